use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

pub mod entities;
pub mod migrations;
pub mod services;

/// Polls the store until it accepts connections. The database container may
/// still be starting when the server comes up, so retry instead of failing.
pub async fn connect_with_retry(database_url: &str) -> DatabaseConnection {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(10);

    loop {
        match Database::connect(opt.clone()).await {
            Ok(conn) => {
                info!("Database connection established.");
                return conn;
            }
            Err(e) => {
                warn!(error = %e, "Database not available yet, retrying in 1s.");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
