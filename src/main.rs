use clap::{Parser, Subcommand};
use dotenv::dotenv;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use recipebox::config::ServerConfig;
use recipebox::db::{self, migrations::Migrator};
use recipebox::services::auth_service;
use recipebox::storage::MediaStore;
use recipebox::web;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an administrative account with staff and superuser flags set.
    CreateSuperuser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        name: String,
    },
}

fn init_logging() {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily("logs", "server.log");
    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false).json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    init_logging();
    dotenv().ok();

    let config = match ServerConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load server configuration: {}", e);
            return Err(e.into());
        }
    };

    let db = db::connect_with_retry(&config.database_url).await;
    Migrator::up(&db, None).await?;

    if let Some(Command::CreateSuperuser { email, password, name }) = args.command {
        let user = auth_service::create_superuser(&db, &email, &password, &name).await?;
        info!(user_id = user.id, email = %user.email, "Superuser created.");
        return Ok(());
    }

    let media = MediaStore::new(config.media_root.clone());
    let app = web::create_axum_router(db, media, config.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(address = %config.bind_addr, "HTTP server listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
