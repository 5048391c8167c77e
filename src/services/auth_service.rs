use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::DatabaseConnection;

use crate::db::entities::user;
use crate::db::services::user_service;
use crate::web::error::AppError;
use crate::web::models::{Claims, RegisterRequest, TokenRequest, TokenResponse, UserResponse};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Lower-cases the domain part of the address; the local part is kept as the
/// user typed it. Idempotent.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let well_formed = email
        .rsplit_once('@')
        .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
        .unwrap_or(false);
    if !well_formed {
        return Err(AppError::InvalidInput("A valid email address is required.".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }
    Ok(())
}

pub async fn register_user(
    db: &DatabaseConnection,
    req: RegisterRequest,
) -> Result<UserResponse, AppError> {
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let email = normalize_email(&req.email);
    if user_service::find_by_email(db, &email).await?.is_some() {
        return Err(AppError::InvalidInput(
            "A user with this email already exists.".to_string(),
        ));
    }

    let password_hash =
        hash(&req.password, DEFAULT_COST).map_err(|e| AppError::PasswordHashingError(e.to_string()))?;

    let user_model = user_service::create_user(db, &email, &req.name, &password_hash, false, false)
        .await?;

    Ok(UserResponse {
        id: user_model.id,
        email: user_model.email,
        name: user_model.name,
    })
}

/// Administrative bootstrap; reached through the CLI only, never over HTTP.
pub async fn create_superuser(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    name: &str,
) -> Result<user::Model, AppError> {
    validate_email(email)?;
    validate_password(password)?;

    let email = normalize_email(email);
    if user_service::find_by_email(db, &email).await?.is_some() {
        return Err(AppError::InvalidInput(
            "A user with this email already exists.".to_string(),
        ));
    }

    let password_hash =
        hash(password, DEFAULT_COST).map_err(|e| AppError::PasswordHashingError(e.to_string()))?;

    Ok(user_service::create_user(db, &email, name, &password_hash, true, true).await?)
}

/// Unknown email, inactive account and wrong password all surface as the same
/// error so the token endpoint leaks nothing about which accounts exist.
pub async fn login_user(
    db: &DatabaseConnection,
    req: TokenRequest,
    jwt_secret: &str,
) -> Result<TokenResponse, AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput("Email and password are required.".to_string()));
    }

    let user = user_service::find_by_email(db, &req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !user.is_active {
        return Err(AppError::InvalidCredentials);
    }

    let valid_password = verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))?;

    if !valid_password {
        return Err(AppError::InvalidCredentials);
    }

    create_jwt_for_user(&user, jwt_secret)
}

pub fn create_jwt_for_user(user: &user::Model, jwt_secret: &str) -> Result<TokenResponse, AppError> {
    let expiration = (Utc::now() + Duration::hours(24 * 7)).timestamp() as usize;

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id,
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(e.to_string()))?;

    Ok(TokenResponse { token })
}

/// Partial profile update; a provided password is validated and re-hashed.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i32,
    name: Option<String>,
    password: Option<String>,
) -> Result<user::Model, AppError> {
    let password_hash = match password.as_deref() {
        Some(password) => {
            validate_password(password)?;
            Some(
                hash(password, DEFAULT_COST)
                    .map_err(|e| AppError::PasswordHashingError(e.to_string()))?,
            )
        }
        None => None,
    };

    user_service::update_profile(db, user_id, name, password_hash)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))
}
