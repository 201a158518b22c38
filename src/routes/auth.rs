//! Account routes
//!
//! Registration, login, logout, and the registered-account listing.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{hash_password, issue_access_token, verify_password, SessionRegistry};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::notification_client::NotificationClient;
use crate::validators::is_valid_username;

/// Account registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
}

/// Login form, submitted urlencoded
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registered account, as exposed to clients. The password hash never
/// leaves the database layer.
#[derive(Serialize)]
pub struct RegisteredAccount {
    pub id: i64,
    pub name: String,
}

/// Bearer-token response for a successful login
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /register
///
/// Register a new account with a name and password. The password is
/// hashed before it reaches storage; the response carries id and name
/// only.
///
/// # Errors
/// - 400: Validation errors (empty or malformed name)
/// - 409: Name already registered
/// - 500: Internal server error
pub async fn register(
    form: web::Json<RegisterRequest>,
    pool: web::Data<PgPool>,
    notifier: web::Data<NotificationClient>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("account_registration");

    let name = is_valid_username(&form.name)?;
    let password_hash = hash_password(&form.password)?;

    let (account_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO accounts (name, password_hash)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(&name)
    .bind(&password_hash)
    .fetch_one(pool.get_ref())
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        account_id,
        "Account registered successfully"
    );

    // Welcome notification, dispatched after the row is committed.
    // Best-effort: a failure is logged and never reaches the client.
    let notifier = notifier.get_ref().clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.send(account_id, "Welcome to the platform!").await {
            tracing::warn!(account_id, error = %e, "Welcome notification failed");
        }
    });

    Ok(HttpResponse::Ok().json(RegisteredAccount {
        id: account_id,
        name,
    }))
}

/// POST /login
///
/// Authenticate with a urlencoded username/password form and receive a
/// bearer token.
///
/// # Errors
/// - 401: Invalid credentials
/// - 500: Internal server error
///
/// # Security Notes
/// Unknown usernames and wrong passwords produce the identical response,
/// so the endpoint cannot be used to enumerate accounts.
pub async fn login(
    form: web::Form<LoginForm>,
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("account_login");

    let account = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, password_hash FROM accounts WHERE name = $1",
    )
    .bind(&form.username)
    .fetch_optional(pool.get_ref())
    .await?;

    let (account_id, name, password_hash) = match account {
        Some(account) => account,
        None => return Err(AppError::Auth(AuthError::InvalidCredentials)),
    };

    if !verify_password(&form.password, &password_hash) {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    let access_token = issue_access_token(&name, Utc::now(), jwt_config.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        account_id,
        "Login succeeded"
    );

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// POST /logout
///
/// Record the presented bearer token as logged out. Succeeds
/// unconditionally: expired, malformed, and already-revoked tokens are all
/// accepted, only a missing Authorization header fails.
///
/// # Errors
/// - 401: No bearer token in the Authorization header
pub async fn logout(
    req: HttpRequest,
    registry: web::Data<SessionRegistry>,
) -> Result<HttpResponse, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Auth(AuthError::MissingToken))?;

    registry.revoke(token);

    tracing::info!(revoked_total = registry.len(), "Token logged out");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Successfully logged out"
    })))
}

/// GET /registeredusers
///
/// List all registered accounts, id and name only.
pub async fn list_registered(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let accounts = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM accounts ORDER BY id")
        .fetch_all(pool.get_ref())
        .await?;

    let accounts: Vec<RegisteredAccount> = accounts
        .into_iter()
        .map(|(id, name)| RegisteredAccount { id, name })
        .collect();

    Ok(HttpResponse::Ok().json(accounts))
}
