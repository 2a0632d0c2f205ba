/*!
 * # Authentication and Authorization Module
 *
 * This module provides authentication and authorization services for the API:
 *
 * - JWT (JSON Web Tokens) access tokens with refresh token support
 * - Refresh tokens persisted in the database (hashed), rotated on use and
 *   removed by a periodic sweeper
 * - Role-based access control (RBAC) and permission verification
 */

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

// Entity modules
pub mod refresh_token;
pub mod user;

// Feature modules
mod permissions;
mod rbac;

// Re-exports
pub use permissions::*;
pub use rbac::*;

pub use user::Model as User;

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,              // Subject (user ID)
    pub username: String,         // Login name
    pub role: String,             // Static role name
    pub permissions: Vec<String>, // Effective permissions at issue time
    pub jti: String,              // JWT ID (unique identifier for this token)
    pub iat: i64,                 // Issued at time
    pub exp: i64,                 // Expiration time
    pub nbf: i64,                 // Not valid before time
    pub iss: String,              // Issuer
    pub aud: String,              // Audience
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub token_id: String,
}

impl AuthUser {
    /// Check if the user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    /// Check if the user holds a permission, honoring wildcards
    pub fn has_permission(&self, permission: &str) -> bool {
        let rbac = RbacService::new();
        self.permissions
            .iter()
            .any(|held| rbac.check_permission(held, permission))
    }

    /// Check if the user is an admin
    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }

    /// Parsed user id, when the subject is a well-formed UUID
    pub fn user_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.user_id).ok()
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_token_expiration: Duration,
    pub refresh_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_issuer: String,
        jwt_audience: String,
        access_token_expiration: Duration,
        refresh_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            access_token_expiration,
            refresh_token_expiration,
        }
    }
}

/// Token pair returned by login and refresh
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}

/// Login request body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Refresh/logout request body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    ExpiredToken,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
    #[error("Token creation failed: {0}")]
    TokenCreation(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingAuth => (StatusCode::UNAUTHORIZED, "Missing authentication".to_string()),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            Self::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token expired".to_string()),
            Self::InsufficientPermissions => {
                (StatusCode::FORBIDDEN, "Insufficient permissions".to_string())
            }
            Self::TokenCreation(_) | Self::DatabaseError(_) | Self::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "authentication failure");
        }

        let body = Json(crate::errors::ErrorResponse {
            success: false,
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            request_id: crate::middleware_helpers::request_id::current_request_id()
                .map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        });

        (status, body).into_response()
    }
}

/// Authentication service that handles credential checks, token issuance and
/// refresh token persistence
#[derive(Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
    rbac: RbacService,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self {
            config,
            db,
            rbac: RbacService::new(),
        }
    }

    /// Hash a password with argon2
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::InternalError(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against a stored argon2 hash
    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        PasswordHash::new(password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Effective permissions for a user: role permissions plus extras
    pub fn permissions_for(&self, user: &user::Model) -> Vec<String> {
        let mut permissions = self.rbac.get_role_permissions(&user.role);
        for extra in user.extra_permissions() {
            if !permissions.contains(&extra) {
                permissions.push(extra);
            }
        }
        permissions
    }

    /// Validate credentials and issue a token pair
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<TokenPair, AuthError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(credentials.username.clone()))
            .filter(user::Column::IsActive.eq(true))
            .one(self.db.as_ref())
            .await?;

        let user = match found {
            Some(user) => user,
            None => {
                debug!(username = %credentials.username, "login attempt for unknown or inactive user");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.verify_password(&credentials.password, &user.password_hash) {
            warn!(username = %credentials.username, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_token_pair(&user).await
    }

    /// Issue an access token plus a fresh persisted refresh token
    pub async fn issue_token_pair(&self, user: &user::Model) -> Result<TokenPair, AuthError> {
        let access_token = self.issue_access_token(user)?;

        let raw_refresh: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect();

        let expires_at = Utc::now()
            + ChronoDuration::from_std(self.config.refresh_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let row = refresh_token::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            token_hash: Set(hash_refresh_token(&raw_refresh)),
            expires_at: Set(expires_at),
            revoked: Set(false),
            created_at: Set(Utc::now()),
        };
        row.insert(self.db.as_ref()).await?;

        Ok(TokenPair {
            access_token,
            refresh_token: raw_refresh,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs(),
        })
    }

    /// Generate a signed JWT access token for a user
    pub fn issue_access_token(&self, user: &user::Model) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            permissions: self.permissions_for(user),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a JWT access token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.jwt_issuer.clone()]);
        validation.set_audience(&[self.config.jwt_audience.clone()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }

    /// Rotate a refresh token: revoke the presented one and issue a new pair
    pub async fn refresh(&self, raw_refresh: &str) -> Result<TokenPair, AuthError> {
        let hash = hash_refresh_token(raw_refresh);

        let row = refresh_token::Entity::find()
            .filter(refresh_token::Column::TokenHash.eq(hash))
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if row.revoked {
            warn!(user_id = %row.user_id, "refresh attempt with revoked token");
            return Err(AuthError::InvalidToken);
        }
        if row.expires_at < Utc::now() {
            return Err(AuthError::ExpiredToken);
        }

        let user = user::Entity::find_by_id(row.user_id)
            .filter(user::Column::IsActive.eq(true))
            .one(self.db.as_ref())
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let mut revoked: refresh_token::ActiveModel = row.into();
        revoked.revoked = Set(true);
        revoked.update(self.db.as_ref()).await?;

        self.issue_token_pair(&user).await
    }

    /// Revoke a refresh token (logout)
    pub async fn revoke_refresh_token(&self, raw_refresh: &str) -> Result<(), AuthError> {
        let hash = hash_refresh_token(raw_refresh);

        let row = refresh_token::Entity::find()
            .filter(refresh_token::Column::TokenHash.eq(hash))
            .one(self.db.as_ref())
            .await?;

        if let Some(row) = row {
            let mut active: refresh_token::ActiveModel = row.into();
            active.revoked = Set(true);
            active.update(self.db.as_ref()).await?;
        }

        Ok(())
    }

    /// Delete expired and revoked refresh tokens. Returns the rows removed.
    pub async fn sweep_refresh_tokens(&self) -> Result<u64, AuthError> {
        let result = refresh_token::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(refresh_token::Column::ExpiresAt.lt(Utc::now()))
                    .add(refresh_token::Column::Revoked.eq(true)),
            )
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }
}

fn hash_refresh_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// Background task that periodically removes expired/revoked refresh tokens
pub async fn refresh_token_sweeper(auth_service: Arc<AuthService>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match auth_service.sweep_refresh_tokens().await {
            Ok(0) => {}
            Ok(removed) => info!(removed, "swept expired refresh tokens"),
            Err(e) => warn!(error = %e, "refresh token sweep failed"),
        }
    }
}

/// Authentication middleware that extracts and validates bearer tokens
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers().clone();

    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication service not available",
            )
                .into_response();
        }
    };

    match extract_auth_from_headers(&headers, &auth_service) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Extract authentication info from request headers
fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_value) = auth_header.to_str() {
            if auth_value.starts_with("Bearer ") {
                let token = auth_value.trim_start_matches("Bearer ").trim();
                let claims = auth_service.validate_token(token)?;

                return Ok(AuthUser {
                    user_id: claims.sub,
                    username: claims.username,
                    role: claims.role,
                    permissions: claims.permissions,
                    token_id: claims.jti,
                });
            }
        }
    }

    Err(AuthError::MissingAuth)
}

/// Permission middleware to check if a user has the required permission
pub async fn permission_middleware(
    State(required_permission): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = match request.extensions().get::<AuthUser>() {
        Some(user) => user.clone(),
        None => return Err(AuthError::MissingAuth),
    };

    // Admins hold every permission
    if user.is_admin() {
        return Ok(next.run(request).await);
    }

    if !user.has_permission(&required_permission) {
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(next.run(request).await)
}

/// Extractor: the authenticated user placed in request extensions by
/// `auth_middleware`. Handlers that name this parameter therefore only run
/// behind the middleware.
#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Type alias kept for handler signatures
pub type AuthenticatedUser = AuthUser;

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_permission(self, permission: &str) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_permission(self, permission: &str) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            permission.to_string(),
            permission_middleware,
        ))
        .with_auth()
    }
}

/// Authentication routes. The handlers pull `Arc<AuthService>` out of the
/// app state via `FromRef`.
pub fn auth_routes() -> axum::Router<crate::AppState> {
    axum::Router::new()
        .route("/login", axum::routing::post(login_handler))
        .route("/refresh", axum::routing::post(refresh_token_handler))
        .route("/logout", axum::routing::post(logout_handler))
        .layer(DefaultBodyLimit::max(1024 * 64)) // 64KB limit
}

/// Login handler
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Token pair issued"),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<crate::ApiResponse<TokenPair>>, AuthError> {
    let token_pair = auth_service.login(&credentials).await?;
    info!(username = %credentials.username, "user logged in");
    Ok(Json(crate::ApiResponse::success(token_pair)))
}

/// Refresh token handler
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token pair rotated"),
        (status = 401, description = "Unknown, expired or revoked token", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh_token_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(refresh_request): Json<RefreshTokenRequest>,
) -> Result<Json<crate::ApiResponse<TokenPair>>, AuthError> {
    let token_pair = auth_service.refresh(&refresh_request.refresh_token).await?;
    Ok(Json(crate::ApiResponse::success(token_pair)))
}

/// Logout handler: revokes the presented refresh token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = RefreshTokenRequest,
    responses((status = 200, description = "Refresh token revoked")),
    tag = "auth"
)]
pub async fn logout_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(refresh_request): Json<RefreshTokenRequest>,
) -> Result<Json<crate::ApiResponse<serde_json::Value>>, AuthError> {
    auth_service
        .revoke_refresh_token(&refresh_request.refresh_token)
        .await?;
    Ok(Json(crate::ApiResponse::success(
        serde_json::json!({ "message": "Successfully logged out" }),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> AuthService {
        let config = AuthConfig::new(
            "fN3qL8vW1xZ5cR9tY2bA7mK4pD6sG0hJfN3qL8vW1xZ5cR9tY2bA7mK4pD6sG0hJ".into(),
            "comercio-auth".into(),
            "comercio-api".into(),
            Duration::from_secs(3600),
            Duration::from_secs(604_800),
        );
        // No DB interaction in these tests
        let db = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        AuthService::new(config, db)
    }

    fn test_user(role: &str) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            username: "amartinez".into(),
            email: "amartinez@example.com".into(),
            password_hash: String::new(),
            full_name: "Ana Martinez".into(),
            role: role.into(),
            permissions: serde_json::json!([]),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn password_hash_roundtrip() {
        let service = test_service();
        let hash = service.hash_password("s3creta!").unwrap();
        assert!(service.verify_password("s3creta!", &hash));
        assert!(!service.verify_password("wrong", &hash));
    }

    #[test]
    fn issued_token_validates_and_carries_claims() {
        let service = test_service();
        let user = test_user("manager");
        let token = service.issue_access_token(&user).unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "amartinez");
        assert_eq!(claims.role, "manager");
        assert!(claims.permissions.contains(&"inventory:adjust".to_string()));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let service = test_service();
        let user = test_user("user");
        let token = service.issue_access_token(&user).unwrap();

        let mut other = test_service();
        other.config.jwt_secret =
            "zZ9yX8wV7uT6sR5qP4oN3mL2kJ1iH0gFzZ9yX8wV7uT6sR5qP4oN3mL2kJ1iH0gF".into();
        assert!(matches!(
            other.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn extra_permissions_extend_role() {
        let service = test_service();
        let mut user = test_user("user");
        user.permissions = serde_json::json!(["inventory:adjust"]);

        let perms = service.permissions_for(&user);
        assert!(perms.contains(&"inventory:adjust".to_string()));
        assert!(perms.contains(&"products:read".to_string()));
    }

    #[test]
    fn auth_user_permission_checks_honor_wildcards() {
        let user = AuthUser {
            user_id: Uuid::new_v4().to_string(),
            username: "x".into(),
            role: "manager".into(),
            permissions: vec!["purchases:*".into()],
            token_id: "jti".into(),
        };
        assert!(user.has_permission("purchases:receive"));
        assert!(!user.has_permission("users:manage"));
    }
}
