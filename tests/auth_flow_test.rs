mod common;

use comercio_api::{
    auth::{refresh_token, AuthConfig, AuthError, AuthService, LoginCredentials},
    errors::ServiceError,
    services::users::{CreateUserCommand, UpdateUserCommand, UserService},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use std::sync::Arc;
use std::time::Duration;

fn auth_config() -> AuthConfig {
    AuthConfig::new(
        "fN3qL8vW1xZ5cR9tY2bA7mK4pD6sG0hJfN3qL8vW1xZ5cR9tY2bA7mK4pD6sG0hJ".to_string(),
        "comercio-auth".to_string(),
        "comercio-api".to_string(),
        Duration::from_secs(3600),
        Duration::from_secs(604_800),
    )
}

async fn setup() -> (Arc<AuthService>, UserService) {
    let db = common::setup_db().await;
    let auth = Arc::new(AuthService::new(auth_config(), db.clone()));
    let users = UserService::new(db, auth.clone(), common::event_sender());
    (auth, users)
}

fn almacenero() -> CreateUserCommand {
    CreateUserCommand {
        username: "jperez".to_string(),
        email: "jperez@example.com".to_string(),
        password: "s3creta-larga".to_string(),
        full_name: "Juan Pérez".to_string(),
        role: "user".to_string(),
        permissions: vec![],
    }
}

#[tokio::test]
async fn login_issues_tokens_and_refresh_rotates_them() {
    let (auth, users) = setup().await;
    users.create_user(almacenero()).await.unwrap();

    let pair = auth
        .login(&LoginCredentials {
            username: "jperez".to_string(),
            password: "s3creta-larga".to_string(),
        })
        .await
        .unwrap();

    // Access token validates and carries role permissions
    let claims = auth.validate_token(&pair.access_token).unwrap();
    assert_eq!(claims.username, "jperez");
    assert_eq!(claims.role, "user");
    assert!(claims.permissions.contains(&"inventory:read".to_string()));

    // Refresh rotates: the old token stops working, the new one works
    let rotated = auth.refresh(&pair.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, pair.refresh_token);

    let err = auth.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));

    auth.refresh(&rotated.refresh_token).await.unwrap();
}

#[tokio::test]
async fn wrong_password_and_inactive_users_cannot_login() {
    let (auth, users) = setup().await;
    let created = users.create_user(almacenero()).await.unwrap();

    let err = auth
        .login(&LoginCredentials {
            username: "jperez".to_string(),
            password: "incorrecta".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    // Deactivate (as an admin, not the user themselves)
    users
        .update_user(
            created.id,
            UpdateUserCommand {
                is_active: Some(false),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    let err = auth
        .login(&LoginCredentials {
            username: "jperez".to_string(),
            password: "s3creta-larga".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn logout_revokes_and_sweeper_purges() {
    let (auth, users) = setup().await;
    users.create_user(almacenero()).await.unwrap();

    let pair = auth
        .login(&LoginCredentials {
            username: "jperez".to_string(),
            password: "s3creta-larga".to_string(),
        })
        .await
        .unwrap();

    auth.revoke_refresh_token(&pair.refresh_token).await.unwrap();
    let err = auth.refresh(&pair.refresh_token).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));

    // The sweep removes the revoked row
    let removed = auth.sweep_refresh_tokens().await.unwrap();
    assert_eq!(removed, 1);
    let remaining = refresh_token::Entity::find()
        .count(auth.db.as_ref())
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn user_management_rules() {
    let (_auth, users) = setup().await;
    let created = users.create_user(almacenero()).await.unwrap();

    // Unknown role rejected
    let mut bad_role = almacenero();
    bad_role.username = "otra".to_string();
    bad_role.email = "otra@example.com".to_string();
    bad_role.role = "superuser".to_string();
    let err = users.create_user(bad_role).await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    // Duplicate username among active users rejected
    let err = users.create_user(almacenero()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // Users cannot deactivate themselves
    let err = users
        .update_user(
            created.id,
            UpdateUserCommand {
                is_active: Some(false),
                ..Default::default()
            },
            Some(created.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    // Extra permissions persist
    let updated = users
        .update_user(
            created.id,
            UpdateUserCommand {
                permissions: Some(vec!["inventory:adjust".to_string()]),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(
        updated.extra_permissions(),
        vec!["inventory:adjust".to_string()]
    );
}
