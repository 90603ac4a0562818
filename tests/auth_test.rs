mod common;

use assert_matches::assert_matches;
use kaiwhakarite_api::auth::{AuthError, AuthService, RegisterRequest};

fn register_request(email: &str, role: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: "kia-kaha-2026".to_string(),
        first_name: "Aroha".to_string(),
        last_name: "Ngata".to_string(),
        role: role.map(str::to_string),
        whanau_group: None,
        marae: Some("Te Marae o Test".to_string()),
        language_preference: None,
    }
}

#[tokio::test]
async fn registration_defaults_to_the_whanau_role() {
    let ctx = common::setup().await;
    let auth = &ctx.services.auth;

    let created = auth
        .register(register_request("aroha@example.org", None))
        .await
        .unwrap();

    assert_eq!(created.email, "aroha@example.org");
    assert_eq!(created.role, "Whānau");
    assert_eq!(created.status, "Active");
    assert_eq!(created.language_preference, "en");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let ctx = common::setup().await;
    let auth = &ctx.services.auth;

    auth.register(register_request("aroha@example.org", None))
        .await
        .unwrap();
    let second = auth
        .register(register_request("aroha@example.org", None))
        .await;

    assert_matches!(second, Err(AuthError::EmailTaken));
}

#[tokio::test]
async fn unknown_roles_are_rejected() {
    let ctx = common::setup().await;

    let result = ctx
        .services
        .auth
        .register(register_request("aroha@example.org", Some("Superuser")))
        .await;

    assert_matches!(result, Err(AuthError::InvalidRole(_)));
}

#[tokio::test]
async fn login_round_trips_through_token_validation() {
    let ctx = common::setup().await;
    let auth = &ctx.services.auth;

    let created = auth
        .register(register_request("kaimahi@example.org", Some("Kaimahi")))
        .await
        .unwrap();

    let tokens = auth
        .login("kaimahi@example.org", "kia-kaha-2026")
        .await
        .unwrap();
    assert_eq!(tokens.token_type, "Bearer");
    assert_eq!(tokens.user.id, created.id);

    let claims = auth.validate_token(&tokens.access_token).await.unwrap();
    assert_eq!(claims.sub, created.id.to_string());
    assert_eq!(claims.email, "kaimahi@example.org");
    assert_eq!(claims.role, "Kaimahi");
}

#[tokio::test]
async fn wrong_password_is_an_invalid_credential() {
    let ctx = common::setup().await;
    let auth = &ctx.services.auth;

    auth.register(register_request("aroha@example.org", None))
        .await
        .unwrap();

    let wrong = auth.login("aroha@example.org", "not-the-password").await;
    assert_matches!(wrong, Err(AuthError::InvalidCredentials));

    let unknown = auth.login("nobody@example.org", "kia-kaha-2026").await;
    assert_matches!(unknown, Err(AuthError::InvalidCredentials));
}

#[tokio::test]
async fn revoked_tokens_stop_validating() {
    let ctx = common::setup().await;
    let auth = &ctx.services.auth;

    auth.register(register_request("aroha@example.org", None))
        .await
        .unwrap();
    let tokens = auth.login("aroha@example.org", "kia-kaha-2026").await.unwrap();

    auth.revoke_token(&tokens.access_token).await.unwrap();

    let result = auth.validate_token(&tokens.access_token).await;
    assert_matches!(result, Err(AuthError::RevokedToken));
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
    let ctx = common::setup().await;
    let auth = &ctx.services.auth;

    let created = auth
        .register(register_request("aroha@example.org", None))
        .await
        .unwrap();

    let denied = auth
        .change_password(created.id, "wrong-password", "new-password-123")
        .await;
    assert_matches!(denied, Err(AuthError::InvalidCredentials));

    auth.change_password(created.id, "kia-kaha-2026", "new-password-123")
        .await
        .unwrap();

    let old = auth.login("aroha@example.org", "kia-kaha-2026").await;
    assert_matches!(old, Err(AuthError::InvalidCredentials));
    auth.login("aroha@example.org", "new-password-123")
        .await
        .unwrap();
}

#[tokio::test]
async fn tokens_from_another_secret_are_invalid() {
    let ctx = common::setup().await;

    let mut other_config = common::test_config();
    other_config.jwt_secret = "aDifferentSecretEntirely-0123456789-abcdef".to_string();
    let other = AuthService::new(
        kaiwhakarite_api::auth::AuthConfig::new(
            other_config.jwt_secret,
            std::time::Duration::from_secs(3600),
        ),
        ctx.db.clone(),
    );

    let created = ctx
        .services
        .auth
        .register(register_request("aroha@example.org", None))
        .await
        .unwrap();
    let account = ctx.services.auth.profile(created.id).await.unwrap();
    assert_eq!(account.id, created.id);

    let tokens = ctx
        .services
        .auth
        .login("aroha@example.org", "kia-kaha-2026")
        .await
        .unwrap();
    let result = other.validate_token(&tokens.access_token).await;
    assert_matches!(result, Err(AuthError::InvalidToken));
}
