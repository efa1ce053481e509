//! Failures without a server message fall back to per-operation text.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use secrecy::SecretString;

use salon_client::api::ProfileUpdate;
use salon_client::{ApiConfig, HttpApiClient, SessionPhase, SessionStore};
use salon_integration_tests::{LEA_EMAIL, LEA_PASSWORD, StubApi};

fn password(s: &str) -> SecretString {
    SecretString::from(s)
}

#[tokio::test]
async fn test_login_server_error_uses_fallback() {
    let stub = StubApi::start().await;
    let store = SessionStore::connect(stub.client()).await;
    stub.fail("auth/login", 500);

    let result = store.login(LEA_EMAIL, &password(LEA_PASSWORD)).await;

    assert!(!result.success);
    assert_eq!(result.message, "Erreur de connexion");
    assert_eq!(store.phase(), SessionPhase::Anonymous);
}

#[tokio::test]
async fn test_check_server_error_drops_session() {
    let stub = StubApi::start().await;
    let store = SessionStore::connect(stub.client()).await;
    store.login(LEA_EMAIL, &password(LEA_PASSWORD)).await;
    assert!(store.is_authenticated());

    stub.fail("auth/check", 503);
    assert!(!store.check_auth_status().await);
    assert_eq!(store.phase(), SessionPhase::Anonymous);
    assert!(!store.is_loading());

    // The server session is still there
    stub.clear_failures();
    assert!(store.refresh_auth().await);
}

#[tokio::test]
async fn test_logout_failure_still_clears_local_session() {
    let stub = StubApi::start().await;
    let store = SessionStore::connect(stub.client()).await;
    store.login(LEA_EMAIL, &password(LEA_PASSWORD)).await;
    stub.fail("auth/logout", 500);

    store.logout().await;
    assert_eq!(store.phase(), SessionPhase::Anonymous);
}

#[tokio::test]
async fn test_fallbacks_per_operation() {
    let stub = StubApi::start().await;
    let store = SessionStore::connect(stub.client()).await;
    store.login(LEA_EMAIL, &password(LEA_PASSWORD)).await;

    stub.fail("clients/profile", 500);
    stub.fail("clients/password", 500);
    stub.fail("auth/verify-email", 500);
    stub.fail("auth/forgot-password", 500);
    stub.fail("auth/reset-password", 500);
    stub.fail("auth/verify-reset-token", 500);
    stub.fail("reservations/mine", 500);

    let update = ProfileUpdate {
        nom: Some("Martin-Roux".to_string()),
        ..ProfileUpdate::default()
    };
    assert_eq!(
        store.update_profile(&update).await.message,
        "Erreur lors de la mise à jour du profil"
    );
    assert_eq!(
        store
            .change_password(&password(LEA_PASSWORD), &password("nouveau-mdp"))
            .await
            .message,
        "Erreur lors du changement de mot de passe"
    );
    assert_eq!(
        store.verify_email("tok").await.message,
        "Erreur lors de la vérification de l'email"
    );
    assert_eq!(
        store.forgot_password(LEA_EMAIL).await.message,
        "Erreur lors de l'envoi de l'email de réinitialisation"
    );
    assert_eq!(
        store
            .reset_password("tok", &password("nouveau-mdp"))
            .await
            .message,
        "Erreur lors de la réinitialisation du mot de passe"
    );
    assert_eq!(
        store.verify_reset_token("tok").await.message,
        "Token invalide ou expiré"
    );
    assert_eq!(
        store.my_reservations().await.message.as_deref(),
        Some("Erreur lors du chargement des réservations")
    );

    // None of the failures touched the session
    assert_eq!(store.phase(), SessionPhase::Authenticated);
}

#[tokio::test]
async fn test_unreachable_api() {
    // Nothing listens on the discard port
    let config = ApiConfig::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
    let store = SessionStore::connect(HttpApiClient::new(&config).unwrap()).await;

    assert_eq!(store.phase(), SessionPhase::Anonymous);
    let result = store.login(LEA_EMAIL, &password(LEA_PASSWORD)).await;
    assert_eq!(result.message, "Erreur de connexion");
}
