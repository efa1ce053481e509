//! Result values returned by session operations.
//!
//! Operations never fail with an error; callers branch on `success` (or
//! `valid`) and show `message`.

use salon_core::{ClientId, Reservation};

use crate::api::ApiError;

/// User-facing messages, in the salon's language.
pub mod messages {
    pub const LOGIN_SUCCEEDED: &str = "Connexion réussie";
    pub const LOGIN_FAILED: &str = "Erreur de connexion";
    pub const REGISTER_SUCCEEDED: &str = "Inscription réussie";
    pub const REGISTER_FAILED: &str = "Erreur lors de l'inscription";
    pub const PROFILE_UPDATED: &str = "Profil mis à jour avec succès";
    pub const PROFILE_UPDATE_FAILED: &str = "Erreur lors de la mise à jour du profil";
    pub const PASSWORD_CHANGED: &str = "Mot de passe modifié avec succès";
    pub const PASSWORD_CHANGE_FAILED: &str = "Erreur lors du changement de mot de passe";
    pub const EMAIL_VERIFIED: &str = "Email vérifié avec succès";
    pub const EMAIL_VERIFICATION_FAILED: &str = "Erreur lors de la vérification de l'email";
    pub const RESET_EMAIL_SENT: &str = "Email de réinitialisation envoyé";
    pub const RESET_EMAIL_FAILED: &str = "Erreur lors de l'envoi de l'email de réinitialisation";
    pub const PASSWORD_RESET: &str = "Mot de passe réinitialisé avec succès";
    pub const PASSWORD_RESET_FAILED: &str = "Erreur lors de la réinitialisation du mot de passe";
    pub const RESET_TOKEN_VALID: &str = "Token valide";
    pub const RESET_TOKEN_INVALID: &str = "Token invalide ou expiré";
    pub const RESERVATIONS_FAILED: &str = "Erreur lors du chargement des réservations";
}

/// Message to show for a failed call: the server's own message when it sent
/// one, otherwise the operation's fallback.
#[must_use]
pub fn failure_message(err: &ApiError, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_string()
}

/// Outcome of an operation that only reports success and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

impl OperationResult {
    pub(crate) fn succeeded(message: Option<String>, default: &str) -> Self {
        Self {
            success: true,
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| default.to_string()),
        }
    }

    pub(crate) fn failed(err: &ApiError, fallback: &str) -> Self {
        Self {
            success: false,
            message: failure_message(err, fallback),
        }
    }
}

/// Outcome of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterResult {
    pub success: bool,
    pub message: String,
    pub client_id: Option<ClientId>,
    pub verification_token: Option<String>,
}

/// Outcome of a reset token check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenValidity {
    pub valid: bool,
    pub message: String,
}

/// Outcome of fetching the client's reservations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationsResult {
    pub success: bool,
    /// Set when the fetch failed.
    pub message: Option<String>,
    pub reservations: Vec<Reservation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_prefers_server_message() {
        let err = ApiError::Status {
            status: 401,
            message: Some("Email ou mot de passe incorrect".to_string()),
        };
        let result = OperationResult::failed(&err, messages::LOGIN_FAILED);
        assert!(!result.success);
        assert_eq!(result.message, "Email ou mot de passe incorrect");
    }

    #[test]
    fn test_failure_falls_back_per_operation() {
        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(
            failure_message(&err, messages::REGISTER_FAILED),
            "Erreur lors de l'inscription"
        );
    }

    #[test]
    fn test_success_default_message() {
        let result = OperationResult::succeeded(None, messages::LOGIN_SUCCEEDED);
        assert!(result.success);
        assert_eq!(result.message, "Connexion réussie");

        let result = OperationResult::succeeded(Some("ok".to_string()), messages::LOGIN_SUCCEEDED);
        assert_eq!(result.message, "ok");
    }
}
