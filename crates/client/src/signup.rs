//! Signup form validation.
//!
//! Checked before anything is sent so obvious mistakes get an immediate
//! message. The server still has the final word (e.g. email already used).

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use salon_core::{Email, EmailError};

use crate::api::RegisterRequest;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Reasons a signup form is rejected. Messages are shown to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignupError {
    #[error("Le nom est requis")]
    MissingNom,

    #[error("Le prénom est requis")]
    MissingPrenom,

    #[error("Adresse email invalide")]
    InvalidEmail(#[source] EmailError),

    #[error("Le mot de passe doit contenir au moins {MIN_PASSWORD_LENGTH} caractères")]
    PasswordTooShort,

    #[error("Les mots de passe ne correspondent pas")]
    PasswordMismatch,
}

/// Raw signup form input.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub adresse: Option<String>,
    pub password: SecretString,
    pub password_confirmation: SecretString,
}

impl SignupForm {
    /// Validate the form and build the registration request.
    ///
    /// Names and optional fields are trimmed; blank optional fields are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns the first [`SignupError`] found, checking fields in form order.
    pub fn validate(self) -> Result<RegisterRequest, SignupError> {
        let nom = self.nom.trim();
        if nom.is_empty() {
            return Err(SignupError::MissingNom);
        }

        let prenom = self.prenom.trim();
        if prenom.is_empty() {
            return Err(SignupError::MissingPrenom);
        }

        let email = Email::parse(&self.email).map_err(SignupError::InvalidEmail)?;

        let password = self.password.expose_secret();
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(SignupError::PasswordTooShort);
        }
        if password != self.password_confirmation.expose_secret() {
            return Err(SignupError::PasswordMismatch);
        }

        Ok(RegisterRequest {
            nom: nom.to_string(),
            prenom: prenom.to_string(),
            email: email.into_inner(),
            telephone: non_blank(self.telephone),
            adresse: non_blank(self.adresse),
            password: self.password,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> SignupForm {
        SignupForm {
            nom: " Martin ".to_string(),
            prenom: "Léa".to_string(),
            email: "Lea@Salon.FR".to_string(),
            telephone: Some("  ".to_string()),
            adresse: Some(" 3 rue des Lilas ".to_string()),
            password: SecretString::from("motdepasse"),
            password_confirmation: SecretString::from("motdepasse"),
        }
    }

    #[test]
    fn test_valid_form_builds_request() {
        let request = form().validate().unwrap();
        assert_eq!(request.nom, "Martin");
        assert_eq!(request.email, "Lea@salon.fr");
        assert_eq!(request.telephone, None);
        assert_eq!(request.adresse.as_deref(), Some("3 rue des Lilas"));
        assert_eq!(request.password.expose_secret(), "motdepasse");
    }

    #[test]
    fn test_names_required() {
        let mut f = form();
        f.nom = "   ".to_string();
        assert_eq!(f.validate().unwrap_err(), SignupError::MissingNom);

        let mut f = form();
        f.prenom = String::new();
        assert_eq!(f.validate().unwrap_err(), SignupError::MissingPrenom);
    }

    #[test]
    fn test_invalid_email() {
        let mut f = form();
        f.email = "pas-un-email".to_string();
        let err = f.validate().unwrap_err();
        assert!(matches!(err, SignupError::InvalidEmail(_)));
        assert_eq!(err.to_string(), "Adresse email invalide");
    }

    #[test]
    fn test_password_length_counts_characters() {
        let mut f = form();
        f.password = SecretString::from("court");
        f.password_confirmation = SecretString::from("court");
        let err = f.validate().unwrap_err();
        assert_eq!(err, SignupError::PasswordTooShort);
        assert_eq!(
            err.to_string(),
            "Le mot de passe doit contenir au moins 8 caractères"
        );

        // 8 characters, more than 8 bytes
        let mut f = form();
        f.password = SecretString::from("élégance");
        f.password_confirmation = SecretString::from("élégance");
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_confirmation_must_match() {
        let mut f = form();
        f.password_confirmation = SecretString::from("autrechose");
        assert_eq!(f.validate().unwrap_err(), SignupError::PasswordMismatch);
    }
}
