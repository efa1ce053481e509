//! Request and response bodies of the salon REST API.
//!
//! Field names follow the API's JSON keys (French column names, a few
//! camelCase keys in registration responses).

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use salon_core::{ClientId, ClientProfile};

/// Response of `GET auth/check`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthCheck {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub client: Option<ClientProfile>,
}

/// Body of `POST auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "mot_de_passe", serialize_with = "expose")]
    pub password: SecretString,
}

/// Response of `POST auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub client: ClientProfile,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    #[serde(rename = "mot_de_passe", serialize_with = "expose")]
    pub password: SecretString,
}

/// Response of `POST auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "clientId")]
    pub client_id: Option<ClientId>,
    #[serde(default, rename = "verificationToken")]
    pub verification_token: Option<String>,
}

/// Partial profile update; absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nom.is_none()
            && self.prenom.is_none()
            && self.email.is_none()
            && self.telephone.is_none()
            && self.adresse.is_none()
    }
}

/// Body of `PUT clients/password`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    #[serde(serialize_with = "expose")]
    pub current_password: SecretString,
    #[serde(serialize_with = "expose")]
    pub new_password: SecretString,
}

/// Body of `POST auth/forgot-password`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

/// Body of `POST auth/reset-password`.
#[derive(Debug, Serialize)]
pub(crate) struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    #[serde(serialize_with = "expose")]
    pub new_password: SecretString,
}

/// Generic `{ "message": ... }` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET auth/verify-reset-token/{token}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetTokenCheck {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body sent with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Passwords only leave their `SecretString` while being written to a body.
fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
