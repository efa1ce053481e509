//! Salon REST API client.
//!
//! # Architecture
//!
//! - [`SalonApi`] is the seam between the session container and the network;
//!   tests drive the container through an in-memory implementation
//! - [`HttpApiClient`] implements it with `reqwest`, keeping the server's
//!   session cookie in a cookie store
//! - Non-2xx responses become [`ApiError::Status`], carrying the `message`
//!   field of the JSON error body when the server sent one

mod http;
pub mod types;

pub use http::HttpApiClient;
pub use types::*;

use std::future::Future;

use secrecy::SecretString;
use thiserror::Error;

use salon_core::{Reservation, SalonService};

/// Errors that can occur when calling the salon API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("(no message)"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, if any.
        message: Option<String>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status code of the failure, when there was a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            Self::Parse(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Human-readable message supplied by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    /// Whether the server rejected the call for lack of a session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Operations of the salon REST API consumed by this crate.
///
/// Every method resolves to the decoded success body or an [`ApiError`].
pub trait SalonApi: Send + Sync + 'static {
    /// Ask whether the current session cookie belongs to a client.
    fn check_auth(&self) -> impl Future<Output = Result<AuthCheck, ApiError>> + Send;

    /// Log in with email and password; the server sets the session cookie.
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// Create a client account. Does not log the client in.
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<RegisterResponse, ApiError>> + Send;

    /// End the server-side session.
    fn logout(&self) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Update fields of the authenticated client's profile.
    fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<MessageResponse, ApiError>> + Send;

    /// Change the authenticated client's password.
    fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> impl Future<Output = Result<MessageResponse, ApiError>> + Send;

    /// Confirm an email address with the token sent at registration.
    fn verify_email(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<MessageResponse, ApiError>> + Send;

    /// Request a password reset link.
    fn forgot_password(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<MessageResponse, ApiError>> + Send;

    /// Set a new password using a reset token.
    fn reset_password(
        &self,
        token: &str,
        new_password: &SecretString,
    ) -> impl Future<Output = Result<MessageResponse, ApiError>> + Send;

    /// Check whether a reset token is still usable.
    fn verify_reset_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<ResetTokenCheck, ApiError>> + Send;

    /// Reservations of the authenticated client.
    fn my_reservations(&self) -> impl Future<Output = Result<Vec<Reservation>, ApiError>> + Send;

    /// Services offered by the salon.
    fn services(&self) -> impl Future<Output = Result<Vec<SalonService>, ApiError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Email déjà utilisé".to_string()),
        };
        assert_eq!(err.to_string(), "API error: 400 - Email déjà utilisé");

        let err = ApiError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "API error: 502 - (no message)");
    }

    #[test]
    fn test_accessors() {
        let err = ApiError::Status {
            status: 401,
            message: Some("Non authentifié".to_string()),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("Non authentifié"));
    }

    #[test]
    fn test_blank_server_message_is_ignored() {
        let err = ApiError::Status {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_parse_error_has_no_status() {
        let err = ApiError::from(serde_json::from_str::<u8>("nope").unwrap_err());
        assert_eq!(err.status(), None);
        assert_eq!(err.server_message(), None);
    }
}
