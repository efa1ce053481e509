//! Crate-level error type and Sentry user context helpers.
//!
//! Session operations never return errors (see [`crate::session`]); this
//! type only covers building the client stack at startup.

use thiserror::Error;

use salon_core::ClientId;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Errors that can occur while setting up the salon client.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Set the Sentry user context for the authenticated client.
///
/// Errors captured afterwards are associated with this client.
pub fn set_sentry_user(client_id: ClientId, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(client_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Called whenever the session drops its client.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a session transition.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(ConfigError::MissingEnvVar("SALON_API_URL".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing environment variable: SALON_API_URL"
        );
    }

    #[test]
    fn test_sentry_helpers_are_noops_without_client() {
        // No Sentry client is bound in tests; these must not panic.
        set_sentry_user(ClientId::new(1), Some("a@b.fr"));
        add_breadcrumb("session", "logged in");
        clear_sentry_user();
    }
}
