//! Salon client library.
//!
//! Talks to the salon REST API and owns the client-side session state: who
//! is logged in, and the operations that can change that.
//!
//! # Architecture
//!
//! - [`api`] - `SalonApi` trait and its `reqwest` implementation (cookie session)
//! - [`session`] - `SessionStore`, the single source of truth for the session
//! - [`catalog`] - Cached services listing
//! - [`signup`] - Signup form validation
//! - [`state`] - Services constructed once at startup and passed down

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod session;
pub mod signup;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiError, HttpApiClient, SalonApi};
pub use catalog::ServiceCatalog;
pub use config::{ApiConfig, ClientConfig, ConfigError};
pub use error::Error;
pub use session::{SessionPhase, SessionState, SessionStore};
pub use signup::{SignupError, SignupForm};
pub use state::AppState;
