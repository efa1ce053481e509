//! Command implementations.
//!
//! - [`account`] - Session and account commands (status, register, password reset)
//! - [`catalog`] - Services listing
//! - [`shell`] - Interactive loop keeping one session alive

pub mod account;
pub mod catalog;
pub mod shell;
