//! Core types for the salon.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the records returned by the salon API.

pub mod client;
pub mod email;
mod flag;
pub mod id;
pub mod price;
pub mod reservation;
pub mod service;
pub mod status;

pub use client::ClientProfile;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use reservation::Reservation;
pub use service::SalonService;
pub use status::*;
