//! Salon Core - Shared domain types.
//!
//! This crate provides the types exchanged with the salon REST API and used
//! across the workspace:
//! - `client` - API client collaborator and session state container
//! - `cli` - Terminal front end driving the session
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, email, prices, statuses and the profile,
//!   reservation and service records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
