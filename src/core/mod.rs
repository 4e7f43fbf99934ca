//! Core types for v2b
//!
//! Error handling lives here: [`V2bError`] for precise handling in code and
//! [`ErrorContext`] / [`user_friendly_error`] for presenting failures to CLI users.

pub mod error;

pub use error::{ErrorContext, V2bError, user_friendly_error};
