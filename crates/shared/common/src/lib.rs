//! Common utilities shared across services.
//!
//! This crate provides:
//! - The application error taxonomy and its client-facing payload
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{normalize_path, AppError, AppResult, ErrorResponse, OptionExt};
