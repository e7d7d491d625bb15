//! DropLink Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! pairing-code registry shared across all DropLink components.

pub mod config;
pub mod error;
pub mod models;
pub mod registry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use registry::{PairingRegistry, SweptCode};
