//! Core domain models, configuration and errors for liveboard.
//!
//! This module contains the message types decoded from the demo server
//! streams and the ambient pieces every other module builds on.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod retry;
pub mod types;

// Re-export commonly used types
pub use config::{Config, ConfigBuilder};
pub use error::{LiveboardError, Result};
pub use retry::Backoff;
pub use types::{FieldSnapshot, Position, Sample};
