//! liveboard - live terminal dashboard for a WebSocket demo server.
//!
//! liveboard follows two streams of a demo server: a stats stream rendered
//! as sliding-window line charts, and a soccer field stream where the local
//! pointer steers your player and the server's positions are mirrored back.
//!
//! # Architecture
//!
//! - `core`: configuration, errors, wire types and reconnect backoff
//! - `charts`: bounded chart series and the surface they draw on
//! - `field`: pointer debouncing and scene reconciliation
//! - `stream`: reconnecting WebSocket channel
//! - `control`: HTTP load generators and host information of the server
//! - `session`: per-view state fed from one event loop
//! - `tui`: terminal rendering and input
//! - `cli`: command-line interface
//!
//! # Example
//!
//! ```no_run
//! use liveboard_lib::core::Config;
//! use liveboard_lib::{Application, View};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let app = Application::new(config, View::Stats, true)?;
//!     app.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod application;
pub mod charts;
pub mod cli;
pub mod control;
pub mod core;
pub mod field;
pub mod session;
pub mod stream;
pub mod tui;

// Re-export core types for convenience
pub use crate::application::{Application, View};
pub use crate::core::{Config, LiveboardError, Result};
