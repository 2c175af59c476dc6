//! Selah command-line host
//!
//! Wires the playback, storage and reminder libraries to a JSON catalog,
//! a data directory and simulated audio devices.

pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::SelahConfig;
pub use error::{CliError, Result};
