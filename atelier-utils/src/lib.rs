//! atelier-utils: Common utilities shared across atelier crates
//!
//! Unified error type, logging setup, and XDG path helpers.

pub mod error;
pub mod logging;
pub mod paths;

pub use error::{AtelierError, Result};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogOutput};
