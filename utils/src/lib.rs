//! Shared utilities for the TRUTH verification engine.

pub mod logging;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
