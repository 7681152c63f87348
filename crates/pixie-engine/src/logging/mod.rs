//! Logger initialization.
//!
//! Engine code only talks to the `log` facade; this module wires the
//! `env_logger` backend once at startup.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
