//! Logging setup.
//!
//! The engine itself only emits through the `log` facade; this module is for
//! binaries that want the default `env_logger` backend.

mod init;

pub use init::{LoggingConfig, init_logging};
