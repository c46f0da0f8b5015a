//! Logging utilities.
//!
//! The engine only talks to the `log` facade. Applications that want output
//! call [`init_logging`] once at startup; the backend is `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig};
