//! # TCN Runtime
//!
//! Shared plumbing for the `hmac-demo` and `tcn-sign` executables.
//!
//! - `config` - API credentials loaded from the environment
//! - `demo` - the fixed reference signature and its two-line report
//! - `logging` - tracing subscriber writing to stderr

pub mod config;
pub mod demo;
pub mod logging;

pub use config::{ConfigError, SignerConfig};
pub use demo::DemoSignature;
