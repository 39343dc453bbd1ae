//! # Six Cities Telemetry
//!
//! Structured logging for the service. Every crate logs through `tracing`
//! macros; the binary calls [`init_logging`] once at startup.
//!
//! | Format   | Use                                  |
//! |----------|--------------------------------------|
//! | `json`   | Deployments; one object per event    |
//! | `pretty` | Local development                    |

#![doc(html_root_url = "https://docs.rs/sixcities-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
