//! Tracing bootstrap for host shells.
//!
//! The core emits structured `tracing` events and never installs a
//! subscriber itself; whichever shell embeds the crate (or a test wanting
//! captured output) decides the sink. This helper covers the common case.

use tracing_subscriber::{fmt, EnvFilter};

use crate::{AppError, Result};

/// Log output format.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LogFormat {
    /// Human-readable line output.
    Text,
    /// One JSON object per event.
    Json,
}

/// Install the process-wide tracing subscriber, honoring `RUST_LOG` and
/// defaulting to `info`.
///
/// # Errors
///
/// Returns `AppError::Config` if a subscriber is already installed.
pub fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
