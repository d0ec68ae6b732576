#![forbid(unsafe_code)]

//! Log subscriber setup.
//!
//! Logs go to stderr so stdout carries only the JSONL report. The filter
//! comes from `PAGEFX_LOG` (standard `EnvFilter` directives) and defaults to
//! `warn`.

use tracing_subscriber::EnvFilter;

use crate::HarnessError;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "PAGEFX_LOG";

/// Default filter when `PAGEFX_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `directives`, falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
pub fn init(json: bool) -> Result<(), HarnessError> {
    let directives = std::env::var(LOG_ENV).ok();
    let filter = filter_from(directives.as_deref());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| HarnessError::Logging(err.to_string()))
}
