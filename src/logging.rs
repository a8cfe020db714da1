//! Native tracing setup.
//!
//! The browser has its own console writer in `miniframe_web::logging`.

use std::sync::Once;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "MINIFRAME_LOG";

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

static TRACING_INSTALLED: Once = Once::new();

/// Installs a stderr `fmt` subscriber filtered by `MINIFRAME_LOG` (idempotent).
///
/// Without the variable, `info` and above are shown.
pub fn init() {
    TRACING_INSTALLED.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(DEFAULT_LOG_LEVEL.into())
            .with_env_var(LOG_ENV)
            .from_env_lossy();
        let result = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .try_init();
        if result.is_err() {
            eprintln!("MiniFrame tracing subscriber failed to initialize");
        }
    });
}
