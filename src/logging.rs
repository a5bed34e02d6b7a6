//! Process-wide tracing setup
//!
//! `RUST_LOG` takes precedence over the configured level. Safe to call more
//! than once; only the first call installs a subscriber.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Err only means a subscriber is already installed
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
