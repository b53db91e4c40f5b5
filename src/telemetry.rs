// Copyright (c) 2025 - Cowboy AI, Inc.
//! Logging setup
//!
//! Installs a `tracing-subscriber` fmt subscriber filtered by `RUST_LOG`,
//! falling back to `info`. Safe to call more than once; only the first call
//! installs a subscriber.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber with the default directive
///
/// Returns `false` if a global subscriber was already set.
pub fn init() -> bool {
    init_with(DEFAULT_DIRECTIVE)
}

/// Install the global subscriber, using `directive` when `RUST_LOG` is unset or invalid
pub fn init_with(directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
