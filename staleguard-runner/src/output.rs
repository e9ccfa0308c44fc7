// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging setup for hosts that don't install their own subscriber.

use crate::errors::LogInitError;
use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    Layer, filter::Targets, layer::SubscriberExt, util::SubscriberInitExt,
};

/// The environment variable controlling which events are logged.
///
/// The value is a list of `target=level` directives, e.g.
/// `staleguard_runner::executor=debug,info`.
pub const LOG_ENV: &str = "STALEGUARD_LOG";

static INIT_LOGGER: Once = Once::new();

/// Installs a stderr logger filtered by [`LOG_ENV`].
///
/// Only the first call in a process has any effect. If the host already
/// installed a global subscriber, that one is kept.
pub fn init_logging() -> Result<(), LogInitError> {
    let value = std::env::var_os(LOG_ENV)
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_default();
    let targets = parse_targets(&value)?;

    INIT_LOGGER.call_once(|| {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(targets);

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("a global subscriber is already installed, not replacing it");
        }
    });
    Ok(())
}

/// Parses a filter directive string. An empty string means `info`.
fn parse_targets(value: &str) -> Result<Targets, LogInitError> {
    if value.is_empty() {
        return Ok(Targets::new().with_default(LevelFilter::INFO));
    }
    value.parse().map_err(|error| LogInitError {
        value: value.to_owned(),
        error,
    })
}
