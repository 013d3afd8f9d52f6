/*!
 * Tracing setup
 * Diagnostics go to stderr so stdout carries only the simulation report
 */

use std::io;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan, prelude::*};

pub const ENV_TRACE_JSON: &str = "SCHED_SIM_TRACE_JSON";

/// Install the global subscriber. Filter comes from `RUST_LOG`, defaulting to
/// `warn`; set `SCHED_SIM_TRACE_JSON=1` for JSON lines.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        debug!("tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_line_number(true)
                    .compact(),
            )
            .init();
        debug!("tracing initialized");
    }
}
