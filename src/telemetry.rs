//! Log output for the provider binary.
//!
//! Records go to stderr; stdout carries the response. The filter comes from
//! `RUNSCOPE_LOG`, then `RUST_LOG`, defaulting to `info`.
//! `RUNSCOPE_LOG_FORMAT=json` switches to JSON lines.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "RUNSCOPE_LOG";
pub const LOG_FORMAT_ENV: &str = "RUNSCOPE_LOG_FORMAT";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn json_requested() -> bool {
    std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Install the global subscriber. `log` records are bridged into it.
pub fn init_tracing() {
    let json = json_requested();
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .try_init();
}
