//! Process-wide tracing setup for the Ronda backend.
//!
//! JSON lines on stdout, one event per line, so the upstream log pipeline
//! can ingest them directly. The filter comes from `RUST_LOG`; without it
//! the backend logs at info with the SQL layers capped at warn.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "info,ronda_backend=info,sqlx=warn,sea_orm=warn";

pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
