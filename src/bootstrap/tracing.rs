//! Tracing subscriber setup.
//!
//! Development builds log at `debug`, release builds at `info`. `RUST_LOG`
//! overrides both.

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

fn is_development() -> bool {
    cfg!(debug_assertions)
}

fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        if is_dev { "dp_app=debug" } else { "dp_app=info" }.to_string(),
        if is_dev {
            "dp_infra=debug"
        } else {
            "dp_infra=info"
        }
        .to_string(),
    ]
}

/// Registers the global subscriber. Call once, before the runtime starts.
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     devprov::bootstrap::tracing::init_tracing_subscriber()?;
///     // ... load config, wire the runtime ...
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// Fails if a global subscriber is already registered.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives.join(",")));

    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(std::io::stdout);

    registry().with(env_filter).with(stdout_layer).try_init()?;
    Ok(())
}
