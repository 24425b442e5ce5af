use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogFormat;

/// Initialize tracing with a stdout layer and a Sentry layer.
///
/// - Stdout: compact human-readable lines, or one JSON object per event
/// - Sentry: captures ERROR events as issues, WARN as breadcrumbs
/// - Default level: INFO (DEBUG for this crate), override via RUST_LOG env
pub fn init(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,closet_lib=debug,tower_http=debug"));

    // Routes tracing::error!/warn! calls to Sentry.
    // No-op when the binary did not configure a DSN.
    let sentry_layer = sentry_tracing::layer().event_filter(|meta| match *meta.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    });

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_layer);

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
    }

    tracing::debug!(?format, "Tracing initialized");
}
