use closet_lib::config::Config;

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("closet-server: {e}");
            std::process::exit(1);
        }
    };

    // Before anything else so startup panics are captured.
    // No-op guard when no DSN is configured.
    let _sentry_guard = sentry::init(sentry_options(&config));

    if let Err(e) = closet_lib::run(config) {
        tracing::error!("Server exited with error: {}", e);
        eprintln!("closet-server: {e}");
        std::process::exit(1);
    }
}

fn sentry_options(config: &Config) -> sentry::ClientOptions {
    sentry::ClientOptions {
        dsn: config.sentry_dsn.as_deref().and_then(|s| s.parse().ok()),
        release: Some(env!("CARGO_PKG_VERSION").into()),
        traces_sample_rate: 0.0,
        send_default_pii: false,
        before_send: Some(std::sync::Arc::new(|mut event| {
            if let Some(ref mut user) = event.user {
                user.email = None;
                user.ip_address = None;
                user.username = None;
            }
            // Request bodies may carry free-text wardrobe descriptions.
            if let Some(ref mut request) = event.request {
                request.data = None;
            }
            Some(event)
        })),
        ..Default::default()
    }
}
