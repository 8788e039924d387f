//! `jrnl` Client Library
//!
//! Webhook registry and dispatch core of the message composer, plus the
//! command layer the presentation side talks to.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod selection;
pub mod state;
pub mod storage;
pub mod store;

pub use config::Config;
pub use dispatch::Dispatcher;
pub use selection::Selection;
pub use state::AppState;
pub use store::WebhookStore;

/// Initialize Sentry when a DSN is configured. Keep the guard alive for the
/// lifetime of the process.
pub fn init_sentry(config: &Config) -> Option<sentry::ClientInitGuard> {
    config.sentry_dsn.as_ref().map(|dsn| {
        sentry::init((
            dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(config.app_env.clone().into()),
                sample_rate: 1.0,
                traces_sample_rate: 0.0,
                send_default_pii: false,
                ..Default::default()
            },
        ))
    })
}

/// Initialize logging to stderr.
pub fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jrnl_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry::integrations::tracing::layer())
        .init();
}
