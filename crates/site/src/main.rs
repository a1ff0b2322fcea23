//! `local-directory-site` binary.
//!
//! Serves the public directory pages, the sitemap and the admin import
//! screens. Listens on `HOST:PORT` (default `0.0.0.0:3000`).
//!
//! The schema is managed separately: `cargo run -p local-directory-cli -- migrate`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;

use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tokio::net::TcpListener;
use tracing::{Level, Metadata, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use local_directory_site::config::SiteConfig;
use local_directory_site::state::AppState;
use local_directory_site::{app, db};

const DEFAULT_LOG_FILTER: &str = "local_directory_site=info,tower_http=debug";

#[tokio::main]
async fn main() {
    let config = SiteConfig::from_env().expect("invalid site configuration");

    // The client has to exist before the tracing layer that forwards to it.
    let _sentry = config
        .sentry_dsn
        .as_deref()
        .map(|dsn| sentry::init((dsn, sentry_options(&config))));

    init_tracing();
    if sentry::Hub::current().client().is_some() {
        info!("Sentry reporting enabled");
    }

    serve(config).await;
}

fn sentry_options(config: &SiteConfig) -> sentry::ClientOptions {
    sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Cow::Owned),
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        attach_stacktrace: true,
        ..Default::default()
    }
}

/// Text logs by default, one JSON object per line when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().flatten_event(true)))
        .with((!json).then(fmt::layer))
        .with(sentry_tracing::layer().event_filter(forward_to_sentry))
        .init();
}

/// Warnings and errors become Sentry events; info and debug ride along as breadcrumbs.
fn forward_to_sentry(metadata: &Metadata<'_>) -> EventFilter {
    match *metadata.level() {
        Level::ERROR | Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}

async fn serve(config: SiteConfig) {
    let addr = config.socket_addr();
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("could not open database pool");

    let router = app(AppState::new(config, pool))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = TcpListener::bind(addr).await.expect("could not bind listen address");
    info!(%addr, "Directory site listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server terminated unexpectedly");

    info!("Directory site stopped");
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => log_ctrl_c(result),
                    _ = terminate.recv() => info!("SIGTERM received"),
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {e}");
                log_ctrl_c(tokio::signal::ctrl_c().await);
            }
        }
    }

    #[cfg(not(unix))]
    log_ctrl_c(tokio::signal::ctrl_c().await);

    info!("Draining in-flight requests");
}

fn log_ctrl_c(result: std::io::Result<()>) {
    match result {
        Ok(()) => info!("Ctrl+C received"),
        Err(e) => warn!("Ctrl+C handler failed: {e}"),
    }
}
