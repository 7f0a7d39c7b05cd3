//! Viber news bot: binary entrypoint.
//! Loads configuration, initialises tracing and metrics, and serves the webhook.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use viber_news_bot::{build_app, metrics::Metrics, AppConfig};

/// Compact text logs by default; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("viber_news_bot=info,tower_http=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::load().context("loading configuration")?;

    let mut app = build_app(&cfg)?;
    match Metrics::init() {
        Ok(m) => app = app.merge(m.router()),
        Err(e) => warn!(error = %e, "prometheus recorder not installed; /metrics disabled"),
    }

    let addr = cfg.settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "webhook listener ready");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
