// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod metrics;
pub mod news;
pub mod notify;
pub mod signature;
pub mod summarize;
pub mod text;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::command::Category;
pub use crate::config::AppConfig;
pub use crate::dispatch::{Dispatch, Dispatcher, Pipeline};

/// Router plus application state, wired from configuration. The caller decides
/// whether to merge in `/metrics`.
pub fn build_app(cfg: &AppConfig) -> anyhow::Result<axum::Router> {
    let dispatcher = Dispatcher::from_config(cfg)?;
    let mut state = AppState::new(dispatcher);
    if cfg.settings.viber.verify_signature {
        state = state.with_signature_key(cfg.secrets.viber_auth_token.clone());
    }
    Ok(router(state))
}
