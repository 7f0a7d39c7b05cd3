use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe the bot's series.
    pub fn init() -> Result<Self, BuildError> {
        let handle = PrometheusBuilder::new().install_recorder()?;

        describe_counter!("webhook_events_total", "Inbound callbacks by event kind.");
        describe_counter!("dispatch_total", "Dispatch decisions by path (menu/pipeline).");
        describe_counter!("pipeline_runs_total", "Finished background pipelines by outcome.");
        describe_gauge!("pipeline_in_flight", "Background pipelines currently running.");
        describe_counter!("news_fetch_total", "Headline fetches by result.");
        describe_counter!("summarize_total", "Summary requests by result.");
        describe_counter!("notify_failures_total", "Push messages that failed to send.");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
