//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Aggregated multicall dispatches
    MulticallBatches,
    /// Individual calls inside dispatched batches
    MulticallCalls,
    /// Individual calls that reverted or failed to decode
    MulticallCallFailures,
    /// Subgraph page requests
    SubgraphPages,
    /// Subgraph records skipped because they failed to parse
    SubgraphRecordsSkipped,
}

impl CounterMetric {
    pub fn name(self) -> &'static str {
        match self {
            CounterMetric::MulticallBatches => "prize_savings_multicall_batches_total",
            CounterMetric::MulticallCalls => "prize_savings_multicall_calls_total",
            CounterMetric::MulticallCallFailures => "prize_savings_multicall_call_failures_total",
            CounterMetric::SubgraphPages => "prize_savings_subgraph_pages_total",
            CounterMetric::SubgraphRecordsSkipped => "prize_savings_subgraph_records_skipped_total",
        }
    }
}

/// Increment a counter, labelled by chain
pub fn increment_counter(metric: CounterMetric, chain_id: u64, value: u64) {
    metrics::counter!(metric.name(), "chain_id" => chain_id.to_string()).increment(value);
}

/// Start the Prometheus scrape endpoint on all interfaces
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}
