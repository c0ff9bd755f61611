//! Prometheus metrics for the gateway.
//!
//! [`GatewayMetrics`] owns a dedicated [`Registry`]; `GET /metrics` encodes
//! it into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry, Encoder, Histogram,
    HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};
use voteweb_admission::Decision;

pub struct GatewayMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub votes_accepted: IntCounter,
    pub votes_already_voted: IntCounter,
    pub votes_not_found: IntCounter,
    pub votes_invalid: IntCounter,
    /// Storage failures and deadline expiries.
    pub votes_failed: IntCounter,
    pub csrf_rejections: IntCounter,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time spent inside the admission engine, in milliseconds.
    pub admission_latency_ms: Histogram,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let votes_accepted = register_int_counter_with_registry!(
            Opts::new("voteweb_votes_accepted_total", "Votes stored"),
            registry
        )
        .expect("failed to register votes_accepted counter");

        let votes_already_voted = register_int_counter_with_registry!(
            Opts::new(
                "voteweb_votes_already_voted_total",
                "Submissions from identities that had already voted"
            ),
            registry
        )
        .expect("failed to register votes_already_voted counter");

        let votes_not_found = register_int_counter_with_registry!(
            Opts::new(
                "voteweb_votes_not_found_total",
                "Submissions for unknown innovations"
            ),
            registry
        )
        .expect("failed to register votes_not_found counter");

        let votes_invalid = register_int_counter_with_registry!(
            Opts::new(
                "voteweb_votes_invalid_total",
                "Submissions rejected by input validation"
            ),
            registry
        )
        .expect("failed to register votes_invalid counter");

        let votes_failed = register_int_counter_with_registry!(
            Opts::new(
                "voteweb_votes_failed_total",
                "Submissions that failed on storage errors or deadline expiry"
            ),
            registry
        )
        .expect("failed to register votes_failed counter");

        let csrf_rejections = register_int_counter_with_registry!(
            Opts::new(
                "voteweb_csrf_rejections_total",
                "Unsafe requests rejected by the CSRF guard"
            ),
            registry
        )
        .expect("failed to register csrf_rejections counter");

        // 0.5 ms → ~8 s.
        let admission_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "voteweb_admission_latency_ms",
                "Vote admission latency in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.5, 2.0, 15).unwrap()),
            registry
        )
        .expect("failed to register admission_latency_ms histogram");

        Self {
            registry,
            votes_accepted,
            votes_already_voted,
            votes_not_found,
            votes_invalid,
            votes_failed,
            csrf_rejections,
            admission_latency_ms,
        }
    }

    /// Count one admission decision.
    pub fn record_decision(&self, decision: &Decision) {
        match decision {
            Decision::Accepted { .. } => self.votes_accepted.inc(),
            Decision::AlreadyVoted { .. } => self.votes_already_voted.inc(),
            Decision::NotFound => self.votes_not_found.inc(),
            Decision::Invalid(_) => self.votes_invalid.inc(),
            Decision::InternalFailure(_) => self.votes_failed.inc(),
        }
    }

    /// Encode every registered metric in the text exposition format.
    pub fn encode(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!(error = %e, "failed to encode metrics");
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voteweb_admission::AdmissionError;

    #[test]
    fn decisions_land_in_their_counters() {
        let metrics = GatewayMetrics::new();
        metrics.record_decision(&Decision::NotFound);
        metrics.record_decision(&Decision::InternalFailure(AdmissionError::Timeout));
        metrics.record_decision(&Decision::Accepted {
            vote_count: 1,
            message: String::new(),
        });
        assert_eq!(metrics.votes_not_found.get(), 1);
        assert_eq!(metrics.votes_failed.get(), 1);
        assert_eq!(metrics.votes_accepted.get(), 1);
        assert_eq!(metrics.votes_already_voted.get(), 0);
    }

    #[test]
    fn encodes_text_format() {
        let metrics = GatewayMetrics::new();
        metrics.csrf_rejections.inc();
        let text = metrics.encode();
        assert!(text.contains("voteweb_csrf_rejections_total 1"));
        assert!(text.contains("voteweb_admission_latency_ms"));
    }
}
