//! Metrics and observability utilities
//!
//! Prometheus metrics with standardized naming conventions for the
//! admin API and background pipeline.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all LexForge metrics
pub const METRICS_PREFIX: &str = "lexforge";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000,
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Background job metrics
    describe_counter!(
        format!("{}_jobs_submitted_total", METRICS_PREFIX),
        Unit::Count,
        "Background jobs submitted"
    );

    describe_counter!(
        format!("{}_jobs_completed_total", METRICS_PREFIX),
        Unit::Count,
        "Background jobs finished successfully"
    );

    describe_counter!(
        format!("{}_jobs_failed_total", METRICS_PREFIX),
        Unit::Count,
        "Background jobs that ended in failure"
    );

    describe_gauge!(
        format!("{}_jobs_running", METRICS_PREFIX),
        Unit::Count,
        "Background jobs currently running"
    );

    // Pipeline metrics
    describe_counter!(
        format!("{}_documents_processed_total", METRICS_PREFIX),
        Unit::Count,
        "Documents run through the processing pipeline"
    );

    describe_counter!(
        format!("{}_pairs_generated_total", METRICS_PREFIX),
        Unit::Count,
        "Prompt-response pairs synthesized"
    );

    describe_counter!(
        format!("{}_redactions_total", METRICS_PREFIX),
        Unit::Count,
        "Sensitive spans redacted"
    );

    describe_histogram!(
        format!("{}_job_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Background job wall-clock duration in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Record a background job submission
pub fn record_job_submitted(job_type: &str) {
    counter!(
        format!("{}_jobs_submitted_total", METRICS_PREFIX),
        "job_type" => job_type.to_string()
    )
    .increment(1);
}

/// Record a background job outcome and duration
pub fn record_job_finished(job_type: &str, duration_secs: f64, success: bool) {
    let name = if success {
        format!("{}_jobs_completed_total", METRICS_PREFIX)
    } else {
        format!("{}_jobs_failed_total", METRICS_PREFIX)
    };

    counter!(name, "job_type" => job_type.to_string()).increment(1);

    histogram!(
        format!("{}_job_duration_seconds", METRICS_PREFIX),
        "job_type" => job_type.to_string()
    )
    .record(duration_secs);
}

/// Track the number of running background jobs
pub fn set_jobs_running(count: usize) {
    gauge!(format!("{}_jobs_running", METRICS_PREFIX)).set(count as f64);
}

/// Record documents processed by the pipeline
pub fn record_documents_processed(count: u64) {
    counter!(format!("{}_documents_processed_total", METRICS_PREFIX)).increment(count);
}

/// Record synthesized pairs
pub fn record_pairs_generated(pair_type: &str, count: u64) {
    counter!(
        format!("{}_pairs_generated_total", METRICS_PREFIX),
        "pair_type" => pair_type.to_string()
    )
    .increment(count);
}

/// Record redacted spans by category
pub fn record_redactions(category: &str, count: u64) {
    if count > 0 {
        counter!(
            format!("{}_redactions_total", METRICS_PREFIX),
            "category" => category.to_string()
        )
        .increment(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_buckets_sorted() {
        let mut prev = 0.0;
        for &bucket in LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }
    }

    #[test]
    fn test_request_metrics() {
        let metrics = RequestMetrics::start("GET", "/api/v1/analytics/overview");
        std::thread::sleep(std::time::Duration::from_millis(10));
        metrics.finish(200);
        // Just verify it runs without panic
    }
}
