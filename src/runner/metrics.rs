use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::CheckOutcome;

/// One HTTP attempt as seen by the runner
#[derive(Debug, Clone)]
pub struct HttpSample {
    /// `None` when no response arrived (connect error, timeout, ...)
    pub status: Option<StatusCode>,
    pub duration: Duration,
    pub error: Option<String>,
}

impl HttpSample {
    /// Failed request: no response, or a 4xx/5xx status
    pub fn is_failed(&self) -> bool {
        match self.status {
            Some(status) => status.is_client_error() || status.is_server_error(),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckCounts {
    pub passes: u64,
    pub fails: u64,
}

/// Point-in-time copy of everything recorded so far
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub checks: BTreeMap<String, CheckCounts>,
    pub http_reqs: u64,
    pub http_req_failed: u64,
    pub transport_errors: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub http_req_durations: Vec<Duration>,
    pub iterations: u64,
    pub interrupted_iterations: u64,
}

/// Shared sink the VUs report into.
///
/// Recording never fails and never blocks on I/O; all counters live behind
/// one short-held lock.
#[derive(Debug, Default)]
pub struct Metrics {
    inner: Mutex<MetricsSnapshot>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_check(&self, outcome: &CheckOutcome) {
        let mut inner = self.inner.lock();
        let counts = inner.checks.entry(outcome.name.clone()).or_default();
        if outcome.passed {
            counts.passes += 1;
        } else {
            counts.fails += 1;
        }
    }

    pub fn record_http(&self, sample: &HttpSample) {
        let mut inner = self.inner.lock();
        inner.http_reqs += 1;
        if sample.is_failed() {
            inner.http_req_failed += 1;
        }
        match sample.status {
            Some(status) => *inner.status_codes.entry(status.as_u16()).or_default() += 1,
            None => inner.transport_errors += 1,
        }
        inner.http_req_durations.push(sample.duration);
    }

    pub fn record_iteration(&self) {
        self.inner.lock().iterations += 1;
    }

    pub fn record_interrupted(&self, count: u64) {
        self.inner.lock().interrupted_iterations += count;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample(status: Option<u16>) -> HttpSample {
        HttpSample {
            status: status.map(|s| StatusCode::from_u16(s).unwrap()),
            duration: Duration::from_millis(10),
            error: status.is_none().then(|| "connection refused".to_string()),
        }
    }

    #[test]
    fn test_check_counts() {
        let metrics = Metrics::new();
        metrics.record_check(&CheckOutcome::status_ok("s", Some(StatusCode::OK)));
        metrics.record_check(&CheckOutcome::status_ok("s", Some(StatusCode::OK)));
        metrics.record_check(&CheckOutcome::status_ok("s", None));

        let snap = metrics.snapshot();
        assert_eq!(snap.checks["s"], CheckCounts { passes: 2, fails: 1 });
    }

    #[test]
    fn test_http_failed_and_transport_errors() {
        let metrics = Metrics::new();
        metrics.record_http(&sample(Some(200)));
        metrics.record_http(&sample(Some(302)));
        metrics.record_http(&sample(Some(500)));
        metrics.record_http(&sample(None));

        let snap = metrics.snapshot();
        assert_eq!(snap.http_reqs, 4);
        assert_eq!(snap.http_req_failed, 2);
        assert_eq!(snap.transport_errors, 1);
        assert_eq!(snap.status_codes[&500], 1);
        assert_eq!(snap.http_req_durations.len(), 4);
    }

    #[tokio::test]
    async fn test_concurrent_recording() {
        let metrics = Arc::new(Metrics::new());
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..10 {
            let metrics = Arc::clone(&metrics);
            tasks.spawn(async move {
                for _ in 0..100 {
                    metrics.record_iteration();
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.expect("task should complete");
        }
        assert_eq!(metrics.snapshot().iterations, 1000);
    }
}
