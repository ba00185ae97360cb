//! End-of-run summary
//!
//! Aggregates a [`MetricsSnapshot`] into pass rates and duration trends,
//! printable as a plain-text report or serializable as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use super::metrics::MetricsSnapshot;
use super::scenario::{ExecutorKind, ScenarioOptions};
use crate::error::LoadTestError;

/// Pass/fail tally of one named check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckSummary {
    pub name: String,
    pub passes: u64,
    pub fails: u64,
}

impl CheckSummary {
    pub fn total(&self) -> u64 {
        self.passes + self.fails
    }

    /// Share of passing checks, 0.0 when none ran
    pub fn rate(&self) -> f64 {
        ratio(self.passes, self.total())
    }
}

/// Distribution of request durations, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrendSummary {
    pub avg: f64,
    pub min: f64,
    pub med: f64,
    pub max: f64,
    pub p90: f64,
    pub p95: f64,
}

impl TrendSummary {
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut ms: Vec<f64> = samples.iter().map(|d| d.as_nanos() as f64 / 1_000_000.0).collect();
        ms.sort_by(|a, b| a.total_cmp(b));

        let n = ms.len();
        let med = if n % 2 == 1 {
            ms[n / 2]
        } else {
            (ms[n / 2 - 1] + ms[n / 2]) / 2.0
        };

        Self {
            avg: ms.iter().sum::<f64>() / n as f64,
            min: ms[0],
            med,
            max: ms[n - 1],
            p90: percentile(&ms, 90.0),
            p95: percentile(&ms, 95.0),
        }
    }
}

/// Nearest-rank percentile over sorted, non-empty input
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpSummary {
    pub reqs: u64,
    pub failed: u64,
    pub transport_errors: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub duration_ms: TrendSummary,
}

impl HttpSummary {
    pub fn failed_rate(&self) -> f64 {
        ratio(self.failed, self.reqs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IterationSummary {
    pub completed: u64,
    pub interrupted: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub scenario: String,
    pub exec: String,
    pub executor: ExecutorKind,
    pub vus: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_seconds: f64,
    pub checks: Vec<CheckSummary>,
    pub http: HttpSummary,
    pub iterations: IterationSummary,
}

impl RunSummary {
    pub fn new(
        options: &ScenarioOptions,
        snapshot: MetricsSnapshot,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        let checks = snapshot
            .checks
            .into_iter()
            .map(|(name, counts)| CheckSummary {
                name,
                passes: counts.passes,
                fails: counts.fails,
            })
            .collect();

        Self {
            run_id: Uuid::new_v4(),
            scenario: options.name.clone(),
            exec: options.exec.clone(),
            executor: options.executor,
            vus: options.vus,
            started_at,
            finished_at,
            elapsed_seconds: elapsed.as_secs_f64(),
            checks,
            http: HttpSummary {
                reqs: snapshot.http_reqs,
                failed: snapshot.http_req_failed,
                transport_errors: snapshot.transport_errors,
                status_codes: snapshot.status_codes,
                duration_ms: TrendSummary::from_samples(&snapshot.http_req_durations),
            },
            iterations: IterationSummary {
                completed: snapshot.iterations,
                interrupted: snapshot.interrupted_iterations,
            },
        }
    }

    /// Pass rate over every check of the run
    pub fn checks_rate(&self) -> f64 {
        let passes = self.checks.iter().map(|c| c.passes).sum();
        let total = self.checks.iter().map(CheckSummary::total).sum();
        ratio(passes, total)
    }

    pub fn all_checks_passed(&self) -> bool {
        self.checks.iter().all(|c| c.fails == 0)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the JSON summary to `path`
    pub async fn export(&self, path: &Path) -> Result<(), LoadTestError> {
        let json = self.to_json()?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| LoadTestError::SummaryExport {
                path: path.display().to_string(),
                source,
            })
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "scenario {} ({}, {} VUs, exec: {})",
            self.scenario, self.executor, self.vus, self.exec
        )?;
        writeln!(f, "run {} finished in {:.1}s", self.run_id, self.elapsed_seconds)?;
        writeln!(f)?;

        for check in &self.checks {
            let mark = if check.fails == 0 { "✓" } else { "✗" };
            writeln!(
                f,
                "  {mark} {} ({:.2}% passed: {} ✓ / {} ✗)",
                check.name,
                check.rate() * 100.0,
                check.passes,
                check.fails
            )?;
        }
        writeln!(f)?;

        let total_checks: u64 = self.checks.iter().map(CheckSummary::total).sum();
        let d = &self.http.duration_ms;
        let rps = if self.elapsed_seconds > 0.0 {
            self.http.reqs as f64 / self.elapsed_seconds
        } else {
            0.0
        };

        writeln!(
            f,
            "  {:.<28}: {:.2}% of {}",
            "checks",
            self.checks_rate() * 100.0,
            total_checks
        )?;
        writeln!(
            f,
            "  {:.<28}: avg={:.2}ms min={:.2}ms med={:.2}ms max={:.2}ms p(90)={:.2}ms p(95)={:.2}ms",
            "http_req_duration", d.avg, d.min, d.med, d.max, d.p90, d.p95
        )?;
        writeln!(
            f,
            "  {:.<28}: {:.2}% ({} of {}, {} without response)",
            "http_req_failed",
            self.http.failed_rate() * 100.0,
            self.http.failed,
            self.http.reqs,
            self.http.transport_errors
        )?;
        writeln!(f, "  {:.<28}: {} ({:.2}/s)", "http_reqs", self.http.reqs, rps)?;
        writeln!(f, "  {:.<28}: {}", "iterations", self.iterations.completed)?;
        write!(
            f,
            "  {:.<28}: {}",
            "interrupted_iterations", self.iterations.interrupted
        )
    }
}
