use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::metrics::Metrics;
use super::scenario::{Scenario, ScenarioOptions};
use super::summary::RunSummary;
use crate::domain::VirtualUser;

/// Runs a fixed number of VUs, each looping over the scenario, until the
/// duration elapses or the run is cancelled.
///
/// Iterations already started when the run ends get `graceful_stop` to
/// finish; whatever is still running after that is aborted and reported as
/// interrupted.
pub struct ConstantVusExecutor {
    options: ScenarioOptions,
}

impl ConstantVusExecutor {
    pub fn new(options: ScenarioOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScenarioOptions {
        &self.options
    }

    pub async fn run(&self, scenario: Arc<dyn Scenario>, shutdown: CancellationToken) -> RunSummary {
        let metrics = Arc::new(Metrics::new());
        let stop = shutdown.child_token();
        let started_at = Utc::now();
        let start = Instant::now();

        info!(
            scenario = %self.options.name,
            exec = scenario.name(),
            executor = %self.options.executor,
            vus = self.options.vus,
            duration_s = self.options.duration.as_secs_f64(),
            "starting scenario"
        );

        let mut tasks = JoinSet::new();
        for id in 1..=self.options.vus {
            let scenario = Arc::clone(&scenario);
            let metrics = Arc::clone(&metrics);
            let stop = stop.clone();
            tasks.spawn(async move {
                let mut vu = VirtualUser::new(id);
                while !stop.is_cancelled() {
                    scenario.iterate(vu, &metrics).await;
                    metrics.record_iteration();
                    vu = vu.next();
                }
                debug!(vu = id, iterations = vu.iteration, "virtual user stopped");
            });
        }

        tokio::select! {
            _ = tokio::time::sleep(self.options.duration) => {
                info!(scenario = %self.options.name, "duration elapsed, stopping new iterations");
            }
            _ = shutdown.cancelled() => {
                warn!(scenario = %self.options.name, "run cancelled, stopping new iterations");
            }
        }
        stop.cancel();

        let drain = async {
            while let Some(result) = tasks.join_next().await {
                log_join_error(result);
            }
        };
        if tokio::time::timeout(self.options.graceful_stop, drain).await.is_err() {
            let interrupted = tasks.len() as u64;
            warn!(interrupted, "graceful stop exceeded, aborting in-flight iterations");
            tasks.abort_all();
            while let Some(result) = tasks.join_next().await {
                log_join_error(result);
            }
            metrics.record_interrupted(interrupted);
        }

        let elapsed = start.elapsed();
        let summary = RunSummary::new(
            &self.options,
            metrics.snapshot(),
            started_at,
            Utc::now(),
            elapsed,
        );

        info!(
            scenario = %summary.scenario,
            iterations = summary.iterations.completed,
            http_reqs = summary.http.reqs,
            checks_rate = summary.checks_rate(),
            elapsed_s = summary.elapsed_seconds,
            "scenario finished"
        );
        summary
    }
}

fn log_join_error(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_cancelled() => {}
        Err(e) => error!(error = %e, "virtual user task panicked"),
    }
}
