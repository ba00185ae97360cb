//! Minimal load runner: constant-VU scheduling, metric sink and summary.

pub mod executor;
pub mod metrics;
pub mod scenario;
pub mod summary;

pub use executor::ConstantVusExecutor;
pub use metrics::{CheckCounts, HttpSample, Metrics, MetricsSnapshot};
pub use scenario::{ExecutorKind, Scenario, ScenarioOptions};
pub use summary::{CheckSummary, HttpSummary, IterationSummary, RunSummary, TrendSummary};
