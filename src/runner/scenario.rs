use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{Display, EnumString};

use super::metrics::Metrics;
use crate::domain::VirtualUser;

/// One unit of work a VU repeats until the run ends.
///
/// Implementations record their own checks and samples into `metrics` and
/// must not fail: anything that goes wrong is an observation, not an error.
#[async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &str;

    async fn iterate(&self, vu: VirtualUser, metrics: &Metrics);
}

/// Scheduling strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum ExecutorKind {
    /// Fixed number of VUs looping for a fixed duration
    #[strum(serialize = "constant-vus")]
    #[serde(rename = "constant-vus")]
    ConstantVus,
}

#[derive(Debug, Clone)]
pub struct ScenarioOptions {
    pub name: String,
    pub executor: ExecutorKind,
    pub vus: u32,
    pub duration: Duration,
    /// How long in-flight iterations may run past `duration`
    pub graceful_stop: Duration,
    /// Entry function label, reported only
    pub exec: String,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            name: "SendMessage".to_string(),
            executor: ExecutorKind::ConstantVus,
            vus: 10,
            duration: Duration::from_secs(20),
            graceful_stop: Duration::from_secs(30),
            exec: "sendMessage".to_string(),
        }
    }
}
