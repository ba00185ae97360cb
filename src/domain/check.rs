use reqwest::StatusCode;
use serde::Serialize;

/// Name of the status check recorded for every send
pub const MESSAGE_STATUS_CHECK: &str = "message status 200";

/// Result of one named assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
}

impl CheckOutcome {
    /// Status check: passes only on an actual `200 OK`.
    /// A missing status (transport error) fails.
    pub fn status_ok(name: &str, status: Option<StatusCode>) -> Self {
        Self {
            name: name.to_string(),
            passed: status == Some(StatusCode::OK),
        }
    }
}
