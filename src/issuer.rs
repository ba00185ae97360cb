use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::{Config, TargetConfig};
use crate::domain::{
    CheckOutcome, MessagePayload, MessageRequest, PayloadError, VirtualUser, MESSAGE_STATUS_CHECK,
};
use crate::error::LoadTestError;
use crate::runner::{HttpSample, Metrics, Scenario};

/// Sends one message per iteration and checks for `200 OK`.
#[derive(Clone)]
pub struct RequestIssuer {
    url: String,
    client: reqwest::Client,
    payload: MessagePayload,
    think_time: Duration,
}

impl RequestIssuer {
    pub fn new(
        target: &TargetConfig,
        payload: MessagePayload,
        think_time: Duration,
    ) -> Result<Self, LoadTestError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("send-message-load/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = target.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            url: target.url(),
            client: builder.build()?,
            payload,
            think_time,
        })
    }

    /// Issuer for the configured target, always sending the fixed payload
    pub fn from_config(cfg: &Config) -> Result<Self, LoadTestError> {
        Self::new(&cfg.target, MessagePayload::default(), cfg.scenario.think_time())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn request_for(&self, vu: VirtualUser) -> MessageRequest {
        self.payload.for_virtual_user(vu)
    }

    /// Build the body for `vu` and POST it once.
    ///
    /// `Err` only when no request could be built; transport errors come back
    /// as a sample without status.
    pub async fn send(&self, vu: VirtualUser) -> Result<HttpSample, PayloadError> {
        let request = self.request_for(vu);
        request.validate()?;
        let body = request.to_json()?;

        let start = Instant::now();
        let result = self.client.post(&self.url).body(body).send().await;

        let sample = match result {
            Ok(resp) => {
                let status = resp.status();
                // drain so the connection can be reused; content is not inspected
                let _ = resp.bytes().await;
                HttpSample {
                    status: Some(status),
                    duration: start.elapsed(),
                    error: None,
                }
            }
            Err(e) => HttpSample {
                status: None,
                duration: start.elapsed(),
                error: Some(e.to_string()),
            },
        };
        Ok(sample)
    }
}

#[async_trait]
impl Scenario for RequestIssuer {
    fn name(&self) -> &str {
        "sendMessage"
    }

    async fn iterate(&self, vu: VirtualUser, metrics: &Metrics) {
        let sample = match self.send(vu).await {
            Ok(sample) => sample,
            Err(e) => {
                warn!(%vu, error = %e, check = MESSAGE_STATUS_CHECK, "check failed, request not sent");
                metrics.record_check(&CheckOutcome::status_ok(MESSAGE_STATUS_CHECK, None));
                tokio::time::sleep(self.think_time).await;
                return;
            }
        };
        let check = CheckOutcome::status_ok(MESSAGE_STATUS_CHECK, sample.status);

        if check.passed {
            debug!(%vu, elapsed_ms = sample.duration.as_millis() as u64, "message sent");
        } else {
            match (&sample.status, &sample.error) {
                (Some(status), _) => warn!(%vu, %status, check = %check.name, "check failed"),
                (None, Some(error)) => warn!(%vu, %error, check = %check.name, "check failed, no response"),
                (None, None) => warn!(%vu, check = %check.name, "check failed, no response"),
            }
        }

        metrics.record_http(&sample);
        metrics.record_check(&check);

        tokio::time::sleep(self.think_time).await;
    }
}
