//! Default scenario (10 VUs for 20s) against a near-zero latency stub.
//!
//! Expected attempts: about `vus * floor(duration / (latency + think_time))`,
//! never fewer than one per VU.

use std::sync::Arc;
use std::time::{Duration, Instant};

use send_message_load::config::{ScenarioConfig, TargetConfig};
use send_message_load::domain::MessagePayload;
use send_message_load::runner::ConstantVusExecutor;
use send_message_load::RequestIssuer;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Ignore by default as this is a slow test
async fn test_default_scenario_request_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let scenario = ScenarioConfig::default();
    let addr = server.address();
    let target = TargetConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        ..TargetConfig::default()
    };
    let issuer = RequestIssuer::new(&target, MessagePayload::default(), scenario.think_time())
        .expect("client should build");

    let started = Instant::now();
    let summary = ConstantVusExecutor::new(scenario.options())
        .run(Arc::new(issuer), CancellationToken::new())
        .await;
    let elapsed = started.elapsed();

    println!("{summary}");

    let vus = u64::from(scenario.vus);
    let per_vu_max = scenario.duration_seconds / (scenario.think_time_ms / 1000) + 1;
    let attempts = summary.http.reqs;

    assert!(attempts >= vus, "at least one iteration per VU, got {attempts}");
    assert!(
        attempts <= vus * per_vu_max,
        "too many attempts: {attempts} > {}",
        vus * per_vu_max
    );
    assert!(summary.all_checks_passed());
    assert_eq!(summary.iterations.interrupted, 0);
    assert!(elapsed >= Duration::from_secs(scenario.duration_seconds));
}
