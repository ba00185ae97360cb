use anyhow::{Context, Result};
use send_message_load::{config, issuer, runner, telemetry};
use config::Config;
use issuer::RequestIssuer;
use runner::ConstantVusExecutor;
use std::sync::Arc;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load().context("loading configuration")?;

    let issuer = RequestIssuer::from_config(&cfg)?;
    info!(url = issuer.url(), "target configured");

    let executor = ConstantVusExecutor::new(cfg.scenario.options());
    let summary = executor
        .run(Arc::new(issuer), telemetry::shutdown_token())
        .await;

    println!("{summary}");

    if let Some(path) = &cfg.output.summary_export {
        summary.export(path).await?;
        info!(path = %path.display(), "summary exported");
    }

    if !summary.all_checks_passed() {
        warn!(
            checks_rate = summary.checks_rate(),
            "some checks failed"
        );
    }
    Ok(())
}
