use anyhow::Context;
use authsmoke::configuration::get_configuration;
use authsmoke::smoke::SmokeTest;
use authsmoke::telemetry::{get_subscriber, init_subscriber};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode, anyhow::Error> {
    let subscriber = get_subscriber("authsmoke".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration")?;
    tracing::info!(base_url = %configuration.api.base_url, "Starting smoke test");

    let smoke_test = SmokeTest::new(&configuration);
    match smoke_test.run().await {
        Ok(report) => {
            tracing::info!(
                probed_endpoints = report.probed_endpoints,
                reachable_endpoints = report.reachable_endpoints,
                token = %report.token_preview,
                username = %report.profile.username,
                "Smoke test completed successfully"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            // The runner does not branch on failure kinds; it reports the
            // full cause chain and exits non-zero.
            tracing::error!(error = ?e, "Smoke test failed");
            Ok(ExitCode::FAILURE)
        }
    }
}
