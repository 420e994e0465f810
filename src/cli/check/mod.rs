//! Check command - one-shot database connectivity report

use tracing::info;

use crate::api::diagnostics::check_database;
use crate::infrastructure::logging;

/// Print the check report as JSON; fails when the store is unreachable
pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config()?;
    logging::init_logging(&config.logging);

    info!(backend = config.store.backend.as_str(), "Checking key store");

    let state = crate::create_app_state_with_config(&config)?;
    let report = check_database(state.api_key_service.as_ref()).await;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.is_success() {
        Ok(())
    } else {
        anyhow::bail!(
            "{}: {}",
            report.message,
            report.error.as_deref().unwrap_or("unknown error")
        )
    }
}
