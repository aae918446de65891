use anyhow::{Context, Result};
use calendar_audit::config::Settings;
use calendar_audit::services::run_workflow_suite;
use calendar_audit::utils::init_logging;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env().context("Invalid configuration")?;
    init_logging(settings.log_level, settings.log_file.as_deref())?;
    info!("Auditing calendar workflows at {}", settings.base_url);

    let results = run_workflow_suite(&settings)
        .await
        .with_context(|| format!("Workflow audit against {} failed", settings.base_url))?;
    if !results.all_passed() {
        info!("Some workflows did not complete; see {}", settings.results_path.display());
    }
    Ok(())
}
