use anyhow::{Context, Result};
use calendar_audit::config::Settings;
use calendar_audit::services::run_extraction;
use calendar_audit::utils::init_logging;
use log::info;

fn main() -> Result<()> {
    let settings = Settings::from_env().context("Invalid configuration")?;
    init_logging(settings.log_level, settings.log_file.as_deref())?;
    info!("Extracting {}", settings.sheet_path.display());

    run_extraction(&settings)
        .with_context(|| format!("Failed to extract {}", settings.sheet_path.display()))?;
    Ok(())
}
