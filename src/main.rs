use std::process::ExitCode;

use kneerx::config::{self, PipelineConfig};
use kneerx::db::{open_database, SqliteRecordSource};
use kneerx::pipeline::processor::{PipelineError, PrescriptionOutcome, PrescriptionPipeline};

fn main() -> ExitCode {
    kneerx::init_tracing();

    let Some(patient_id) = std::env::args().nth(1) else {
        eprintln!("usage: kneerx <patient_id>");
        return ExitCode::from(2);
    };

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match run(&patient_id) {
        Ok(outcome) => match serde_json::to_string_pretty(&outcome) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode outcome");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Prescription run failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(patient_id: &str) -> Result<PrescriptionOutcome, PipelineError> {
    let config = PipelineConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(error = %e, "Could not create data directory");
        }
    }
    let source = SqliteRecordSource::new(open_database(&config.database_path)?);
    let pipeline = PrescriptionPipeline::from_config(&config)?;

    let today = chrono::Local::now().date_naive();
    pipeline.run(&source, patient_id, today)
}
