use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mtsurvey_core::scaffold::{create_survey_tree, SurveyLayout};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Create the folder tree for a new magnetotelluric survey", long_about = None)]
struct Cli {
    /// Root folder of the new survey, e.g. ./survey1
    survey_root: PathBuf,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let layout = SurveyLayout::from_env();
    info!(layout = %layout, root = %cli.survey_root.display(), "scaffolding survey tree");

    let report = create_survey_tree(&cli.survey_root, layout)
        .with_context(|| format!("cannot create survey root {}", cli.survey_root.display()))?;

    if !report.is_clean() {
        eprintln!(
            "{} of {} folders could not be created",
            report.failed.len(),
            layout.subdirs().len()
        );
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
