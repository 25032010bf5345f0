//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load a seed document into the dashboard core and print its state.
//! - Keep output deterministic for quick local sanity checks.
//!
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use survey_core::{
    core_version, init_logging, load_seed_path, DashboardConfig, DashboardService,
    InMemorySeriesRepository, SeriesRepository,
};

/// Prints the survey series loaded from a seed document.
#[derive(Parser, Debug)]
#[command(name = "survey_cli", version)]
struct Cli {
    /// Seed JSON file; the dashboard starts empty when omitted.
    #[arg(env = "SURVEY_SEED_PATH")]
    seed_path: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("survey_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = DashboardConfig::from_env();
    if let Some(path) = cli.seed_path {
        config = config.with_seed_path(path);
    }

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let repo = match config.seed_path.as_deref() {
        Some(path) => load_seed_path(path).map_err(|err| err.to_string())?,
        None => InMemorySeriesRepository::new(),
    };
    let service = DashboardService::new(repo);
    info!(
        "event=cli_start module=cli status=ok series={}",
        service.repository().list_series().len()
    );

    println!("survey_core version={}", core_version());
    let selected = service.selection().selected_series_id();
    for series in service.repository().list_series() {
        let marker = if Some(series.id.as_str()) == selected {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {} ({} project(s)) id={}",
            series.name,
            series.projects.len(),
            series.id
        );
        for project in &series.projects {
            println!(
                "    - {} [{}] sections={} enrollments={} template={}",
                project.term_title,
                project.status,
                project.course_sections,
                project.enrollments,
                project.survey_template
            );
        }
    }
    if selected.is_none() {
        println!("no survey series selected");
    }
    Ok(())
}
