//! Static seed loading.
//!
//! Seed documents are a JSON array of series records in wire shape
//! (`id`, `name`, `projects[]` with camelCase project fields).

use crate::model::survey::SurveySeries;
use crate::repo::series_repo::{InMemorySeriesRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Seed loading failures.
#[derive(Debug)]
pub enum SeedError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    Invalid(RepoError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read seed `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "malformed seed JSON: {err}"),
            Self::Invalid(err) => write!(f, "seed rejected: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Invalid(value)
    }
}

pub fn load_seed_str(json: &str) -> Result<InMemorySeriesRepository, SeedError> {
    let records: Vec<SurveySeries> = serde_json::from_str(json)?;
    build(records)
}

pub fn load_seed_reader(reader: impl Read) -> Result<InMemorySeriesRepository, SeedError> {
    let records: Vec<SurveySeries> = serde_json::from_reader(reader)?;
    build(records)
}

/// Loads and validates a seed file.
pub fn load_seed_path(path: impl AsRef<Path>) -> Result<InMemorySeriesRepository, SeedError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_seed_reader(std::io::BufReader::new(file))
}

fn build(records: Vec<SurveySeries>) -> Result<InMemorySeriesRepository, SeedError> {
    let series_count = records.len();
    let project_count = records
        .iter()
        .map(|series| series.projects.len())
        .sum::<usize>();
    let repo = InMemorySeriesRepository::from_seed(records)?;
    info!(
        "event=seed_load module=repo status=ok series={} projects={}",
        series_count, project_count
    );
    Ok(repo)
}
