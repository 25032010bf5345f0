//! Series repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Own every `SurveySeries` and, through them, every `SurveyProject`.
//! - Provide create/edit/delete entry points guarded by domain invariants.
//!
//! # Invariants
//! - Series stay sorted by `compare_series_names` (stable) after every write.
//! - Project ids are unique across the whole repository.
//! - Writes are computed on a copy and committed only on success; a failed
//!   call leaves the repository untouched.

use crate::model::id::new_id;
use crate::model::survey::{
    compare_series_names, ProjectDraft, ProjectId, ProjectPatch, ProjectStatus, SeriesId,
    SurveyProject, SurveySeries, ValidationError,
};
use crate::policy::lifecycle::{apply_patch, PolicyError};
use chrono::Utc;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for series/project operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(ValidationError),
    SeriesNotFound(SeriesId),
    ProjectNotFound(ProjectId),
    ImmutableState(ProjectId),
    InvalidTransition {
        project_id: ProjectId,
        from: ProjectStatus,
        to: ProjectStatus,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::SeriesNotFound(id) => write!(f, "survey series not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "survey project not found: {id}"),
            Self::ImmutableState(id) => write!(f, "survey project is closed: {id}"),
            Self::InvalidTransition {
                project_id,
                from,
                to,
            } => write!(
                f,
                "survey project {project_id} cannot move from {from} to {to}"
            ),
            Self::InvalidData(message) => write!(f, "invalid series data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Repository interface for series and their owned projects.
pub trait SeriesRepository {
    /// All series in canonical (name-sorted) order.
    fn list_series(&self) -> &[SurveySeries];
    fn create_series(&mut self, name: &str) -> RepoResult<SurveySeries>;
    fn edit_series(&mut self, id: &str, name: &str) -> RepoResult<SurveySeries>;
    /// Removes a series and all of its projects; returns what was removed.
    fn delete_series(&mut self, id: &str) -> RepoResult<SurveySeries>;
    fn create_project(
        &mut self,
        series_id: &str,
        draft: &ProjectDraft,
    ) -> RepoResult<SurveyProject>;
    fn edit_project(&mut self, project_id: &str, patch: &ProjectPatch)
        -> RepoResult<SurveyProject>;

    fn get_series(&self, id: &str) -> Option<&SurveySeries> {
        self.list_series().iter().find(|series| series.id == id)
    }

    /// Finds a project by id regardless of owning series.
    fn find_project(&self, project_id: &str) -> Option<(&SurveySeries, &SurveyProject)> {
        self.list_series().iter().find_map(|series| {
            series
                .project(project_id)
                .map(|project| (series, project))
        })
    }

    /// Case-insensitive substring search over series names.
    ///
    /// A blank query matches every series. Canonical order is preserved.
    fn filter_series(&self, query: &str) -> Vec<&SurveySeries> {
        let needle = query.trim().to_lowercase();
        self.list_series()
            .iter()
            .filter(|series| series.name.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Process-memory repository for a single dashboard session.
#[derive(Debug, Clone, Default)]
pub struct InMemorySeriesRepository {
    series: Vec<SurveySeries>,
}

impl InMemorySeriesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from seed records.
    ///
    /// # Errors
    /// - `Validation` when a series name or project term title is blank.
    /// - `InvalidData` when series ids or project ids repeat.
    pub fn from_seed(series: Vec<SurveySeries>) -> RepoResult<Self> {
        validate_seed(&series)?;
        let mut repo = Self { series };
        repo.sort();
        Ok(repo)
    }

    fn sort(&mut self) {
        self.series
            .sort_by(|left, right| compare_series_names(&left.name, &right.name));
    }

    fn position(&self, id: &str) -> RepoResult<usize> {
        self.series
            .iter()
            .position(|series| series.id == id)
            .ok_or_else(|| RepoError::SeriesNotFound(id.to_string()))
    }

    fn contains_id(&self, id: &str) -> bool {
        self.series
            .iter()
            .any(|series| series.id == id || series.project(id).is_some())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = new_id();
            if !self.contains_id(&id) {
                return id;
            }
        }
    }
}

impl SeriesRepository for InMemorySeriesRepository {
    fn list_series(&self) -> &[SurveySeries] {
        &self.series
    }

    fn create_series(&mut self, name: &str) -> RepoResult<SurveySeries> {
        let name = normalize_series_name(name)?;
        let created = SurveySeries::new(self.fresh_id(), name);
        self.series.push(created.clone());
        self.sort();
        Ok(created)
    }

    fn edit_series(&mut self, id: &str, name: &str) -> RepoResult<SurveySeries> {
        let index = self.position(id)?;
        let name = normalize_series_name(name)?;
        self.series[index].name = name;
        let renamed = self.series[index].clone();
        self.sort();
        Ok(renamed)
    }

    fn delete_series(&mut self, id: &str) -> RepoResult<SurveySeries> {
        let index = self.position(id)?;
        Ok(self.series.remove(index))
    }

    fn create_project(
        &mut self,
        series_id: &str,
        draft: &ProjectDraft,
    ) -> RepoResult<SurveyProject> {
        let index = self.position(series_id)?;
        let project = SurveyProject::from_draft(self.fresh_id(), draft, Utc::now())?;
        self.series[index].projects.push(project.clone());
        Ok(project)
    }

    fn edit_project(
        &mut self,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> RepoResult<SurveyProject> {
        let (series_index, project_index) = self
            .series
            .iter()
            .enumerate()
            .find_map(|(series_index, series)| {
                series
                    .projects
                    .iter()
                    .position(|project| project.id == project_id)
                    .map(|project_index| (series_index, project_index))
            })
            .ok_or_else(|| RepoError::ProjectNotFound(project_id.to_string()))?;

        let current = &self.series[series_index].projects[project_index];
        let updated = apply_patch(current, patch).map_err(|err| match err {
            PolicyError::Immutable => RepoError::ImmutableState(project_id.to_string()),
            PolicyError::InvalidTransition { from, to } => RepoError::InvalidTransition {
                project_id: project_id.to_string(),
                from,
                to,
            },
            PolicyError::Validation(err) => RepoError::Validation(err),
        })?;

        self.series[series_index].projects[project_index] = updated.clone();
        Ok(updated)
    }
}

fn validate_seed(series: &[SurveySeries]) -> RepoResult<()> {
    let mut series_ids = HashSet::new();
    let mut project_ids = HashSet::new();
    for entry in series {
        if entry.name.trim().is_empty() {
            return Err(ValidationError::BlankSeriesName.into());
        }
        if !series_ids.insert(entry.id.as_str()) {
            return Err(RepoError::InvalidData(format!(
                "duplicate series id `{}`",
                entry.id
            )));
        }
        for project in &entry.projects {
            if project.term_title.trim().is_empty() {
                return Err(ValidationError::BlankTermTitle.into());
            }
            if !project_ids.insert(project.id.as_str()) {
                return Err(RepoError::InvalidData(format!(
                    "duplicate project id `{}`",
                    project.id
                )));
            }
        }
    }
    Ok(())
}

fn normalize_series_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankSeriesName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{InMemorySeriesRepository, RepoError, SeriesRepository};
    use crate::model::survey::{ProjectDraft, ProjectStatus, SurveySeries, ValidationError};

    #[test]
    fn create_series_trims_and_rejects_blank_names() {
        let mut repo = InMemorySeriesRepository::new();
        let created = repo.create_series("  Fall Cohort ").unwrap();
        assert_eq!(created.name, "Fall Cohort");

        let err = repo.create_series("   ").unwrap_err();
        assert_eq!(err, RepoError::Validation(ValidationError::BlankSeriesName));
        assert_eq!(repo.list_series().len(), 1);
    }

    #[test]
    fn edit_series_resorts_after_rename() {
        let mut repo = InMemorySeriesRepository::new();
        let alpha = repo.create_series("Alpha").unwrap();
        repo.create_series("Beta").unwrap();

        repo.edit_series(&alpha.id, "Zeta").unwrap();
        let names = repo
            .list_series()
            .iter()
            .map(|series| series.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Beta", "Zeta"]);
    }

    #[test]
    fn mixed_case_names_sort_alphabetically() {
        let mut repo = InMemorySeriesRepository::new();
        for name in ["Beta", "alpha", "Zeta", "charlie"] {
            repo.create_series(name).unwrap();
        }
        let names = repo
            .list_series()
            .iter()
            .map(|series| series.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["alpha", "Beta", "charlie", "Zeta"]);

        let seeded = InMemorySeriesRepository::from_seed(vec![
            SurveySeries::new("s-1".to_string(), "Zeta"),
            SurveySeries::new("s-2".to_string(), "Alpha"),
            SurveySeries::new("s-3".to_string(), "alpha"),
        ])
        .unwrap();
        let names = seeded
            .list_series()
            .iter()
            .map(|series| series.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["alpha", "Alpha", "Zeta"]);
    }

    #[test]
    fn failed_project_create_leaves_series_untouched() {
        let mut repo = InMemorySeriesRepository::new();
        let series = repo.create_series("Fall").unwrap();
        let draft = ProjectDraft::new("Fall 2024", ProjectStatus::Draft).with_enrollments("-3");

        assert!(matches!(
            repo.create_project(&series.id, &draft),
            Err(RepoError::Validation(ValidationError::InvalidCount { .. }))
        ));
        assert!(repo.get_series(&series.id).unwrap().projects.is_empty());
    }

    #[test]
    fn filter_series_is_case_insensitive() {
        let mut repo = InMemorySeriesRepository::new();
        repo.create_series("Spring Cohort").unwrap();
        repo.create_series("Fall Cohort").unwrap();
        repo.create_series("Summer Bridge").unwrap();

        let names = repo
            .filter_series("  COHORT ")
            .into_iter()
            .map(|series| series.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Fall Cohort", "Spring Cohort"]);
        assert_eq!(repo.filter_series("").len(), 3);
    }
}
