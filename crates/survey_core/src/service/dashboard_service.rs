//! Dashboard use-case service.
//!
//! # Responsibility
//! - Expose the collaborator-facing operations (`on_series_create`, ...).
//! - Keep the selection coordinator consistent with every repository write.
//! - Emit metadata-only diagnostic events for each mutation.
//!
//! # Invariants
//! - Selection is reconciled against post-mutation repository state.
//! - Failed operations change neither the repository nor the selection.
//! - Service APIs never bypass repository/policy contracts.

use crate::model::survey::{
    ProjectDraft, ProjectField, ProjectId, ProjectPatch, ProjectStatus, SeriesId, SurveyProject,
    SurveySeries, ValidationError,
};
use crate::repo::series_repo::{RepoError, SeriesRepository};
use crate::service::selection::SelectionCoordinator;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors returned to UI collaborators. All are recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// Malformed or missing input.
    Validation(ValidationError),
    /// Series id is stale or unknown.
    SeriesNotFound(SeriesId),
    /// Project id is stale or unknown.
    ProjectNotFound(ProjectId),
    /// Requested status change violates the lifecycle table.
    InvalidTransition {
        project_id: ProjectId,
        from: ProjectStatus,
        to: ProjectStatus,
    },
    /// Edit attempted on a `Closed` project.
    ImmutableState(ProjectId),
    /// Create-in-selected called with nothing selected.
    NoSeriesSelected,
    /// Repository rejected its own state.
    Repo(RepoError),
}

impl DashboardError {
    /// Stable short label for logs and notifications.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::SeriesNotFound(_) | Self::ProjectNotFound(_) => "not_found",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::ImmutableState(_) => "immutable_state",
            Self::NoSeriesSelected => "no_series_selected",
            Self::Repo(_) => "repo",
        }
    }
}

impl Display for DashboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::SeriesNotFound(id) => write!(f, "survey series not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "survey project not found: {id}"),
            Self::InvalidTransition {
                project_id,
                from,
                to,
            } => write!(
                f,
                "survey project {project_id} cannot move from {from} to {to}"
            ),
            Self::ImmutableState(id) => write!(f, "survey project is closed: {id}"),
            Self::NoSeriesSelected => write!(f, "no survey series selected"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DashboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DashboardError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::SeriesNotFound(id) => Self::SeriesNotFound(id),
            RepoError::ProjectNotFound(id) => Self::ProjectNotFound(id),
            RepoError::ImmutableState(id) => Self::ImmutableState(id),
            RepoError::InvalidTransition {
                project_id,
                from,
                to,
            } => Self::InvalidTransition {
                project_id,
                from,
                to,
            },
            other => Self::Repo(other),
        }
    }
}

/// One consistent view of repository and selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub series: Vec<SurveySeries>,
    pub selection: SelectionCoordinator,
}

/// Dashboard service facade over a series repository.
pub struct DashboardService<R: SeriesRepository> {
    repo: R,
    selection: SelectionCoordinator,
}

impl<R: SeriesRepository> DashboardService<R> {
    /// Wraps a loaded repository; the first series starts selected.
    pub fn new(repo: R) -> Self {
        let selection = SelectionCoordinator::initial(repo.list_series());
        Self { repo, selection }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn selection(&self) -> &SelectionCoordinator {
        &self.selection
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            series: self.repo.list_series().to_vec(),
            selection: self.selection.clone(),
        }
    }

    /// Creates a series and selects it.
    pub fn on_series_create(&mut self, name: &str) -> Result<SurveySeries, DashboardError> {
        let created = self
            .repo
            .create_series(name)
            .map_err(|err| failed("series_create", err.into()))?;
        self.selection.on_series_created(&created);
        info!(
            "event=series_create module=service status=ok series_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn on_series_edit(&mut self, id: &str, name: &str) -> Result<SurveySeries, DashboardError> {
        let renamed = self
            .repo
            .edit_series(id, name)
            .map_err(|err| failed("series_edit", err.into()))?;
        info!(
            "event=series_edit module=service status=ok series_id={}",
            renamed.id
        );
        Ok(renamed)
    }

    /// Deletes a series with its projects, then reconciles selection from
    /// the remaining series.
    pub fn on_series_delete(&mut self, id: &str) -> Result<(), DashboardError> {
        let deleted = self
            .repo
            .delete_series(id)
            .map_err(|err| failed("series_delete", err.into()))?;
        self.selection
            .on_series_deleted(&deleted, self.repo.list_series());
        info!(
            "event=series_delete module=service status=ok series_id={} projects_removed={}",
            deleted.id,
            deleted.projects.len()
        );
        Ok(())
    }

    pub fn on_project_create(
        &mut self,
        series_id: &str,
        draft: &ProjectDraft,
    ) -> Result<SurveyProject, DashboardError> {
        let created = self
            .repo
            .create_project(series_id, draft)
            .map_err(|err| failed("project_create", err.into()))?;
        info!(
            "event=project_create module=service status=ok series_id={} project_id={} project_status={}",
            series_id, created.id, created.status
        );
        Ok(created)
    }

    /// Creates a project inside the currently selected series.
    pub fn on_project_create_in_selected(
        &mut self,
        draft: &ProjectDraft,
    ) -> Result<SurveyProject, DashboardError> {
        let series_id = self
            .selection
            .selected_series_id()
            .map(str::to_string)
            .ok_or_else(|| failed("project_create", DashboardError::NoSeriesSelected))?;
        self.on_project_create(&series_id, draft)
    }

    /// Applies an edit patch. On success, the edit state is cleared if it
    /// belonged to this project.
    ///
    /// # Errors
    /// - `ProjectNotFound` for unknown ids.
    /// - `ImmutableState` for `Closed` projects.
    /// - `InvalidTransition` when the submitted status is not reachable.
    /// - `Validation` when a count cannot be coerced.
    pub fn on_project_edit(
        &mut self,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> Result<SurveyProject, DashboardError> {
        let updated = self
            .repo
            .edit_project(project_id, patch)
            .map_err(|err| failed("project_edit", err.into()))?;
        if self.selection.editing_project_id() == Some(project_id) {
            self.selection.finish_project_edit();
        }
        info!(
            "event=project_edit module=service status=ok project_id={} project_status={}",
            updated.id, updated.status
        );
        Ok(updated)
    }

    /// Sidebar click: shows `series_id`.
    pub fn select_series(&mut self, series_id: &str) -> Result<(), DashboardError> {
        if self.repo.get_series(series_id).is_none() {
            return Err(DashboardError::SeriesNotFound(series_id.to_string()));
        }
        self.selection.select(series_id.to_string());
        Ok(())
    }

    pub fn selected_series(&self) -> Option<&SurveySeries> {
        self.selection
            .selected_series_id()
            .and_then(|id| self.repo.get_series(id))
    }

    pub fn search_series(&self, query: &str) -> Vec<&SurveySeries> {
        self.repo.filter_series(query)
    }

    /// Opens a project for editing. Returns `Ok(false)` for `Closed`
    /// projects, which are refused before any edit surface opens.
    pub fn begin_project_edit(&mut self, project_id: &str) -> Result<bool, DashboardError> {
        let (_, project) = self
            .repo
            .find_project(project_id)
            .ok_or_else(|| DashboardError::ProjectNotFound(project_id.to_string()))?;
        Ok(self.selection.begin_project_edit(project))
    }

    /// Discards the open edit without touching the repository.
    pub fn cancel_project_edit(&mut self) {
        self.selection.finish_project_edit();
    }

    pub fn editing_fields(&self) -> BTreeSet<ProjectField> {
        self.selection.editing_fields()
    }
}

fn failed(event: &str, err: DashboardError) -> DashboardError {
    warn!(
        "event={} module=service status=error error_kind={}",
        event,
        err.kind()
    );
    err
}
