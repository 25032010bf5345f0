//! Selection coordinator.
//!
//! # Responsibility
//! - Track which series is displayed and which project is being edited.
//! - Reconcile both pointers after repository mutations.
//!
//! # Invariants
//! - `selected_series_id`, when set, names a series that exists.
//! - `editing_project_status` is the status captured when editing began and
//!   is set if and only if `editing_project_id` is set.
//! - A `Closed` project is never opened for editing.

use crate::model::survey::{
    ProjectField, ProjectId, ProjectStatus, SeriesId, SurveyProject, SurveySeries,
};
use crate::policy::lifecycle::{fields_editable_for, is_terminal};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCoordinator {
    selected_series_id: Option<SeriesId>,
    editing_project_id: Option<ProjectId>,
    editing_project_status: Option<ProjectStatus>,
}

impl SelectionCoordinator {
    /// Selects the first series of a freshly loaded, sorted list.
    pub fn initial(series: &[SurveySeries]) -> Self {
        Self {
            selected_series_id: series.first().map(|first| first.id.clone()),
            ..Self::default()
        }
    }

    pub fn selected_series_id(&self) -> Option<&str> {
        self.selected_series_id.as_deref()
    }

    pub fn editing_project_id(&self) -> Option<&str> {
        self.editing_project_id.as_deref()
    }

    pub fn editing_project_status(&self) -> Option<ProjectStatus> {
        self.editing_project_status
    }

    /// Caller guarantees `series_id` exists.
    pub fn select(&mut self, series_id: SeriesId) {
        self.selected_series_id = Some(series_id);
    }

    pub fn on_series_created(&mut self, created: &SurveySeries) {
        self.selected_series_id = Some(created.id.clone());
    }

    /// Reconciles after `deleted` was removed; `remaining` is the
    /// post-delete, name-sorted list.
    pub fn on_series_deleted(&mut self, deleted: &SurveySeries, remaining: &[SurveySeries]) {
        if self.selected_series_id.as_deref() == Some(deleted.id.as_str()) {
            self.selected_series_id = remaining.first().map(|first| first.id.clone());
        }
        let editing_deleted_project = self
            .editing_project_id
            .as_deref()
            .is_some_and(|project_id| deleted.project(project_id).is_some());
        if editing_deleted_project {
            self.finish_project_edit();
        }
    }

    /// Opens `project` for editing. Returns `false`, changing nothing, when
    /// the project is terminal.
    pub fn begin_project_edit(&mut self, project: &SurveyProject) -> bool {
        if is_terminal(project.status) {
            return false;
        }
        self.editing_project_id = Some(project.id.clone());
        self.editing_project_status = Some(project.status);
        true
    }

    /// Clears edit state after a successful save or a cancel.
    pub fn finish_project_edit(&mut self) {
        self.editing_project_id = None;
        self.editing_project_status = None;
    }

    /// Editable fields for the project being edited, from the cached status.
    pub fn editing_fields(&self) -> BTreeSet<ProjectField> {
        self.editing_project_status
            .map(fields_editable_for)
            .unwrap_or_default()
    }
}
