//! Project lifecycle state machine and field editability.
//!
//! # Responsibility
//! - Declare which statuses are reachable from each status.
//! - Declare which fields may change in each status.
//! - Apply an edit patch against these tables.
//!
//! # Invariants
//! - Transitions are strictly forward; `Closed` is terminal.
//! - A `Closed` project exposes no editable field, status included.
//! - `apply_patch` either returns a fully updated copy or an error; the
//!   input project is never mutated.

use crate::model::survey::{
    parse_count, ProjectField, ProjectPatch, ProjectStatus, SurveyProject, ValidationError,
};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DRAFT_FIELDS: &[ProjectField] = &[
    ProjectField::TermTitle,
    ProjectField::CourseSections,
    ProjectField::Enrollments,
    ProjectField::SurveyTemplate,
    ProjectField::Status,
];
const PUBLISHED_FIELDS: &[ProjectField] = &[
    ProjectField::TermTitle,
    ProjectField::CourseSections,
    ProjectField::Enrollments,
    ProjectField::Status,
];
const LIVE_FIELDS: &[ProjectField] = &[ProjectField::Enrollments, ProjectField::Status];

const DRAFT_NEXT: &[ProjectStatus] = &[
    ProjectStatus::Published,
    ProjectStatus::Live,
    ProjectStatus::Closed,
];
const PUBLISHED_NEXT: &[ProjectStatus] = &[ProjectStatus::Live, ProjectStatus::Closed];
const LIVE_NEXT: &[ProjectStatus] = &[ProjectStatus::Closed];

/// Rejections produced while applying a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Project is `Closed`; nothing may change.
    Immutable,
    /// Requested status is not reachable from the current one.
    InvalidTransition {
        from: ProjectStatus,
        to: ProjectStatus,
    },
    /// A submitted value failed coercion.
    Validation(ValidationError),
}

impl Display for PolicyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Immutable => write!(f, "closed projects cannot be edited"),
            Self::InvalidTransition { from, to } => {
                write!(f, "status cannot change from {from} to {to}")
            }
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PolicyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for PolicyError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

fn editable_table(status: ProjectStatus) -> &'static [ProjectField] {
    match status {
        ProjectStatus::Draft => DRAFT_FIELDS,
        ProjectStatus::Published => PUBLISHED_FIELDS,
        ProjectStatus::Live => LIVE_FIELDS,
        ProjectStatus::Closed => &[],
    }
}

fn transition_table(status: ProjectStatus) -> &'static [ProjectStatus] {
    match status {
        ProjectStatus::Draft => DRAFT_NEXT,
        ProjectStatus::Published => PUBLISHED_NEXT,
        ProjectStatus::Live => LIVE_NEXT,
        ProjectStatus::Closed => &[],
    }
}

/// Fields an edit form may submit for a project in `status`.
pub fn fields_editable_for(status: ProjectStatus) -> BTreeSet<ProjectField> {
    editable_table(status).iter().copied().collect()
}

/// Statuses a project in `status` may move to.
pub fn allowed_next_statuses(status: ProjectStatus) -> BTreeSet<ProjectStatus> {
    transition_table(status).iter().copied().collect()
}

pub fn is_field_editable(status: ProjectStatus, field: ProjectField) -> bool {
    editable_table(status).contains(&field)
}

pub fn can_transition(from: ProjectStatus, to: ProjectStatus) -> bool {
    transition_table(from).contains(&to)
}

/// Returns whether no transition leaves `status`.
pub fn is_terminal(status: ProjectStatus) -> bool {
    transition_table(status).is_empty()
}

/// Applies `patch` to a copy of `project` under the current status rules.
///
/// Fields that are not editable in the current status are dropped without
/// error, so stale form state cannot fail an otherwise valid edit.
///
/// # Errors
/// - `Immutable` when the project is `Closed`.
/// - `InvalidTransition` when the submitted status is not reachable.
/// - `Validation` when a submitted value cannot be coerced.
pub fn apply_patch(
    project: &SurveyProject,
    patch: &ProjectPatch,
) -> Result<SurveyProject, PolicyError> {
    let current = project.status;
    if is_terminal(current) {
        return Err(PolicyError::Immutable);
    }

    let mut updated = project.clone();
    for field in patch.present_fields() {
        if !is_field_editable(current, field) {
            continue;
        }
        let Some(raw) = patch.value(field) else {
            continue;
        };
        match field {
            ProjectField::TermTitle => updated.term_title = raw.to_string(),
            ProjectField::CourseSections => {
                updated.course_sections = parse_count(field, Some(raw))?.unwrap_or_default();
            }
            ProjectField::Enrollments => {
                updated.enrollments = parse_count(field, Some(raw))?.unwrap_or_default();
            }
            ProjectField::SurveyTemplate => updated.survey_template = raw.to_string(),
            ProjectField::Status => {
                let next = raw.parse::<ProjectStatus>()?;
                if !can_transition(current, next) {
                    return Err(PolicyError::InvalidTransition {
                        from: current,
                        to: next,
                    });
                }
                updated.status = next;
            }
        }
    }

    Ok(updated)
}
