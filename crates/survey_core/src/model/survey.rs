//! Survey series/project domain model.
//!
//! # Responsibility
//! - Define the canonical series and project records.
//! - Define form-shaped inputs for project create and edit flows.
//! - Coerce textual form values into typed fields.
//!
//! # Invariants
//! - `SurveySeries::name` and `SurveyProject::term_title` are never blank.
//! - A project belongs to exactly one series for its whole lifetime.
//! - `created_at` is set once at creation and never rewritten.
//!
//! # See also
//! - `crate::policy::lifecycle` for status-dependent editability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Template assigned when a project is created without one.
pub const DEFAULT_SURVEY_TEMPLATE: &str = "Default Survey Template";

/// Opaque identifier of a survey series.
pub type SeriesId = String;

/// Opaque identifier of a survey project, unique across all series.
pub type ProjectId = String;

/// Project lifecycle status.
///
/// Declaration order is lifecycle order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Being prepared; every field is editable.
    Draft,
    /// Announced to course owners.
    Published,
    /// Collecting responses.
    Live,
    /// Terminal. No further edits.
    Closed,
}

impl ProjectStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Draft,
        ProjectStatus::Published,
        ProjectStatus::Live,
        ProjectStatus::Closed,
    ];

    /// Wire/display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Live => "Live",
            Self::Closed => "Closed",
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == trimmed)
            .ok_or_else(|| ValidationError::InvalidStatus(trimmed.to_string()))
    }
}

/// Mutable project field names, as submitted by edit forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectField {
    TermTitle,
    CourseSections,
    Enrollments,
    SurveyTemplate,
    Status,
}

impl ProjectField {
    /// All mutable fields in form order.
    pub const ALL: [ProjectField; 5] = [
        ProjectField::TermTitle,
        ProjectField::CourseSections,
        ProjectField::Enrollments,
        ProjectField::SurveyTemplate,
        ProjectField::Status,
    ];

    /// Form field id (`termTitle`, `courseSections`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TermTitle => "termTitle",
            Self::CourseSections => "courseSections",
            Self::Enrollments => "enrollments",
            Self::SurveyTemplate => "surveyTemplate",
            Self::Status => "status",
        }
    }
}

impl Display for ProjectField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == trimmed)
            .ok_or_else(|| ValidationError::UnknownField(trimmed.to_string()))
    }
}

/// Input validation failures. Always locally correctable by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Series name is blank after trim.
    BlankSeriesName,
    /// Project term title is blank after trim.
    BlankTermTitle,
    /// Count field is not a non-negative integer.
    InvalidCount { field: ProjectField, value: String },
    /// Status is required on create.
    MissingStatus,
    /// Status label is not one of the four lifecycle states.
    InvalidStatus(String),
    /// Field id does not name a mutable project field.
    UnknownField(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankSeriesName => write!(f, "series name must not be blank"),
            Self::BlankTermTitle => write!(f, "term title must not be blank"),
            Self::InvalidCount { field, value } => write!(
                f,
                "{field} must be a non-negative integer, got `{value}`"
            ),
            Self::MissingStatus => write!(f, "status is required"),
            Self::InvalidStatus(value) => write!(
                f,
                "invalid status `{value}`; expected Draft|Published|Live|Closed"
            ),
            Self::UnknownField(value) => write!(f, "unknown project field `{value}`"),
        }
    }
}

impl Error for ValidationError {}

/// A survey distribution effort inside one series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyProject {
    pub id: ProjectId,
    pub term_title: String,
    #[serde(default)]
    pub course_sections: u32,
    #[serde(default)]
    pub enrollments: u32,
    #[serde(default = "default_survey_template")]
    pub survey_template: String,
    pub created_at: DateTime<Utc>,
    pub status: ProjectStatus,
}

impl SurveyProject {
    /// Builds a project from create-form input.
    ///
    /// # Errors
    /// - `BlankTermTitle` when `term_title` is blank.
    /// - `InvalidCount` when a supplied count is not a non-negative integer.
    /// - `MissingStatus` / `InvalidStatus` when status is absent or unknown.
    pub fn from_draft(
        id: ProjectId,
        draft: &ProjectDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let term_title =
            non_blank(Some(draft.term_title.as_str())).ok_or(ValidationError::BlankTermTitle)?;
        let course_sections = parse_count(
            ProjectField::CourseSections,
            draft.course_sections.as_deref(),
        )?;
        let enrollments = parse_count(ProjectField::Enrollments, draft.enrollments.as_deref())?;
        let status = non_blank(draft.status.as_deref())
            .ok_or(ValidationError::MissingStatus)?
            .parse::<ProjectStatus>()?;
        let survey_template = non_blank(draft.survey_template.as_deref())
            .unwrap_or(DEFAULT_SURVEY_TEMPLATE);

        Ok(Self {
            id,
            term_title: term_title.to_string(),
            course_sections: course_sections.unwrap_or(0),
            enrollments: enrollments.unwrap_or(0),
            survey_template: survey_template.to_string(),
            created_at,
            status,
        })
    }

    /// Returns whether the project reached the terminal status.
    pub fn is_closed(&self) -> bool {
        self.status == ProjectStatus::Closed
    }
}

/// A named container of projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySeries {
    pub id: SeriesId,
    pub name: String,
    #[serde(default)]
    pub projects: Vec<SurveyProject>,
}

impl SurveySeries {
    /// Creates an empty series.
    pub fn new(id: SeriesId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            projects: Vec::new(),
        }
    }

    /// Looks up an owned project.
    pub fn project(&self, project_id: &str) -> Option<&SurveyProject> {
        self.projects.iter().find(|project| project.id == project_id)
    }
}

/// Orders series names the way an English-locale collator does.
///
/// Names compare case-insensitively first (`alpha < Beta < zeta`); names
/// that differ only by case put the lowercase form first (`alpha < Alpha`).
pub fn compare_series_names(left: &str, right: &str) -> Ordering {
    let folded = left
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| {
            left.chars()
                .zip(right.chars())
                .find(|(l, r)| l != r)
                .map_or(Ordering::Equal, |(l, r)| {
                    match (l.is_lowercase(), r.is_lowercase()) {
                        (true, false) => Ordering::Less,
                        (false, true) => Ordering::Greater,
                        _ => l.cmp(&r),
                    }
                })
        })
        .then_with(|| left.cmp(right))
}

/// Create-form input for a project.
///
/// Values stay textual until validation, matching what form widgets submit.
/// JSON numbers are accepted for count fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub term_title: String,
    #[serde(deserialize_with = "deserialize_form_text")]
    pub course_sections: Option<String>,
    #[serde(deserialize_with = "deserialize_form_text")]
    pub enrollments: Option<String>,
    pub survey_template: Option<String>,
    pub status: Option<String>,
}

impl ProjectDraft {
    pub fn new(term_title: impl Into<String>, status: ProjectStatus) -> Self {
        Self {
            term_title: term_title.into(),
            status: Some(status.as_str().to_string()),
            ..Self::default()
        }
    }

    pub fn with_course_sections(mut self, value: impl ToString) -> Self {
        self.course_sections = Some(value.to_string());
        self
    }

    pub fn with_enrollments(mut self, value: impl ToString) -> Self {
        self.enrollments = Some(value.to_string());
        self
    }

    pub fn with_survey_template(mut self, value: impl Into<String>) -> Self {
        self.survey_template = Some(value.into());
        self
    }
}

/// Edit-form input for a project. Every field is optional.
///
/// Blank values are treated as absent so a partially-filled form never
/// clears a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub term_title: Option<String>,
    #[serde(deserialize_with = "deserialize_form_text")]
    pub course_sections: Option<String>,
    #[serde(deserialize_with = "deserialize_form_text")]
    pub enrollments: Option<String>,
    pub survey_template: Option<String>,
    pub status: Option<String>,
}

impl ProjectPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one field from its form id and textual value.
    pub fn set(mut self, field: ProjectField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            ProjectField::TermTitle => self.term_title = value,
            ProjectField::CourseSections => self.course_sections = value,
            ProjectField::Enrollments => self.enrollments = value,
            ProjectField::SurveyTemplate => self.survey_template = value,
            ProjectField::Status => self.status = value,
        }
        self
    }

    /// Returns the trimmed non-blank value submitted for `field`.
    pub fn value(&self, field: ProjectField) -> Option<&str> {
        let raw = match field {
            ProjectField::TermTitle => self.term_title.as_deref(),
            ProjectField::CourseSections => self.course_sections.as_deref(),
            ProjectField::Enrollments => self.enrollments.as_deref(),
            ProjectField::SurveyTemplate => self.survey_template.as_deref(),
            ProjectField::Status => self.status.as_deref(),
        };
        non_blank(raw)
    }

    /// Fields carrying a non-blank value, in form order.
    pub fn present_fields(&self) -> impl Iterator<Item = ProjectField> + '_ {
        ProjectField::ALL
            .into_iter()
            .filter(|field| self.value(*field).is_some())
    }
}

/// Parses an optional count field.
///
/// Blank input yields `Ok(None)`.
pub fn parse_count(field: ProjectField, raw: Option<&str>) -> Result<Option<u32>, ValidationError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidCount {
                field,
                value: value.to_string(),
            }),
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn default_survey_template() -> String {
    DEFAULT_SURVEY_TEMPLATE.to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormText {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn deserialize_form_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<FormText>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        FormText::Text(text) => text,
        FormText::Integer(number) => number.to_string(),
        FormText::Float(number) => number.to_string(),
    }))
}
