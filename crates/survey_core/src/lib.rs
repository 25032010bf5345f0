//! Core domain logic for the survey series dashboard.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use config::DashboardConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::id::new_id;
pub use model::survey::{
    compare_series_names, ProjectDraft, ProjectField, ProjectId, ProjectPatch, ProjectStatus,
    SeriesId, SurveyProject, SurveySeries, ValidationError, DEFAULT_SURVEY_TEMPLATE,
};
pub use policy::lifecycle::{
    allowed_next_statuses, apply_patch, can_transition, fields_editable_for, is_field_editable,
    is_terminal, PolicyError,
};
pub use repo::seed::{load_seed_path, load_seed_reader, load_seed_str, SeedError};
pub use repo::series_repo::{InMemorySeriesRepository, RepoError, RepoResult, SeriesRepository};
pub use service::dashboard_service::{DashboardError, DashboardService, DashboardSnapshot};
pub use service::selection::SelectionCoordinator;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
