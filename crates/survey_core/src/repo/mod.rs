//! Repository layer: ownership of all series and projects.
//!
//! # Responsibility
//! - Define the series repository contract used by services.
//! - Provide the in-memory implementation and seed loading.
//!
//! # Invariants
//! - Repository writes consult `policy::lifecycle` before touching a project.
//! - Repository APIs return semantic errors (`SeriesNotFound`,
//!   `InvalidTransition`, ...) rather than panicking.

pub mod seed;
pub mod series_repo;
