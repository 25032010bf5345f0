//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into collaborator-level APIs.
//! - Own selection state so UI layers stay free of invariant logic.

pub mod dashboard_service;
pub mod selection;
