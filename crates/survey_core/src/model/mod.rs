//! Survey dashboard domain model.
//!
//! # Responsibility
//! - Define canonical series/project structures used by core business logic.
//! - Provide identifier generation for new entities.
//!
//! # Invariants
//! - Every series and project is identified by a unique opaque id.
//! - Projects are owned by exactly one series; deleting the series drops them.

pub mod id;
pub mod survey;
