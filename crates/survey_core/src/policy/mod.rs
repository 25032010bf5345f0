//! Status-dependent business rules.
//!
//! # Responsibility
//! - Own the project lifecycle transition table.
//! - Own the per-status field editability table.
//!
//! # Invariants
//! - Policy functions are pure and total over `ProjectStatus`.
//! - Form renderers query the policy; they never bypass it.

pub mod lifecycle;
