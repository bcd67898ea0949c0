//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record and its field catalogue.
//! - Keep one in-memory shape for both cache and cloud projections.
//!
//! # Invariants
//! - Every todo is identified by a stable, non-empty `TodoId`.
//! - Field keys are shared by the local codec and the cloud key mapping.

pub mod field;
pub mod todo;
