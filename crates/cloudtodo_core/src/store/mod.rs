//! Local cache adapter.
//!
//! # Responsibility
//! - Define the key-value cache contract used to persist todo blobs.
//! - Keep SQL details out of the model and codec layers.
//!
//! # Invariants
//! - Cache keys are todo ids; values are opaque encoded blobs.

pub mod todo_cache;
