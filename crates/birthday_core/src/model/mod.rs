//! Domain model for the birthday roster.
//!
//! # Responsibility
//! - Define the canonical `Person` record with its derived display fields.
//! - Define the raw seed/import record shape and the bundled dataset.
//!
//! # Invariants
//! - `Person::id` is unique within a roster.
//! - At most one person carries the reserved self tag.

pub mod person;
pub mod seed;
