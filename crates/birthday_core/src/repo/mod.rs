//! Persistence contracts for the birthday roster.
//!
//! # Responsibility
//! - Define the slot repository trait the engine persists through.
//! - Provide the SQLite-backed implementation.

pub mod slot_repo;
