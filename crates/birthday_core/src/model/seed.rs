//! Seed/import record shape and the bundled bootstrap dataset.
//!
//! # Responsibility
//! - Define the raw record shape shared by the seed dataset and import
//!   files: `{id, name, birthDate, tags?}`.
//! - Expose the dataset embedded in the crate for first-load bootstrap.
//!
//! # Invariants
//! - `birth_date` stays a raw string here; only the calendar layer decides
//!   whether a record names a real date.
//! - Unknown JSON fields are ignored, so exported rosters (which carry
//!   derived fields) can be re-imported through this shape.

use serde::{Deserialize, Serialize};

/// Raw roster record as found in the bundled seed dataset and in import
/// payloads. Typed deserialization through this struct is the import
/// schema check: a payload that does not decode is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecord {
    pub id: i64,
    pub name: String,
    /// Birth date string in either supported input shape.
    pub birth_date: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

const BUNDLED_SEED_JSON: &str = include_str!("../../data/seed_people.json");

/// Parses the seed dataset shipped inside the crate.
///
/// The embedded JSON is covered by tests, so a decode failure here is a
/// packaging bug, not a runtime condition.
pub fn bundled_seed() -> Vec<SeedRecord> {
    serde_json::from_str(BUNDLED_SEED_JSON).expect("bundled seed dataset is valid JSON")
}
