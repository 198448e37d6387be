//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical roster record and its serialized wire shape.
//! - Keep the derived display cache consistent with the birth date.
//!
//! # Invariants
//! - `birth_date` is the origin of truth; derived fields are a cache that
//!   is recomputed on every load and mutation, never trusted from storage.
//! - The self tag is a reserved sentinel carried by at most one person.

use crate::calendar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reserved tag marking the roster entry that represents the app user.
///
/// The literal matches the original dataset so existing exports keep
/// their meaning when re-imported.
pub const SELF_TAG: &str = "自己";

/// Stable identifier for roster entries.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PersonId = i64;

/// Canonical roster record.
///
/// Serialized field names stay camelCase so exported files are readable
/// by (and from) the original application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Unique within the roster; engine-assigned on add, caller-assigned
    /// on import and seed load.
    pub id: PersonId,
    /// Display name; non-empty for form-created entries.
    pub name: String,
    /// Birth calendar date, replaced wholesale on edit.
    #[serde(with = "crate::calendar::birth_date_format")]
    pub birth_date: NaiveDate,
    /// Ordered tag sequence; may be empty.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Display-order override; not part of identity.
    #[serde(default)]
    pub is_pinned: bool,
    /// Days from the evaluation day to the next occurrence. Derived.
    #[serde(default)]
    pub days_until_birthday: i64,
    /// Age turned on the next occurrence. Derived.
    #[serde(default)]
    pub upcoming_age: i32,
    /// Month/day display string. Derived.
    #[serde(default)]
    pub formatted_date: String,
}

impl Person {
    /// Creates a record with an empty derived cache.
    ///
    /// Callers must invoke [`Person::refresh`] before the record is shown
    /// or persisted.
    pub fn new(
        id: PersonId,
        name: impl Into<String>,
        birth_date: NaiveDate,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            birth_date,
            tags,
            is_pinned: false,
            days_until_birthday: 0,
            upcoming_age: 0,
            formatted_date: String::new(),
        }
    }

    /// Recomputes the derived display cache against `today`.
    pub fn refresh(&mut self, today: NaiveDate) {
        let facts = calendar::birthday_facts(self.birth_date, today);
        self.days_until_birthday = facts.days_until;
        self.upcoming_age = facts.upcoming_age;
        self.formatted_date = facts.formatted_date;
    }

    /// Returns whether this record carries the reserved self tag.
    pub fn is_self(&self) -> bool {
        self.tags.iter().any(|tag| tag == SELF_TAG)
    }
}
