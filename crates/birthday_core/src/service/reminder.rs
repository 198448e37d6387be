//! Upcoming-birthday reminder selection.
//!
//! # Responsibility
//! - Select the active reminder set from the roster.
//! - Cycle through that set with wraparound for the banner UI.
//!
//! # Invariants
//! - Membership is derived purely from `days_until_birthday`.
//! - The cursor resets to 0 whenever set membership changes.

use crate::model::person::{Person, PersonId};

/// Day counts that place an entry in the active reminder set.
pub const REMINDER_DAYS: [i64; 3] = [1, 3, 5];

/// Returns the reminder subset in roster order.
pub fn reminder_set(people: &[Person]) -> Vec<&Person> {
    people
        .iter()
        .filter(|person| REMINDER_DAYS.contains(&person.days_until_birthday))
        .collect()
}

/// Cycling cursor over the active reminder set.
///
/// Callers re-`sync` after every roster change; `next`/`prev` wrap around.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderRotation {
    members: Vec<PersonId>,
    index: usize,
}

impl ReminderRotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derives the reminder set from the roster.
    ///
    /// The cursor resets to the first entry when membership changed;
    /// otherwise the current position is kept.
    pub fn sync(&mut self, people: &[Person]) {
        let members: Vec<PersonId> = reminder_set(people)
            .iter()
            .map(|person| person.id)
            .collect();

        let mut new_set = members.clone();
        let mut old_set = self.members.clone();
        new_set.sort_unstable();
        old_set.sort_unstable();
        if new_set != old_set {
            self.index = 0;
        }
        self.members = members;
    }

    /// Returns the id under the cursor, if the set is non-empty.
    pub fn current(&self) -> Option<PersonId> {
        self.members.get(self.index).copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Advances the cursor, wrapping past the end.
    pub fn next(&mut self) {
        if !self.members.is_empty() {
            self.index = (self.index + 1) % self.members.len();
        }
    }

    /// Moves the cursor back, wrapping before the start.
    pub fn prev(&mut self) {
        if !self.members.is_empty() {
            self.index = (self.index + self.members.len() - 1) % self.members.len();
        }
    }
}
