//! Birthday roster engine.
//!
//! # Responsibility
//! - Own the authoritative ordered roster and every mutation rule:
//!   add/edit/delete, pin and manual reorder, import/export, onboarding.
//! - Serialize the full list back to the slot store after each successful
//!   mutation.
//!
//! # Invariants
//! - A rejected operation leaves both the in-memory roster and the
//!   persisted slot unchanged.
//! - Add/edit/import re-sort by `days_until_birthday` only; pin order is
//!   maintained exclusively by the pin/move operations. The asymmetry is
//!   inherited behavior and covered by tests.
//! - The self-tagged entry can never be removed, alone or in bulk.

use crate::calendar::{parse_birth_date, InvalidDateError};
use crate::model::person::{Person, PersonId, SELF_TAG};
use crate::model::seed::{bundled_seed, SeedRecord};
use crate::repo::slot_repo::{
    RepoError, SlotRepository, SLOT_BIRTHDAY_LIST, SLOT_ONBOARDING_DONE, SLOT_SELF_PROFILE,
};
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Suggested filename for exported rosters.
pub const EXPORT_FILE_NAME: &str = "birthday-data.json";

/// Id reserved for the onboarding-created self entry.
pub const SELF_PERSON_ID: PersonId = 0;

pub type RosterResult<T> = Result<T, RosterError>;

/// Engine-boundary error for roster operations.
#[derive(Debug)]
pub enum RosterError {
    /// Birth date input cannot be parsed into a real calendar date.
    InvalidDate(InvalidDateError),
    /// A required form field is missing or blank.
    IncompleteForm(&'static str),
    /// The operation would remove the protected self entry.
    ProtectedEntity(PersonId),
    /// Import payload failed shape validation; nothing was merged.
    MalformedImport(String),
    /// No roster entry with the given id.
    NotFound(PersonId),
    /// Slot store failure.
    Store(RepoError),
    /// Roster could not be encoded for persistence or export.
    Encode(serde_json::Error),
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::IncompleteForm(field) => write!(f, "missing required field: {field}"),
            Self::ProtectedEntity(id) => {
                write!(f, "entry {id} is the protected self entry and cannot be removed")
            }
            Self::MalformedImport(message) => write!(f, "malformed import payload: {message}"),
            Self::NotFound(id) => write!(f, "no roster entry with id {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode roster: {err}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidDateError> for RosterError {
    fn from(value: InvalidDateError) -> Self {
        Self::InvalidDate(value)
    }
}

impl From<RepoError> for RosterError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Raw form fields for add/edit/onboarding submissions.
///
/// Year/month/day stay strings here because that is what the form
/// delivers; validation and padding happen on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonForm {
    pub name: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub tags: Vec<String>,
}

impl PersonForm {
    /// Validates required fields and composes the dotted date string.
    fn validated_date_string(&self) -> RosterResult<String> {
        if self.name.trim().is_empty() {
            return Err(RosterError::IncompleteForm("name"));
        }
        if self.year.trim().is_empty() {
            return Err(RosterError::IncompleteForm("year"));
        }
        if self.month.trim().is_empty() {
            return Err(RosterError::IncompleteForm("month"));
        }
        if self.day.trim().is_empty() {
            return Err(RosterError::IncompleteForm("day"));
        }
        Ok(format!(
            "{}.{:0>2}.{:0>2}",
            self.year.trim(),
            self.month.trim(),
            self.day.trim()
        ))
    }
}

/// Per-record outcome summary of an import merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Records merged into the roster.
    pub merged: usize,
    /// Records discarded because their id already exists.
    pub duplicate: usize,
    /// Records skipped because their date failed to parse.
    pub skipped: usize,
}

/// Ordered-list mutation engine over an injected slot store.
///
/// `today` is injected at load time so every derived-field computation in
/// a session observes the same calendar day (and tests a fixed one).
pub struct RosterService<R: SlotRepository> {
    repo: R,
    today: NaiveDate,
    people: Vec<Person>,
}

impl<R: SlotRepository> RosterService<R> {
    /// Loads the roster from the slot store, falling back to the bundled
    /// seed dataset when no usable list is stored.
    pub fn load(repo: R, today: NaiveDate) -> RosterResult<Self> {
        Self::load_with_seed(repo, today, &bundled_seed())
    }

    /// Loads with an explicit seed dataset.
    ///
    /// A stored list is taken as the authoritative order; only its derived
    /// fields are recomputed. A missing or undecodable slot falls back to
    /// the seed, sorted by days ascending.
    pub fn load_with_seed(repo: R, today: NaiveDate, seed: &[SeedRecord]) -> RosterResult<Self> {
        let mut service = Self {
            repo,
            today,
            people: Vec::new(),
        };

        match service.repo.read_slot(SLOT_BIRTHDAY_LIST)? {
            Some(stored) => match serde_json::from_str::<Vec<Person>>(&stored) {
                Ok(mut people) => {
                    for person in &mut people {
                        person.refresh(today);
                    }
                    info!(
                        "event=roster_load module=service status=ok source=store count={}",
                        people.len()
                    );
                    service.people = people;
                }
                Err(err) => {
                    warn!(
                        "event=roster_load module=service status=error source=store error_code=decode_failed error={err}"
                    );
                    service.people = materialize_seed(seed, today);
                }
            },
            None => {
                service.people = materialize_seed(seed, today);
                info!(
                    "event=roster_load module=service status=ok source=seed count={}",
                    service.people.len()
                );
            }
        }

        Ok(service)
    }

    /// Returns the authoritative ordered roster.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Returns the calendar day this session evaluates against.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Adds a new entry from form input and returns its assigned id.
    ///
    /// The roster is re-sorted by `days_until_birthday` ascending.
    pub fn add(&mut self, form: &PersonForm) -> RosterResult<PersonId> {
        let raw_date = form.validated_date_string()?;
        let birth_date = parse_birth_date(&raw_date)?;
        let id = self.next_id();

        let mut person = Person::new(id, form.name.trim(), birth_date, form.tags.clone());
        person.refresh(self.today);

        let mut next = self.people.clone();
        next.push(person);
        sort_by_days(&mut next);
        self.commit(next)?;
        info!("event=roster_add module=service status=ok id={id}");
        Ok(id)
    }

    /// Replaces an existing entry's fields and recomputes its derived
    /// cache, then re-sorts by `days_until_birthday` ascending.
    ///
    /// The pinned flag survives the edit.
    pub fn edit(&mut self, id: PersonId, form: &PersonForm) -> RosterResult<()> {
        let raw_date = form.validated_date_string()?;
        let birth_date = parse_birth_date(&raw_date)?;
        let index = self.index_of(id).ok_or(RosterError::NotFound(id))?;

        let mut next = self.people.clone();
        let person = &mut next[index];
        person.name = form.name.trim().to_string();
        person.birth_date = birth_date;
        person.tags = form.tags.clone();
        person.refresh(self.today);

        sort_by_days(&mut next);
        self.commit(next)?;
        info!("event=roster_edit module=service status=ok id={id}");
        Ok(())
    }

    /// Removes one entry. The self entry is protected; an unknown id is a
    /// no-op (matching the original behavior).
    pub fn delete(&mut self, id: PersonId) -> RosterResult<()> {
        if let Some(person) = self.people.iter().find(|person| person.id == id) {
            if person.is_self() {
                return Err(RosterError::ProtectedEntity(id));
            }
        }

        let mut next = self.people.clone();
        next.retain(|person| person.id != id);
        self.commit(next)?;
        info!("event=roster_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Removes a selection of entries, all or nothing.
    ///
    /// When any target carries the self tag the whole request is rejected
    /// and nothing is deleted.
    pub fn bulk_delete(&mut self, ids: &[PersonId]) -> RosterResult<()> {
        if let Some(protected) = self
            .people
            .iter()
            .find(|person| ids.contains(&person.id) && person.is_self())
        {
            return Err(RosterError::ProtectedEntity(protected.id));
        }

        let mut next = self.people.clone();
        next.retain(|person| !ids.contains(&person.id));
        self.commit(next)?;
        info!(
            "event=roster_bulk_delete module=service status=ok count={}",
            ids.len()
        );
        Ok(())
    }

    /// Pins an entry and reinserts it at the top of the pinned block.
    ///
    /// A self-tagged entry always lands at index 0; any other entry lands
    /// directly below a pinned self entry when one exists, else at 0.
    pub fn pin_to_top(&mut self, id: PersonId) -> RosterResult<()> {
        let Some(index) = self.index_of(id) else {
            return Ok(());
        };

        let mut next = self.people.clone();
        let mut person = next.remove(index);
        person.is_pinned = true;

        let insert_at = if person.is_self() {
            0
        } else {
            next.iter()
                .take_while(|other| other.is_pinned && other.is_self())
                .count()
        };
        next.insert(insert_at, person);
        self.commit(next)
    }

    /// Clears the pinned flag in place; the position is unchanged.
    pub fn unpin(&mut self, id: PersonId) -> RosterResult<()> {
        let Some(index) = self.index_of(id) else {
            return Ok(());
        };

        let mut next = self.people.clone();
        next[index].is_pinned = false;
        self.commit(next)
    }

    /// Swaps the entry with its predecessor.
    ///
    /// Pinned and self entries form a floor an ordinary entry cannot cross
    /// upward; a blocked move is a no-op.
    pub fn move_up(&mut self, id: PersonId) -> RosterResult<()> {
        let Some(index) = self.index_of(id) else {
            return Ok(());
        };
        if index == 0 {
            return Ok(());
        }
        let above = &self.people[index - 1];
        if above.is_pinned || above.is_self() {
            return Ok(());
        }

        let mut next = self.people.clone();
        next.swap(index - 1, index);
        self.commit(next)
    }

    /// Swaps the entry with its successor.
    ///
    /// Blocked (no-op) when the successor is the self entry, or when this
    /// entry is pinned and would descend below the pinned block.
    pub fn move_down(&mut self, id: PersonId) -> RosterResult<()> {
        let Some(index) = self.index_of(id) else {
            return Ok(());
        };
        if index + 1 >= self.people.len() {
            return Ok(());
        }
        let below = &self.people[index + 1];
        if below.is_self() {
            return Ok(());
        }
        if self.people[index].is_pinned && !below.is_pinned {
            return Ok(());
        }

        let mut next = self.people.clone();
        next.swap(index, index + 1);
        self.commit(next)
    }

    /// Merges an import payload into the roster.
    ///
    /// The whole payload is rejected when it fails shape validation.
    /// Records with unparseable dates are skipped individually; records
    /// whose id already exists are discarded rather than overwriting. The
    /// merged roster is re-sorted by `days_until_birthday` ascending.
    pub fn import(&mut self, payload: &str) -> RosterResult<ImportOutcome> {
        let records: Vec<SeedRecord> = serde_json::from_str(payload)
            .map_err(|err| RosterError::MalformedImport(err.to_string()))?;

        let mut next = self.people.clone();
        let mut known: HashSet<PersonId> = next.iter().map(|person| person.id).collect();
        let mut outcome = ImportOutcome::default();

        for record in &records {
            if known.contains(&record.id) {
                outcome.duplicate += 1;
                continue;
            }
            match person_from_record(record, self.today) {
                Ok(person) => {
                    known.insert(person.id);
                    next.push(person);
                    outcome.merged += 1;
                }
                Err(err) => {
                    warn!(
                        "event=import_skip module=service status=error id={} error={err}",
                        record.id
                    );
                    outcome.skipped += 1;
                }
            }
        }

        sort_by_days(&mut next);
        self.commit(next)?;
        info!(
            "event=roster_import module=service status=ok merged={} duplicate={} skipped={}",
            outcome.merged, outcome.duplicate, outcome.skipped
        );
        Ok(outcome)
    }

    /// Serializes the full roster verbatim, derived fields and flags
    /// included, as pretty-printed JSON.
    pub fn export(&self) -> RosterResult<String> {
        serde_json::to_string_pretty(&self.people).map_err(RosterError::Encode)
    }

    /// Returns whether the roster already contains the protected self
    /// entry.
    pub fn is_onboarded(&self) -> bool {
        self.people.iter().any(Person::is_self)
    }

    /// Creates the pinned self entry from onboarding input and rebuilds
    /// the roster around it: self first, then pinned entries, then
    /// everyone else by `days_until_birthday` ascending.
    ///
    /// Persists the list plus the onboarding flag and self-profile slots.
    pub fn complete_onboarding(&mut self, form: &PersonForm) -> RosterResult<PersonId> {
        let raw_date = form.validated_date_string()?;
        let birth_date = parse_birth_date(&raw_date)?;

        let mut owner = Person::new(
            SELF_PERSON_ID,
            form.name.trim(),
            birth_date,
            vec![SELF_TAG.to_string()],
        );
        owner.is_pinned = true;
        owner.refresh(self.today);
        let owner_json = serde_json::to_string(&owner).map_err(RosterError::Encode)?;

        let mut next: Vec<Person> = self
            .people
            .iter()
            .filter(|person| !person.is_self())
            .cloned()
            .collect();
        next.push(owner);
        next.sort_by_key(|person| (!person.is_pinned, !person.is_self(), person.days_until_birthday));

        self.commit(next)?;
        self.repo.write_slot(SLOT_ONBOARDING_DONE, "true")?;
        self.repo.write_slot(SLOT_SELF_PROFILE, &owner_json)?;
        info!("event=onboarding_complete module=service status=ok");
        Ok(SELF_PERSON_ID)
    }

    fn index_of(&self, id: PersonId) -> Option<usize> {
        self.people.iter().position(|person| person.id == id)
    }

    fn next_id(&self) -> PersonId {
        self.people
            .iter()
            .map(|person| person.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Persists `people` to the list slot, then swaps it in. Nothing
    /// changes when encoding or the slot write fails.
    fn commit(&mut self, people: Vec<Person>) -> RosterResult<()> {
        let encoded = serde_json::to_string(&people).map_err(RosterError::Encode)?;
        self.repo.write_slot(SLOT_BIRTHDAY_LIST, &encoded)?;
        self.people = people;
        Ok(())
    }
}

fn person_from_record(record: &SeedRecord, today: NaiveDate) -> Result<Person, InvalidDateError> {
    let birth_date = parse_birth_date(&record.birth_date)?;
    let mut person = Person::new(record.id, record.name.clone(), birth_date, record.tags.clone());
    person.refresh(today);
    Ok(person)
}

fn materialize_seed(seed: &[SeedRecord], today: NaiveDate) -> Vec<Person> {
    let mut people: Vec<Person> = seed
        .iter()
        .filter_map(|record| match person_from_record(record, today) {
            Ok(person) => Some(person),
            Err(err) => {
                warn!(
                    "event=seed_skip module=service status=error id={} error={err}",
                    record.id
                );
                None
            }
        })
        .collect();
    sort_by_days(&mut people);
    people
}

/// Stable days-ascending sort: ties keep their current relative order.
fn sort_by_days(people: &mut [Person]) {
    people.sort_by_key(|person| person.days_until_birthday);
}
