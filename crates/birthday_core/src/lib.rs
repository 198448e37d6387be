//! Core domain logic for the birthday roster.
//! This crate is the single source of truth for business invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use calendar::{
    birthday_facts, format_display, next_occurrence, parse_birth_date, BirthdayFacts,
    InvalidDateError,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{Person, PersonId, SELF_TAG};
pub use model::seed::{bundled_seed, SeedRecord};
pub use repo::slot_repo::{
    RepoError, RepoResult, SlotRepository, SqliteSlotRepository, SLOT_BIRTHDAY_LIST,
    SLOT_ONBOARDING_DONE, SLOT_SELF_PROFILE,
};
pub use search::filter::{all_tags, visible_people, FilterQuery};
pub use service::reminder::{reminder_set, ReminderRotation, REMINDER_DAYS};
pub use service::roster_service::{
    ImportOutcome, PersonForm, RosterError, RosterResult, RosterService, EXPORT_FILE_NAME,
    SELF_PERSON_ID,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
