//! Key-value slot repository standing in for browser local storage.
//!
//! # Responsibility
//! - Provide string-valued read/write access to named persistence slots.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A slot write replaces the previous value wholesale.
//! - Slot values are opaque strings here; (de)serialization belongs to the
//!   service layer.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key for the serialized roster list.
pub const SLOT_BIRTHDAY_LIST: &str = "birthdayList";
/// Slot key for the onboarding-completed flag (`"true"` when set).
pub const SLOT_ONBOARDING_DONE: &str = "hasCompletedFirstVisit";
/// Slot key for the onboarding-created self profile.
pub const SLOT_SELF_PROFILE: &str = "userBirthday";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the persistence slots.
///
/// The engine only ever needs read-at-init and write-after-mutate; keeping
/// the port this narrow makes it trivially replaceable in tests.
pub trait SlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed slot repository.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}
