use birthday_core::db::migrations::{apply_migrations, latest_version};
use birthday_core::db::{open_db, open_db_in_memory};
use birthday_core::{SlotRepository, SqliteSlotRepository};

#[test]
fn open_applies_migrations_and_sets_user_version() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn reapplying_migrations_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();
}

#[test]
fn file_backed_slots_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slots.db");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        repo.write_slot("birthdayList", "[]").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    assert_eq!(repo.read_slot("birthdayList").unwrap().as_deref(), Some("[]"));
}
