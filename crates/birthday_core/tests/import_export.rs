use birthday_core::db::open_db_in_memory;
use birthday_core::{
    PersonForm, RosterError, RosterService, SeedRecord, SlotRepository, SqliteSlotRepository,
    EXPORT_FILE_NAME, SLOT_BIRTHDAY_LIST,
};
use chrono::NaiveDate;
use rusqlite::Connection;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 18).unwrap()
}

fn record(id: i64, name: &str, birth: &str, tags: &[&str]) -> SeedRecord {
    SeedRecord {
        id,
        name: name.to_string(),
        birth_date: birth.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

fn service_from<'conn>(
    conn: &'conn Connection,
    seed: &[SeedRecord],
) -> RosterService<SqliteSlotRepository<'conn>> {
    RosterService::load_with_seed(SqliteSlotRepository::new(conn), today(), seed).unwrap()
}

#[test]
fn export_then_import_reproduces_the_same_set() {
    let source_conn = open_db_in_memory().unwrap();
    let seed = vec![
        record(1, "甲", "1990.05.20", &["朋友"]),
        record(2, "乙", "2000.01.01", &[]),
    ];
    let mut source = service_from(&source_conn, &seed);
    source
        .add(&PersonForm {
            name: "丙".to_string(),
            year: "1996".to_string(),
            month: "2".to_string(),
            day: "29".to_string(),
            tags: vec!["同事".to_string()],
        })
        .unwrap();
    let exported = source.export().unwrap();
    assert_eq!(EXPORT_FILE_NAME, "birthday-data.json");

    let target_conn = open_db_in_memory().unwrap();
    let mut target = service_from(&target_conn, &[]);
    let outcome = target.import(&exported).unwrap();
    assert_eq!(outcome.merged, 3);
    assert_eq!(outcome.duplicate, 0);
    assert_eq!(outcome.skipped, 0);

    let mut source_people: Vec<_> = source
        .people()
        .iter()
        .map(|p| (p.id, p.name.clone(), p.birth_date, p.tags.clone()))
        .collect();
    let mut target_people: Vec<_> = target
        .people()
        .iter()
        .map(|p| (p.id, p.name.clone(), p.birth_date, p.tags.clone()))
        .collect();
    source_people.sort();
    target_people.sort();
    assert_eq!(source_people, target_people);

    // Derived fields are recomputed on the same "today", so they agree too.
    for person in target.people() {
        let original = source
            .people()
            .iter()
            .find(|p| p.id == person.id)
            .unwrap();
        assert_eq!(person.days_until_birthday, original.days_until_birthday);
    }
}

#[test]
fn malformed_import_is_rejected_whole() {
    let conn = open_db_in_memory().unwrap();
    let seed = vec![record(1, "甲", "1990.05.20", &[])];
    let mut service = service_from(&conn, &seed);

    let err = service.import(r#"{"not": "an array"}"#).unwrap_err();
    assert!(matches!(err, RosterError::MalformedImport(_)));

    // One well-formed record does not save a payload with a broken one.
    let err = service
        .import(r#"[{"id": 7, "name": "乙", "birthDate": "1992.03.04"}, {"id": 8}]"#)
        .unwrap_err();
    assert!(matches!(err, RosterError::MalformedImport(_)));

    assert_eq!(service.people().len(), 1);
}

#[test]
fn import_discards_records_with_existing_ids() {
    let conn = open_db_in_memory().unwrap();
    let seed = vec![record(1, "甲", "1990.05.20", &[])];
    let mut service = service_from(&conn, &seed);

    let outcome = service
        .import(
            r#"[
                {"id": 1, "name": "冒名", "birthDate": "1980.01.01"},
                {"id": 2, "name": "乙", "birthDate": "1992.03.04"}
            ]"#,
        )
        .unwrap();
    assert_eq!(outcome.merged, 1);
    assert_eq!(outcome.duplicate, 1);

    let kept = service.people().iter().find(|p| p.id == 1).unwrap();
    assert_eq!(kept.name, "甲");
}

#[test]
fn import_skips_records_with_unparseable_dates() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service_from(&conn, &[]);

    let outcome = service
        .import(
            r#"[
                {"id": 1, "name": "甲", "birthDate": "1990.13.40"},
                {"id": 2, "name": "乙", "birthDate": "1992.03.04"}
            ]"#,
        )
        .unwrap();
    assert_eq!(outcome.merged, 1);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(service.people().len(), 1);
    assert_eq!(service.people()[0].id, 2);
}

#[test]
fn import_accepts_both_date_shapes_and_resorts() {
    let conn = open_db_in_memory().unwrap();
    let seed = vec![record(1, "甲", "1992.06.17", &[])];
    let mut service = service_from(&conn, &seed);

    let outcome = service
        .import(
            r#"[
                {"id": 2, "name": "乙", "birthDate": "2025-05-19T16:00:00.000Z"},
                {"id": 3, "name": "丙", "birthDate": "1990.00.28"}
            ]"#,
        )
        .unwrap();
    assert_eq!(outcome.merged, 2);

    // 乙: May 19 -> 1 day; 丙: coerced to Jan 28 -> far out; 甲: 30 days.
    let ids: Vec<i64> = service.people().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1, 3]);
    assert_eq!(
        service.people()[0].birth_date,
        NaiveDate::from_ymd_opt(2025, 5, 19).unwrap()
    );
    assert_eq!(
        service.people()[2].birth_date,
        NaiveDate::from_ymd_opt(1990, 1, 28).unwrap()
    );
}

#[test]
fn persisted_roster_reloads_with_order_pins_and_fresh_derivations() {
    let conn = open_db_in_memory().unwrap();
    let seed = vec![
        record(1, "甲", "1990.05.20", &[]),
        record(2, "乙", "1985.05.28", &[]),
        record(3, "丙", "1992.06.17", &[]),
    ];
    {
        let mut service = service_from(&conn, &seed);
        service.pin_to_top(3).unwrap();
    }

    // A fresh session sees the persisted order, not a re-derived one.
    let service = service_from(&conn, &[]);
    let ids: Vec<i64> = service.people().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert!(service.people()[0].is_pinned);
    assert_eq!(service.people()[0].days_until_birthday, 30);
}

#[test]
fn malformed_stored_slot_falls_back_to_seed() {
    let conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteSlotRepository::new(&conn);
        repo.write_slot(SLOT_BIRTHDAY_LIST, "{definitely not json]").unwrap();
    }

    let seed = vec![record(1, "甲", "1990.05.20", &[])];
    let service = service_from(&conn, &seed);
    assert_eq!(service.people().len(), 1);
    assert_eq!(service.people()[0].id, 1);
}
