//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `birthday_core` linkage.
//! - Print the seeded roster and active reminders without any UI runtime.

use birthday_core::db::open_db_in_memory;
use birthday_core::{reminder_set, RosterService, SqliteSlotRepository};
use chrono::Local;

fn main() {
    if let Err(err) = run() {
        eprintln!("birthday_core error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let repo = SqliteSlotRepository::new(&conn);
    let service = RosterService::load(repo, Local::now().date_naive())?;

    println!("birthday_core version={}", birthday_core::core_version());
    for person in service.people() {
        println!(
            "{:>3}d  {}  ({})",
            person.days_until_birthday, person.name, person.formatted_date
        );
    }
    for person in reminder_set(service.people()) {
        println!(
            "reminder: {} in {} day(s)",
            person.name, person.days_until_birthday
        );
    }
    Ok(())
}
