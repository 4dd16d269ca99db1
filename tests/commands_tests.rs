// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use drivenote::cli;
use drivenote::commands::{doctor, expenses, hours, mileage, reports, sync};
use drivenote::db;
use drivenote::models::{Expense, ExpenseCategory, Income, IncomeSource, Mileage, WorkHours};
use drivenote::store::SqliteStore;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    for d in 1..=3 {
        store
            .save_expense(&Expense::new(at(2025, 1, d, 8), dec("10"), ExpenseCategory::Fuel))
            .unwrap();
    }
    store
        .save_expense(&Expense::new(at(2025, 1, 4, 8), dec("4"), ExpenseCategory::Parking))
        .unwrap();
    conn
}

#[test]
fn expense_list_limit_respected() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from(["drivenote", "expense", "list", "--limit", "2"]);
    if let Some(("expense", exp_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = exp_m.subcommand() {
            let rows = expenses::query_expenses(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, at(2025, 1, 4, 8));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no expense subcommand");
    }
}

#[test]
fn expense_list_filters_by_category_and_dates() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "drivenote",
        "expense",
        "list",
        "--from",
        "2025-01-02",
        "--to",
        "2025-01-04",
        "--category",
        "FUEL",
    ]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("no expense subcommand");
    };
    let Some(("list", list_m)) = exp_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = expenses::query_expenses(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|e| e.category == ExpenseCategory::Fuel));
}

#[test]
fn expense_list_rejects_backwards_range() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "drivenote", "expense", "list", "--from", "2025-02-01", "--to", "2025-01-01",
    ]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("no expense subcommand");
    };
    let Some(("list", list_m)) = exp_m.subcommand() else {
        panic!("no list subcommand");
    };
    assert!(expenses::query_expenses(&conn, list_m).is_err());
}

#[test]
fn expense_add_applies_overrides() {
    let conn = db::open_in_memory().unwrap();
    let matches = cli::build_cli().get_matches_from([
        "drivenote",
        "expense",
        "add",
        "--date",
        "2025-03-10 14:30",
        "--amount",
        "19.99",
        "--category",
        "cleaning",
        "--deductible",
        "true",
        "--pct",
        "50",
        "--method",
        "ocr",
    ]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("no expense subcommand");
    };
    expenses::handle(&conn, exp_m).unwrap();

    let all = SqliteStore::new(&conn).list::<Expense>().unwrap();
    assert_eq!(all.len(), 1);
    let e = &all[0];
    assert_eq!(e.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(14, 30, 0).unwrap());
    assert!(e.is_tax_deductible);
    assert_eq!(e.tax_deductible_amount(), dec("9.995"));
    assert_eq!(e.creation_method.as_str(), "ocr");
}

#[test]
fn expense_add_rejects_unknown_category() {
    let conn = db::open_in_memory().unwrap();
    let matches = cli::build_cli().get_matches_from([
        "drivenote", "expense", "add", "--date", "2025-03-10", "--amount", "5", "--category",
        "snacks",
    ]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("no expense subcommand");
    };
    assert!(expenses::handle(&conn, exp_m).is_err());
    assert!(SqliteStore::new(&conn).list::<Expense>().unwrap().is_empty());
}

#[test]
fn hours_from_shift_default_to_start_date() {
    let matches = cli::build_cli().get_matches_from([
        "drivenote",
        "hours",
        "add",
        "--start",
        "2025-03-10 22:00",
        "--end",
        "2025-03-11 02:30",
    ]);
    let Some(("hours", h_m)) = matches.subcommand() else {
        panic!("no hours subcommand");
    };
    let Some(("add", add_m)) = h_m.subcommand() else {
        panic!("no add subcommand");
    };
    let shift = hours::work_hours_from_args(add_m).unwrap();
    assert_eq!(shift.date, at(2025, 3, 10, 22));
    assert_eq!(shift.total_hours, 4.5);
}

#[test]
fn hours_need_a_duration() {
    let matches =
        cli::build_cli().get_matches_from(["drivenote", "hours", "add", "--date", "2025-03-10"]);
    let Some(("hours", h_m)) = matches.subcommand() else {
        panic!("no hours subcommand");
    };
    let Some(("add", add_m)) = h_m.subcommand() else {
        panic!("no add subcommand");
    };
    assert!(hours::work_hours_from_args(add_m).is_err());
}

#[test]
fn mileage_from_odometer_args() {
    let matches = cli::build_cli().get_matches_from([
        "drivenote", "mileage", "add", "--date", "2025-03-10", "--start", "1200", "--end", "1275.5",
    ]);
    let Some(("mileage", m_m)) = matches.subcommand() else {
        panic!("no mileage subcommand");
    };
    let Some(("add", add_m)) = m_m.subcommand() else {
        panic!("no add subcommand");
    };
    let trip = mileage::mileage_from_args(add_m).unwrap();
    assert_eq!(trip.distance, 75.5);
    assert_eq!(trip.odometer_distance(), Some(75.5));
}

#[test]
fn mileage_link_must_be_fuel() {
    let conn = setup();
    let parking = SqliteStore::new(&conn)
        .expenses_by_category(ExpenseCategory::Parking)
        .unwrap()
        .remove(0);
    let id = parking.id.to_string();
    let matches = cli::build_cli().get_matches_from([
        "drivenote",
        "mileage",
        "add",
        "--date",
        "2025-01-04",
        "--distance",
        "12",
        "--fuel-expense",
        &id,
    ]);
    let Some(("mileage", m_m)) = matches.subcommand() else {
        panic!("no mileage subcommand");
    };
    assert!(mileage::handle(&conn, m_m).is_err());
    assert!(SqliteStore::new(&conn).list::<Mileage>().unwrap().is_empty());
}

#[test]
fn reports_use_requested_range() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    store.save_mileage(&Mileage::new(at(2025, 1, 2, 9), 120.0)).unwrap();
    store
        .save_income(&Income::new(at(2025, 1, 2, 20), dec("60"), dec("6"), IncomeSource::Uber))
        .unwrap();
    store.save_work_hours(&WorkHours::new(at(2025, 1, 2, 12), 3.0)).unwrap();

    let matches = cli::build_cli().get_matches_from([
        "drivenote", "report", "mileage", "--period", "month", "--at", "2025-01-15",
    ]);
    let Some(("report", r_m)) = matches.subcommand() else {
        panic!("no report subcommand");
    };
    let Some(("mileage", sub)) = r_m.subcommand() else {
        panic!("no mileage report");
    };
    let range = reports::report_range(sub).unwrap();
    let cost = reports::mileage_report(&conn, &range).unwrap();
    assert_eq!(cost.total_fuel_cost, dec("30"));
    assert_eq!(cost.cost_per_mile, dec("0.25"));

    let hourly = reports::hourly_report(&conn, &range).unwrap();
    assert_eq!(hourly.hourly_rate, dec("22"));

    let spend = reports::expense_report(&conn, &range).unwrap();
    assert_eq!(spend.total_expense, dec("34"));
}

#[test]
fn sync_counts_and_marks() {
    let conn = setup();
    let counts = sync::pending_counts(&conn).unwrap();
    assert_eq!(counts[0].kind, "Expense");
    assert_eq!(counts[0].pending, 4);
    assert!(counts[1..].iter().all(|c| c.pending == 0));

    let first = SqliteStore::new(&conn).list::<Expense>().unwrap().remove(0);
    sync::mark(&conn, "expense", first.id).unwrap();
    assert_eq!(sync::pending_counts(&conn).unwrap()[0].pending, 3);
    assert!(sync::mark(&conn, "income", first.id).is_err());
}

#[test]
fn doctor_flags_inconsistent_records() {
    let conn = db::open_in_memory().unwrap();
    assert!(doctor::find_issues(&conn).unwrap().is_empty());

    let store = SqliteStore::new(&conn);
    let mut e = Expense::new(at(2025, 1, 1, 8), dec("10"), ExpenseCategory::Fuel);
    e.tax_deductible_percentage = 150;
    store.save_expense(&e).unwrap();
    store.save_mileage(&Mileage::new(at(2025, 1, 1, 9), -5.0)).unwrap();
    // Written behind the store's back, so the odometer disagrees
    conn.execute(
        "INSERT INTO mileage(id, date, start_mileage, end_mileage, distance, is_uploaded, last_modified)
         VALUES ('00000000-0000-4000-8000-000000000001', '2025-01-02 09:00:00', 100.0, 150.0, 20.0, 0,
                 '2025-01-02 09:00:00+00:00')",
        [],
    )
    .unwrap();

    let issues: Vec<String> = doctor::find_issues(&conn)
        .unwrap()
        .into_iter()
        .map(|(kind, _)| kind)
        .collect();
    assert!(issues.contains(&"pct_out_of_range".to_string()));
    assert!(issues.contains(&"negative_distance".to_string()));
    assert!(issues.contains(&"odometer_mismatch".to_string()));
}

#[test]
fn expense_list_category_applies_before_limit() {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    store
        .save_expense(&Expense::new(at(2025, 3, 1, 8), dec("45"), ExpenseCategory::Fuel))
        .unwrap();
    store
        .save_expense(&Expense::new(at(2025, 3, 5, 8), dec("6"), ExpenseCategory::Parking))
        .unwrap();

    let matches = cli::build_cli().get_matches_from([
        "drivenote", "expense", "list", "--category", "fuel", "--limit", "1",
    ]);
    let Some(("expense", exp_m)) = matches.subcommand() else {
        panic!("no expense subcommand");
    };
    let Some(("list", list_m)) = exp_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = expenses::query_expenses(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, ExpenseCategory::Fuel);
    assert_eq!(rows[0].amount, dec("45"));
}
