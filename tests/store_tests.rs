// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use drivenote::db;
use drivenote::error::StorageError;
use drivenote::models::{
    CreationMethod, Expense, ExpenseCategory, Income, IncomeSource, Mileage, WorkHours,
};
use drivenote::period::{DateRange, Period};
use drivenote::store::SqliteStore;
use rusqlite::Connection;
use rust_decimal::Decimal;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

#[test]
fn expense_round_trips_all_fields() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let mut e = Expense::new(at(2025, 3, 10, 14, 5), dec("42.17"), ExpenseCategory::Maintenance);
    e.description = Some("Brake pads".into());
    e.tax_deductible_percentage = 80;
    e.creation_method = CreationMethod::Ocr;
    e.receipt_ids = Some(vec![Uuid::new_v4(), Uuid::new_v4()]);
    let saved = store.save_expense(&e).unwrap();

    let loaded = store.get::<Expense>(e.id).unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.amount, dec("42.17"));
    assert_eq!(loaded.receipt_ids.as_ref().map(Vec::len), Some(2));
    assert_eq!(loaded.tax_deductible_amount(), dec("33.736"));
}

#[test]
fn saving_again_updates_in_place() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let mut i = Income::new(at(2025, 3, 10, 20, 0), dec("30"), dec("2.5"), IncomeSource::FreeNow);
    store.save_income(&i).unwrap();
    i.tip_amount = dec("5");
    i.notes = Some("airport run".into());
    store.save_income(&i).unwrap();

    let all = store.list::<Income>().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].total_amount(), dec("35"));
    assert_eq!(all[0].source, IncomeSource::FreeNow);
    assert_eq!(all[0].notes.as_deref(), Some("airport run"));
}

#[test]
fn range_query_is_half_open() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    for (d, amt) in [(1, "1"), (15, "2"), (31, "3")] {
        store
            .save_expense(&Expense::new(at(2025, 3, d, 23, 59), dec(amt), ExpenseCategory::Toll))
            .unwrap();
    }
    store
        .save_expense(&Expense::new(at(2025, 4, 1, 0, 0), dec("100"), ExpenseCategory::Toll))
        .unwrap();
    store
        .save_expense(&Expense::new(at(2025, 2, 28, 23, 59), dec("100"), ExpenseCategory::Toll))
        .unwrap();

    let march = Period::Month.resolve(at(2025, 3, 20, 0, 0));
    let rows = store.list_in_range::<Expense>(&march).unwrap();
    let total: Decimal = rows.iter().map(|e| e.amount).sum();
    assert_eq!(rows.len(), 3);
    assert_eq!(total, dec("6"));
    // oldest first
    assert_eq!(rows[0].date, at(2025, 3, 1, 23, 59));

    let newest = store.list::<Expense>().unwrap();
    assert_eq!(newest[0].date, at(2025, 4, 1, 0, 0));
}

#[test]
fn odometer_readings_win_on_save() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let mut trip = Mileage::new(at(2025, 3, 10, 9, 0), 999.0);
    trip.start_mileage = Some(10_000.0);
    trip.end_mileage = Some(10_042.5);
    let saved = store.save_mileage(&trip).unwrap();
    assert_eq!(saved.distance, 42.5);

    let loaded = store.get::<Mileage>(trip.id).unwrap().unwrap();
    assert_eq!(loaded.distance, 42.5);

    // A single reading leaves the entered distance alone
    let mut partial = Mileage::new(at(2025, 3, 11, 9, 0), 12.0);
    partial.start_mileage = Some(10_050.0);
    assert_eq!(store.save_mileage(&partial).unwrap().distance, 12.0);
}

#[test]
fn shift_times_win_on_save() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let mut shift = WorkHours::new(at(2025, 3, 10, 0, 0), 1.0);
    shift.start_time = Some(at(2025, 3, 10, 7, 0));
    shift.end_time = Some(at(2025, 3, 10, 15, 45));
    let saved = store.save_work_hours(&shift).unwrap();
    assert_eq!(saved.total_hours, 8.75);
    assert_eq!(saved.formatted_total_hours(), "8h 45m");

    let loaded = store.get::<WorkHours>(shift.id).unwrap().unwrap();
    assert_eq!(loaded.start_time, Some(at(2025, 3, 10, 7, 0)));
    assert_eq!(loaded.total_hours, 8.75);
}

#[test]
fn delete_missing_record_is_not_found() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let id = Uuid::new_v4();
    let err = store.delete::<Income>(id).unwrap_err();
    assert!(matches!(err, StorageError::NotFound { id: missing, .. } if missing == id));

    let e = store
        .save_expense(&Expense::new(at(2025, 3, 1, 0, 0), dec("5"), ExpenseCategory::Parking))
        .unwrap();
    store.delete::<Expense>(e.id).unwrap();
    assert!(store.get::<Expense>(e.id).unwrap().is_none());
}

#[test]
fn unsynced_until_marked() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let a = store
        .save_expense(&Expense::new(at(2025, 3, 1, 0, 0), dec("5"), ExpenseCategory::Parking))
        .unwrap();
    let b = store
        .save_expense(&Expense::new(at(2025, 3, 2, 0, 0), dec("6"), ExpenseCategory::Parking))
        .unwrap();
    assert_eq!(store.unsynced::<Expense>().unwrap().len(), 2);

    store.mark_synced::<Expense>(a.id).unwrap();
    let pending = store.unsynced::<Expense>().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, b.id);
    assert!(store.get::<Expense>(a.id).unwrap().unwrap().is_uploaded);

    assert!(store.mark_synced::<Mileage>(Uuid::new_v4()).is_err());
}

#[test]
fn category_and_fuel_link_lookups() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let fuel = store
        .save_expense(&Expense::new(at(2025, 3, 1, 8, 0), dec("60"), ExpenseCategory::Fuel))
        .unwrap();
    store
        .save_expense(&Expense::new(at(2025, 3, 2, 8, 0), dec("9"), ExpenseCategory::Cleaning))
        .unwrap();
    let mut trip = Mileage::new(at(2025, 3, 1, 9, 0), 150.0);
    trip.related_fuel_expense_id = Some(fuel.id);
    store.save_mileage(&trip).unwrap();
    store.save_mileage(&Mileage::new(at(2025, 3, 3, 9, 0), 20.0)).unwrap();

    let fuels = store.expenses_by_category(ExpenseCategory::Fuel).unwrap();
    assert_eq!(fuels.len(), 1);
    assert_eq!(fuels[0].id, fuel.id);

    let linked = store.mileage_for_fuel_expense(fuel.id).unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, trip.id);
}

#[test]
fn whole_day_filter_includes_last_day() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    store.save_work_hours(&WorkHours::new(at(2025, 3, 31, 22, 0), 2.0)).unwrap();
    let range = DateRange::from_dates(
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
    );
    assert_eq!(store.list_in_range::<WorkHours>(&range).unwrap().len(), 1);
}
