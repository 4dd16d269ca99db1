// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use drivenote::chart::{bucket_count, bucket_index, bucketize};
use drivenote::models::{Expense, ExpenseCategory, Income, IncomeSource};
use drivenote::period::Period;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 30, 0)
        .unwrap()
}

#[test]
fn series_lengths_match_period() {
    let reference = at(2025, 3, 12, 10);
    for (p, n) in [
        (Period::Day, 24),
        (Period::Week, 7),
        (Period::Month, 5),
        (Period::Quarter, 3),
        (Period::Year, 12),
    ] {
        let range = p.resolve(reference);
        let chart = bucketize(p, &[], &[], &range);
        assert_eq!(bucket_count(p), n);
        assert_eq!(chart.labels.len(), n, "{}", p);
        assert_eq!(chart.income_data.len(), n, "{}", p);
        assert_eq!(chart.expense_data.len(), n, "{}", p);
        assert!(chart.income_data.iter().all(|v| v.is_zero()));
    }
}

#[test]
fn labels_per_period() {
    let reference = at(2025, 5, 20, 10);
    let day = bucketize(Period::Day, &[], &[], &Period::Day.resolve(reference));
    assert_eq!(day.labels[0], "00");
    assert_eq!(day.labels[23], "23");

    let week = bucketize(Period::Week, &[], &[], &Period::Week.resolve(reference));
    assert_eq!(week.labels, vec!["M", "T", "W", "T", "F", "S", "S"]);

    let month = bucketize(Period::Month, &[], &[], &Period::Month.resolve(reference));
    assert_eq!(month.labels[1], "Week 2");

    let quarter = bucketize(Period::Quarter, &[], &[], &Period::Quarter.resolve(reference));
    assert_eq!(quarter.labels, vec!["APR", "MAY", "JUN"]);

    let year = bucketize(Period::Year, &[], &[], &Period::Year.resolve(reference));
    assert_eq!(year.labels[0], "JAN");
    assert_eq!(year.labels[11], "DEC");
}

#[test]
fn month_buckets_by_days_since_start() {
    let range = Period::Month.resolve(at(2025, 3, 1, 0));
    assert_eq!(bucket_index(Period::Month, &range, at(2025, 3, 10, 8)), 1);
    assert_eq!(bucket_index(Period::Month, &range, at(2025, 3, 1, 8)), 0);
    assert_eq!(bucket_index(Period::Month, &range, at(2025, 3, 29, 8)), 4);
    // Day 31 would be a sixth week; it is folded into the last one
    assert_eq!(bucket_index(Period::Month, &range, at(2025, 3, 31, 8)), 4);
}

#[test]
fn quarter_buckets_relative_to_quarter_start() {
    let range = Period::Quarter.resolve(at(2025, 4, 15, 0));
    assert_eq!(bucket_index(Period::Quarter, &range, at(2025, 6, 2, 9)), 2);
    assert_eq!(bucket_index(Period::Quarter, &range, at(2025, 4, 2, 9)), 0);
    // Outside the quarter still lands in a valid bucket
    assert_eq!(bucket_index(Period::Quarter, &range, at(2025, 9, 2, 9)), 2);
}

#[test]
fn day_and_week_buckets() {
    let day = Period::Day.resolve(at(2025, 3, 12, 0));
    assert_eq!(bucket_index(Period::Day, &day, at(2025, 3, 12, 17)), 17);

    let week = Period::Week.resolve(at(2025, 3, 12, 0));
    // Sunday
    assert_eq!(bucket_index(Period::Week, &week, at(2025, 3, 16, 9)), 6);
}

#[test]
fn buckets_conserve_totals() {
    let reference = at(2025, 3, 12, 10);
    let expenses = vec![
        Expense::new(at(2025, 3, 1, 6), dec("12.50"), ExpenseCategory::Parking),
        Expense::new(at(2025, 3, 10, 7), dec("60"), ExpenseCategory::Fuel),
        Expense::new(at(2025, 3, 31, 22), dec("7.25"), ExpenseCategory::Toll),
    ];
    let income = vec![
        Income::new(at(2025, 3, 3, 9), dec("80"), dec("5"), IncomeSource::Uber),
        Income::new(at(2025, 3, 15, 21), dec("120.40"), dec("0"), IncomeSource::Bolt),
    ];
    for p in Period::ALL {
        let range = p.resolve(reference);
        let chart = bucketize(p, &expenses, &income, &range);
        let inc: Decimal = chart.income_data.iter().sum();
        let exp: Decimal = chart.expense_data.iter().sum();
        assert_eq!(inc, dec("205.40"), "{}", p);
        assert_eq!(exp, dec("79.75"), "{}", p);
    }
}

#[test]
fn income_bucket_includes_tips() {
    let range = Period::Month.resolve(at(2025, 3, 1, 0));
    let income = vec![Income::new(at(2025, 3, 10, 9), dec("40"), dec("4"), IncomeSource::Cash)];
    let chart = bucketize(Period::Month, &[], &income, &range);
    assert_eq!(chart.income_data[1], dec("44"));
}
