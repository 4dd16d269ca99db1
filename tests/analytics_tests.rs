// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use drivenote::analytics::{
    CurrentRecords, ExpenseAnalytics, HourlyRateAnalytics, MileageCost, PreviousRecords,
    aggregate, percent_change,
};
use drivenote::models::{Expense, ExpenseCategory, Income, IncomeSource, Mileage, WorkHours};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn scenario() -> CurrentRecords {
    CurrentRecords {
        expenses: vec![
            Expense::new(day(2), dec("50"), ExpenseCategory::Fuel),
            Expense::new(day(3), dec("30"), ExpenseCategory::Maintenance),
        ],
        income: vec![Income::new(day(4), dec("100"), dec("10"), IncomeSource::Uber)],
        mileage: vec![Mileage::new(day(2), 120.0), Mileage::new(day(5), 80.0)],
        work_hours: vec![WorkHours::new(day(4), 5.5)],
    }
}

#[test]
fn aggregates_totals_and_metrics() {
    let agg = aggregate(&scenario(), &PreviousRecords::default());

    assert_eq!(agg.summary.total_expense, dec("80"));
    assert_eq!(agg.summary.total_income, dec("110"));
    assert_eq!(agg.summary.net_income, dec("30"));
    assert_eq!(agg.metrics.cost_per_mile, dec("0.25"));
    assert_eq!(agg.metrics.total_mileage, 200.0);
    assert_eq!(agg.metrics.total_work_hours, 5.5);
    assert_eq!(agg.metrics.hourly_rate, dec("20"));
    assert_eq!(agg.metrics.total_tax_deductible, dec("80"));

    // No previous activity at all
    assert_eq!(agg.summary.income_change_percent, None);
    assert_eq!(agg.summary.expense_change_percent, None);
    assert_eq!(agg.summary.net_income_change_percent, None);
}

#[test]
fn partial_deduction_counts_towards_tax_total() {
    let mut current = scenario();
    current.expenses[1].tax_deductible_percentage = 50;
    current.expenses.push({
        let mut e = Expense::new(day(6), dec("12"), ExpenseCategory::Parking);
        e.is_tax_deductible = false;
        e
    });
    let agg = aggregate(&current, &PreviousRecords::default());
    assert_eq!(agg.metrics.total_tax_deductible, dec("65"));
    assert_eq!(agg.summary.total_expense, dec("92"));
}

#[test]
fn change_against_previous_period() {
    let previous = PreviousRecords {
        expenses: vec![Expense::new(day(1), dec("40"), ExpenseCategory::Fuel)],
        income: vec![Income::new(day(1), dec("100"), dec("0"), IncomeSource::Bolt)],
    };
    let agg = aggregate(&scenario(), &previous);
    assert_eq!(agg.summary.income_change_percent, Some(dec("10")));
    assert_eq!(agg.summary.expense_change_percent, Some(dec("100")));
    // net 60 -> 30
    assert_eq!(agg.summary.net_income_change_percent, Some(dec("-50")));
}

#[test]
fn zero_quantities_give_zero_rates() {
    let current = CurrentRecords {
        expenses: vec![Expense::new(day(2), dec("50"), ExpenseCategory::Fuel)],
        income: vec![Income::new(day(2), dec("90"), dec("0"), IncomeSource::Cash)],
        mileage: vec![],
        work_hours: vec![],
    };
    let agg = aggregate(&current, &PreviousRecords::default());
    assert_eq!(agg.metrics.hourly_rate, Decimal::ZERO);
    assert_eq!(agg.metrics.cost_per_mile, Decimal::ZERO);
}

#[test]
fn empty_everything_is_all_zero() {
    let agg = aggregate(&CurrentRecords::default(), &PreviousRecords::default());
    assert_eq!(agg.summary.total_income, Decimal::ZERO);
    assert_eq!(agg.summary.net_income, Decimal::ZERO);
    assert_eq!(agg.metrics.total_mileage, 0.0);
}

#[test]
fn percent_change_needs_a_baseline() {
    assert_eq!(percent_change(dec("50"), Decimal::ZERO), None);
    assert_eq!(percent_change(dec("150"), dec("100")), Some(dec("50")));
    assert_eq!(percent_change(dec("-20"), dec("-10")), Some(dec("100")));
    assert_eq!(percent_change(Decimal::MAX, dec("0.0000001")), None);
}

#[test]
fn expense_breakdown_by_category() {
    let mut expenses = scenario().expenses;
    expenses.push(Expense::new(day(8), dec("25"), ExpenseCategory::Fuel));
    let report = ExpenseAnalytics::from_expenses(&expenses);
    assert_eq!(report.by_category[&ExpenseCategory::Fuel], dec("75"));
    let top = report.top_categories();
    assert_eq!(top[0], (ExpenseCategory::Fuel, dec("75")));
    assert_eq!(top[1], (ExpenseCategory::Maintenance, dec("30")));
    assert_eq!(report.tax_deductible_share(), dec("100"));
}

#[test]
fn mileage_cost_uses_fuel_only() {
    let current = scenario();
    let report = MileageCost::from_records(&current.mileage, &current.expenses);
    assert_eq!(report.total_fuel_cost, dec("50"));
    assert_eq!(report.cost_per_mile, dec("0.25"));
    assert_eq!(report.tax_deductible_mileage, 200.0);
}

#[test]
fn hourly_rate_with_and_without_tips() {
    let shifts = vec![WorkHours::new(day(4), 4.0)];
    let income = vec![Income::new(day(4), dec("90"), dec("10"), IncomeSource::FreeNow)];
    let report = HourlyRateAnalytics::from_records(&shifts, &income);
    assert_eq!(report.hourly_rate, dec("25"));
    assert_eq!(report.hourly_rate_without_tips, dec("22.5"));
    assert_eq!(report.tips_share(), dec("10"));
}
