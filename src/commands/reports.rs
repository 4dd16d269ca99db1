// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::analytics::{ExpenseAnalytics, HourlyRateAnalytics, MileageCost};
use crate::models::{Expense, Income, Mileage, WorkHours};
use crate::period::{DateRange, Period};
use crate::store::SqliteStore;
use crate::utils::{
    fmt_money, get_currency_symbol, maybe_print_json, now_local, pretty_table, range_from_args,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => expenses(conn, sub)?,
        Some(("mileage", sub)) => mileage(conn, sub)?,
        Some(("hourly", sub)) => hourly(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Reports cover the current month unless a range is given.
pub fn report_range(sub: &clap::ArgMatches) -> Result<DateRange> {
    Ok(range_from_args(sub)?.unwrap_or_else(|| Period::Month.resolve(now_local())))
}

pub fn expense_report(conn: &Connection, range: &DateRange) -> Result<ExpenseAnalytics> {
    let store = SqliteStore::new(conn);
    let expenses = store.list_in_range::<Expense>(range)?;
    Ok(ExpenseAnalytics::from_expenses(&expenses))
}

pub fn mileage_report(conn: &Connection, range: &DateRange) -> Result<MileageCost> {
    let store = SqliteStore::new(conn);
    let trips = store.list_in_range::<Mileage>(range)?;
    let expenses = store.list_in_range::<Expense>(range)?;
    Ok(MileageCost::from_records(&trips, &expenses))
}

pub fn hourly_report(conn: &Connection, range: &DateRange) -> Result<HourlyRateAnalytics> {
    let store = SqliteStore::new(conn);
    let shifts = store.list_in_range::<WorkHours>(range)?;
    let income = store.list_in_range::<Income>(range)?;
    Ok(HourlyRateAnalytics::from_records(&shifts, &income))
}

fn expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let range = report_range(sub)?;
    let report = expense_report(conn, &range)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let symbol = get_currency_symbol(conn)?;
    println!("Expenses {}", range);
    let mut rows: Vec<Vec<String>> = report
        .top_categories()
        .into_iter()
        .map(|(cat, amt)| vec![cat.to_string(), fmt_money(&amt, &symbol)])
        .collect();
    rows.push(vec![
        "Total".to_string(),
        fmt_money(&report.total_expense, &symbol),
    ]);
    rows.push(vec![
        "Tax deductible".to_string(),
        format!(
            "{} ({:.1}%)",
            fmt_money(&report.total_tax_deductible, &symbol),
            report.tax_deductible_share().round_dp(1)
        ),
    ]);
    println!("{}", pretty_table(&["Category", "Amount"], rows));
    Ok(())
}

fn mileage(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let range = report_range(sub)?;
    let report = mileage_report(conn, &range)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let symbol = get_currency_symbol(conn)?;
    println!("Mileage {}", range);
    let rows = vec![
        vec!["Miles".to_string(), format!("{:.1}", report.total_mileage)],
        vec![
            "Deductible miles".to_string(),
            format!("{:.1}", report.tax_deductible_mileage),
        ],
        vec![
            "Fuel cost".to_string(),
            fmt_money(&report.total_fuel_cost, &symbol),
        ],
        vec![
            "Cost per mile".to_string(),
            fmt_money(&report.cost_per_mile, &symbol),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

fn hourly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let range = report_range(sub)?;
    let report = hourly_report(conn, &range)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let symbol = get_currency_symbol(conn)?;
    println!("Hourly rate {}", range);
    let rows = vec![
        vec!["Hours".to_string(), format!("{:.2}", report.total_hours)],
        vec![
            "Income".to_string(),
            fmt_money(&report.total_income, &symbol),
        ],
        vec![
            "Tips".to_string(),
            format!(
                "{} ({:.1}%)",
                fmt_money(&report.total_tips, &symbol),
                report.tips_share().round_dp(1)
            ),
        ],
        vec![
            "Per hour".to_string(),
            fmt_money(&report.hourly_rate, &symbol),
        ],
        vec![
            "Per hour, excl. tips".to_string(),
            fmt_money(&report.hourly_rate_without_tips, &symbol),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}
