// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::dashboard::{DashboardData, compute_dashboard};
use crate::period::Period;
use crate::store::SqliteStore;
use crate::utils::{
    fmt_money, fmt_percent, get_currency_symbol, maybe_print_json, parse_datetime, pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let period: Period = m.get_one::<String>("period").unwrap().parse()?;
    let at = match m.get_one::<String>("at") {
        Some(s) => Some(parse_datetime(s)?),
        None => None,
    };
    let store = SqliteStore::new(conn);
    let data = compute_dashboard(&store, period, at)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let symbol = get_currency_symbol(conn)?;
    print_dashboard(&data, &symbol);
    Ok(())
}

fn print_dashboard(data: &DashboardData, symbol: &str) {
    let s = &data.summary;
    let mt = &data.metrics;
    println!("{} ({})", data.period.label(), data.range);

    let summary = vec![
        vec![
            "Income".to_string(),
            fmt_money(&s.total_income, symbol),
            fmt_percent(s.income_change_percent),
        ],
        vec![
            "Expenses".to_string(),
            fmt_money(&s.total_expense, symbol),
            fmt_percent(s.expense_change_percent),
        ],
        vec![
            "Net".to_string(),
            fmt_money(&s.net_income, symbol),
            fmt_percent(s.net_income_change_percent),
        ],
    ];
    println!("{}", pretty_table(&["", "Amount", "vs previous"], summary));

    let metrics = vec![
        vec!["Hourly rate".to_string(), fmt_money(&mt.hourly_rate, symbol)],
        vec!["Cost per mile".to_string(), fmt_money(&mt.cost_per_mile, symbol)],
        vec!["Miles".to_string(), format!("{:.1}", mt.total_mileage)],
        vec!["Hours worked".to_string(), format!("{:.2}", mt.total_work_hours)],
        vec![
            "Tax deductible".to_string(),
            fmt_money(&mt.total_tax_deductible, symbol),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], metrics));

    let chart: Vec<Vec<String>> = data
        .chart
        .labels
        .iter()
        .zip(data.chart.income_data.iter().zip(&data.chart.expense_data))
        .map(|(label, (inc, exp))| {
            vec![
                label.clone(),
                fmt_money(inc, symbol),
                fmt_money(exp, symbol),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Bucket", "Income", "Expenses"], chart));
}
