// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::commands::{apply_limit, opt_str, query_records};
use crate::models::{CreationMethod, Expense, ExpenseCategory};
use crate::store::SqliteStore;
use crate::utils::{
    fmt_money, get_currency_symbol, maybe_print_json, parse_datetime, parse_decimal, parse_uuid,
    pretty_table, range_from_args,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("rm", sub)) => {
            let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
            SqliteStore::new(conn).delete::<Expense>(id)?;
            println!("Removed expense {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn expense_from_args(sub: &clap::ArgMatches) -> Result<Expense> {
    let date = parse_datetime(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category: ExpenseCategory = sub.get_one::<String>("category").unwrap().parse()?;

    let mut e = Expense::new(date, amount, category);
    e.description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(flag) = sub.get_one::<bool>("deductible") {
        e.is_tax_deductible = *flag;
    }
    if let Some(pct) = sub.get_one::<i32>("pct") {
        e.tax_deductible_percentage = *pct;
    }
    let method: CreationMethod = sub.get_one::<String>("method").unwrap().parse()?;
    e.creation_method = method;
    if let Some(raw) = sub.get_one::<String>("mileage") {
        e.related_mileage_id = Some(parse_uuid(raw)?);
    }
    Ok(e)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let e = expense_from_args(sub)?;
    let saved = SqliteStore::new(conn).save_expense(&e)?;
    let symbol = get_currency_symbol(conn)?;
    println!(
        "Recorded {} {} on {} (id {})",
        saved.category,
        fmt_money(&saved.amount, &symbol),
        saved.date.format("%Y-%m-%d %H:%M"),
        saved.id
    );
    Ok(())
}

pub fn query_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Expense>> {
    let Some(raw) = sub.get_one::<String>("category") else {
        return query_records::<Expense>(conn, sub);
    };
    let category: ExpenseCategory = raw.parse()?;
    let mut rows = SqliteStore::new(conn).expenses_by_category(category)?;
    if let Some(range) = range_from_args(sub)? {
        // Same order as an unfiltered range listing: oldest first
        rows.retain(|e| range.contains(e.date));
        rows.reverse();
    }
    Ok(apply_limit(rows, sub))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_expenses(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let symbol = get_currency_symbol(conn)?;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.date.format("%Y-%m-%d %H:%M").to_string(),
                    e.category.to_string(),
                    fmt_money(&e.amount, &symbol),
                    fmt_money(&e.tax_deductible_amount(), &symbol),
                    opt_str(&e.description),
                    e.id.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Category", "Amount", "Deductible", "Description", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
    let store = SqliteStore::new(conn);
    let e = store
        .get::<Expense>(id)?
        .with_context(|| format!("Expense {} not found", id))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &e)? {
        return Ok(());
    }
    let symbol = get_currency_symbol(conn)?;
    let trips = store.mileage_for_fuel_expense(id)?;
    let rows = vec![
        vec!["Date".into(), e.date.format("%Y-%m-%d %H:%M").to_string()],
        vec!["Category".into(), e.category.to_string()],
        vec!["Amount".into(), fmt_money(&e.amount, &symbol)],
        vec![
            "Tax deductible".into(),
            format!(
                "{} ({}%) = {}",
                if e.is_tax_deductible { "yes" } else { "no" },
                e.tax_deductible_percentage,
                fmt_money(&e.tax_deductible_amount(), &symbol)
            ),
        ],
        vec!["Description".into(), opt_str(&e.description)],
        vec!["Created".into(), e.creation_method.to_string()],
        vec!["Uploaded".into(), e.is_uploaded.to_string()],
        vec![
            "Receipts".into(),
            e.receipt_ids.as_ref().map(|ids| ids.len()).unwrap_or(0).to_string(),
        ],
        vec!["Linked trips".into(), trips.len().to_string()],
        vec![
            "Last modified".into(),
            e.last_modified.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}
