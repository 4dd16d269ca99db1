// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::commands::{opt_str, query_records};
use crate::models::{Income, IncomeSource};
use crate::store::SqliteStore;
use crate::utils::{
    fmt_money, get_currency_symbol, maybe_print_json, parse_datetime, parse_decimal, parse_uuid,
    pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let date = parse_datetime(sub.get_one::<String>("date").unwrap())?;
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let tip = parse_decimal(sub.get_one::<String>("tip").unwrap())?;
            let source: IncomeSource = sub.get_one::<String>("source").unwrap().parse()?;
            let mut income = Income::new(date, amount, tip, source);
            income.notes = sub.get_one::<String>("notes").cloned();

            let saved = SqliteStore::new(conn).save_income(&income)?;
            let symbol = get_currency_symbol(conn)?;
            println!(
                "Recorded {} from {} on {} (id {})",
                fmt_money(&saved.total_amount(), &symbol),
                saved.source,
                saved.date.format("%Y-%m-%d %H:%M"),
                saved.id
            );
        }
        Some(("list", sub)) => {
            let data = query_records::<Income>(conn, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let symbol = get_currency_symbol(conn)?;
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|i| {
                        vec![
                            i.date.format("%Y-%m-%d %H:%M").to_string(),
                            i.source.to_string(),
                            fmt_money(&i.amount, &symbol),
                            fmt_money(&i.tip_amount, &symbol),
                            fmt_money(&i.total_amount(), &symbol),
                            opt_str(&i.notes),
                            i.id.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Date", "Source", "Fare", "Tip", "Total", "Notes", "Id"],
                        rows,
                    )
                );
            }
        }
        Some(("rm", sub)) => {
            let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
            SqliteStore::new(conn).delete::<Income>(id)?;
            println!("Removed income {}", id);
        }
        _ => {}
    }
    Ok(())
}
