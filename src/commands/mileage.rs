// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::commands::{opt_str, query_records};
use crate::models::{Expense, ExpenseCategory, Mileage};
use crate::store::SqliteStore;
use crate::utils::{maybe_print_json, parse_datetime, parse_f64, parse_uuid, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let trip = mileage_from_args(sub)?;
            let store = SqliteStore::new(conn);
            if let Some(fuel_id) = trip.related_fuel_expense_id {
                match store.get::<Expense>(fuel_id)? {
                    Some(e) if e.category == ExpenseCategory::Fuel => {}
                    Some(e) => bail!("Expense {} is {}, not fuel", fuel_id, e.category),
                    None => bail!("Expense {} not found", fuel_id),
                }
            }
            let saved = store.save_mileage(&trip)?;
            println!(
                "Recorded {:.1} mi on {} (id {})",
                saved.distance,
                saved.date.format("%Y-%m-%d"),
                saved.id
            );
        }
        Some(("list", sub)) => {
            let data = query_records::<Mileage>(conn, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|t| {
                        let odo = match (t.start_mileage, t.end_mileage) {
                            (Some(s), Some(e)) => format!("{:.0} -> {:.0}", s, e),
                            _ => String::new(),
                        };
                        vec![
                            t.date.format("%Y-%m-%d").to_string(),
                            format!("{:.1}", t.distance),
                            format!("{:.1}", t.tax_deductible_mileage()),
                            odo,
                            opt_str(&t.purpose),
                            t.id.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Date", "Distance", "Deductible", "Odometer", "Purpose", "Id"],
                        rows,
                    )
                );
            }
        }
        Some(("rm", sub)) => {
            let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
            SqliteStore::new(conn).delete::<Mileage>(id)?;
            println!("Removed trip {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn mileage_from_args(sub: &clap::ArgMatches) -> Result<Mileage> {
    let date = parse_datetime(sub.get_one::<String>("date").unwrap())?;
    let start = sub.get_one::<String>("start");
    let end = sub.get_one::<String>("end");
    let mut trip = match (start, end, sub.get_one::<String>("distance")) {
        (Some(s), Some(e), _) => {
            let (s, e) = (parse_f64(s)?, parse_f64(e)?);
            if e < s {
                bail!("End reading {} is below start reading {}", e, s);
            }
            Mileage::from_odometer(date, s, e)
        }
        (_, _, Some(d)) => Mileage::new(date, parse_f64(d)?),
        _ => bail!("Give either --start and --end or --distance"),
    };
    trip.purpose = sub.get_one::<String>("purpose").cloned();
    if let Some(flag) = sub.get_one::<bool>("deductible") {
        trip.is_tax_deductible = *flag;
    }
    if let Some(pct) = sub.get_one::<i32>("pct") {
        trip.tax_deductible_percentage = *pct;
    }
    if let Some(raw) = sub.get_one::<String>("fuel-expense") {
        trip.related_fuel_expense_id = Some(parse_uuid(raw)?);
    }
    Ok(trip)
}
