// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

use crate::commands::{opt_str, query_records};
use crate::models::{Expense, Income, Mileage, WorkHours};

/// A record that can be written as one CSV row.
trait CsvRow {
    const HEADER: &'static [&'static str];

    fn csv_row(&self) -> Vec<String>;
}

fn opt_num(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl CsvRow for Expense {
    const HEADER: &'static [&'static str] = &[
        "id",
        "date",
        "amount",
        "category",
        "description",
        "is_tax_deductible",
        "tax_deductible_percentage",
        "tax_deductible_amount",
        "creation_method",
        "is_uploaded",
        "related_mileage_id",
    ];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.amount.to_string(),
            self.category.to_string(),
            opt_str(&self.description),
            self.is_tax_deductible.to_string(),
            self.tax_deductible_percentage.to_string(),
            self.tax_deductible_amount().to_string(),
            self.creation_method.to_string(),
            self.is_uploaded.to_string(),
            self.related_mileage_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        ]
    }
}

impl CsvRow for Income {
    const HEADER: &'static [&'static str] = &[
        "id",
        "date",
        "amount",
        "tip_amount",
        "total_amount",
        "source",
        "notes",
        "is_uploaded",
    ];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.amount.to_string(),
            self.tip_amount.to_string(),
            self.total_amount().to_string(),
            self.source.to_string(),
            opt_str(&self.notes),
            self.is_uploaded.to_string(),
        ]
    }
}

impl CsvRow for Mileage {
    const HEADER: &'static [&'static str] = &[
        "id",
        "date",
        "start_mileage",
        "end_mileage",
        "distance",
        "purpose",
        "is_tax_deductible",
        "tax_deductible_percentage",
        "related_fuel_expense_id",
        "is_uploaded",
    ];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            opt_num(self.start_mileage),
            opt_num(self.end_mileage),
            self.distance.to_string(),
            opt_str(&self.purpose),
            self.is_tax_deductible.to_string(),
            self.tax_deductible_percentage.to_string(),
            self.related_fuel_expense_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            self.is_uploaded.to_string(),
        ]
    }
}

impl CsvRow for WorkHours {
    const HEADER: &'static [&'static str] = &[
        "id",
        "date",
        "start_time",
        "end_time",
        "total_hours",
        "notes",
        "is_uploaded",
    ];

    fn csv_row(&self) -> Vec<String> {
        let fmt_time = |t: Option<chrono::NaiveDateTime>| {
            t.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default()
        };
        vec![
            self.id.to_string(),
            self.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            fmt_time(self.start_time),
            fmt_time(self.end_time),
            self.total_hours.to_string(),
            opt_str(&self.notes),
            self.is_uploaded.to_string(),
        ]
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let kind = m.get_one::<String>("kind").unwrap();
    let fmt = m.get_one::<String>("format").unwrap().to_lowercase();
    let out = m.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let n = match kind.as_str() {
        "expense" => write_records(&query_records::<Expense>(conn, m)?, &fmt, out)?,
        "income" => write_records(&query_records::<Income>(conn, m)?, &fmt, out)?,
        "mileage" => write_records(&query_records::<Mileage>(conn, m)?, &fmt, out)?,
        "hours" => write_records(&query_records::<WorkHours>(conn, m)?, &fmt, out)?,
        other => bail!("Unknown record kind '{}'", other),
    };
    tracing::info!(kind = %kind, rows = n, out = %out, "exported");
    println!("Exported {} {} records to {}", n, kind, out);
    Ok(())
}

fn write_records<T: CsvRow + Serialize>(
    items: &[T],
    fmt: &str,
    out: impl AsRef<Path>,
) -> Result<usize> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(T::HEADER)?;
            for item in items {
                wtr.write_record(item.csv_row())?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(items.len())
}
