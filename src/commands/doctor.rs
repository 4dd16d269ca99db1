// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::models::{Expense, Income, Mileage, WorkHours};
use crate::store::SqliteStore;
use crate::utils::pretty_table;

// Odometer and clock-derived values are compared with some slack for
// float storage.
const TOLERANCE: f64 = 0.01;

/// Inconsistent stored records, as `(issue, detail)` pairs.
pub fn find_issues(conn: &Connection) -> Result<Vec<(String, String)>> {
    let store = SqliteStore::new(conn);
    let mut rows: Vec<(String, String)> = Vec::new();
    let pct_ok = |p: i32| (0..=100).contains(&p);

    for e in store.list::<Expense>()? {
        if e.amount < Decimal::ZERO {
            rows.push(("negative_amount".into(), format!("expense {} {}", e.id, e.amount)));
        }
        if !pct_ok(e.tax_deductible_percentage) {
            rows.push((
                "pct_out_of_range".into(),
                format!("expense {} {}%", e.id, e.tax_deductible_percentage),
            ));
        }
        if let Some(trip_id) = e.related_mileage_id {
            if store.get::<Mileage>(trip_id)?.is_none() {
                rows.push(("dangling_link".into(), format!("expense {} -> mileage {}", e.id, trip_id)));
            }
        }
    }

    for i in store.list::<Income>()? {
        if i.amount < Decimal::ZERO || i.tip_amount < Decimal::ZERO {
            rows.push(("negative_amount".into(), format!("income {} {}", i.id, i.total_amount())));
        }
    }

    for t in store.list::<Mileage>()? {
        if t.distance < 0.0 {
            rows.push(("negative_distance".into(), format!("mileage {} {}", t.id, t.distance)));
        }
        if !pct_ok(t.tax_deductible_percentage) {
            rows.push((
                "pct_out_of_range".into(),
                format!("mileage {} {}%", t.id, t.tax_deductible_percentage),
            ));
        }
        if let Some(odo) = t.odometer_distance() {
            if (odo - t.distance).abs() > TOLERANCE {
                rows.push((
                    "odometer_mismatch".into(),
                    format!("mileage {} odometer {} vs distance {}", t.id, odo, t.distance),
                ));
            }
        }
        if let Some(fuel_id) = t.related_fuel_expense_id {
            if store.get::<Expense>(fuel_id)?.is_none() {
                rows.push(("dangling_link".into(), format!("mileage {} -> expense {}", t.id, fuel_id)));
            }
        }
    }

    for w in store.list::<WorkHours>()? {
        if w.total_hours < 0.0 {
            rows.push(("negative_hours".into(), format!("hours {} {}", w.id, w.total_hours)));
        }
        if let Some(shift) = w.shift_hours() {
            if (shift - w.total_hours).abs() > TOLERANCE {
                rows.push((
                    "shift_mismatch".into(),
                    format!("hours {} shift {:.2} vs total {:.2}", w.id, shift, w.total_hours),
                ));
            }
        }
    }

    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = find_issues(conn)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues.into_iter().map(|(a, b)| vec![a, b]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
