// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod dashboard;
pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod hours;
pub mod income;
pub mod mileage;
pub mod reports;
pub mod settings;
pub mod sync;

use anyhow::Result;
use rusqlite::Connection;

use crate::store::{Record, SqliteStore};
use crate::utils::range_from_args;

/// Records selected by the shared `--from/--to/--period/--at/--limit` args.
pub fn query_records<T: Record>(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<T>> {
    let store = SqliteStore::new(conn);
    let rows = match range_from_args(sub)? {
        Some(range) => store.list_in_range::<T>(&range)?,
        None => store.list::<T>()?,
    };
    Ok(apply_limit(rows, sub))
}

/// Truncates to `--limit`. Run it after every other filter.
pub(crate) fn apply_limit<T>(mut rows: Vec<T>, sub: &clap::ArgMatches) -> Vec<T> {
    // Not every command that lists records takes --limit
    if let Some(limit) = sub.try_get_one::<usize>("limit").ok().flatten() {
        rows.truncate(*limit);
    }
    rows
}

pub(crate) fn opt_str(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}
