// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::models::{Expense, Income, Mileage, WorkHours};
use crate::store::{Record, SqliteStore};
use crate::utils::{maybe_print_json, parse_uuid, pretty_table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingCount {
    pub kind: &'static str,
    pub pending: usize,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("status", sub)) => {
            let data = pending_counts(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|c| vec![c.kind.to_string(), c.pending.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Kind", "Not uploaded"], rows));
            }
        }
        Some(("mark", sub)) => {
            let kind = sub.get_one::<String>("kind").unwrap();
            let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
            mark(conn, kind, id)?;
            println!("Marked {} {} as uploaded", kind, id);
        }
        _ => {}
    }
    Ok(())
}

fn count<T: Record>(store: &SqliteStore<'_>) -> Result<PendingCount> {
    Ok(PendingCount {
        kind: T::KIND,
        pending: store.unsynced::<T>()?.len(),
    })
}

pub fn pending_counts(conn: &Connection) -> Result<Vec<PendingCount>> {
    let store = SqliteStore::new(conn);
    Ok(vec![
        count::<Expense>(&store)?,
        count::<Income>(&store)?,
        count::<Mileage>(&store)?,
        count::<WorkHours>(&store)?,
    ])
}

pub fn mark(conn: &Connection, kind: &str, id: uuid::Uuid) -> Result<()> {
    let store = SqliteStore::new(conn);
    match kind {
        "expense" => store.mark_synced::<Expense>(id)?,
        "income" => store.mark_synced::<Income>(id)?,
        "mileage" => store.mark_synced::<Mileage>(id)?,
        "hours" => store.mark_synced::<WorkHours>(id)?,
        other => anyhow::bail!("Unknown record kind '{}'", other),
    }
    Ok(())
}
