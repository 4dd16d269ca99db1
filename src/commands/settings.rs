// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::db;
use crate::utils::{get_currency_symbol, pretty_table, set_currency_symbol};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let path = db::db_path()?;
            let rows = vec![
                vec!["currency_symbol".to_string(), get_currency_symbol(conn)?],
                vec!["database".to_string(), path.display().to_string()],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-currency", sub)) => {
            let symbol = sub.get_one::<String>("symbol").unwrap().trim();
            if symbol.is_empty() {
                bail!("Currency symbol cannot be empty");
            }
            set_currency_symbol(conn, symbol)?;
            println!("Currency symbol set to {}", symbol);
        }
        _ => {}
    }
    Ok(())
}
