// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::commands::{opt_str, query_records};
use crate::models::WorkHours;
use crate::store::SqliteStore;
use crate::utils::{maybe_print_json, parse_datetime, parse_f64, parse_uuid, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let shift = work_hours_from_args(sub)?;
            let saved = SqliteStore::new(conn).save_work_hours(&shift)?;
            println!(
                "Recorded {} on {} (id {})",
                saved.formatted_total_hours(),
                saved.date.format("%Y-%m-%d"),
                saved.id
            );
        }
        Some(("list", sub)) => {
            let data = query_records::<WorkHours>(conn, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|w| {
                        let shift = match (w.start_time, w.end_time) {
                            (Some(s), Some(e)) => {
                                format!("{} - {}", s.format("%H:%M"), e.format("%H:%M"))
                            }
                            _ => String::new(),
                        };
                        vec![
                            w.date.format("%Y-%m-%d").to_string(),
                            shift,
                            w.formatted_total_hours(),
                            opt_str(&w.notes),
                            w.id.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Date", "Shift", "Hours", "Notes", "Id"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
            SqliteStore::new(conn).delete::<WorkHours>(id)?;
            println!("Removed shift {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn work_hours_from_args(sub: &clap::ArgMatches) -> Result<WorkHours> {
    let date = match sub.get_one::<String>("date") {
        Some(s) => Some(parse_datetime(s)?),
        None => None,
    };
    let start = sub.get_one::<String>("start");
    let end = sub.get_one::<String>("end");
    let mut shift = match (start, end, sub.get_one::<String>("hours")) {
        (Some(s), Some(e), _) => {
            let (s, e) = (parse_datetime(s)?, parse_datetime(e)?);
            if e <= s {
                bail!("Shift end {} is not after its start {}", e, s);
            }
            let mut w = WorkHours::from_shift(s, e);
            if let Some(d) = date {
                w.date = d;
            }
            w
        }
        (_, _, Some(h)) => {
            let Some(d) = date else {
                bail!("--date is required with --hours");
            };
            WorkHours::new(d, parse_f64(h)?)
        }
        _ => bail!("Give either --start and --end or --hours"),
    };
    shift.notes = sub.get_one::<String>("notes").cloned();
    Ok(shift)
}
