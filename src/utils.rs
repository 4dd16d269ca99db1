// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Once;

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::period::{DateRange, Period};

static TRACING_INIT: Once = Once::new();

/// Installs the stderr subscriber once. `RUST_LOG` overrides the default
/// `drivenote=warn`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("drivenote=warn"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s.trim()))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` or the same with a `T`.
/// A bare date means midnight.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| {
        format!("Invalid date/time '{}', expected YYYY-MM-DD[ HH:MM]", s)
    })?;
    Ok(date.and_time(NaiveTime::MIN))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s.trim()))
}

pub fn parse_f64(s: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("Invalid number '{}'", s.trim()))
}

pub fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s.trim()).with_context(|| format!("Invalid id '{}'", s.trim()))
}

pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Range selected by `--from/--to` or `--period/--at`. `None` means no
/// filter was given.
pub fn range_from_args(sub: &clap::ArgMatches) -> Result<Option<DateRange>> {
    let from = sub.get_one::<String>("from");
    let to = sub.get_one::<String>("to");
    if from.is_some() || to.is_some() {
        // Open ends stay inside four-digit years so stored dates compare
        // correctly as text.
        let from = match from {
            Some(s) => parse_date(s)?,
            None => NaiveDate::from_ymd_opt(1, 1, 1).context("calendar lower bound")?,
        };
        let to = match to {
            Some(s) => parse_date(s)?,
            None => NaiveDate::from_ymd_opt(9998, 12, 31).context("calendar upper bound")?,
        };
        if to < from {
            return Err(anyhow!("--to {} is before --from {}", to, from));
        }
        return Ok(Some(DateRange::from_dates(from, to)));
    }
    if let Some(p) = sub.get_one::<String>("period") {
        let period: Period = p.parse()?;
        let at = match sub.get_one::<String>("at") {
            Some(s) => parse_datetime(s)?,
            None => now_local(),
        };
        return Ok(Some(period.resolve(at)));
    }
    Ok(None)
}

pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    if d.is_sign_negative() && !d.is_zero() {
        format!("-{}{:.2}", symbol, d.abs().round_dp(2))
    } else {
        format!("{}{:.2}", symbol, d.round_dp(2))
    }
}

pub fn fmt_percent(p: Option<Decimal>) -> String {
    match p {
        Some(v) if v.is_sign_negative() => format!("{:.1}%", v.round_dp(1)),
        Some(v) => format!("+{:.1}%", v.round_dp(1)),
        None => "n/a".to_string(),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub const DEFAULT_CURRENCY_SYMBOL: &str = "£";

pub fn get_currency_symbol(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='currency_symbol'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()))
}

pub fn set_currency_symbol(conn: &Connection, symbol: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('currency_symbol', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![symbol],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
