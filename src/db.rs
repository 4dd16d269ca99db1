// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Drivenote", "drivenote"));

/// Overrides the platform data dir location of the database file.
pub const DB_ENV: &str = "DRIVENOTE_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("drivenote.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS expenses(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT,
        is_tax_deductible INTEGER NOT NULL DEFAULT 0,
        tax_deductible_percentage INTEGER NOT NULL DEFAULT 100,
        creation_method TEXT NOT NULL DEFAULT 'manual',
        is_uploaded INTEGER NOT NULL DEFAULT 0,
        last_modified TEXT NOT NULL,
        receipt_ids TEXT, -- JSON array of UUIDs
        related_mileage_id TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

    CREATE TABLE IF NOT EXISTS income(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        tip_amount TEXT NOT NULL DEFAULT '0',
        source TEXT NOT NULL,
        notes TEXT,
        is_uploaded INTEGER NOT NULL DEFAULT 0,
        last_modified TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);

    CREATE TABLE IF NOT EXISTS mileage(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        start_mileage REAL,
        end_mileage REAL,
        distance REAL NOT NULL,
        purpose TEXT,
        is_tax_deductible INTEGER NOT NULL DEFAULT 1,
        tax_deductible_percentage INTEGER NOT NULL DEFAULT 100,
        related_fuel_expense_id TEXT,
        is_uploaded INTEGER NOT NULL DEFAULT 0,
        last_modified TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_mileage_date ON mileage(date);

    CREATE TABLE IF NOT EXISTS work_hours(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        start_time TEXT,
        end_time TEXT,
        total_hours REAL NOT NULL,
        notes TEXT,
        is_uploaded INTEGER NOT NULL DEFAULT 0,
        last_modified TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_work_hours_date ON work_hours(date);
    "#,
    )?;
    Ok(())
}
