// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed record store. Money is kept as decimal text so that
//! totals never pick up binary floating point error.

use std::str::FromStr;

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{Connection, Params, Row, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StorageError;
use crate::gateway::RecordQuery;
use crate::models::{Expense, ExpenseCategory, Income, Mileage, WorkHours};
use crate::period::DateRange;

/// A record type with a table of its own.
pub trait Record: Sized {
    const TABLE: &'static str;
    const KIND: &'static str;
    const COLUMNS: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

fn parse_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.trim()
        .parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_opt_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.get(idx)?;
    match raw.filter(|s| !s.trim().is_empty()) {
        Some(s) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

fn parse_id_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Vec<Uuid>>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(s) => serde_json::from_str(&s)
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

impl Record for Expense {
    const TABLE: &'static str = "expenses";
    const KIND: &'static str = "Expense";
    const COLUMNS: &'static str = "id, date, amount, category, description, is_tax_deductible, \
         tax_deductible_percentage, creation_method, is_uploaded, last_modified, receipt_ids, \
         related_mileage_id";

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Expense {
            id: parse_col(r, 0)?,
            date: r.get(1)?,
            amount: parse_col(r, 2)?,
            category: parse_col(r, 3)?,
            description: r.get(4)?,
            is_tax_deductible: r.get(5)?,
            tax_deductible_percentage: r.get(6)?,
            creation_method: parse_col(r, 7)?,
            is_uploaded: r.get(8)?,
            last_modified: r.get(9)?,
            receipt_ids: parse_id_list(r, 10)?,
            related_mileage_id: parse_opt_col(r, 11)?,
        })
    }
}

impl Record for Income {
    const TABLE: &'static str = "income";
    const KIND: &'static str = "Income";
    const COLUMNS: &'static str =
        "id, date, amount, tip_amount, source, notes, is_uploaded, last_modified";

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Income {
            id: parse_col(r, 0)?,
            date: r.get(1)?,
            amount: parse_col(r, 2)?,
            tip_amount: parse_col(r, 3)?,
            source: parse_col(r, 4)?,
            notes: r.get(5)?,
            is_uploaded: r.get(6)?,
            last_modified: r.get(7)?,
        })
    }
}

impl Record for Mileage {
    const TABLE: &'static str = "mileage";
    const KIND: &'static str = "Mileage";
    const COLUMNS: &'static str = "id, date, start_mileage, end_mileage, distance, purpose, \
         is_tax_deductible, tax_deductible_percentage, related_fuel_expense_id, is_uploaded, \
         last_modified";

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Mileage {
            id: parse_col(r, 0)?,
            date: r.get(1)?,
            start_mileage: r.get(2)?,
            end_mileage: r.get(3)?,
            distance: r.get(4)?,
            purpose: r.get(5)?,
            is_tax_deductible: r.get(6)?,
            tax_deductible_percentage: r.get(7)?,
            related_fuel_expense_id: parse_opt_col(r, 8)?,
            is_uploaded: r.get(9)?,
            last_modified: r.get(10)?,
        })
    }
}

impl Record for WorkHours {
    const TABLE: &'static str = "work_hours";
    const KIND: &'static str = "Work hours";
    const COLUMNS: &'static str =
        "id, date, start_time, end_time, total_hours, notes, is_uploaded, last_modified";

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(WorkHours {
            id: parse_col(r, 0)?,
            date: r.get(1)?,
            start_time: r.get(2)?,
            end_time: r.get(3)?,
            total_hours: r.get(4)?,
            notes: r.get(5)?,
            is_uploaded: r.get(6)?,
            last_modified: r.get(7)?,
        })
    }
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqliteStore { conn }
    }

    fn select<T: Record, P: Params>(&self, clause: &str, params: P) -> Result<Vec<T>, StorageError> {
        let sql = format!("SELECT {} FROM {} {}", T::COLUMNS, T::TABLE, clause);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params, T::from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        debug!(table = T::TABLE, rows = out.len(), "select");
        Ok(out)
    }

    /// Newest first.
    pub fn list<T: Record>(&self) -> Result<Vec<T>, StorageError> {
        self.select("ORDER BY date DESC, id", params![])
    }

    /// Oldest first, `start <= date < end`.
    pub fn list_in_range<T: Record>(&self, range: &DateRange) -> Result<Vec<T>, StorageError> {
        self.select(
            "WHERE date >= ?1 AND date < ?2 ORDER BY date, id",
            params![range.start, range.end],
        )
    }

    pub fn get<T: Record>(&self, id: Uuid) -> Result<Option<T>, StorageError> {
        let mut found = self.select::<T, _>("WHERE id = ?1", params![id.to_string()])?;
        Ok(found.pop())
    }

    pub fn delete<T: Record>(&self, id: Uuid) -> Result<(), StorageError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);
        let n = self.conn.execute(&sql, params![id.to_string()])?;
        if n == 0 {
            return Err(StorageError::NotFound { kind: T::KIND, id });
        }
        info!(table = T::TABLE, %id, "deleted");
        Ok(())
    }

    /// Records not yet flagged as uploaded.
    pub fn unsynced<T: Record>(&self) -> Result<Vec<T>, StorageError> {
        self.select("WHERE is_uploaded = 0 ORDER BY date, id", params![])
    }

    pub fn mark_synced<T: Record>(&self, id: Uuid) -> Result<(), StorageError> {
        let sql = format!("UPDATE {} SET is_uploaded = 1 WHERE id = ?1", T::TABLE);
        let n = self.conn.execute(&sql, params![id.to_string()])?;
        if n == 0 {
            return Err(StorageError::NotFound { kind: T::KIND, id });
        }
        Ok(())
    }

    pub fn expenses_by_category(
        &self,
        category: ExpenseCategory,
    ) -> Result<Vec<Expense>, StorageError> {
        self.select(
            "WHERE category = ?1 ORDER BY date DESC, id",
            params![category.as_str()],
        )
    }

    pub fn mileage_for_fuel_expense(&self, expense_id: Uuid) -> Result<Vec<Mileage>, StorageError> {
        self.select(
            "WHERE related_fuel_expense_id = ?1 ORDER BY date, id",
            params![expense_id.to_string()],
        )
    }

    pub fn save_expense(&self, expense: &Expense) -> Result<Expense, StorageError> {
        let mut e = expense.clone();
        e.last_modified = Utc::now();
        let receipts = match &e.receipt_ids {
            Some(ids) => Some(serde_json::to_string(ids)?),
            None => None,
        };
        self.conn.execute(
            "INSERT INTO expenses(id, date, amount, category, description, is_tax_deductible,
                 tax_deductible_percentage, creation_method, is_uploaded, last_modified,
                 receipt_ids, related_mileage_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(id) DO UPDATE SET
                 date=excluded.date, amount=excluded.amount, category=excluded.category,
                 description=excluded.description, is_tax_deductible=excluded.is_tax_deductible,
                 tax_deductible_percentage=excluded.tax_deductible_percentage,
                 creation_method=excluded.creation_method, is_uploaded=excluded.is_uploaded,
                 last_modified=excluded.last_modified, receipt_ids=excluded.receipt_ids,
                 related_mileage_id=excluded.related_mileage_id",
            params![
                e.id.to_string(),
                e.date,
                e.amount.to_string(),
                e.category.as_str(),
                e.description,
                e.is_tax_deductible,
                e.tax_deductible_percentage,
                e.creation_method.as_str(),
                e.is_uploaded,
                e.last_modified,
                receipts,
                e.related_mileage_id.map(|id| id.to_string()),
            ],
        )?;
        info!(id = %e.id, amount = %e.amount, category = %e.category, "saved expense");
        Ok(e)
    }

    pub fn save_income(&self, income: &Income) -> Result<Income, StorageError> {
        let mut i = income.clone();
        i.last_modified = Utc::now();
        self.conn.execute(
            "INSERT INTO income(id, date, amount, tip_amount, source, notes, is_uploaded, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                 date=excluded.date, amount=excluded.amount, tip_amount=excluded.tip_amount,
                 source=excluded.source, notes=excluded.notes, is_uploaded=excluded.is_uploaded,
                 last_modified=excluded.last_modified",
            params![
                i.id.to_string(),
                i.date,
                i.amount.to_string(),
                i.tip_amount.to_string(),
                i.source.as_str(),
                i.notes,
                i.is_uploaded,
                i.last_modified,
            ],
        )?;
        info!(id = %i.id, total = %i.total_amount(), source = %i.source, "saved income");
        Ok(i)
    }

    /// Odometer readings, when both are present, overwrite the distance
    /// before the row is written.
    pub fn save_mileage(&self, mileage: &Mileage) -> Result<Mileage, StorageError> {
        let mut m = mileage.clone();
        m.resolve_distance();
        m.last_modified = Utc::now();
        self.conn.execute(
            "INSERT INTO mileage(id, date, start_mileage, end_mileage, distance, purpose,
                 is_tax_deductible, tax_deductible_percentage, related_fuel_expense_id,
                 is_uploaded, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(id) DO UPDATE SET
                 date=excluded.date, start_mileage=excluded.start_mileage,
                 end_mileage=excluded.end_mileage, distance=excluded.distance,
                 purpose=excluded.purpose, is_tax_deductible=excluded.is_tax_deductible,
                 tax_deductible_percentage=excluded.tax_deductible_percentage,
                 related_fuel_expense_id=excluded.related_fuel_expense_id,
                 is_uploaded=excluded.is_uploaded, last_modified=excluded.last_modified",
            params![
                m.id.to_string(),
                m.date,
                m.start_mileage,
                m.end_mileage,
                m.distance,
                m.purpose,
                m.is_tax_deductible,
                m.tax_deductible_percentage,
                m.related_fuel_expense_id.map(|id| id.to_string()),
                m.is_uploaded,
                m.last_modified,
            ],
        )?;
        info!(id = %m.id, distance = m.distance, "saved mileage");
        Ok(m)
    }

    /// Start and end times, when both are present, overwrite the total.
    pub fn save_work_hours(&self, work_hours: &WorkHours) -> Result<WorkHours, StorageError> {
        let mut w = work_hours.clone();
        w.resolve_total_hours();
        w.last_modified = Utc::now();
        self.conn.execute(
            "INSERT INTO work_hours(id, date, start_time, end_time, total_hours, notes,
                 is_uploaded, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                 date=excluded.date, start_time=excluded.start_time, end_time=excluded.end_time,
                 total_hours=excluded.total_hours, notes=excluded.notes,
                 is_uploaded=excluded.is_uploaded, last_modified=excluded.last_modified",
            params![
                w.id.to_string(),
                w.date,
                w.start_time,
                w.end_time,
                w.total_hours,
                w.notes,
                w.is_uploaded,
                w.last_modified,
            ],
        )?;
        info!(id = %w.id, hours = w.total_hours, "saved work hours");
        Ok(w)
    }
}

impl<T: Record> RecordQuery<T> for SqliteStore<'_> {
    fn get_all(&self) -> Result<Vec<T>, StorageError> {
        self.list()
    }

    fn get_by_date_range(&self, range: &DateRange) -> Result<Vec<T>, StorageError> {
        self.list_in_range(range)
    }
}
