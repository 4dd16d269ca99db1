// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;

use crate::error::StorageError;
use crate::models::{Expense, Income, Mileage, WorkHours};
use crate::period::DateRange;

/// Read access to one kind of record.
pub trait RecordQuery<T> {
    fn get_all(&self) -> Result<Vec<T>, StorageError>;

    /// Records dated inside `range` (start inclusive, end exclusive).
    fn get_by_date_range(&self, range: &DateRange) -> Result<Vec<T>, StorageError>;
}

/// Everything the dashboard needs to read.
pub trait RecordGateway:
    RecordQuery<Expense> + RecordQuery<Income> + RecordQuery<Mileage> + RecordQuery<WorkHours>
{
}

impl<G> RecordGateway for G where
    G: RecordQuery<Expense>
        + RecordQuery<Income>
        + RecordQuery<Mileage>
        + RecordQuery<WorkHours>
{
}

/// Records that carry a calendar instant.
pub trait Dated {
    fn date(&self) -> NaiveDateTime;
}

impl Dated for Expense {
    fn date(&self) -> NaiveDateTime {
        self.date
    }
}

impl Dated for Income {
    fn date(&self) -> NaiveDateTime {
        self.date
    }
}

impl Dated for Mileage {
    fn date(&self) -> NaiveDateTime {
        self.date
    }
}

impl Dated for WorkHours {
    fn date(&self) -> NaiveDateTime {
        self.date
    }
}

/// Gateway over records already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub expenses: Vec<Expense>,
    pub income: Vec<Income>,
    pub mileage: Vec<Mileage>,
    pub work_hours: Vec<WorkHours>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn in_range<T: Dated + Clone>(items: &[T], range: &DateRange) -> Vec<T> {
    items
        .iter()
        .filter(|item| range.contains(item.date()))
        .cloned()
        .collect()
}

impl RecordQuery<Expense> for MemoryStore {
    fn get_all(&self) -> Result<Vec<Expense>, StorageError> {
        Ok(self.expenses.clone())
    }

    fn get_by_date_range(&self, range: &DateRange) -> Result<Vec<Expense>, StorageError> {
        Ok(in_range(&self.expenses, range))
    }
}

impl RecordQuery<Income> for MemoryStore {
    fn get_all(&self) -> Result<Vec<Income>, StorageError> {
        Ok(self.income.clone())
    }

    fn get_by_date_range(&self, range: &DateRange) -> Result<Vec<Income>, StorageError> {
        Ok(in_range(&self.income, range))
    }
}

impl RecordQuery<Mileage> for MemoryStore {
    fn get_all(&self) -> Result<Vec<Mileage>, StorageError> {
        Ok(self.mileage.clone())
    }

    fn get_by_date_range(&self, range: &DateRange) -> Result<Vec<Mileage>, StorageError> {
        Ok(in_range(&self.mileage, range))
    }
}

impl RecordQuery<WorkHours> for MemoryStore {
    fn get_all(&self) -> Result<Vec<WorkHours>, StorageError> {
        Ok(self.work_hours.clone())
    }

    fn get_by_date_range(&self, range: &DateRange) -> Result<Vec<WorkHours>, StorageError> {
        Ok(in_range(&self.work_hours, range))
    }
}
