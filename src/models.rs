// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Fuel,
    Insurance,
    Maintenance,
    Tax,
    License,
    Parking,
    Toll,
    Cleaning,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Fuel,
        ExpenseCategory::Insurance,
        ExpenseCategory::Maintenance,
        ExpenseCategory::Tax,
        ExpenseCategory::License,
        ExpenseCategory::Parking,
        ExpenseCategory::Toll,
        ExpenseCategory::Cleaning,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Fuel => "fuel",
            ExpenseCategory::Insurance => "insurance",
            ExpenseCategory::Maintenance => "maintenance",
            ExpenseCategory::Tax => "tax",
            ExpenseCategory::License => "license",
            ExpenseCategory::Parking => "parking",
            ExpenseCategory::Toll => "toll",
            ExpenseCategory::Cleaning => "cleaning",
            ExpenseCategory::Other => "other",
        }
    }

    /// Whether expenses in this category are normally deductible for a
    /// vehicle used for hire. Used as the default for new entries.
    pub fn usually_tax_deductible(&self) -> bool {
        matches!(
            self,
            ExpenseCategory::Fuel
                | ExpenseCategory::Insurance
                | ExpenseCategory::Maintenance
                | ExpenseCategory::Tax
                | ExpenseCategory::License
                | ExpenseCategory::Toll
        )
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ParseError::unknown("expense category", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreationMethod {
    Manual,
    Ocr,
}

impl CreationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationMethod::Manual => "manual",
            CreationMethod::Ocr => "ocr",
        }
    }
}

impl fmt::Display for CreationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreationMethod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(CreationMethod::Manual),
            "ocr" => Ok(CreationMethod::Ocr),
            _ => Err(ParseError::unknown("creation method", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeSource {
    Uber,
    Bolt,
    FreeNow,
    Cash,
    Other,
}

impl IncomeSource {
    pub const ALL: [IncomeSource; 5] = [
        IncomeSource::Uber,
        IncomeSource::Bolt,
        IncomeSource::FreeNow,
        IncomeSource::Cash,
        IncomeSource::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeSource::Uber => "uber",
            IncomeSource::Bolt => "bolt",
            IncomeSource::FreeNow => "freenow",
            IncomeSource::Cash => "cash",
            IncomeSource::Other => "other",
        }
    }
}

impl fmt::Display for IncomeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncomeSource {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        IncomeSource::ALL
            .into_iter()
            .find(|src| src.as_str() == needle)
            .ok_or_else(|| ParseError::unknown("income source", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub date: NaiveDateTime,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub is_tax_deductible: bool,
    pub tax_deductible_percentage: i32, // 0-100, not clamped
    pub creation_method: CreationMethod,
    pub is_uploaded: bool,
    pub last_modified: DateTime<Utc>,
    pub receipt_ids: Option<Vec<Uuid>>,
    pub related_mileage_id: Option<Uuid>,
}

impl Expense {
    /// A manual entry with a fresh id, fully deductible when the category
    /// usually is.
    pub fn new(date: NaiveDateTime, amount: Decimal, category: ExpenseCategory) -> Self {
        Expense {
            id: Uuid::new_v4(),
            date,
            amount,
            category,
            description: None,
            is_tax_deductible: category.usually_tax_deductible(),
            tax_deductible_percentage: 100,
            creation_method: CreationMethod::Manual,
            is_uploaded: false,
            last_modified: Utc::now(),
            receipt_ids: None,
            related_mileage_id: None,
        }
    }

    pub fn tax_deductible_amount(&self) -> Decimal {
        if self.is_tax_deductible {
            self.amount
                .saturating_mul(Decimal::from(self.tax_deductible_percentage))
                / Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub date: NaiveDateTime,
    pub amount: Decimal,
    pub tip_amount: Decimal,
    pub source: IncomeSource,
    pub notes: Option<String>,
    pub is_uploaded: bool,
    pub last_modified: DateTime<Utc>,
}

impl Income {
    pub fn new(date: NaiveDateTime, amount: Decimal, tip_amount: Decimal, source: IncomeSource) -> Self {
        Income {
            id: Uuid::new_v4(),
            date,
            amount,
            tip_amount,
            source,
            notes: None,
            is_uploaded: false,
            last_modified: Utc::now(),
        }
    }

    /// Fare plus tip, saturating at the `Decimal` bounds.
    pub fn total_amount(&self) -> Decimal {
        self.amount.saturating_add(self.tip_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mileage {
    pub id: Uuid,
    pub date: NaiveDateTime,
    pub start_mileage: Option<f64>,
    pub end_mileage: Option<f64>,
    pub distance: f64,
    pub purpose: Option<String>,
    pub is_tax_deductible: bool,
    pub tax_deductible_percentage: i32,
    pub related_fuel_expense_id: Option<Uuid>,
    pub is_uploaded: bool,
    pub last_modified: DateTime<Utc>,
}

impl Mileage {
    pub fn new(date: NaiveDateTime, distance: f64) -> Self {
        Mileage {
            id: Uuid::new_v4(),
            date,
            start_mileage: None,
            end_mileage: None,
            distance,
            purpose: None,
            is_tax_deductible: true,
            tax_deductible_percentage: 100,
            related_fuel_expense_id: None,
            is_uploaded: false,
            last_modified: Utc::now(),
        }
    }

    /// Trip recorded from odometer readings; distance is derived.
    pub fn from_odometer(date: NaiveDateTime, start: f64, end: f64) -> Self {
        let mut m = Mileage::new(date, 0.0);
        m.start_mileage = Some(start);
        m.end_mileage = Some(end);
        m.resolve_distance();
        m
    }

    pub fn tax_deductible_mileage(&self) -> f64 {
        if self.is_tax_deductible {
            self.distance * f64::from(self.tax_deductible_percentage) / 100.0
        } else {
            0.0
        }
    }

    /// Odometer readings win over a stored distance when both are present.
    pub fn resolve_distance(&mut self) {
        if let (Some(start), Some(end)) = (self.start_mileage, self.end_mileage) {
            self.distance = end - start;
        }
    }

    /// Distance implied by the odometer readings, if both were recorded.
    pub fn odometer_distance(&self) -> Option<f64> {
        match (self.start_mileage, self.end_mileage) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkHours {
    pub id: Uuid,
    pub date: NaiveDateTime,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub total_hours: f64,
    pub notes: Option<String>,
    pub is_uploaded: bool,
    pub last_modified: DateTime<Utc>,
}

impl WorkHours {
    pub fn new(date: NaiveDateTime, total_hours: f64) -> Self {
        WorkHours {
            id: Uuid::new_v4(),
            date,
            start_time: None,
            end_time: None,
            total_hours,
            notes: None,
            is_uploaded: false,
            last_modified: Utc::now(),
        }
    }

    /// Shift recorded by clock times; the shift is dated by its start.
    pub fn from_shift(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let mut wh = WorkHours::new(start, 0.0);
        wh.start_time = Some(start);
        wh.end_time = Some(end);
        wh.resolve_total_hours();
        wh
    }

    pub fn resolve_total_hours(&mut self) {
        if let Some(hours) = self.shift_hours() {
            self.total_hours = hours;
        }
    }

    /// Whole hours plus whole minutes between start and end; seconds are
    /// dropped.
    pub fn shift_hours(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                let minutes = (end - start).num_minutes();
                Some((minutes / 60) as f64 + (minutes % 60) as f64 / 60.0)
            }
            _ => None,
        }
    }

    /// `"{h}h {mm}m"`, truncated to the whole minute.
    pub fn formatted_total_hours(&self) -> String {
        // The nudge keeps exact minutes such as 80/60 h from reading as 79.
        let minutes = (self.total_hours.abs() * 60.0 + 1e-9).trunc() as i64;
        let sign = if self.total_hours < 0.0 && minutes > 0 { "-" } else { "" };
        format!("{}{}h {:02}m", sign, minutes / 60, minutes % 60)
    }
}
