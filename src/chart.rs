// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Expense, Income};
use crate::period::{DateRange, Period};

const WEEKDAY_LABELS: [&str; 7] = ["M", "T", "W", "T", "F", "S", "S"];
const MONTH_LABELS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const WEEKS_PER_MONTH: usize = 5;

/// Bar-chart series; `labels`, `income_data` and `expense_data` always have
/// the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub income_data: Vec<Decimal>,
    pub expense_data: Vec<Decimal>,
}

impl ChartData {
    fn empty(labels: Vec<String>) -> Self {
        let n = labels.len();
        ChartData {
            labels,
            income_data: vec![Decimal::ZERO; n],
            expense_data: vec![Decimal::ZERO; n],
        }
    }
}

pub fn bucket_count(period: Period) -> usize {
    match period {
        Period::Day => 24,
        Period::Week => 7,
        Period::Month => WEEKS_PER_MONTH,
        Period::Quarter => 3,
        Period::Year => 12,
    }
}

pub fn bucket_labels(period: Period, range: &DateRange) -> Vec<String> {
    match period {
        Period::Day => (0..24).map(|h| format!("{:02}", h)).collect(),
        Period::Week => WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect(),
        Period::Month => (1..=WEEKS_PER_MONTH).map(|w| format!("Week {}", w)).collect(),
        Period::Quarter | Period::Year => {
            let first = range.start.month0() as usize;
            (0..bucket_count(period))
                .map(|i| MONTH_LABELS[(first + i) % 12].to_string())
                .collect()
        }
    }
}

/// Bucket for a transaction dated `date`, clamped into the chart.
pub fn bucket_index(period: Period, range: &DateRange, date: chrono::NaiveDateTime) -> usize {
    let last = bucket_count(period) - 1;
    let raw = match period {
        Period::Day => date.hour() as i64,
        Period::Week => i64::from(date.weekday().num_days_from_monday()),
        Period::Month => (date - range.start).num_days() / 7,
        Period::Quarter | Period::Year => {
            let start_month = range.start.month0() as i64;
            (date.month0() as i64 - start_month + 12) % 12
        }
    };
    raw.clamp(0, last as i64) as usize
}

pub fn bucketize(
    period: Period,
    expenses: &[Expense],
    income: &[Income],
    range: &DateRange,
) -> ChartData {
    let mut chart = ChartData::empty(bucket_labels(period, range));
    for item in income {
        let idx = bucket_index(period, range, item.date);
        chart.income_data[idx] = chart.income_data[idx].saturating_add(item.total_amount());
    }
    for item in expenses {
        let idx = bucket_index(period, range, item.date);
        chart.expense_data[idx] = chart.expense_data[idx].saturating_add(item.amount);
    }
    chart
}
