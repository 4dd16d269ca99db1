// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar periods and the half-open ranges they cover.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

/// `[start, end)` in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        DateRange { start, end }
    }

    /// Whole days `from..=to`, as entered on the command line.
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange {
            start: from.and_time(NaiveTime::MIN),
            end: add_days(to, 1).and_time(NaiveTime::MIN),
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Day,
        Period::Week,
        Period::Month,
        Period::Quarter,
        Period::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Day => "Today",
            Period::Week => "This week",
            Period::Month => "This month",
            Period::Quarter => "This quarter",
            Period::Year => "This year",
        }
    }

    /// The period of this granularity containing `reference`.
    pub fn resolve(&self, reference: NaiveDateTime) -> DateRange {
        let day = reference.date();
        let start = match self {
            Period::Day => day,
            Period::Week => sub_days(day, i64::from(day.weekday().num_days_from_monday())),
            Period::Month => first_of_month(day),
            Period::Quarter => {
                let first = first_of_month(day);
                sub_months(first, day.month0() % 3)
            }
            Period::Year => sub_days(day, i64::from(day.ordinal0())),
        };
        let end = self.step_forward(start);
        DateRange::new(start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN))
    }

    /// The range one unit earlier than `range`. Months, quarters and years
    /// move by calendar months, never by a fixed number of days.
    pub fn previous(&self, range: &DateRange) -> DateRange {
        DateRange::new(self.step_back(range.start), self.step_back(range.end))
    }

    fn step_forward(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => add_days(date, 1),
            Period::Week => add_days(date, 7),
            Period::Month => add_months(date, 1),
            Period::Quarter => add_months(date, 3),
            Period::Year => add_months(date, 12),
        }
    }

    fn step_back(&self, instant: NaiveDateTime) -> NaiveDateTime {
        let date = match self {
            Period::Day => sub_days(instant.date(), 1),
            Period::Week => sub_days(instant.date(), 7),
            Period::Month => sub_months(instant.date(), 1),
            Period::Quarter => sub_months(instant.date(), 3),
            Period::Year => sub_months(instant.date(), 12),
        };
        date.and_time(instant.time())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| ParseError::unknown("period", s))
    }
}

// Calendar helpers saturate at chrono's representable range.

fn first_of_month(date: NaiveDate) -> NaiveDate {
    sub_days(date, i64::from(date.day0()))
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MAX)
}

fn sub_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_sub_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MIN)
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}
