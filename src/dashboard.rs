// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::analytics::{self, CurrentRecords, DashboardMetrics, DashboardSummary, PreviousRecords};
use crate::chart::{self, ChartData};
use crate::error::StorageError;
use crate::gateway::{RecordGateway, RecordQuery};
use crate::models::{Expense, Income, Mileage, WorkHours};
use crate::period::{DateRange, Period};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub period: Period,
    pub range: DateRange,
    pub previous_range: DateRange,
    pub summary: DashboardSummary,
    pub metrics: DashboardMetrics,
    pub chart: ChartData,
}

/// Loads the four current collections and the two previous ones. Any failed
/// fetch aborts the whole load.
pub fn fetch_records<G>(
    gateway: &G,
    current: &DateRange,
    previous: &DateRange,
) -> Result<(CurrentRecords, PreviousRecords), StorageError>
where
    G: RecordGateway + ?Sized,
{
    let now = CurrentRecords {
        expenses: RecordQuery::<Expense>::get_by_date_range(gateway, current)?,
        income: RecordQuery::<Income>::get_by_date_range(gateway, current)?,
        mileage: RecordQuery::<Mileage>::get_by_date_range(gateway, current)?,
        work_hours: RecordQuery::<WorkHours>::get_by_date_range(gateway, current)?,
    };
    let before = PreviousRecords {
        expenses: RecordQuery::<Expense>::get_by_date_range(gateway, previous)?,
        income: RecordQuery::<Income>::get_by_date_range(gateway, previous)?,
    };
    Ok((now, before))
}

/// Reduces fetched records into the dashboard result. Pure.
pub fn build_dashboard(
    period: Period,
    range: DateRange,
    previous_range: DateRange,
    current: &CurrentRecords,
    previous: &PreviousRecords,
) -> DashboardData {
    let agg = analytics::aggregate(current, previous);
    let chart = chart::bucketize(period, &current.expenses, &current.income, &range);
    DashboardData {
        period,
        range,
        previous_range,
        summary: agg.summary,
        metrics: agg.metrics,
        chart,
    }
}

/// Dashboard for the `period` containing `reference` (now, when `None`).
pub fn compute_dashboard<G>(
    gateway: &G,
    period: Period,
    reference: Option<NaiveDateTime>,
) -> Result<DashboardData, StorageError>
where
    G: RecordGateway + ?Sized,
{
    let reference = reference.unwrap_or_else(|| Local::now().naive_local());
    let range = period.resolve(reference);
    let previous_range = period.previous(&range);
    debug!(%period, %range, previous = %previous_range, "computing dashboard");

    let (current, previous) = fetch_records(gateway, &range, &previous_range)?;
    debug!(
        expenses = current.expenses.len(),
        income = current.income.len(),
        mileage = current.mileage.len(),
        work_hours = current.work_hours.len(),
        "fetched current period"
    );
    Ok(build_dashboard(period, range, previous_range, &current, &previous))
}
