// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period totals and derived metrics. Everything here is a pure reduction
//! over already-fetched records; malformed values are summed as they are.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Expense, ExpenseCategory, Income, Mileage, WorkHours};

/// Records dated inside the period being reported.
#[derive(Debug, Clone, Default)]
pub struct CurrentRecords {
    pub expenses: Vec<Expense>,
    pub income: Vec<Income>,
    pub mileage: Vec<Mileage>,
    pub work_hours: Vec<WorkHours>,
}

/// Records from the preceding period; only money flows are compared.
#[derive(Debug, Clone, Default)]
pub struct PreviousRecords {
    pub expenses: Vec<Expense>,
    pub income: Vec<Income>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_income: Decimal,
    pub income_change_percent: Option<Decimal>,
    pub expense_change_percent: Option<Decimal>,
    pub net_income_change_percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub hourly_rate: Decimal,
    pub cost_per_mile: Decimal,
    pub total_mileage: f64,
    pub total_work_hours: f64,
    pub total_tax_deductible: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub summary: DashboardSummary,
    pub metrics: DashboardMetrics,
}

/// Sum of money values. Saturates at the `Decimal` bounds instead of
/// panicking, so malformed records still produce a total.
pub fn sum_money<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

pub fn total_expense(expenses: &[Expense]) -> Decimal {
    sum_money(expenses.iter().map(|e| e.amount))
}

pub fn total_income(income: &[Income]) -> Decimal {
    sum_money(income.iter().map(Income::total_amount))
}

pub fn total_tips(income: &[Income]) -> Decimal {
    sum_money(income.iter().map(|i| i.tip_amount))
}

pub fn total_mileage(mileage: &[Mileage]) -> f64 {
    mileage.iter().map(|m| m.distance).sum()
}

pub fn total_work_hours(work_hours: &[WorkHours]) -> f64 {
    work_hours.iter().map(|w| w.total_hours).sum()
}

pub fn total_fuel_cost(expenses: &[Expense]) -> Decimal {
    sum_money(
        expenses
            .iter()
            .filter(|e| e.category == ExpenseCategory::Fuel)
            .map(|e| e.amount),
    )
}

/// `part / whole` in percent, zero when `whole` is not positive or the
/// ratio does not fit.
fn share_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part.checked_div(whole)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

/// Relative change in percent. `None` when the baseline is zero, or when
/// the result does not fit a `Decimal`.
pub fn percent_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// `amount / quantity`, or zero when the quantity is not positive.
fn rate_per(amount: Decimal, quantity: f64) -> Decimal {
    if quantity > 0.0 {
        Decimal::try_from(quantity)
            .ok()
            .and_then(|q| amount.checked_div(q))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

pub fn aggregate(current: &CurrentRecords, previous: &PreviousRecords) -> Aggregation {
    let total_expense_now = total_expense(&current.expenses);
    let total_income_now = total_income(&current.income);
    let net_income = total_income_now.saturating_sub(total_expense_now);

    let total_expense_before = total_expense(&previous.expenses);
    let total_income_before = total_income(&previous.income);
    let net_income_before = total_income_before.saturating_sub(total_expense_before);

    let mileage = total_mileage(&current.mileage);
    let hours = total_work_hours(&current.work_hours);

    // All income in the period counts, not only income from logged shifts.
    let hourly_rate = rate_per(total_income_now, hours);
    let cost_per_mile = rate_per(total_fuel_cost(&current.expenses), mileage);

    let total_tax_deductible =
        sum_money(current.expenses.iter().map(Expense::tax_deductible_amount));

    Aggregation {
        summary: DashboardSummary {
            total_income: total_income_now,
            total_expense: total_expense_now,
            net_income,
            income_change_percent: percent_change(total_income_now, total_income_before),
            expense_change_percent: percent_change(total_expense_now, total_expense_before),
            net_income_change_percent: percent_change(net_income, net_income_before),
        },
        metrics: DashboardMetrics {
            hourly_rate,
            cost_per_mile,
            total_mileage: mileage,
            total_work_hours: hours,
            total_tax_deductible,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseAnalytics {
    pub total_expense: Decimal,
    pub total_tax_deductible: Decimal,
    pub by_category: BTreeMap<ExpenseCategory, Decimal>,
}

impl ExpenseAnalytics {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut by_category = BTreeMap::new();
        for e in expenses {
            let slot = by_category.entry(e.category).or_insert(Decimal::ZERO);
            *slot = slot.saturating_add(e.amount);
        }
        ExpenseAnalytics {
            total_expense: total_expense(expenses),
            total_tax_deductible: sum_money(expenses.iter().map(Expense::tax_deductible_amount)),
            by_category,
        }
    }

    /// Deductible part of total spend, in percent.
    pub fn tax_deductible_share(&self) -> Decimal {
        share_of(self.total_tax_deductible, self.total_expense)
    }

    /// Categories by amount, largest first.
    pub fn top_categories(&self) -> Vec<(ExpenseCategory, Decimal)> {
        let mut items: Vec<_> = self.by_category.iter().map(|(c, a)| (*c, *a)).collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        items
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MileageCost {
    pub total_mileage: f64,
    pub total_fuel_cost: Decimal,
    pub cost_per_mile: Decimal,
    pub tax_deductible_mileage: f64,
}

impl MileageCost {
    pub fn from_records(mileage: &[Mileage], expenses: &[Expense]) -> Self {
        let total = total_mileage(mileage);
        let fuel = total_fuel_cost(expenses);
        MileageCost {
            total_mileage: total,
            total_fuel_cost: fuel,
            cost_per_mile: rate_per(fuel, total),
            tax_deductible_mileage: mileage.iter().map(Mileage::tax_deductible_mileage).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRateAnalytics {
    pub total_hours: f64,
    pub total_income: Decimal,
    pub total_tips: Decimal,
    pub hourly_rate: Decimal,
    pub hourly_rate_without_tips: Decimal,
}

impl HourlyRateAnalytics {
    pub fn from_records(work_hours: &[WorkHours], income: &[Income]) -> Self {
        let hours = total_work_hours(work_hours);
        let gross = total_income(income);
        let tips = total_tips(income);
        HourlyRateAnalytics {
            total_hours: hours,
            total_income: gross,
            total_tips: tips,
            hourly_rate: rate_per(gross, hours),
            hourly_rate_without_tips: rate_per(gross.saturating_sub(tips), hours),
        }
    }

    pub fn tips_share(&self) -> Decimal {
        share_of(self.total_tips, self.total_income)
    }
}
