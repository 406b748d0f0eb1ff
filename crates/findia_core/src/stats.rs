//! crates/findia_core/src/stats.rs
//!
//! Debt aggregation and payoff projection.
//!
//! Everything here is a pure function over a snapshot of records: no I/O, no shared
//! state, and the input is never mutated. Numeric edge cases (empty input, zero totals,
//! balances above the original amount) always produce defined numbers instead of errors.
//! Results that would overflow saturate at `f64::MAX`, so finite input never yields NaN.

use crate::domain::{DebtRecord, PaymentRecord};
use chrono::Datelike;
use std::collections::{BTreeMap, HashMap};

/// Category label used for debts without one.
pub const UNCATEGORIZED: &str = "Other";

/// Summary view over a set of debts. Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateStats {
    pub total_original_debt: f64,
    pub total_current_debt: f64,
    /// Negative when balances have grown past their original amounts.
    pub total_paid: f64,
    /// Share of the original total paid off. Not clamped to 0..=100.
    pub progress_percentage: f64,
    pub monthly_minimum_payment: f64,
    pub active_debt_count: usize,
    pub estimated_months_to_payoff: Option<u32>,
}

/// Per-category totals produced by [`distribute_by_category`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub category: String,
    pub total: f64,
    pub paid: f64,
    pub remaining: f64,
}

/// Clamps infinities to the largest finite values and maps NaN to zero.
fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(f64::MIN, f64::MAX)
    }
}

/// Sums in sorted order so the result is identical for every permutation of the input.
fn stable_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    saturate(values.into_iter().sum())
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        saturate(part / whole * 100.0)
    } else {
        0.0
    }
}

/// Aggregates totals, progress and the minimum-payment payoff projection.
pub fn compute_stats(debts: &[DebtRecord]) -> AggregateStats {
    let total_original_debt = stable_sum(debts.iter().map(|d| d.original_amount));
    let total_current_debt = stable_sum(debts.iter().map(|d| d.current_balance));
    let total_paid = saturate(total_original_debt - total_current_debt);
    let monthly_minimum_payment = stable_sum(debts.iter().map(|d| d.minimum_payment));

    AggregateStats {
        total_original_debt,
        total_current_debt,
        total_paid,
        progress_percentage: percentage(total_paid, total_original_debt),
        monthly_minimum_payment,
        active_debt_count: debts.iter().filter(|d| d.current_balance > 0.0).count(),
        estimated_months_to_payoff: estimate_months_to_payoff(
            total_current_debt,
            monthly_minimum_payment,
        ),
    }
}

/// Like [`compute_stats`], but projects payoff from the user's observed monthly payments
/// when there is any payment history.
pub fn compute_stats_with_payments(
    debts: &[DebtRecord],
    payments: &[PaymentRecord],
) -> AggregateStats {
    let mut stats = compute_stats(debts);
    if let Some(average) = average_monthly_payment(payments) {
        stats.estimated_months_to_payoff =
            estimate_months_to_payoff(stats.total_current_debt, average);
    }
    stats
}

/// Whole months needed to clear `total_current_debt` at a constant payment rate.
///
/// Interest is ignored on purpose: this is a flat, non-amortizing estimate.
/// Returns `None` when the payment rate is zero, negative or not a number, and when
/// the balance is not a number.
pub fn estimate_months_to_payoff(total_current_debt: f64, average_monthly_payment: f64) -> Option<u32> {
    if !(average_monthly_payment.is_finite() && average_monthly_payment > 0.0) {
        return None;
    }
    if total_current_debt.is_nan() {
        return None;
    }
    if total_current_debt <= 0.0 {
        return Some(0);
    }
    let months = (total_current_debt / average_monthly_payment).ceil();
    if months >= u32::MAX as f64 {
        Some(u32::MAX)
    } else {
        Some(months as u32)
    }
}

/// Groups debts by category. Missing or blank categories land in [`UNCATEGORIZED`].
///
/// Groups are returned in the order their category was first seen.
pub fn distribute_by_category(debts: &[DebtRecord]) -> Vec<CategoryBreakdown> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<&DebtRecord>> = HashMap::new();

    for debt in debts {
        let category = match debt.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => UNCATEGORIZED.to_string(),
        };
        grouped
            .entry(category.clone())
            .or_insert_with(|| {
                order.push(category);
                Vec::new()
            })
            .push(debt);
    }

    order
        .into_iter()
        .map(|category| {
            let members = grouped.remove(&category).unwrap_or_default();
            CategoryBreakdown {
                total: stable_sum(members.iter().map(|d| d.original_amount)),
                paid: stable_sum(
                    members
                        .iter()
                        .map(|d| saturate(d.original_amount - d.current_balance)),
                ),
                remaining: stable_sum(members.iter().map(|d| d.current_balance)),
                category,
            }
        })
        .collect()
}

/// Average of the per-calendar-month payment totals, over the months that saw a payment.
pub fn average_monthly_payment(payments: &[PaymentRecord]) -> Option<f64> {
    let mut by_month: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for payment in payments {
        by_month
            .entry((payment.date.year(), payment.date.month()))
            .or_default()
            .push(payment.amount);
    }
    if by_month.is_empty() {
        return None;
    }
    let months = by_month.len() as f64;
    let total = stable_sum(by_month.into_values().map(|amounts| stable_sum(amounts.into_iter())));
    Some(total / months)
}

/// Share of a single debt's original amount that has been paid off.
pub fn debt_progress_percentage(debt: &DebtRecord) -> f64 {
    percentage(debt.original_amount - debt.current_balance, debt.original_amount)
}

/// The `limit` newest payments, by payment date and then by creation time.
pub fn recent_payments(payments: &[PaymentRecord], limit: usize) -> Vec<PaymentRecord> {
    let mut sorted = payments.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    sorted.truncate(limit);
    sorted
}
