//! crates/findia_core/src/insights.rs
//!
//! Rule-based coaching messages shown next to the dashboard.

use crate::domain::DebtRecord;
use crate::stats::AggregateStats;
use chrono::NaiveDate;

/// Progress thresholds that earn a milestone message, highest first.
const MILESTONES: [f64; 3] = [75.0, 50.0, 25.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    GetStarted,
    Celebrate,
    Milestone,
    Overdue,
    /// Pay the highest interest rate first.
    Avalanche,
    /// Pay the smallest balance first.
    Snowball,
    Projection,
    /// Free-form advice produced by a language model.
    Coaching,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::GetStarted => "get_started",
            SuggestionKind::Celebrate => "celebrate",
            SuggestionKind::Milestone => "milestone",
            SuggestionKind::Overdue => "overdue",
            SuggestionKind::Avalanche => "avalanche",
            SuggestionKind::Snowball => "snowball",
            SuggestionKind::Projection => "projection",
            SuggestionKind::Coaching => "coaching",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
}

impl Suggestion {
    fn new(kind: SuggestionKind, message: String) -> Self {
        Self { kind, message }
    }
}

/// Builds suggestions for the given snapshot. `today` decides which debts are overdue.
pub fn suggest(debts: &[DebtRecord], stats: &AggregateStats, today: NaiveDate) -> Vec<Suggestion> {
    if debts.is_empty() {
        return vec![Suggestion::new(
            SuggestionKind::GetStarted,
            "Add your first debt to start tracking your path to zero.".to_string(),
        )];
    }

    let active: Vec<&DebtRecord> = debts.iter().filter(|d| d.current_balance > 0.0).collect();
    if active.is_empty() {
        return vec![Suggestion::new(
            SuggestionKind::Celebrate,
            format!(
                "Every tracked debt is paid off. You cleared {:.2} in total!",
                stats.total_paid
            ),
        )];
    }

    let mut out = Vec::new();

    for debt in &active {
        if let Some(due) = debt.due_date {
            if due < today {
                out.push(Suggestion::new(
                    SuggestionKind::Overdue,
                    format!(
                        "'{}' was due on {}. Make at least the minimum payment of {:.2} to avoid fees.",
                        debt.name, due, debt.minimum_payment
                    ),
                ));
            }
        }
    }

    if let Some(milestone) = MILESTONES.iter().find(|m| stats.progress_percentage >= **m) {
        out.push(Suggestion::new(
            SuggestionKind::Milestone,
            format!(
                "You've paid off over {:.0}% of your debt. Keep the momentum going!",
                milestone
            ),
        ));
    }

    if let Some(costliest) = active
        .iter()
        .filter(|d| d.interest_rate > 0.0)
        .max_by(|a, b| a.interest_rate.total_cmp(&b.interest_rate))
    {
        out.push(Suggestion::new(
            SuggestionKind::Avalanche,
            format!(
                "'{}' charges the highest rate ({:.1}%). Extra money there saves the most interest.",
                costliest.name, costliest.interest_rate
            ),
        ));
    }

    if active.len() >= 2 {
        if let Some(smallest) = active
            .iter()
            .min_by(|a, b| a.current_balance.total_cmp(&b.current_balance))
        {
            out.push(Suggestion::new(
                SuggestionKind::Snowball,
                format!(
                    "'{}' has the smallest balance ({:.2}). Clearing it first is a quick win.",
                    smallest.name, smallest.current_balance
                ),
            ));
        }
    }

    if let Some(months) = stats.estimated_months_to_payoff {
        out.push(Suggestion::new(
            SuggestionKind::Projection,
            format!(
                "At your current pace you could be debt-free in about {} month{}.",
                months,
                if months == 1 { "" } else { "s" }
            ),
        ));
    }

    out
}
