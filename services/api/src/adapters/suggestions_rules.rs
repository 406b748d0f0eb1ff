//! services/api/src/adapters/suggestions_rules.rs
//!
//! A `SuggestionService` that needs no network: it runs the core insight rules
//! against today's date.

use async_trait::async_trait;
use chrono::Utc;
use findia_core::domain::DebtRecord;
use findia_core::insights::{self, Suggestion};
use findia_core::ports::{PortResult, SuggestionService};
use findia_core::stats::AggregateStats;

#[derive(Clone, Default)]
pub struct RuleBasedSuggestionAdapter;

impl RuleBasedSuggestionAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SuggestionService for RuleBasedSuggestionAdapter {
    async fn suggest(&self, debts: &[DebtRecord], stats: &AggregateStats) -> PortResult<Vec<Suggestion>> {
        Ok(insights::suggest(debts, stats, Utc::now().date_naive()))
    }
}
