//! services/api/src/adapters/suggestions_llm.rs
//!
//! This module contains the adapter for the coaching LLM.
//! It implements the `SuggestionService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use findia_core::{
    domain::DebtRecord,
    insights::{Suggestion, SuggestionKind},
    ports::{PortError, PortResult, SuggestionService},
    stats::AggregateStats,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

const SYSTEM_INSTRUCTIONS: &str = "You are an upbeat personal-finance coach inside a debt payoff tracker. \
Given a summary of the user's debts, reply with two to four short, concrete suggestions, one per line. \
Be encouraging, mention debts by name when useful, and never invent numbers that are not in the summary. \
Do not add headings or closing remarks.";

/// Leading list markers the model tends to add: "-", "*", "•", "1.", "2)".
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s*").expect("list marker pattern is valid"));

/// Suggestions beyond this count are dropped.
const MAX_SUGGESTIONS: usize = 4;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SuggestionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSuggestionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSuggestionAdapter {
    /// Creates a new `OpenAiSuggestionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// Renders the snapshot the model is asked to comment on.
pub fn build_summary(debts: &[DebtRecord], stats: &AggregateStats) -> String {
    let mut summary = format!(
        "Total original debt: {:.2}\nTotal remaining: {:.2}\nPaid so far: {:.2} ({:.1}%)\n\
         Monthly minimum payments: {:.2}\nActive debts: {}\n",
        stats.total_original_debt,
        stats.total_current_debt,
        stats.total_paid,
        stats.progress_percentage,
        stats.monthly_minimum_payment,
        stats.active_debt_count,
    );
    match stats.estimated_months_to_payoff {
        Some(months) => {
            let _ = writeln!(summary, "Estimated months to payoff: {}", months);
        }
        None => summary.push_str("Estimated months to payoff: unknown\n"),
    }

    summary.push_str("Debts:\n");
    for debt in debts {
        let _ = writeln!(
            summary,
            "- {} ({}, {} priority): balance {:.2} of {:.2}, {:.1}% interest, minimum {:.2}{}",
            debt.name,
            debt.category.as_deref().unwrap_or("uncategorized"),
            debt.priority,
            debt.current_balance,
            debt.original_amount,
            debt.interest_rate,
            debt.minimum_payment,
            debt.due_date
                .map(|d| format!(", due {}", d))
                .unwrap_or_default(),
        );
    }
    summary
}

/// Splits the model's reply into one suggestion per non-empty line.
pub fn parse_suggestions(reply: &str) -> Vec<Suggestion> {
    reply
        .lines()
        .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(|message| Suggestion {
            kind: SuggestionKind::Coaching,
            message,
        })
        .collect()
}

//=========================================================================================
// `SuggestionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SuggestionService for OpenAiSuggestionAdapter {
    async fn suggest(&self, debts: &[DebtRecord], stats: &AggregateStats) -> PortResult<Vec<Suggestion>> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(build_summary(debts, stats))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Suggestion LLM response contained no text content.".to_string())
            })?;

        let suggestions = parse_suggestions(&content);
        if suggestions.is_empty() {
            return Err(PortError::Unexpected(
                "Suggestion LLM returned an empty reply.".to_string(),
            ));
        }
        Ok(suggestions)
    }
}
