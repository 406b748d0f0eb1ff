//! services/api/src/web/payloads.rs
//!
//! JSON request and response bodies for the REST API, and their conversions to and
//! from the core domain types. Field names are camelCase on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use findia_core::{
    domain::{DebtChanges, DebtRecord, NewDebt, NewPayment, PaymentRecord, Priority},
    insights::Suggestion,
    stats::{debt_progress_percentage, AggregateStats, CategoryBreakdown},
};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Shared Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PriorityPayload {
    High,
    Medium,
    Low,
}

impl From<Priority> for PriorityPayload {
    fn from(p: Priority) -> Self {
        match p {
            Priority::High => PriorityPayload::High,
            Priority::Medium => PriorityPayload::Medium,
            Priority::Low => PriorityPayload::Low,
        }
    }
}

impl From<PriorityPayload> for Priority {
    fn from(p: PriorityPayload) -> Self {
        match p {
            PriorityPayload::High => Priority::High,
            PriorityPayload::Medium => Priority::Medium,
            PriorityPayload::Low => Priority::Low,
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Keeps an explicit `null` apart from a missing field: missing stays `None` through
/// `#[serde(default)]`, `null` becomes `Some(None)`.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

//=========================================================================================
// Debts
//=========================================================================================

/// A debt as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebtResponse {
    pub id: Uuid,
    pub name: String,
    pub original_amount: f64,
    pub current_balance: f64,
    pub minimum_payment: f64,
    pub interest_rate: f64,
    pub due_date: Option<NaiveDate>,
    pub priority: PriorityPayload,
    pub category: Option<String>,
    pub notes: Option<String>,
    /// Share of this debt's original amount that has been paid off.
    pub progress_percentage: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DebtRecord> for DebtResponse {
    fn from(d: DebtRecord) -> Self {
        Self {
            progress_percentage: debt_progress_percentage(&d),
            id: d.id,
            name: d.name,
            original_amount: d.original_amount,
            current_balance: d.current_balance,
            minimum_payment: d.minimum_payment,
            interest_rate: d.interest_rate,
            due_date: d.due_date,
            priority: d.priority.into(),
            category: d.category,
            notes: d.notes,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// The body of `POST /debts`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDebtRequest {
    pub name: String,
    #[serde(alias = "currentAmount")]
    pub current_balance: f64,
    pub original_amount: f64,
    pub minimum_payment: f64,
    #[serde(default)]
    pub interest_rate: f64,
    pub due_date: NaiveDate,
    pub priority: PriorityPayload,
    pub category: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CreateDebtRequest> for NewDebt {
    fn from(req: CreateDebtRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            original_amount: req.original_amount,
            current_balance: req.current_balance,
            minimum_payment: req.minimum_payment,
            interest_rate: req.interest_rate,
            due_date: Some(req.due_date),
            priority: req.priority.into(),
            category: non_blank(req.category),
            notes: req.notes.and_then(non_blank),
        }
    }
}

/// The body of `PUT /debts/{id}`. The original amount cannot be changed.
///
/// `dueDate`, `category` and `notes` may be sent as `null` to clear them.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateDebtRequest {
    pub name: Option<String>,
    #[serde(alias = "currentAmount")]
    pub current_balance: Option<f64>,
    pub minimum_payment: Option<f64>,
    pub interest_rate: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<NaiveDate>)]
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<PriorityPayload>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl From<UpdateDebtRequest> for DebtChanges {
    fn from(req: UpdateDebtRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            current_balance: req.current_balance,
            minimum_payment: req.minimum_payment,
            interest_rate: req.interest_rate,
            due_date: req.due_date,
            priority: req.priority.map(Into::into),
            category: req.category.map(|c| c.and_then(non_blank)),
            notes: req.notes.map(|n| n.and_then(non_blank)),
        }
    }
}

//=========================================================================================
// Payments
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: Uuid,
    pub debt_id: Uuid,
    pub amount: f64,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(p: PaymentRecord) -> Self {
        Self {
            id: p.id,
            debt_id: p.debt_id,
            amount: p.amount,
            date: p.date,
            notes: p.notes,
            created_at: p.created_at,
        }
    }
}

/// The body of `POST /payments`. `date` defaults to today.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub debt_id: Uuid,
    pub amount: f64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreatePaymentRequest {
    pub fn into_domain(self, today: NaiveDate) -> NewPayment {
        NewPayment {
            debt_id: self.debt_id,
            amount: self.amount,
            date: self.date.unwrap_or(today),
            notes: self.notes.and_then(non_blank),
        }
    }
}

//=========================================================================================
// Dashboard and Analytics
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_original_debt: f64,
    pub total_current_debt: f64,
    pub total_paid: f64,
    pub progress_percentage: f64,
    pub monthly_minimum_payment: f64,
    pub active_debt_count: usize,
    /// `null` when no payment rate is known.
    pub estimated_months_to_payoff: Option<u32>,
}

impl From<AggregateStats> for StatsResponse {
    fn from(s: AggregateStats) -> Self {
        Self {
            total_original_debt: s.total_original_debt,
            total_current_debt: s.total_current_debt,
            total_paid: s.total_paid,
            progress_percentage: s.progress_percentage,
            monthly_minimum_payment: s.monthly_minimum_payment,
            active_debt_count: s.active_debt_count,
            estimated_months_to_payoff: s.estimated_months_to_payoff,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: StatsResponse,
    pub debts: Vec<DebtResponse>,
    pub payments: Vec<PaymentResponse>,
    pub recent_payments: Vec<PaymentResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub category: String,
    pub total: f64,
    pub paid: f64,
    pub remaining: f64,
}

impl From<CategoryBreakdown> for CategoryResponse {
    fn from(c: CategoryBreakdown) -> Self {
        Self {
            category: c.category,
            total: c.total,
            paid: c.paid,
            remaining: c.remaining,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub kind: String,
    pub message: String,
}

impl From<Suggestion> for SuggestionResponse {
    fn from(s: Suggestion) -> Self {
        Self {
            kind: s.kind.as_str().to_string(),
            message: s.message,
        }
    }
}
