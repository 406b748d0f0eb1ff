//! crates/findia_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, so the backing store
//! (PostgreSQL, memory, a spreadsheet) and the suggestion engine can be swapped freely.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{DebtChanges, DebtRecord, NewDebt, NewPayment, PaymentRecord, User, UserCredentials};
use crate::insights::Suggestion;
use crate::rules::DomainError;
use crate::stats::AggregateStats;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<DomainError> for PortError {
    fn from(err: DomainError) -> Self {
        PortError::Invalid(err.to_string())
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Per-user storage of debts and payments.
///
/// Every method is scoped to `user_id`; records owned by someone else are reported
/// as `NotFound`.
#[async_trait]
pub trait DebtRepository: Send + Sync {
    async fn list_debts(&self, user_id: Uuid) -> PortResult<Vec<DebtRecord>>;

    async fn get_debt(&self, user_id: Uuid, debt_id: Uuid) -> PortResult<DebtRecord>;

    async fn create_debt(&self, user_id: Uuid, debt: NewDebt) -> PortResult<DebtRecord>;

    async fn update_debt(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
        changes: DebtChanges,
    ) -> PortResult<DebtRecord>;

    async fn delete_debt(&self, user_id: Uuid, debt_id: Uuid) -> PortResult<()>;

    async fn list_payments(&self, user_id: Uuid) -> PortResult<Vec<PaymentRecord>>;

    /// Stores the payment and lowers the debt's balance in one step.
    /// Implementations must use [`crate::rules::apply_payment`] to compute the new balance.
    async fn record_payment(&self, user_id: Uuid, payment: NewPayment) -> PortResult<PaymentRecord>;
}

/// Users and their browser login sessions.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create_user_with_email(&self, email: &str, hashed_password: &str) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the session's user, or `Unauthorized` when it is unknown or expired.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}

#[async_trait]
pub trait SuggestionService: Send + Sync {
    /// Produces coaching messages for a user's current debts.
    async fn suggest(&self, debts: &[DebtRecord], stats: &AggregateStats) -> PortResult<Vec<Suggestion>>;
}
