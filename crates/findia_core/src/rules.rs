//! crates/findia_core/src/rules.rs
//!
//! Input validation and payment application.
//!
//! The aggregator itself accepts any numbers. These checks run where user input
//! enters the system: creating or editing a debt, and applying a payment to it.

use crate::domain::{DebtChanges, DebtRecord, NewDebt};

/// Largest amount or rate accepted from user input. Keeps every aggregate finite.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// A violation of a domain rule. Always caused by the caller's input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Payment of {amount:.2} exceeds the remaining balance of {balance:.2}")]
    Overpayment { amount: f64, balance: f64 },
}

fn non_negative(field: &'static str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() {
        return Err(DomainError::InvalidField {
            field,
            reason: "must be a finite number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(DomainError::InvalidField {
            field,
            reason: "must not be negative".to_string(),
        });
    }
    if value > MAX_AMOUNT {
        return Err(DomainError::InvalidField {
            field,
            reason: format!("must not exceed {}", MAX_AMOUNT),
        });
    }
    Ok(())
}

fn non_blank(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Checks a new debt before it is stored.
///
/// A current balance above the original amount is accepted: users track interest
/// and extra borrowing on the same debt.
pub fn validate_new_debt(debt: &NewDebt) -> Result<(), DomainError> {
    non_blank("name", &debt.name)?;
    non_negative("originalAmount", debt.original_amount)?;
    non_negative("currentBalance", debt.current_balance)?;
    non_negative("minimumPayment", debt.minimum_payment)?;
    non_negative("interestRate", debt.interest_rate)?;
    Ok(())
}

/// Same rules as [`validate_new_debt`], for the fields that are present.
pub fn validate_changes(changes: &DebtChanges) -> Result<(), DomainError> {
    if let Some(name) = &changes.name {
        non_blank("name", name)?;
    }
    if let Some(balance) = changes.current_balance {
        non_negative("currentBalance", balance)?;
    }
    if let Some(minimum) = changes.minimum_payment {
        non_negative("minimumPayment", minimum)?;
    }
    if let Some(rate) = changes.interest_rate {
        non_negative("interestRate", rate)?;
    }
    Ok(())
}

/// Returns the balance left on `debt` after paying `amount`.
pub fn apply_payment(debt: &DebtRecord, amount: f64) -> Result<f64, DomainError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DomainError::InvalidField {
            field: "amount",
            reason: "must be greater than zero".to_string(),
        });
    }
    if amount > debt.current_balance {
        return Err(DomainError::Overpayment {
            amount,
            balance: debt.current_balance,
        });
    }
    Ok(debt.current_balance - amount)
}
