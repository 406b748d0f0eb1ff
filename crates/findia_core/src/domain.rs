//! crates/findia_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How urgently the user wants a debt handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

/// A tracked liability owned by exactly one user.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Amount owed when the debt was created. Never changes afterwards.
    pub original_amount: f64,
    pub current_balance: f64,
    pub minimum_payment: f64,
    /// Annual rate, in percent.
    pub interest_rate: f64,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single payment made against a debt.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Lookup-only reference; the debt may since have been deleted.
    pub debt_id: Uuid,
    pub amount: f64,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to create a debt. Ids, owner and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDebt {
    pub name: String,
    pub original_amount: f64,
    pub current_balance: f64,
    pub minimum_payment: f64,
    pub interest_rate: f64,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub category: Option<String>,
    pub notes: Option<String>,
}

/// A partial update. `original_amount` is deliberately absent.
///
/// The optional fields are doubly wrapped: `None` leaves the field alone and
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtChanges {
    pub name: Option<String>,
    pub current_balance: Option<f64>,
    pub minimum_payment: Option<f64>,
    pub interest_rate: Option<f64>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub category: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl DebtChanges {
    /// Applies the present fields to `debt` and stamps `updated_at`.
    pub fn apply_to(self, debt: &mut DebtRecord, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            debt.name = name;
        }
        if let Some(balance) = self.current_balance {
            debt.current_balance = balance;
        }
        if let Some(minimum) = self.minimum_payment {
            debt.minimum_payment = minimum;
        }
        if let Some(rate) = self.interest_rate {
            debt.interest_rate = rate;
        }
        if let Some(due) = self.due_date {
            debt.due_date = due;
        }
        if let Some(priority) = self.priority {
            debt.priority = priority;
        }
        if let Some(category) = self.category {
            debt.category = category;
        }
        if let Some(notes) = self.notes {
            debt.notes = notes;
        }
        debt.updated_at = now;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub debt_id: Uuid,
    pub amount: f64,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
