//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DebtRepository` and `AccountRepository` ports from the `core` crate. It
//! handles all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use findia_core::domain::{
    DebtChanges, DebtRecord, NewDebt, NewPayment, PaymentRecord, Priority, User, UserCredentials,
};
use findia_core::ports::{AccountRepository, DebtRepository, PortError, PortResult};
use findia_core::rules;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

const DEBT_COLUMNS: &str = "id, user_id, name, original_amount, current_balance, minimum_payment, \
     interest_rate, due_date, priority, category, notes, created_at, updated_at";

const PAYMENT_COLUMNS: &str = "id, user_id, debt_id, amount, date, notes, created_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the repository ports on PostgreSQL.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    async fn lock_debt(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        debt_id: Uuid,
    ) -> PortResult<DebtRecord> {
        let query = format!(
            "SELECT {} FROM debts WHERE id = $1 AND user_id = $2 FOR UPDATE",
            DEBT_COLUMNS
        );
        let record = sqlx::query_as::<_, DebtRow>(&query)
            .bind(debt_id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| debt_not_found(debt_id))?;
        record.to_domain()
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn debt_not_found(debt_id: Uuid) -> PortError {
    PortError::NotFound(format!("Debt {} not found", debt_id))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct DebtRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    original_amount: f64,
    current_balance: f64,
    minimum_payment: f64,
    interest_rate: f64,
    due_date: Option<NaiveDate>,
    priority: String,
    category: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl DebtRow {
    fn to_domain(self) -> PortResult<DebtRecord> {
        let priority = self.priority.parse::<Priority>().map_err(|e| {
            warn!("Debt {} has an unreadable priority: {}", self.id, e);
            PortError::Unexpected(e)
        })?;
        Ok(DebtRecord {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            original_amount: self.original_amount,
            current_balance: self.current_balance,
            minimum_payment: self.minimum_payment,
            interest_rate: self.interest_rate,
            due_date: self.due_date,
            priority,
            category: self.category,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct PaymentRow {
    id: Uuid,
    user_id: Uuid,
    debt_id: Uuid,
    amount: f64,
    date: NaiveDate,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}
impl PaymentRow {
    fn to_domain(self) -> PaymentRecord {
        PaymentRecord {
            id: self.id,
            user_id: self.user_id,
            debt_id: self.debt_id,
            amount: self.amount,
            date: self.date,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}

//=========================================================================================
// `DebtRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl DebtRepository for DbAdapter {
    async fn list_debts(&self, user_id: Uuid) -> PortResult<Vec<DebtRecord>> {
        let query = format!(
            "SELECT {} FROM debts WHERE user_id = $1 ORDER BY created_at ASC",
            DEBT_COLUMNS
        );
        let records = sqlx::query_as::<_, DebtRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_debt(&self, user_id: Uuid, debt_id: Uuid) -> PortResult<DebtRecord> {
        let query = format!("SELECT {} FROM debts WHERE id = $1 AND user_id = $2", DEBT_COLUMNS);
        sqlx::query_as::<_, DebtRow>(&query)
            .bind(debt_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| debt_not_found(debt_id))?
            .to_domain()
    }

    async fn create_debt(&self, user_id: Uuid, debt: NewDebt) -> PortResult<DebtRecord> {
        rules::validate_new_debt(&debt)?;
        let now = Utc::now();
        let query = format!(
            "INSERT INTO debts ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12) \
             RETURNING {}",
            DEBT_COLUMNS, DEBT_COLUMNS
        );
        sqlx::query_as::<_, DebtRow>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&debt.name)
            .bind(debt.original_amount)
            .bind(debt.current_balance)
            .bind(debt.minimum_payment)
            .bind(debt.interest_rate)
            .bind(debt.due_date)
            .bind(debt.priority.as_str())
            .bind(&debt.category)
            .bind(&debt.notes)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?
            .to_domain()
    }

    async fn update_debt(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
        changes: DebtChanges,
    ) -> PortResult<DebtRecord> {
        rules::validate_changes(&changes)?;
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let mut debt = Self::lock_debt(&mut tx, user_id, debt_id).await?;
        changes.apply_to(&mut debt, Utc::now());

        sqlx::query(
            "UPDATE debts SET name = $1, current_balance = $2, minimum_payment = $3, \
             interest_rate = $4, due_date = $5, priority = $6, category = $7, notes = $8, \
             updated_at = $9 WHERE id = $10",
        )
        .bind(&debt.name)
        .bind(debt.current_balance)
        .bind(debt.minimum_payment)
        .bind(debt.interest_rate)
        .bind(debt.due_date)
        .bind(debt.priority.as_str())
        .bind(&debt.category)
        .bind(&debt.notes)
        .bind(debt.updated_at)
        .bind(debt.id)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(debt)
    }

    async fn delete_debt(&self, user_id: Uuid, debt_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM debts WHERE id = $1 AND user_id = $2")
            .bind(debt_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(debt_not_found(debt_id));
        }
        Ok(())
    }

    async fn list_payments(&self, user_id: Uuid) -> PortResult<Vec<PaymentRecord>> {
        let query = format!(
            "SELECT {} FROM payments WHERE user_id = $1 ORDER BY date DESC, created_at DESC",
            PAYMENT_COLUMNS
        );
        let records = sqlx::query_as::<_, PaymentRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn record_payment(&self, user_id: Uuid, payment: NewPayment) -> PortResult<PaymentRecord> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let debt = Self::lock_debt(&mut tx, user_id, payment.debt_id).await?;
        let new_balance = rules::apply_payment(&debt, payment.amount)?;
        let now = Utc::now();

        sqlx::query("UPDATE debts SET current_balance = $1, updated_at = $2 WHERE id = $3")
            .bind(new_balance)
            .bind(now)
            .bind(debt.id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        let query = format!(
            "INSERT INTO payments ({}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            PAYMENT_COLUMNS, PAYMENT_COLUMNS
        );
        let record = sqlx::query_as::<_, PaymentRow>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(debt.id)
            .bind(payment.amount)
            .bind(payment.date)
            .bind(&payment.notes)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }
}

//=========================================================================================
// `AccountRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl AccountRepository for DbAdapter {
    async fn create_user_with_email(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let user_id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(email)
            .bind(hashed_password)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return PortError::Conflict(format!(
                            "An account for {} already exists",
                            email
                        ));
                    }
                }
                unexpected(e)
            })?;

        Ok(User {
            user_id,
            email: email.to_string(),
        })
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))?;

        Ok(UserCredentials {
            user_id: record.user_id,
            email: record.email,
            hashed_password: record.hashed_password,
        })
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
