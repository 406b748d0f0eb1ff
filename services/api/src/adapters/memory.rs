//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the repository ports. Used when no
//! `DATABASE_URL` is configured, and by the HTTP tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use findia_core::domain::{
    AuthSession, DebtChanges, DebtRecord, NewDebt, NewPayment, PaymentRecord, User,
    UserCredentials,
};
use findia_core::ports::{AccountRepository, DebtRepository, PortError, PortResult};
use findia_core::rules;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<String, UserCredentials>,
    auth_sessions: HashMap<String, AuthSession>,
    /// Kept in insertion order so listings are stable.
    debts: Vec<DebtRecord>,
    payments: Vec<PaymentRecord>,
}

/// Stores everything in memory behind a single lock. Data is lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn debt_not_found(debt_id: Uuid) -> PortError {
    PortError::NotFound(format!("Debt {} not found", debt_id))
}

fn owned_debt_mut(tables: &mut Tables, user_id: Uuid, debt_id: Uuid) -> PortResult<&mut DebtRecord> {
    tables
        .debts
        .iter_mut()
        .find(|d| d.id == debt_id && d.user_id == user_id)
        .ok_or_else(|| debt_not_found(debt_id))
}

#[async_trait]
impl DebtRepository for InMemoryStore {
    async fn list_debts(&self, user_id: Uuid) -> PortResult<Vec<DebtRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .debts
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_debt(&self, user_id: Uuid, debt_id: Uuid) -> PortResult<DebtRecord> {
        let tables = self.tables.read().await;
        tables
            .debts
            .iter()
            .find(|d| d.id == debt_id && d.user_id == user_id)
            .cloned()
            .ok_or_else(|| debt_not_found(debt_id))
    }

    async fn create_debt(&self, user_id: Uuid, debt: NewDebt) -> PortResult<DebtRecord> {
        rules::validate_new_debt(&debt)?;
        let now = Utc::now();
        let record = DebtRecord {
            id: Uuid::new_v4(),
            user_id,
            name: debt.name,
            original_amount: debt.original_amount,
            current_balance: debt.current_balance,
            minimum_payment: debt.minimum_payment,
            interest_rate: debt.interest_rate,
            due_date: debt.due_date,
            priority: debt.priority,
            category: debt.category,
            notes: debt.notes,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.debts.push(record.clone());
        Ok(record)
    }

    async fn update_debt(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
        changes: DebtChanges,
    ) -> PortResult<DebtRecord> {
        rules::validate_changes(&changes)?;
        let mut tables = self.tables.write().await;
        let debt = owned_debt_mut(&mut tables, user_id, debt_id)?;
        changes.apply_to(debt, Utc::now());
        Ok(debt.clone())
    }

    async fn delete_debt(&self, user_id: Uuid, debt_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.debts.len();
        tables
            .debts
            .retain(|d| !(d.id == debt_id && d.user_id == user_id));
        if tables.debts.len() == before {
            return Err(debt_not_found(debt_id));
        }
        Ok(())
    }

    async fn list_payments(&self, user_id: Uuid) -> PortResult<Vec<PaymentRecord>> {
        let tables = self.tables.read().await;
        let mut payments: Vec<PaymentRecord> = tables
            .payments
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(payments)
    }

    async fn record_payment(&self, user_id: Uuid, payment: NewPayment) -> PortResult<PaymentRecord> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let debt = owned_debt_mut(&mut tables, user_id, payment.debt_id)?;
        debt.current_balance = rules::apply_payment(debt, payment.amount)?;
        debt.updated_at = now;

        let record = PaymentRecord {
            id: Uuid::new_v4(),
            user_id,
            debt_id: payment.debt_id,
            amount: payment.amount,
            date: payment.date,
            notes: payment.notes,
            created_at: now,
        };
        tables.payments.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create_user_with_email(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(email) {
            return Err(PortError::Conflict(format!(
                "An account for {} already exists",
                email
            )));
        }
        let user_id = Uuid::new_v4();
        tables.users.insert(
            email.to_string(),
            UserCredentials {
                user_id,
                email: email.to_string(),
                hashed_password: hashed_password.to_string(),
            },
        );
        Ok(User {
            user_id,
            email: email.to_string(),
        })
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.tables
            .read()
            .await
            .users
            .get(email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        tables.auth_sessions.retain(|_, session| session.expires_at > now);
        tables.auth_sessions.insert(
            session_id.to_string(),
            AuthSession {
                id: session_id.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let tables = self.tables.read().await;
        match tables.auth_sessions.get(session_id) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.tables.write().await.auth_sessions.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use findia_core::domain::Priority;

    fn new_debt(balance: f64) -> NewDebt {
        NewDebt {
            name: "Student loan".to_string(),
            original_amount: 5000.0,
            current_balance: balance,
            minimum_payment: 100.0,
            interest_rate: 3.2,
            due_date: None,
            priority: Priority::Medium,
            category: Some("education".to_string()),
            notes: None,
        }
    }

    fn payment(debt_id: Uuid, amount: f64) -> NewPayment {
        NewPayment {
            debt_id,
            amount,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn debts_are_scoped_to_their_owner() {
        let store = InMemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let debt = store.create_debt(alice, new_debt(4000.0)).await.unwrap();

        assert_eq!(store.list_debts(alice).await.unwrap().len(), 1);
        assert!(store.list_debts(bob).await.unwrap().is_empty());
        assert!(matches!(
            store.get_debt(bob, debt.id).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_debt(bob, debt.id).await,
            Err(PortError::NotFound(_))
        ));
        store.delete_debt(alice, debt.id).await.unwrap();
        assert!(store.list_debts(alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn payment_lowers_balance_and_is_listed() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let debt = store.create_debt(user, new_debt(4000.0)).await.unwrap();

        let recorded = store.record_payment(user, payment(debt.id, 250.0)).await.unwrap();
        assert_eq!(recorded.amount, 250.0);

        let updated = store.get_debt(user, debt.id).await.unwrap();
        assert_eq!(updated.current_balance, 3750.0);
        assert_eq!(updated.original_amount, 5000.0);
        assert!(updated.updated_at >= debt.updated_at);
        assert_eq!(store.list_payments(user).await.unwrap(), vec![recorded]);
    }

    #[tokio::test]
    async fn overpayment_leaves_state_untouched() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        let debt = store.create_debt(user, new_debt(100.0)).await.unwrap();

        let err = store.record_payment(user, payment(debt.id, 150.0)).await;
        assert!(matches!(err, Err(PortError::Invalid(_))));
        assert_eq!(store.get_debt(user, debt.id).await.unwrap().current_balance, 100.0);
        assert!(store.list_payments(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_debt_is_rejected() {
        let store = InMemoryStore::new();
        let result = store.create_debt(Uuid::new_v4(), new_debt(-1.0)).await;
        assert!(matches!(result, Err(PortError::Invalid(_))));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = InMemoryStore::new();
        store.create_user_with_email("a@b.c", "hash").await.unwrap();
        assert!(matches!(
            store.create_user_with_email("a@b.c", "hash").await,
            Err(PortError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn expired_sessions_are_rejected() {
        let store = InMemoryStore::new();
        let user = store.create_user_with_email("a@b.c", "hash").await.unwrap();
        store
            .create_auth_session("live", user.user_id, Utc::now() + Duration::days(1))
            .await
            .unwrap();
        store
            .create_auth_session("stale", user.user_id, Utc::now() - Duration::days(1))
            .await
            .unwrap();

        assert_eq!(store.validate_auth_session("live").await.unwrap(), user.user_id);
        assert!(matches!(
            store.validate_auth_session("stale").await,
            Err(PortError::Unauthorized)
        ));

        store.delete_auth_session("live").await.unwrap();
        assert!(store.validate_auth_session("live").await.is_err());
    }

    #[tokio::test]
    async fn new_session_prunes_expired_ones() {
        let store = InMemoryStore::new();
        let user = store.create_user_with_email("a@b.c", "hash").await.unwrap();
        store
            .create_auth_session("stale", user.user_id, Utc::now() - Duration::days(1))
            .await
            .unwrap();
        store
            .create_auth_session("fresh", user.user_id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        let tables = store.tables.read().await;
        assert!(!tables.auth_sessions.contains_key("stale"));
        assert!(tables.auth_sessions.contains_key("fresh"));
        assert_eq!(tables.auth_sessions.len(), 1);
    }
}
