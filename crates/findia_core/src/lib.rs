pub mod domain;
pub mod insights;
pub mod ports;
pub mod rules;
pub mod stats;

pub use domain::{
    AuthSession, DebtChanges, DebtRecord, NewDebt, NewPayment, PaymentRecord, Priority, User,
    UserCredentials,
};
pub use insights::{Suggestion, SuggestionKind};
pub use ports::{AccountRepository, DebtRepository, PortError, PortResult, SuggestionService};
pub use rules::DomainError;
pub use stats::{AggregateStats, CategoryBreakdown};
