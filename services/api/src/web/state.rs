//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use findia_core::ports::{AccountRepository, DebtRepository, SuggestionService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub debts: Arc<dyn DebtRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub suggestions: Arc<dyn SuggestionService>,
    pub config: Arc<Config>,
}
