//! services/api/src/web/dashboard.rs
//!
//! Read-only views computed from the caller's current debts and payments:
//! the dashboard summary, the category breakdown, and coaching suggestions.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::Utc;
use findia_core::{
    domain::{DebtRecord, PaymentRecord},
    insights,
    stats::{compute_stats_with_payments, distribute_by_category, recent_payments},
};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::error::log_and_map;
use crate::web::payloads::{
    CategoryResponse, DashboardResponse, PaymentResponse, SuggestionResponse,
};
use crate::web::state::AppState;

/// Number of payments shown in the dashboard's "recent" list.
const RECENT_PAYMENTS: usize = 5;

async fn load_snapshot(
    state: &AppState,
    user_id: Uuid,
) -> Result<(Vec<DebtRecord>, Vec<PaymentRecord>), (StatusCode, String)> {
    tokio::try_join!(
        state.debts.list_debts(user_id),
        state.debts.list_payments(user_id)
    )
    .map_err(log_and_map("load dashboard data"))
}

/// GET /dashboard - Summary stats plus the records they were computed from
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard snapshot", body = DashboardResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (debts, payments) = load_snapshot(&state, user_id).await?;

    let stats = compute_stats_with_payments(&debts, &payments);
    let recent = recent_payments(&payments, RECENT_PAYMENTS);

    Ok(Json(DashboardResponse {
        stats: stats.into(),
        debts: debts.into_iter().map(Into::into).collect(),
        payments: payments.into_iter().map(Into::into).collect(),
        recent_payments: recent.into_iter().map(PaymentResponse::from).collect(),
    }))
}

/// GET /analytics/categories - Totals grouped by debt category
#[utoipa::path(
    get,
    path = "/analytics/categories",
    responses(
        (status = 200, description = "Per-category totals", body = [CategoryResponse]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn categories_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let debts = state
        .debts
        .list_debts(user_id)
        .await
        .map_err(log_and_map("list debts"))?;

    let body: Vec<CategoryResponse> = distribute_by_category(&debts)
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(body))
}

/// GET /suggestions - Coaching messages for the caller's debts
///
/// Falls back to the built-in rules when the configured suggestion service fails.
#[utoipa::path(
    get,
    path = "/suggestions",
    responses(
        (status = 200, description = "Suggestions", body = [SuggestionResponse]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn suggestions_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (debts, payments) = load_snapshot(&state, user_id).await?;
    let stats = compute_stats_with_payments(&debts, &payments);

    let suggestions = match state.suggestions.suggest(&debts, &stats).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            warn!("Suggestion service failed, using built-in rules: {:?}", e);
            insights::suggest(&debts, &stats, Utc::now().date_naive())
        }
    };

    let body: Vec<SuggestionResponse> = suggestions.into_iter().map(Into::into).collect();
    Ok(Json(body))
}
