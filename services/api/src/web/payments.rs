//! services/api/src/web/payments.rs
//!
//! Handlers for listing and recording payments.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::log_and_map;
use crate::web::payloads::{CreatePaymentRequest, PaymentResponse};
use crate::web::state::AppState;

/// GET /payments - List the caller's payments, newest first
#[utoipa::path(
    get,
    path = "/payments",
    responses(
        (status = 200, description = "The caller's payments", body = [PaymentResponse]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_payments_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let payments = state
        .debts
        .list_payments(user_id)
        .await
        .map_err(log_and_map("list payments"))?;

    let body: Vec<PaymentResponse> = payments.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// POST /payments - Record a payment and lower the debt's balance
#[utoipa::path(
    post,
    path = "/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentResponse),
        (status = 400, description = "Amount is not positive or exceeds the balance"),
        (status = 404, description = "No such debt for this user")
    )
)]
pub async fn create_payment_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let payment = req.into_domain(Utc::now().date_naive());
    let recorded = state
        .debts
        .record_payment(user_id, payment)
        .await
        .map_err(log_and_map("record payment"))?;

    info!(
        "User {} paid {:.2} towards debt {}",
        user_id, recorded.amount, recorded.debt_id
    );
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(recorded))))
}
