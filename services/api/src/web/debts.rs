//! services/api/src/web/debts.rs
//!
//! CRUD handlers for the caller's debts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use findia_core::domain::{DebtChanges, NewDebt};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::log_and_map;
use crate::web::payloads::{CreateDebtRequest, DebtResponse, UpdateDebtRequest};
use crate::web::state::AppState;

/// GET /debts - List the caller's debts
#[utoipa::path(
    get,
    path = "/debts",
    responses(
        (status = 200, description = "The caller's debts", body = [DebtResponse]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_debts_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let debts = state
        .debts
        .list_debts(user_id)
        .await
        .map_err(log_and_map("list debts"))?;

    let body: Vec<DebtResponse> = debts.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// GET /debts/{id} - Fetch a single debt
#[utoipa::path(
    get,
    path = "/debts/{id}",
    params(("id" = Uuid, Path, description = "Debt id")),
    responses(
        (status = 200, description = "The debt", body = DebtResponse),
        (status = 404, description = "No such debt for this user")
    )
)]
pub async fn get_debt_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(debt_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let debt = state
        .debts
        .get_debt(user_id, debt_id)
        .await
        .map_err(log_and_map("fetch debt"))?;
    Ok(Json(DebtResponse::from(debt)))
}

/// POST /debts - Create a debt
#[utoipa::path(
    post,
    path = "/debts",
    request_body = CreateDebtRequest,
    responses(
        (status = 201, description = "Debt created", body = DebtResponse),
        (status = 400, description = "Invalid amounts or name"),
        (status = 422, description = "Missing or malformed fields")
    )
)]
pub async fn create_debt_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateDebtRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let debt = state
        .debts
        .create_debt(user_id, NewDebt::from(req))
        .await
        .map_err(log_and_map("create debt"))?;

    info!("User {} created debt {}", user_id, debt.id);
    Ok((StatusCode::CREATED, Json(DebtResponse::from(debt))))
}

/// PUT /debts/{id} - Partially update a debt
#[utoipa::path(
    put,
    path = "/debts/{id}",
    params(("id" = Uuid, Path, description = "Debt id")),
    request_body = UpdateDebtRequest,
    responses(
        (status = 200, description = "Debt updated", body = DebtResponse),
        (status = 400, description = "Invalid values"),
        (status = 404, description = "No such debt for this user"),
        (status = 422, description = "Unknown or immutable fields")
    )
)]
pub async fn update_debt_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(debt_id): Path<Uuid>,
    Json(req): Json<UpdateDebtRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let debt = state
        .debts
        .update_debt(user_id, debt_id, DebtChanges::from(req))
        .await
        .map_err(log_and_map("update debt"))?;
    Ok(Json(DebtResponse::from(debt)))
}

/// DELETE /debts/{id} - Remove a debt
#[utoipa::path(
    delete,
    path = "/debts/{id}",
    params(("id" = Uuid, Path, description = "Debt id")),
    responses(
        (status = 204, description = "Debt deleted"),
        (status = 404, description = "No such debt for this user")
    )
)]
pub async fn delete_debt_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(debt_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .debts
        .delete_debt(user_id, debt_id)
        .await
        .map_err(log_and_map("delete debt"))?;

    info!("User {} deleted debt {}", user_id, debt_id);
    Ok(StatusCode::NO_CONTENT)
}
