pub mod auth;
pub mod dashboard;
pub mod debts;
pub mod middleware;
pub mod payloads;
pub mod payments;
pub mod rest;
pub mod state;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;
use auth::{login_handler, logout_handler, signup_handler};
use dashboard::{categories_handler, dashboard_handler, suggestions_handler};
use debts::{
    create_debt_handler, delete_debt_handler, get_debt_handler, list_debts_handler,
    update_debt_handler,
};
use middleware::require_auth;
use payments::{create_payment_handler, list_payments_handler};
use rest::ApiDoc;
use state::AppState;

/// Builds the complete application router: public auth routes, cookie-protected
/// data routes, and the Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin: {}", e)))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/debts", get(list_debts_handler).post(create_debt_handler))
        .route(
            "/debts/{id}",
            get(get_debt_handler)
                .put(update_debt_handler)
                .delete(delete_debt_handler),
        )
        .route("/payments", get(list_payments_handler).post(create_payment_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/analytics/categories", get(categories_handler))
        .route("/suggestions", get(suggestions_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http()))
}
