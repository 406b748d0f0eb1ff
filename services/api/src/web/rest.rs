//! services/api/src/web/rest.rs
//!
//! The master definition of the OpenAPI specification for the REST API.

use utoipa::OpenApi;

use crate::web::auth::{AuthResponse, LoginRequest, SignupRequest};
use crate::web::payloads::{
    CategoryResponse, CreateDebtRequest, CreatePaymentRequest, DashboardResponse, DebtResponse,
    PaymentResponse, PriorityPayload, StatsResponse, SuggestionResponse, UpdateDebtRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::debts::list_debts_handler,
        crate::web::debts::get_debt_handler,
        crate::web::debts::create_debt_handler,
        crate::web::debts::update_debt_handler,
        crate::web::debts::delete_debt_handler,
        crate::web::payments::list_payments_handler,
        crate::web::payments::create_payment_handler,
        crate::web::dashboard::dashboard_handler,
        crate::web::dashboard::categories_handler,
        crate::web::dashboard::suggestions_handler,
    ),
    components(
        schemas(
            SignupRequest, LoginRequest, AuthResponse,
            PriorityPayload, DebtResponse, CreateDebtRequest, UpdateDebtRequest,
            PaymentResponse, CreatePaymentRequest,
            StatsResponse, DashboardResponse, CategoryResponse, SuggestionResponse
        )
    ),
    tags(
        (name = "FindIA API", description = "Debt tracking, payoff progress and coaching suggestions.")
    )
)]
pub struct ApiDoc;
