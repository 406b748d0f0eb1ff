//! End-to-end tests of the HTTP API over the in-memory store.

use api_lib::{
    adapters::{InMemoryStore, RuleBasedSuggestionAdapter},
    config::Config,
    web::{self, state::AppState},
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use findia_core::{
    domain::DebtRecord,
    insights::Suggestion,
    ports::{PortError, PortResult, SuggestionService},
    stats::AggregateStats,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct FailingSuggestions;

#[async_trait]
impl SuggestionService for FailingSuggestions {
    async fn suggest(&self, _: &[DebtRecord], _: &AggregateStats) -> PortResult<Vec<Suggestion>> {
        Err(PortError::Unexpected("model unavailable".to_string()))
    }
}

fn app_with(suggestions: Arc<dyn SuggestionService>) -> Router {
    let config = Config::from_lookup(|_| None).expect("default config");
    let store = Arc::new(InMemoryStore::new());
    let state = Arc::new(AppState {
        debts: store.clone(),
        accounts: store,
        suggestions,
        config: Arc::new(config),
    });
    web::router(state).expect("router builds")
}

fn app() -> Router {
    app_with(Arc::new(RuleBasedSuggestionAdapter::new()))
}

struct Reply {
    status: StatusCode,
    set_cookie: Option<String>,
    body: Value,
}

async fn send(app: &Router, method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    Reply {
        status,
        set_cookie,
        body,
    }
}

/// Signs up a fresh user and returns the `Cookie` header value to use.
async fn signup(app: &Router, email: &str) -> String {
    let reply = send(
        app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "email": email, "password": "correct horse" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let set_cookie = reply.set_cookie.expect("signup sets a cookie");
    set_cookie.split(';').next().unwrap().to_string()
}

async fn create_debt(app: &Router, cookie: &str, body: Value) -> Value {
    let reply = send(app, Method::POST, "/debts", Some(cookie), Some(body)).await;
    assert_eq!(reply.status, StatusCode::CREATED, "body: {}", reply.body);
    reply.body
}

fn debt_body(name: &str, original: f64, current: f64, minimum: f64, category: &str) -> Value {
    json!({
        "name": name,
        "originalAmount": original,
        "currentBalance": current,
        "minimumPayment": minimum,
        "interestRate": 12.5,
        "dueDate": "2030-01-15",
        "priority": "medium",
        "category": category
    })
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = app();
    for uri in ["/debts", "/payments", "/dashboard", "/analytics/categories", "/suggestions"] {
        let reply = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{}", uri);
    }
    let reply = send(&app, Method::GET, "/debts", Some("session=made-up"), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_login_and_logout() {
    let app = app();
    let cookie = signup(&app, "Maya@Example.com").await;
    assert!(cookie.starts_with("session="));

    let duplicate = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "email": "maya@example.com", "password": "another pass" })),
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let short = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "email": "new@example.com", "password": "short" })),
    )
    .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let wrong = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "maya@example.com", "password": "wrong password" })),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let login = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "maya@example.com", "password": "correct horse" })),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["email"], json!("maya@example.com"));
    assert!(login.set_cookie.is_some());

    let logout = send(&app, Method::POST, "/auth/logout", Some(&cookie), None).await;
    assert_eq!(logout.status, StatusCode::OK);
    let after = send(&app, Method::GET, "/debts", Some(&cookie), None).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn debt_crud_and_dashboard_stats() {
    let app = app();
    let cookie = signup(&app, "crud@example.com").await;

    let card = create_debt(&app, &cookie, debt_body("Card", 1000.0, 500.0, 25.0, "credit_card")).await;
    create_debt(&app, &cookie, debt_body("Loan", 2000.0, 1000.0, 75.0, "loan")).await;
    assert_eq!(card["progressPercentage"], json!(50.0));
    assert_eq!(card["priority"], json!("medium"));

    let dashboard = send(&app, Method::GET, "/dashboard", Some(&cookie), None).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    let stats = &dashboard.body["stats"];
    assert_eq!(stats["totalOriginalDebt"], json!(3000.0));
    assert_eq!(stats["totalCurrentDebt"], json!(1500.0));
    assert_eq!(stats["totalPaid"], json!(1500.0));
    assert_eq!(stats["progressPercentage"], json!(50.0));
    assert_eq!(stats["monthlyMinimumPayment"], json!(100.0));
    assert_eq!(stats["activeDebtCount"], json!(2));
    assert_eq!(stats["estimatedMonthsToPayoff"], json!(15));
    assert_eq!(dashboard.body["debts"].as_array().unwrap().len(), 2);
    assert_eq!(dashboard.body["recentPayments"], json!([]));

    let id = card["id"].as_str().unwrap();
    let uri = format!("/debts/{}", id);

    let immutable = send(&app, Method::PUT, &uri, Some(&cookie), Some(json!({ "originalAmount": 1.0 }))).await;
    assert_eq!(immutable.status, StatusCode::UNPROCESSABLE_ENTITY);

    let negative = send(&app, Method::PUT, &uri, Some(&cookie), Some(json!({ "minimumPayment": -5.0 }))).await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let updated = send(
        &app,
        Method::PUT,
        &uri,
        Some(&cookie),
        Some(json!({ "currentBalance": 1200.0, "priority": "high" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["currentBalance"], json!(1200.0));
    assert_eq!(updated.body["originalAmount"], json!(1000.0));
    assert_eq!(updated.body["priority"], json!("high"));
    assert_eq!(updated.body["progressPercentage"], json!(-20.0));

    let deleted = send(&app, Method::DELETE, &uri, Some(&cookie), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = send(&app, Method::GET, &uri, Some(&cookie), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_debt_accepts_current_amount_and_requires_fields() {
    let app = app();
    let cookie = signup(&app, "fields@example.com").await;

    let debt = create_debt(
        &app,
        &cookie,
        json!({
            "name": "Phone",
            "originalAmount": 600.0,
            "currentAmount": 450.0,
            "minimumPayment": 30.0,
            "dueDate": "2030-03-01",
            "priority": "low",
            "category": "electronics"
        }),
    )
    .await;
    assert_eq!(debt["currentBalance"], json!(450.0));
    assert_eq!(debt["interestRate"], json!(0.0));

    let missing = send(
        &app,
        Method::POST,
        "/debts",
        Some(&cookie),
        Some(json!({ "name": "Incomplete", "originalAmount": 10.0 })),
    )
    .await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);

    let blank = send(
        &app,
        Method::POST,
        "/debts",
        Some(&cookie),
        Some(debt_body("   ", 10.0, 10.0, 1.0, "misc")),
    )
    .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payments_lower_balances_and_drive_projection() {
    let app = app();
    let cookie = signup(&app, "payer@example.com").await;
    let debt = create_debt(&app, &cookie, debt_body("Card", 1000.0, 1000.0, 50.0, "credit_card")).await;
    let debt_id = debt["id"].as_str().unwrap().to_string();

    let paid = send(
        &app,
        Method::POST,
        "/payments",
        Some(&cookie),
        Some(json!({ "debtId": debt_id, "amount": 200.0, "date": "2024-05-10", "notes": "bonus" })),
    )
    .await;
    assert_eq!(paid.status, StatusCode::CREATED);
    assert_eq!(paid.body["amount"], json!(200.0));

    let refreshed = send(&app, Method::GET, &format!("/debts/{}", debt_id), Some(&cookie), None).await;
    assert_eq!(refreshed.body["currentBalance"], json!(800.0));

    let overpaid = send(
        &app,
        Method::POST,
        "/payments",
        Some(&cookie),
        Some(json!({ "debtId": debt_id, "amount": 900.0 })),
    )
    .await;
    assert_eq!(overpaid.status, StatusCode::BAD_REQUEST);

    let zero = send(
        &app,
        Method::POST,
        "/payments",
        Some(&cookie),
        Some(json!({ "debtId": debt_id, "amount": 0.0 })),
    )
    .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    let payments = send(&app, Method::GET, "/payments", Some(&cookie), None).await;
    assert_eq!(payments.body.as_array().unwrap().len(), 1);

    let dashboard = send(&app, Method::GET, "/dashboard", Some(&cookie), None).await;
    let stats = &dashboard.body["stats"];
    assert_eq!(stats["totalPaid"], json!(200.0));
    assert_eq!(stats["progressPercentage"], json!(20.0));
    // One month of history averaging 200 against 800 remaining.
    assert_eq!(stats["estimatedMonthsToPayoff"], json!(4));
    assert_eq!(dashboard.body["recentPayments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn users_cannot_touch_each_others_debts() {
    let app = app();
    let owner = signup(&app, "owner@example.com").await;
    let intruder = signup(&app, "intruder@example.com").await;
    let debt = create_debt(&app, &owner, debt_body("Private", 100.0, 100.0, 10.0, "misc")).await;
    let uri = format!("/debts/{}", debt["id"].as_str().unwrap());

    let listed = send(&app, Method::GET, "/debts", Some(&intruder), None).await;
    assert_eq!(listed.body, json!([]));

    for method in [Method::GET, Method::DELETE] {
        let reply = send(&app, method, &uri, Some(&intruder), None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }
    let update = send(&app, Method::PUT, &uri, Some(&intruder), Some(json!({ "name": "Mine" }))).await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let payment = send(
        &app,
        Method::POST,
        "/payments",
        Some(&intruder),
        Some(json!({ "debtId": debt["id"], "amount": 10.0 })),
    )
    .await;
    assert_eq!(payment.status, StatusCode::NOT_FOUND);

    let still_there = send(&app, Method::GET, &uri, Some(&owner), None).await;
    assert_eq!(still_there.body["currentBalance"], json!(100.0));
}

#[tokio::test]
async fn categories_group_uncategorized_debts_as_other() {
    let app = app();
    let cookie = signup(&app, "groups@example.com").await;
    create_debt(&app, &cookie, debt_body("Visa", 1000.0, 400.0, 20.0, "credit_card")).await;
    create_debt(&app, &cookie, debt_body("Gym", 300.0, 300.0, 30.0, "")).await;
    create_debt(&app, &cookie, debt_body("Amex", 2000.0, 1500.0, 40.0, "credit_card")).await;

    let reply = send(&app, Method::GET, "/analytics/categories", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.body,
        json!([
            { "category": "credit_card", "total": 3000.0, "paid": 1100.0, "remaining": 1900.0 },
            { "category": "Other", "total": 300.0, "paid": 0.0, "remaining": 300.0 }
        ])
    );
}

#[tokio::test]
async fn suggestions_fall_back_to_rules() {
    let app = app_with(Arc::new(FailingSuggestions));
    let cookie = signup(&app, "coach@example.com").await;

    let reply = send(&app, Method::GET, "/suggestions", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body[0]["kind"], json!("get_started"));
}

#[tokio::test]
async fn rule_based_suggestions_name_the_costliest_debt() {
    let app = app();
    let cookie = signup(&app, "rules@example.com").await;
    let mut pricey = debt_body("Store card", 500.0, 500.0, 25.0, "credit_card");
    pricey["interestRate"] = json!(29.9);
    create_debt(&app, &cookie, pricey).await;
    create_debt(&app, &cookie, debt_body("Car", 9000.0, 8000.0, 250.0, "auto")).await;

    let reply = send(&app, Method::GET, "/suggestions", Some(&cookie), None).await;
    let avalanche = reply
        .body
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["kind"] == json!("avalanche"))
        .expect("avalanche hint present");
    assert!(avalanche["message"].as_str().unwrap().contains("Store card"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let reply = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["paths"]["/debts/{id}"].is_object());
    assert!(reply.body["paths"]["/dashboard"].is_object());
}

#[tokio::test]
async fn oversized_amounts_are_rejected_and_dashboard_stays_numeric() {
    let app = app();
    let cookie = signup(&app, "whale@example.com").await;

    let huge = send(
        &app,
        Method::POST,
        "/debts",
        Some(&cookie),
        Some(debt_body("Yacht", 1e308, 1e308, 1e308, "luxury")),
    )
    .await;
    assert_eq!(huge.status, StatusCode::BAD_REQUEST);

    create_debt(&app, &cookie, debt_body("House", 1e12, 1e12, 1e6, "mortgage")).await;
    create_debt(&app, &cookie, debt_body("Land", 1e12, 5e11, 1e6, "mortgage")).await;

    let dashboard = send(&app, Method::GET, "/dashboard", Some(&cookie), None).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    let stats = &dashboard.body["stats"];
    assert_eq!(stats["totalPaid"], json!(5e11));
    assert_eq!(stats["progressPercentage"], json!(25.0));
    assert!(stats["estimatedMonthsToPayoff"].is_u64());
}

#[tokio::test]
async fn update_can_clear_optional_fields_with_null() {
    let app = app();
    let cookie = signup(&app, "tidy@example.com").await;
    let debt = create_debt(&app, &cookie, debt_body("Phone plan", 600.0, 400.0, 50.0, "utilities")).await;
    let uri = format!("/debts/{}", debt["id"].as_str().unwrap());

    let cleared = send(
        &app,
        Method::PUT,
        &uri,
        Some(&cookie),
        Some(json!({ "category": null, "dueDate": null })),
    )
    .await;
    assert_eq!(cleared.status, StatusCode::OK, "body: {}", cleared.body);
    assert_eq!(cleared.body["category"], json!(null));
    assert_eq!(cleared.body["dueDate"], json!(null));
    assert_eq!(cleared.body["name"], json!("Phone plan"));

    let untouched = send(&app, Method::PUT, &uri, Some(&cookie), Some(json!({ "notes": "autopay" }))).await;
    assert_eq!(untouched.status, StatusCode::OK);
    assert_eq!(untouched.body["notes"], json!("autopay"));
    assert_eq!(untouched.body["category"], json!(null));

    let categories = send(&app, Method::GET, "/analytics/categories", Some(&cookie), None).await;
    assert_eq!(categories.body[0]["category"], json!("Other"));
}
