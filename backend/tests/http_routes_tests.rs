//! Router-level tests using `tower::ServiceExt::oneshot`.
#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use support::*;
use tour_booking::db::repository::FullRepository;
use tour_booking::http::{create_router, AppState};
use tower::ServiceExt;

fn app() -> Router {
    let repo = Arc::new(seeded_repository()) as Arc<dyn FullRepository>;
    create_router(AppState::new(repo))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn sign_in(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/v1/auth/session",
        None,
        Some(json!({"email": TRAVELLER_EMAIL})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_list_packages_with_filters() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/v1/packages", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["destinations"].as_array().unwrap().len(), 3);

    let (_, body) = send(
        &app,
        Method::GET,
        "/v1/packages?sort=rating_high_to_low&max_price=500",
        None,
        None,
    )
    .await;
    let titles: Vec<_> = body["packages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["Komodo Sailing", "Bromo Sunrise", "Lake Toba Retreat"]);
}

#[tokio::test]
async fn test_package_detail_and_missing_package() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/v1/packages/2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inclusions"][1]["label"], "Meals");
    assert_eq!(body["inclusions"][1]["detail"], "Full board");

    let (status, body) = send(&app, Method::GET, "/v1/packages/99", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_availability_statuses() {
    let app = app();
    let (_, bromo) = send(&app, Method::GET, "/v1/packages/1/availability", None, None).await;
    assert_eq!(bromo["status"], "available");
    // Nearest first: the sold-out August range precedes September.
    assert_eq!(bromo["ranges"][0]["start"], "2025-08-01");
    assert_eq!(bromo["ranges"][1]["label"], "9 - 14 Sep, 2025");

    let (_, komodo) = send(&app, Method::GET, "/v1/packages/2/availability", None, None).await;
    assert_eq!(komodo["status"], "fully_booked");
    assert_eq!(komodo["all_fully_booked"], true);

    let (_, toba) = send(&app, Method::GET, "/v1/packages/3/availability", None, None).await;
    assert_eq!(toba["status"], "no_dates");
    assert_eq!(toba["all_fully_booked"], false);
}

#[tokio::test]
async fn test_calendar_with_selection() {
    let (status, body) = send(
        &app(),
        Method::GET,
        "/v1/packages/1/calendar?year=2025&month=8&start=2025-09-09&end=2025-09-14",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "September 2025");
    assert_eq!(body["selection_label"], "9 - 14 Sep, 2025");
    assert_eq!(body["previous"]["month"], 7);
    assert_eq!(body["next"]["month"], 9);

    // First row: one blank (Monday start), then 1-6 September.
    let first_week = body["weeks"][0].as_array().unwrap();
    assert!(first_week[0].get("date").is_none());
    assert_eq!(first_week[1]["date"], "2025-09-01");
    assert_eq!(first_week[1]["state"], "unavailable");

    let second_week = body["weeks"][1].as_array().unwrap();
    assert_eq!(second_week[2]["date"], "2025-09-09");
    assert_eq!(second_week[2]["state"], "range-endpoint-and-selected");
    assert_eq!(second_week[3]["state"], "in-range");
}

#[tokio::test]
async fn test_calendar_rejects_bad_month() {
    let (status, _) = send(
        &app(),
        Method::GET,
        "/v1/packages/1/calendar?year=2025&month=12",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_intent_from_day() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/packages/1/booking-intents",
        None,
        Some(json!({"date": "2025-09-11", "party_size": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"]["start_date"], "2025-09-09");
    assert_eq!(body["intent"]["end_date"], "2025-09-14");
    assert_eq!(body["label"], "9 - 14 Sep, 2025");

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/packages/1/booking-intents",
        None,
        Some(json!({"date": "2025-09-20", "party_size": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/packages/1/booking-intents",
        None,
        Some(json!({"date": "2025-09-11", "party_size": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/v1/favorites", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/auth/session",
        None,
        Some(json!({"email": "nobody@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = sign_in(&app).await;
    let (status, _) = send(&app, Method::DELETE, "/v1/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/v1/favorites", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_favorites() {
    let app = app();
    let token = sign_in(&app).await;

    let (status, body) = send(&app, Method::PUT, "/v1/favorites/2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);
    let (_, body) = send(&app, Method::PUT, "/v1/favorites/2", Some(&token), None).await;
    assert_eq!(body["changed"], false);

    let (_, body) = send(&app, Method::GET, "/v1/favorites", Some(&token), None).await;
    assert_eq!(body["package_ids"], json!([2]));
    assert_eq!(body["packages"][0]["title"], "Komodo Sailing");

    let (_, body) = send(&app, Method::DELETE, "/v1/favorites/2", Some(&token), None).await;
    assert_eq!(body["favorite"], false);
    assert_eq!(body["changed"], true);

    let (status, _) = send(&app, Method::PUT, "/v1/favorites/99", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_and_list_bookings() {
    let app = app();
    let token = sign_in(&app).await;
    let request = json!({
        "package_id": 1,
        "start_date": "2025-09-09",
        "end_date": "2025-09-14",
        "party_size": 2,
        "contact": {
            "full_name": "Ayu Lestari",
            "email": "ayu@example.com",
            "phone": "+62 812 3456 789"
        },
        "payment_method": "credit_card",
        "installments": {"type": "monthly", "months": 3}
    });

    let (status, first) = send(&app, Method::POST, "/v1/bookings", Some(&token), Some(request.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "pending");
    let per_installment: Decimal = first["amount_per_installment"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(per_installment, Decimal::from(100));

    let (_, second) = send(&app, Method::POST, "/v1/bookings", Some(&token), Some(request)).await;
    assert_eq!(first["id"], second["id"]);
    assert_eq!(first["reference"], second["reference"]);

    let (_, list) = send(&app, Method::GET, "/v1/bookings", Some(&token), None).await;
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn test_rebooking_with_other_payment_method_conflicts() {
    let app = app();
    let token = sign_in(&app).await;
    let mut request = json!({
        "package_id": 1,
        "start_date": "2025-09-09",
        "end_date": "2025-09-14",
        "party_size": 2,
        "contact": {
            "full_name": "Ayu Lestari",
            "email": "ayu@example.com",
            "phone": "+62 812 3456 789"
        },
        "payment_method": "credit_card",
        "installments": {"type": "monthly", "months": 3}
    });
    let (status, _) = send(&app, Method::POST, "/v1/bookings", Some(&token), Some(request.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    request["payment_method"] = json!("bank_transfer");
    request["installments"] = json!({"type": "pay_in_full"});
    let (status, body) = send(&app, Method::POST, "/v1/bookings", Some(&token), Some(request)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, list) = send(&app, Method::GET, "/v1/bookings", Some(&token), None).await;
    assert_eq!(list["total"], 1);
    assert_eq!(list["bookings"][0]["payment_method"], "credit_card");
}

#[tokio::test]
async fn test_booking_validation_errors() {
    let app = app();
    let token = sign_in(&app).await;
    let base = json!({
        "package_id": 1,
        "start_date": "2025-09-09",
        "end_date": "2025-09-14",
        "party_size": 2,
        "contact": {
            "full_name": "Ayu Lestari",
            "email": "ayu@example.com",
            "phone": "+62 812 3456 789"
        },
        "payment_method": "bank_transfer"
    });

    let mut installments_on_transfer = base.clone();
    installments_on_transfer["installments"] = json!({"type": "monthly", "months": 3});
    let (status, _) = send(&app, Method::POST, "/v1/bookings", Some(&token), Some(installments_on_transfer)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_email = base.clone();
    bad_email["contact"]["email"] = json!("ayu@");
    let (status, body) = send(&app, Method::POST, "/v1/bookings", Some(&token), Some(bad_email)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("email"));

    let mut unknown_range = base.clone();
    unknown_range["end_date"] = json!("2025-09-15");
    let (status, _) = send(&app, Method::POST, "/v1/bookings", Some(&token), Some(unknown_range)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/v1/bookings", None, Some(base)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
