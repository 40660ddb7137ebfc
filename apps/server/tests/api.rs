//! End-to-end API tests against an in-memory database.
//!
//! Each test builds the full router with `tower::ServiceExt::oneshot`
//! and drives it over HTTP semantics only, the way a client would.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use lodge_db::{Database, DbConfig};
use lodge_server::auth::hash_password;
use lodge_server::{router, AppState};

const STAFF_TOKEN: &str = "staff-test-token";

async fn test_app() -> (Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    // Seed a staff account with a known token.
    let staff = db
        .accounts()
        .create_staff("manager", &hash_password("secret123").unwrap())
        .await
        .unwrap();
    db.accounts().issue_token(&staff.id, STAFF_TOKEN).await.unwrap();

    (router(AppState::new(db.clone())), db)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_customer(app: &Router, username: &str, national_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "username": username,
                "password": "secret123",
                "name": format!("Customer {username}"),
                "phone": "0700000000",
                "national_id": national_id,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

async fn create_room(app: &Router, room_number: &str, price_cents: i64) -> String {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/rooms",
            Some(STAFF_TOKEN),
            Some(json!({
                "room_number": room_number,
                "room_type": "Deluxe",
                "price_cents": price_cents,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

async fn book(
    app: &Router,
    token: &str,
    room_id: &str,
    check_in: &str,
    check_out: &str,
) -> axum::response::Response {
    app.clone()
        .oneshot(request(
            "POST",
            "/api/bookings",
            Some(token),
            Some(json!({
                "room_id": room_id,
                "check_in": check_in,
                "check_out": check_out,
                "payment_method": "mobile_money",
            })),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn register_login_me_and_logout() {
    let (app, _db) = test_app().await;
    let token = register_customer(&app, "ada", "NID-1").await;

    // me reflects the linked customer profile.
    let response = app
        .clone()
        .oneshot(request("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "ada");
    assert_eq!(body["is_staff"], false);
    assert_eq!(body["customer"]["name"], "Customer ada");

    // Login hands back the live token rather than minting a new one.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "ada", "password": "secret123"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token"], token);

    // Logout kills the token server-side.
    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/logout", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let (app, db) = test_app().await;
    register_customer(&app, "ada", "NID-1").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "username": "ada",
                "password": "secret123",
                "name": "Someone Else",
                "phone": "0711111111",
                "national_id": "NID-2",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The failed attempt left no partial profile behind.
    assert_eq!(db.customers().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (app, _db) = test_app().await;
    register_customer(&app, "ada", "NID-1").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "ada", "password": "wrong"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid username or password.");

    // An unknown username gets the same rejection.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "nobody", "password": "secret123"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (app, _db) = test_app().await;

    for path in ["/api/auth/me", "/api/bookings", "/api/transactions"] {
        let response = app
            .clone()
            .oneshot(request("GET", path, None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn room_reads_are_open_to_anonymous_callers() {
    let (app, _db) = test_app().await;
    let room_id = create_room(&app, "101", 10000).await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/rooms", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(request("GET", &format!("/api/rooms/{room_id}"), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/rooms/available?check_in=2024-01-01&check_out=2024-01-03",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn room_writes_are_staff_only() {
    let (app, _db) = test_app().await;
    let customer_token = register_customer(&app, "ada", "NID-1").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/rooms",
            Some(&customer_token),
            Some(json!({"room_number": "101", "room_type": "Deluxe", "price_cents": 10000})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let room_id = create_room(&app, "101", 10000).await;

    // Customers can still read the inventory.
    let response = app
        .clone()
        .oneshot(request("GET", "/api/rooms", Some(&customer_token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/rooms/{room_id}"),
            Some(&customer_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn availability_query_errors_are_distinguishable() {
    let (app, _db) = test_app().await;

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/rooms/available",
            Some(STAFF_TOKEN),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "check_in and check_out query params are required (YYYY-MM-DD)."
    );

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/rooms/available?check_in=today&check_out=2024-01-03",
            Some(STAFF_TOKEN),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid date format. Use YYYY-MM-DD.");

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/rooms/available?check_in=2024-01-03&check_out=2024-01-01",
            Some(STAFF_TOKEN),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_lifecycle_over_http() {
    let (app, _db) = test_app().await;
    let room_id = create_room(&app, "101", 10000).await;
    let ada = register_customer(&app, "ada", "NID-1").await;
    let grace = register_customer(&app, "grace", "NID-2").await;

    let response = book(&app, &ada, &room_id, "2024-01-01", "2024-01-03").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let booking_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(
        body["receipt_url"],
        format!("/api/bookings/{booking_id}/receipt")
    );

    // Overlap with the existing stay is rejected.
    let response = book(&app, &grace, &room_id, "2024-01-02", "2024-01-04").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Room is already booked for the selected date range."
    );

    // Back-to-back is allowed.
    let response = book(&app, &grace, &room_id, "2024-01-03", "2024-01-05").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Grace cannot see or cancel Ada's booking.
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/bookings/{booking_id}"),
            Some(&grace),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/bookings/{booking_id}"),
            Some(&grace),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Ada's list shows only her own booking.
    let response = app
        .clone()
        .oneshot(request("GET", "/api/bookings", Some(&ada), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Owner cancels.
    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/bookings/{booking_id}"),
            Some(&ada),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn booking_without_payment_method_is_rejected() {
    let (app, _db) = test_app().await;
    let room_id = create_room(&app, "101", 10000).await;
    let ada = register_customer(&app, "ada", "NID-1").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/bookings",
            Some(&ada),
            Some(json!({
                "room_id": room_id,
                "check_in": "2024-01-01",
                "check_out": "2024-01-03",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Payment method is required. Choose mobile_money or bank_transfer."
    );
}

#[tokio::test]
async fn receipt_downloads_as_pdf() {
    let (app, _db) = test_app().await;
    let room_id = create_room(&app, "101", 10000).await;
    let ada = register_customer(&app, "ada", "NID-1").await;

    let response = book(&app, &ada, &room_id, "2024-01-01", "2024-01-03").await;
    let body = body_json(response).await;
    let booking_id = body["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/bookings/{booking_id}/receipt"),
            Some(&ada),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"receipt-{booking_id}.pdf\"")
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF-1.4"));
}

#[tokio::test]
async fn customer_detail_includes_booking_history() {
    let (app, _db) = test_app().await;
    let room_id = create_room(&app, "101", 10000).await;
    let ada = register_customer(&app, "ada", "NID-1").await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/auth/me", Some(&ada), None))
        .await
        .unwrap();
    let me = body_json(response).await;
    let customer_id = me["customer"]["id"].as_str().unwrap().to_string();

    let response = book(&app, &ada, &room_id, "2024-01-01", "2024-01-03").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The directory is staff-only.
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/customers/{customer_id}"),
            Some(&ada),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/customers/{customer_id}"),
            Some(STAFF_TOKEN),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Customer ada");
    assert_eq!(body["total_bookings"], 1);
    let history = body["booking_history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["room_number"], "101");
}

#[tokio::test]
async fn transactions_are_staff_only() {
    let (app, _db) = test_app().await;
    let room_id = create_room(&app, "101", 10000).await;
    let ada = register_customer(&app, "ada", "NID-1").await;

    let response = book(&app, &ada, &room_id, "2024-01-01", "2024-01-03").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/transactions", Some(&ada), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/transactions?entry_type=BOOKING",
            Some(STAFF_TOKEN),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["entry_type"], "BOOKING");
    assert_eq!(entries[0]["amount_cents"], 20000);

    // The shorter `type` spelling filters the same way.
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/transactions?type=CANCELLATION",
            Some(STAFF_TOKEN),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body.as_array().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/transactions?entry_type=refund",
            Some(STAFF_TOKEN),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
