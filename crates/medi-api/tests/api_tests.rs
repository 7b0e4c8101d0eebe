//! End-to-end tests of the HTTP surface against the in-memory store.

mod common;

use axum::http::{header, HeaderValue, StatusCode};
use common::{as_document, RecordingProvider, TestApp};
use medi_core::{Collection, DocumentStore, Filter};
use serde_json::{json, Value};

// =============================================================================
// Guards
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_rejected_before_storage() {
    let app = TestApp::new();
    let before = app.store.operations();

    let response = app.server.get("/users").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], 401);
    assert_eq!(app.store.operations(), before);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = TestApp::new();

    app.server
        .post("/selectedCart")
        .authorization_bearer("not.a.token")
        .json(&json!({ "name": "Napa" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    assert_eq!(app.store.inner.count(Collection::Carts).await, 0);
}

#[tokio::test]
async fn test_wrong_role_is_forbidden() {
    let app = TestApp::new();
    let token = app.login("buyer@medisnap.app", "user").await;

    let response = app.server.get("/users").authorization_bearer(&token).await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"], "forbidden access");
}

#[tokio::test]
async fn test_token_without_email_cannot_pass_role_guards() {
    let app = TestApp::new();
    let response = app.server.post("/jwt").json(&json!({ "name": "anon" })).await;
    response.assert_status_ok();
    let token = response.json::<Value>()["token"].as_str().unwrap().to_string();

    app.server
        .get("/adminPaymentHistory")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_client_supplied_role_is_ignored_at_issuance() {
    let app = TestApp::new();
    app.seed_user("buyer@medisnap.app", "user").await;

    let response = app
        .server
        .post("/jwt")
        .json(&json!({ "email": "buyer@medisnap.app", "role": "admin" }))
        .await;
    let token = response.json::<Value>()["token"].as_str().unwrap().to_string();

    app.server
        .get("/users")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_with_audience_claim_is_accepted() {
    let app = TestApp::new();
    app.seed_user("buyer@medisnap.app", "user").await;

    let response = app
        .server
        .post("/jwt")
        .json(&json!({ "email": "buyer@medisnap.app", "aud": "web" }))
        .await;
    response.assert_status_ok();
    let token = response.json::<Value>()["token"].as_str().unwrap().to_string();

    app.server
        .get("/selectedCarts/buyer@medisnap.app")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_demoted_admin_keeps_reads_until_token_expires() {
    let app = TestApp::new();
    let token = app.login("admin@medisnap.app", "admin").await;

    app.server
        .patch("/user/admin@medisnap.app")
        .authorization_bearer(&token)
        .json(&json!({ "role": "user" }))
        .await
        .assert_status_ok();

    // Safe methods trust the role stamped at issuance
    app.server
        .get("/users")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    // Writes re-read the stored role
    app.server
        .post("/category")
        .authorization_bearer(&token)
        .json(&json!({ "categoryName": "Tablet" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    // A fresh token carries the new role
    let fresh = app.token_for("admin@medisnap.app").await;
    app.server
        .get("/users")
        .authorization_bearer(&fresh)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mutating_request_rechecks_stored_role() {
    let app = TestApp::new();
    let token = app.login("seller@medisnap.app", "seller").await;

    // Demote the seller after the token was issued
    app.store
        .inner
        .update_one(
            Collection::Users,
            &Filter::all().eq("email", "seller@medisnap.app"),
            as_document(json!({ "role": "user" })),
        )
        .await
        .unwrap();

    app.server
        .post("/medicine")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Napa", "addederEmail": "seller@medisnap.app" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    assert_eq!(app.store.inner.count(Collection::Medicines).await, 0);
}

#[tokio::test]
async fn test_seller_or_admin_may_add_medicine() {
    let app = TestApp::new();
    let seller = app.login("seller@medisnap.app", "seller").await;
    let admin = app.login("admin@medisnap.app", "admin").await;
    let user = app.login("buyer@medisnap.app", "user").await;

    for token in [&seller, &admin] {
        app.server
            .post("/medicine")
            .authorization_bearer(token)
            .json(&json!({ "name": "Napa" }))
            .await
            .assert_status_ok();
    }

    app.server
        .post("/medicine")
        .authorization_bearer(&user)
        .json(&json!({ "name": "Napa" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    assert_eq!(app.store.inner.count(Collection::Medicines).await, 2);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_create_user_twice_reports_existing() {
    let app = TestApp::new();
    let body = json!({ "email": "new@medisnap.app", "name": "New", "role": "user" });

    let first = app.server.post("/user").json(&body).await;
    first.assert_status_ok();
    assert!(first.json::<Value>()["insertedId"].is_string());

    let second = app.server.post("/user").json(&body).await;
    second.assert_status_ok();
    assert_eq!(
        second.json::<Value>(),
        json!({ "message": "user already exists", "insertedId": null })
    );

    assert_eq!(app.store.inner.count(Collection::Users).await, 1);
}

#[tokio::test]
async fn test_create_user_requires_email() {
    let app = TestApp::new();

    app.server
        .post("/user")
        .json(&json!({ "name": "Nobody" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_patch_keeps_other_fields() {
    let app = TestApp::new();
    let admin = app.login("admin@medisnap.app", "admin").await;
    app.seed_user("buyer@medisnap.app", "user").await;

    let response = app
        .server
        .patch("/user/buyer@medisnap.app")
        .authorization_bearer(&admin)
        .json(&json!({ "role": "seller" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["modifiedCount"], 1);

    let user = app.server.get("/user/buyer@medisnap.app").await.json::<Value>();
    assert_eq!(user["role"], "seller");
    assert_eq!(user["name"], "Test");
}

#[tokio::test]
async fn test_empty_patch_is_bad_request() {
    let app = TestApp::new();
    let admin = app.login("admin@medisnap.app", "admin").await;

    app.server
        .patch("/user/admin@medisnap.app")
        .authorization_bearer(&admin)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// Catalogue
// =============================================================================

#[tokio::test]
async fn test_discount_excludes_zero_discount() {
    let app = TestApp::new();
    for (name, discount) in [("A", json!("0")), ("B", json!("10"))] {
        app.store
            .inner
            .insert_one(
                Collection::Medicines,
                as_document(json!({ "name": name, "discountPercentage": discount })),
            )
            .await
            .unwrap();
    }
    app.store
        .inner
        .insert_one(Collection::Medicines, as_document(json!({ "name": "C" })))
        .await
        .unwrap();

    let discounted = app.server.get("/discount").await.json::<Vec<Value>>();
    let names: Vec<&str> = discounted.iter().filter_map(|m| m["name"].as_str()).collect();

    assert_eq!(names, vec!["B", "C"]);
}

#[tokio::test]
async fn test_seller_medicines_filtered_by_adder() {
    let app = TestApp::new();
    let token = app.login("seller@medisnap.app", "seller").await;

    for adder in ["seller@medisnap.app", "other@medisnap.app"] {
        app.store
            .inner
            .insert_one(
                Collection::Medicines,
                as_document(json!({ "name": "Napa", "addederEmail": adder })),
            )
            .await
            .unwrap();
    }

    let mine = app
        .server
        .get("/medicines/seller@medisnap.app")
        .authorization_bearer(&token)
        .await
        .json::<Vec<Value>>();

    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["addederEmail"], "seller@medisnap.app");
}

#[tokio::test]
async fn test_lookup_by_id() {
    let app = TestApp::new();

    app.server
        .get("/mediDetails/not-an-id")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let missing = app.server.get("/mediDetails/aaaaaaaaaaaaaaaaaaaaaaaa").await;
    missing.assert_status_ok();
    assert_eq!(missing.json::<Value>(), Value::Null);
}

#[tokio::test]
async fn test_replace_category_drops_absent_fields() {
    let app = TestApp::new();
    let admin = app.login("admin@medisnap.app", "admin").await;

    let created = app
        .server
        .post("/category")
        .authorization_bearer(&admin)
        .json(&json!({ "categoryName": "Tablet", "image": "tablet.png" }))
        .await
        .json::<Value>();
    let id = created["insertedId"].as_str().unwrap().to_string();

    let replaced = app
        .server
        .put(&format!("/category/{id}"))
        .authorization_bearer(&admin)
        .json(&json!({ "categoryName": "Syrup" }))
        .await;
    replaced.assert_status_ok();
    assert_eq!(replaced.json::<Value>()["matchedCount"], 1);

    let category = app
        .server
        .get(&format!("/ctgDetails/{id}"))
        .await
        .json::<Value>();
    assert_eq!(category["_id"], id.as_str());
    assert_eq!(category["categoryName"], "Syrup");
    assert!(category.get("image").is_none());
}

#[tokio::test]
async fn test_categories_by_name_on_both_paths() {
    let app = TestApp::new();
    app.store
        .inner
        .insert_one(
            Collection::Categories,
            as_document(json!({ "categoryName": "Tablet" })),
        )
        .await
        .unwrap();

    for path in ["/categoryDetails/Tablet", "/specificCategories/Tablet"] {
        let found = app.server.get(path).await.json::<Vec<Value>>();
        assert_eq!(found.len(), 1, "{path}");
    }
}

// =============================================================================
// Carts
// =============================================================================

#[tokio::test]
async fn test_cart_lifecycle() {
    let app = TestApp::new();
    let token = app.login("buyer@medisnap.app", "user").await;

    let created = app
        .server
        .post("/selectedCart")
        .authorization_bearer(&token)
        .json(&json!({ "selecterEmail": "buyer@medisnap.app", "name": "Napa", "massUnit": 1 }))
        .await
        .json::<Value>();
    let id = created["insertedId"].as_str().unwrap().to_string();

    let updated = app
        .server
        .patch(&format!("/massUnit/{id}"))
        .authorization_bearer(&token)
        .json(&json!({ "massUnit": 3 }))
        .await
        .json::<Value>();
    assert_eq!(updated["modifiedCount"], 1);

    let cart = app
        .server
        .get("/selectedCarts/buyer@medisnap.app")
        .authorization_bearer(&token)
        .await
        .json::<Vec<Value>>();
    assert_eq!(cart[0]["massUnit"], 3);
    assert_eq!(cart[0]["name"], "Napa");

    let deleted = app
        .server
        .delete(&format!("/cart/{id}"))
        .authorization_bearer(&token)
        .await
        .json::<Value>();
    assert_eq!(deleted["deletedCount"], 1);

    let found = app
        .store
        .inner
        .find_one(
            Collection::Carts,
            &Filter::by_id(&medi_core::DocumentId::parse(&id).unwrap()),
        )
        .await
        .unwrap();
    assert!(found.is_none());
}

// =============================================================================
// Payments
// =============================================================================

#[tokio::test]
async fn test_payment_intent_rejects_non_positive_price() {
    let app = TestApp::new();
    let token = app.login("buyer@medisnap.app", "user").await;

    for price in [json!(0), json!(-3), json!("abc")] {
        app.server
            .post("/create-payment-intent")
            .authorization_bearer(&token)
            .json(&json!({ "price": price }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    assert_eq!(app.payments.calls(), 0);
}

#[tokio::test]
async fn test_payment_intent_returns_client_secret() {
    let app = TestApp::new();
    let token = app.login("buyer@medisnap.app", "user").await;

    let response = app
        .server
        .post("/create-payment-intent")
        .authorization_bearer(&token)
        .json(&json!({ "price": "12.50" }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "clientSecret": "pi_test_1_secret_abc" })
    );

    let requests = app.payments.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount, 1250);
}

#[tokio::test]
async fn test_payment_provider_failure_is_bad_gateway() {
    let app = TestApp::with_provider(RecordingProvider {
        fail: true,
        ..Default::default()
    });
    let token = app.login("buyer@medisnap.app", "user").await;

    let response = app
        .server
        .post("/create-payment-intent")
        .authorization_bearer(&token)
        .json(&json!({ "price": 10 }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>()["code"], 502);
}

#[tokio::test]
async fn test_revenue_views() {
    let app = TestApp::new();
    let admin = app.login("admin@medisnap.app", "admin").await;
    let seller = app.login("seller@medisnap.app", "seller").await;

    for (seller_email, status) in [
        ("seller@medisnap.app", "paid"),
        ("seller@medisnap.app", "pending"),
        ("other@medisnap.app", "paid"),
    ] {
        app.store
            .inner
            .insert_one(
                Collection::Payments,
                as_document(json!({ "sellerEmail": seller_email, "status": status })),
            )
            .await
            .unwrap();
    }

    for path in ["/seles", "/sales", "/adminPaidRevenue"] {
        let paid = app
            .server
            .get(path)
            .authorization_bearer(&admin)
            .await
            .json::<Vec<Value>>();
        assert_eq!(paid.len(), 2, "{path}");
    }

    let pending = app
        .server
        .get("/sellerPendingRevenue/seller@medisnap.app")
        .authorization_bearer(&seller)
        .await
        .json::<Vec<Value>>();
    assert_eq!(pending.len(), 1);

    let history = app
        .server
        .get("/sellerPaymentHistory")
        .authorization_bearer(&seller)
        .await
        .json::<Vec<Value>>();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|p| p["sellerEmail"] == "seller@medisnap.app"));
}

#[tokio::test]
async fn test_admin_marks_payment_paid() {
    let app = TestApp::new();
    let admin = app.login("admin@medisnap.app", "admin").await;
    let user = app.login("buyer@medisnap.app", "user").await;

    let created = app
        .server
        .post("/payment")
        .authorization_bearer(&user)
        .json(&json!({ "email": "buyer@medisnap.app", "status": "pending", "price": 12.5 }))
        .await
        .json::<Value>();
    let id = created["insertedId"].as_str().unwrap().to_string();

    app.server
        .patch(&format!("/paymentStatus/{id}"))
        .authorization_bearer(&admin)
        .json(&json!({ "status": "paid" }))
        .await
        .assert_status_ok();

    let history = app
        .server
        .get("/userPaymentHistory/buyer@medisnap.app")
        .authorization_bearer(&user)
        .await
        .json::<Vec<Value>>();
    assert_eq!(history[0]["status"], "paid");
    assert_eq!(history[0]["price"], 12.5);
}

// =============================================================================
// Service endpoints
// =============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let app = TestApp::new();

    app.server.get("/").await.assert_text("Hello from MediSnap Server..");

    let health = app.server.get("/health").await.json::<Value>();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["storage"]["backend"], "counting-memory");
    assert_eq!(health["payments"], "recording");
}

#[tokio::test]
async fn test_wrong_method_is_json_method_not_allowed() {
    let app = TestApp::new();

    let response = app.server.get("/jwt").await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.json::<Value>()["code"], 405);

    let response = app.server.delete("/medicines").await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.json::<Value>()["code"], 405);
}

#[tokio::test]
async fn test_wrong_method_on_guarded_path_is_not_auth_checked() {
    let app = TestApp::new();
    let before = app.store.operations();

    for response in [
        app.server.delete("/user/a@x.com").await,
        app.server.post("/users").await,
        app.server.get("/cart/aaaaaaaaaaaaaaaaaaaaaaaa").await,
    ] {
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.json::<Value>()["code"], 405);
    }

    assert_eq!(app.store.operations(), before);
}

#[tokio::test]
async fn test_cors_echoes_configured_origin_only() {
    let app = TestApp::with_allowed_origins("http://localhost:5173");

    let allowed = app
        .server
        .get("/medicines")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:5173"))
        .await;
    allowed.assert_status_ok();
    assert_eq!(
        allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("http://localhost:5173"))
    );

    let other = app
        .server
        .get("/medicines")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://evil.example"))
        .await;
    assert!(other
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/medicines")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://shop.example"))
        .await;

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("*"))
    );
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let app = TestApp::new();

    let response = app.server.get("/no/such/route").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], 404);
}
