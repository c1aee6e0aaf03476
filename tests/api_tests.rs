//! End-to-end API tests over the full router and a throwaway sqlite file.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;
use vendoor::config::Config;
use vendoor::db::ProductInput;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "changeme";

async fn spawn_app() -> (Arc<vendoor::api::AppState>, Router) {
    let db_path =
        std::env::temp_dir().join(format!("vendoor-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;

    let state = vendoor::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");

    let router = vendoor::api::router(state.clone()).await;
    (state, router)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn cookie_value(response: &axum::response::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .into_iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| {
            let (pair, _) = raw.split_once(';').unwrap_or((raw, ""));
            let (cookie_name, value) = pair.split_once('=')?;
            (cookie_name == name).then(|| value.to_string())
        })
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed(method: &str, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));

    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Registers a fresh user and returns their access token.
async fn register_and_login(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            serde_json::json!({
                "name": "Test User",
                "email": email,
                "password": "password123"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    login(app, email, "password123").await
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    cookie_value(&response, "accessToken").expect("login should set an access token cookie")
}

fn sample_product(name: &str, price: f64, category: &str, sizes: &[&str]) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        brand: "Acme".to_string(),
        description: "A sample product".to_string(),
        category: category.to_string(),
        gender: "unisex".to_string(),
        sizes: serde_json::to_string(sizes).unwrap(),
        colors: serde_json::to_string(&["Red", "Blue"]).unwrap(),
        price,
        stock: 10,
        rating: 0.0,
    }
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn health_endpoint_is_public() {
    let (_, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (_, app) = spawn_app().await;

    let payload = serde_json::json!({
        "name": "Dup",
        "email": "dup@example.com",
        "password": "password123"
    });

    let first = app
        .clone()
        .oneshot(post_json("/api/auth/register", payload.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .clone()
        .oneshot(post_json("/api/auth/register", payload))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_with_wrong_password_sets_no_cookies() {
    let (_, app) = spawn_app().await;
    register_and_login(&app, "shopper@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            serde_json::json!({ "email": "shopper@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(cookie_value(&response, "accessToken").is_none());
    assert!(cookie_value(&response, "refreshToken").is_none());
}

#[tokio::test]
async fn login_sets_both_token_cookies() {
    let (_, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie_value(&response, "accessToken").is_some());
    assert!(cookie_value(&response, "refreshToken").is_some());

    let body = json_body(response).await;
    assert_eq!(body["data"]["role"], "SUPER_ADMIN");
}

#[tokio::test]
async fn refresh_rotates_the_refresh_token() {
    let (_, app) = spawn_app().await;
    register_and_login(&app, "rotate@example.com").await;

    let login_response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            serde_json::json!({ "email": "rotate@example.com", "password": "password123" }),
        ))
        .await
        .unwrap();
    let old_refresh = cookie_value(&login_response, "refreshToken").unwrap();

    let refresh_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/refresh-token")
                .header("Cookie", format!("refreshToken={old_refresh}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(refresh_response.status(), StatusCode::OK);

    let new_refresh = cookie_value(&refresh_response, "refreshToken").unwrap();
    assert_ne!(new_refresh, old_refresh);

    // The rotated-out token is single-use.
    let replay = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/refresh-token")
                .header("Cookie", format!("refreshToken={old_refresh}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_refresh_token() {
    let (_, app) = spawn_app().await;
    register_and_login(&app, "bye@example.com").await;

    let login_response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            serde_json::json!({ "email": "bye@example.com", "password": "password123" }),
        ))
        .await
        .unwrap();
    let refresh = cookie_value(&login_response, "refreshToken").unwrap();

    let logout_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header("Cookie", format!("refreshToken={refresh}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(logout_response.status(), StatusCode::OK);

    let refresh_after_logout = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/refresh-token")
                .header("Cookie", format!("refreshToken={refresh}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(refresh_after_logout.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_authentication() {
    let (_, app) = spawn_app().await;

    for uri in [
        "/api/cart/fetch-cart",
        "/api/address/list",
        "/api/products/fetch-client-products",
        "/api/settings/get-banners",
        "/api/coupon/fetch-all-coupon",
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let (_, app) = spawn_app().await;
    let token = register_and_login(&app, "pleb@example.com").await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/coupon/create-coupon",
            &token,
            Some(serde_json::json!({
                "code": "NOPE",
                "discountPercent": 10,
                "startDate": "2026-01-01T00:00:00Z",
                "endDate": "2026-02-01T00:00:00Z",
                "usageLimit": 5
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let fetch_admin = app
        .clone()
        .oneshot(authed(
            "GET",
            "/api/products/fetch-admin-products",
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(fetch_admin.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Addresses
// ============================================================================

#[tokio::test]
async fn only_one_address_stays_default() {
    let (_, app) = spawn_app().await;
    let token = register_and_login(&app, "addr@example.com").await;

    let make_address = |name: &str, is_default: bool| {
        serde_json::json!({
            "name": name,
            "address": "1 Main St",
            "city": "Springfield",
            "country": "US",
            "postalCode": "12345",
            "phone": "555-0100",
            "isDefault": is_default
        })
    };

    let first = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/address/add",
            &token,
            Some(make_address("Home", true)),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_id = json_body(first).await["data"]["id"].as_i64().unwrap();

    let second = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/address/add",
            &token,
            Some(make_address("Work", true)),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    let list = app
        .clone()
        .oneshot(authed("GET", "/api/address/list", &token, None))
        .await
        .unwrap();
    let body = json_body(list).await;
    let addresses = body["data"].as_array().unwrap();
    assert_eq!(addresses.len(), 2);

    let defaults: Vec<_> = addresses
        .iter()
        .filter(|a| a["isDefault"].as_bool().unwrap())
        .collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["name"], "Work");

    // Updating the first one back to default flips it over.
    let update = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/address/update/{first_id}"),
            &token,
            Some(make_address("Home", true)),
        ))
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::OK);

    let list = app
        .clone()
        .oneshot(authed("GET", "/api/address/list", &token, None))
        .await
        .unwrap();
    let body = json_body(list).await;
    let defaults: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["isDefault"].as_bool().unwrap())
        .collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["name"], "Home");
}

#[tokio::test]
async fn addresses_are_scoped_to_their_owner() {
    let (_, app) = spawn_app().await;
    let owner = register_and_login(&app, "owner@example.com").await;
    let other = register_and_login(&app, "other@example.com").await;

    let created = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/address/add",
            &owner,
            Some(serde_json::json!({
                "name": "Home",
                "address": "1 Main St",
                "city": "Springfield",
                "country": "US",
                "postalCode": "12345",
                "phone": "555-0100",
                "isDefault": false
            })),
        ))
        .await
        .unwrap();
    let id = json_body(created).await["data"]["id"].as_i64().unwrap();

    let delete = app
        .clone()
        .oneshot(authed(
            "DELETE",
            &format!("/api/address/delete/{id}"),
            &other,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    let list = app
        .clone()
        .oneshot(authed("GET", "/api/address/list", &other, None))
        .await
        .unwrap();
    assert!(json_body(list).await["data"].as_array().unwrap().is_empty());
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn adding_the_same_line_merges_quantities() {
    let (state, app) = spawn_app().await;
    let token = register_and_login(&app, "cart@example.com").await;

    let product = state
        .store()
        .create_product(
            sample_product("Sneaker", 59.99, "shoes", &["M", "L"]),
            r#"["https://img.example/1.jpg"]"#.to_string(),
        )
        .await
        .unwrap();

    let add = |size: &str, quantity: i32| {
        serde_json::json!({
            "productId": product.id,
            "quantity": quantity,
            "size": size,
            "color": "Red"
        })
    };

    for payload in [add("M", 2), add("M", 3), add("L", 1)] {
        let response = app
            .clone()
            .oneshot(authed("POST", "/api/cart/add-to-cart", &token, Some(payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let fetch = app
        .clone()
        .oneshot(authed("GET", "/api/cart/fetch-cart", &token, None))
        .await
        .unwrap();
    let body = json_body(fetch).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    let m_line = items.iter().find(|i| i["size"] == "M").unwrap();
    assert_eq!(m_line["quantity"], 5);
    assert_eq!(m_line["name"], "Sneaker");
    assert_eq!(m_line["image"], "https://img.example/1.jpg");

    let l_line = items.iter().find(|i| i["size"] == "L").unwrap();
    assert_eq!(l_line["quantity"], 1);
}

#[tokio::test]
async fn cart_update_remove_and_clear() {
    let (state, app) = spawn_app().await;
    let token = register_and_login(&app, "cart2@example.com").await;

    let product = state
        .store()
        .create_product(
            sample_product("Tee", 19.99, "shirts", &["S"]),
            "[]".to_string(),
        )
        .await
        .unwrap();

    let add = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/cart/add-to-cart",
            &token,
            Some(serde_json::json!({
                "productId": product.id,
                "quantity": 1,
                "size": "S",
                "color": "Blue"
            })),
        ))
        .await
        .unwrap();
    let item_id = json_body(add).await["data"]["id"].as_i64().unwrap();

    let update = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/cart/update/{item_id}"),
            &token,
            Some(serde_json::json!({ "quantity": 7 })),
        ))
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::OK);
    assert_eq!(json_body(update).await["data"]["quantity"], 7);

    // A different user cannot touch the item.
    let intruder = register_and_login(&app, "intruder@example.com").await;
    let foreign_update = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/cart/update/{item_id}"),
            &intruder,
            Some(serde_json::json!({ "quantity": 1 })),
        ))
        .await
        .unwrap();
    assert_eq!(foreign_update.status(), StatusCode::NOT_FOUND);

    let remove = app
        .clone()
        .oneshot(authed(
            "DELETE",
            &format!("/api/cart/remove/{item_id}"),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(remove.status(), StatusCode::OK);

    let fetch = app
        .clone()
        .oneshot(authed("GET", "/api/cart/fetch-cart", &token, None))
        .await
        .unwrap();
    assert!(json_body(fetch).await["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn updating_quantity_to_zero_succeeds_with_product_details() {
    let (state, app) = spawn_app().await;
    let token = register_and_login(&app, "zeroqty@example.com").await;

    let product = state
        .store()
        .create_product(
            sample_product("Hoodie", 49.5, "hoodies", &["M"]),
            "[\"https://img.example/hoodie.jpg\"]".to_string(),
        )
        .await
        .unwrap();

    let add = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/cart/add-to-cart",
            &token,
            Some(serde_json::json!({
                "productId": product.id,
                "quantity": 3,
                "size": "M",
                "color": "Black"
            })),
        ))
        .await
        .unwrap();
    let item_id = json_body(add).await["data"]["id"].as_i64().unwrap();

    // Quantity is overwritten as sent, zero included.
    let update = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/cart/update/{item_id}"),
            &token,
            Some(serde_json::json!({ "quantity": 0 })),
        ))
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::OK);
    let body = json_body(update).await;
    assert_eq!(body["data"]["quantity"], 0);
    assert_eq!(body["data"]["name"], "Hoodie");
    assert_eq!(body["data"]["price"], 49.5);
    assert_eq!(body["data"]["image"], "https://img.example/hoodie.jpg");
}

#[tokio::test]
async fn deleting_a_product_clears_it_from_carts() {
    let (state, app) = spawn_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let token = register_and_login(&app, "cascade@example.com").await;

    let product = state
        .store()
        .create_product(
            sample_product("Doomed", 5.0, "misc", &["S"]),
            "[]".to_string(),
        )
        .await
        .unwrap();

    let add = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/cart/add-to-cart",
            &token,
            Some(serde_json::json!({
                "productId": product.id,
                "quantity": 1,
                "size": "S",
                "color": "Red"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(add.status(), StatusCode::OK);

    let delete = app
        .clone()
        .oneshot(authed(
            "DELETE",
            &format!("/api/products/{}", product.id),
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::OK);

    let fetch = app
        .clone()
        .oneshot(authed("GET", "/api/cart/fetch-cart", &token, None))
        .await
        .unwrap();
    assert!(json_body(fetch).await["data"].as_array().unwrap().is_empty());
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn client_listing_filters_sorts_and_paginates() {
    let (state, app) = spawn_app().await;
    let token = register_and_login(&app, "browse@example.com").await;

    for (name, price, category, sizes) in [
        ("Cheap Tee", 9.0, "shirts", ["S", "M"].as_slice()),
        ("Mid Tee", 25.0, "shirts", ["XS", "M"].as_slice()),
        ("Fancy Tee", 45.0, "shirts", ["S"].as_slice()),
        ("Boots", 80.0, "shoes", ["L"].as_slice()),
    ] {
        state
            .store()
            .create_product(sample_product(name, price, category, sizes), "[]".to_string())
            .await
            .unwrap();
    }

    // Price window, ascending.
    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            "/api/products/fetch-client-products?minPrice=10&maxPrice=50&sortBy=price&sortOrder=asc",
            &token,
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["totalProducts"], 2);
    let names: Vec<_> = body["data"]["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Mid Tee", "Fancy Tee"]);

    // Size filter matches whole tokens only; "S" must not match "XS".
    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            "/api/products/fetch-client-products?sizes=S",
            &token,
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    let names: Vec<_> = body["data"]["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&"Cheap Tee".to_string()));
    assert!(names.contains(&"Fancy Tee".to_string()));
    assert!(!names.contains(&"Mid Tee".to_string()));

    // Pagination totals.
    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            "/api/products/fetch-client-products?categories=shirts&limit=2&page=2&sortBy=price&sortOrder=asc",
            &token,
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["totalProducts"], 3);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(body["data"]["currentPage"], 2);
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["products"][0]["name"], "Fancy Tee");
}

#[tokio::test]
async fn admin_can_update_and_fetch_products() {
    let (state, app) = spawn_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let product = state
        .store()
        .create_product(
            sample_product("Original", 10.0, "misc", &["S"]),
            r#"["https://img.example/keep.jpg"]"#.to_string(),
        )
        .await
        .unwrap();

    let update = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/products/{}", product.id),
            &admin,
            Some(serde_json::json!({
                "name": "Renamed",
                "brand": "Acme",
                "description": "Updated",
                "category": "misc",
                "gender": "unisex",
                "sizes": ["S", "M"],
                "colors": ["Green"],
                "price": 12.5,
                "stock": 3
            })),
        ))
        .await
        .unwrap();
    assert_eq!(update.status(), StatusCode::OK);

    let body = json_body(update).await;
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["price"], 12.5);
    // Images survive scalar updates untouched.
    assert_eq!(body["data"]["images"][0], "https://img.example/keep.jpg");

    let listing = app
        .clone()
        .oneshot(authed(
            "GET",
            "/api/products/fetch-admin-products",
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::OK);
    assert_eq!(json_body(listing).await["data"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn featured_set_is_replaced_wholesale_and_capped() {
    let (state, app) = spawn_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let mut ids = Vec::new();
    for i in 0..3 {
        let p = state
            .store()
            .create_product(
                sample_product(&format!("P{i}"), 10.0, "misc", &["S"]),
                "[]".to_string(),
            )
            .await
            .unwrap();
        ids.push(p.id);
    }

    let set = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/settings/update-featured-products",
            &admin,
            Some(serde_json::json!({ "productIds": [ids[0], ids[1]] })),
        ))
        .await
        .unwrap();
    assert_eq!(set.status(), StatusCode::OK);

    let fetch = app
        .clone()
        .oneshot(authed(
            "GET",
            "/api/settings/fetch-featured-products",
            &admin,
            None,
        ))
        .await
        .unwrap();
    let body = json_body(fetch).await;
    let featured: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(featured.len(), 2);
    assert!(featured.contains(&i64::from(ids[0])));
    assert!(featured.contains(&i64::from(ids[1])));

    // Over the cap: rejected without touching the stored set.
    let too_many: Vec<i32> = (1..=9).collect();
    let rejected = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/settings/update-featured-products",
            &admin,
            Some(serde_json::json!({ "productIds": too_many })),
        ))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let fetch = app
        .clone()
        .oneshot(authed(
            "GET",
            "/api/settings/fetch-featured-products",
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(fetch).await["data"].as_array().unwrap().len(), 2);

    // Replacement is wholesale, not additive.
    let replace = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/settings/update-featured-products",
            &admin,
            Some(serde_json::json!({ "productIds": [ids[2]] })),
        ))
        .await
        .unwrap();
    assert_eq!(replace.status(), StatusCode::OK);

    let fetch = app
        .clone()
        .oneshot(authed(
            "GET",
            "/api/settings/fetch-featured-products",
            &admin,
            None,
        ))
        .await
        .unwrap();
    let body = json_body(fetch).await;
    let featured = body["data"].as_array().unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0]["id"].as_i64().unwrap(), i64::from(ids[2]));
}

#[tokio::test]
async fn banners_are_listed_for_shoppers() {
    let (state, app) = spawn_app().await;
    let token = register_and_login(&app, "banners@example.com").await;

    state
        .store()
        .add_banners(vec![
            "https://img.example/banner-1.jpg".to_string(),
            "https://img.example/banner-2.jpg".to_string(),
        ])
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/settings/get-banners", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Coupons
// ============================================================================

#[tokio::test]
async fn coupon_lifecycle() {
    let (_, app) = spawn_app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let shopper = register_and_login(&app, "saver@example.com").await;

    let payload = serde_json::json!({
        "code": "SPRING20",
        "discountPercent": 20,
        "startDate": "2026-03-01T00:00:00Z",
        "endDate": "2026-04-01T00:00:00Z",
        "usageLimit": 100
    });

    let created = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/coupon/create-coupon",
            &admin,
            Some(payload.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);
    let body = json_body(created).await;
    assert_eq!(body["data"]["usageCount"], 0);
    let id = body["data"]["id"].as_i64().unwrap();

    let duplicate = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/coupon/create-coupon",
            &admin,
            Some(payload),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let inverted_dates = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/coupon/create-coupon",
            &admin,
            Some(serde_json::json!({
                "code": "BACKWARDS",
                "discountPercent": 10,
                "startDate": "2026-04-01T00:00:00Z",
                "endDate": "2026-03-01T00:00:00Z",
                "usageLimit": 1
            })),
        ))
        .await
        .unwrap();
    assert_eq!(inverted_dates.status(), StatusCode::BAD_REQUEST);

    let listing = app
        .clone()
        .oneshot(authed("GET", "/api/coupon/fetch-all-coupon", &shopper, None))
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::OK);
    assert_eq!(json_body(listing).await["data"].as_array().unwrap().len(), 1);

    let deleted = app
        .clone()
        .oneshot(authed("DELETE", &format!("/api/coupon/{id}"), &admin, None))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);

    let missing = app
        .clone()
        .oneshot(authed("DELETE", &format!("/api/coupon/{id}"), &admin, None))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
