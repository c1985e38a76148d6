use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine as _;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::ConnectOptions;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use server::{ServerState, router};

async fn test_router() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder().database(db).build().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

fn basic_auth(username: &str, password: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn signup(app: &Router, username: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/signup",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "secret",
            "about": null,
            "avatar": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn create_wish(app: &Router, auth: &str, price_minor: i64) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/wishes",
        Some(auth),
        Some(json!({
            "name": "Espresso machine",
            "link": "https://shop.example/espresso",
            "image": "https://shop.example/espresso.jpg",
            "price_minor": price_minor,
            "description": "A very shiny espresso machine",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn signup_conflicts_on_duplicate_username() {
    let app = test_router().await;
    let body = signup(&app, "alice").await;
    assert_eq!(body["username"], "alice");

    let (status, _) = send(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "secret",
            "about": null,
            "avatar": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn protected_routes_require_credentials() {
    let app = test_router().await;
    signup(&app, "alice").await;

    let (status, _) = send(&app, "GET", "/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let bad = basic_auth("alice", "wrong");
    let (status, _) = send(&app, "GET", "/users/me", Some(&bad), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let good = basic_auth("alice", "secret");
    let (status, body) = send(&app, "GET", "/users/me", Some(&good), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
}

#[tokio::test]
async fn contribution_flow_with_hidden_redaction() {
    let app = test_router().await;
    signup(&app, "alice").await;
    signup(&app, "bob").await;
    let alice = basic_auth("alice", "secret");
    let bob = basic_auth("bob", "secret");

    let wish = create_wish(&app, &alice, 10_000).await;
    let wish_id = wish["id"].as_str().unwrap().to_string();

    let (status, offer) = send(
        &app,
        "POST",
        "/offers",
        Some(&bob),
        Some(json!({"item_id": wish_id, "amount_minor": 2_500, "hidden": true})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(offer["amount_minor"], 2_500);
    assert_eq!(offer["item"]["raised_minor"], 2_500);

    // Anonymous callers and non-owners see a zeroed amount, flag intact.
    let (status, view) = send(&app, "GET", &format!("/wishes/{wish_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["raised_minor"], 2_500);
    assert_eq!(view["offers"][0]["amount_minor"], 0);
    assert_eq!(view["offers"][0]["hidden"], true);
    assert_eq!(view["offers"][0]["user"]["username"], "bob");

    let (_, view) = send(&app, "GET", &format!("/wishes/{wish_id}"), Some(&bob), None).await;
    assert_eq!(view["offers"][0]["amount_minor"], 0);

    // The owner sees the true amount.
    let (_, view) = send(&app, "GET", &format!("/wishes/{wish_id}"), Some(&alice), None).await;
    assert_eq!(view["offers"][0]["amount_minor"], 2_500);

    // The contributor sees their own pledge unredacted under /offers.
    let (status, offers) = send(&app, "GET", "/offers", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(offers[0]["amount_minor"], 2_500);
}

#[tokio::test]
async fn offer_rejections_map_to_stable_statuses() {
    let app = test_router().await;
    signup(&app, "alice").await;
    signup(&app, "bob").await;
    let alice = basic_auth("alice", "secret");
    let bob = basic_auth("bob", "secret");

    let wish = create_wish(&app, &alice, 10_000).await;
    let wish_id = wish["id"].as_str().unwrap().to_string();

    // Self-funding is forbidden.
    let (status, _) = send(
        &app,
        "POST",
        "/offers",
        Some(&alice),
        Some(json!({"item_id": wish_id, "amount_minor": 100, "hidden": false})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Exceeding the cap is unprocessable.
    let (status, _) = send(
        &app,
        "POST",
        "/offers",
        Some(&bob),
        Some(json!({"item_id": wish_id, "amount_minor": 10_001, "hidden": false})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Unknown wish is not found.
    let (status, _) = send(
        &app,
        "POST",
        "/offers",
        Some(&bob),
        Some(json!({
            "item_id": "00000000-0000-4000-8000-000000000000",
            "amount_minor": 100,
            "hidden": false,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The wish is untouched by the rejections.
    let (_, view) = send(&app, "GET", &format!("/wishes/{wish_id}"), None, None).await;
    assert_eq!(view["raised_minor"], 0);
    assert_eq!(view["offers"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn price_locks_after_first_offer() {
    let app = test_router().await;
    signup(&app, "alice").await;
    signup(&app, "bob").await;
    let alice = basic_auth("alice", "secret");
    let bob = basic_auth("bob", "secret");

    let wish = create_wish(&app, &alice, 10_000).await;
    let wish_id = wish["id"].as_str().unwrap().to_string();

    // Unfunded: price moves freely.
    let (status, view) = send(
        &app,
        "PATCH",
        &format!("/wishes/{wish_id}"),
        Some(&alice),
        Some(json!({"price_minor": 12_000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["price_minor"], 12_000);

    send(
        &app,
        "POST",
        "/offers",
        Some(&bob),
        Some(json!({"item_id": wish_id, "amount_minor": 500, "hidden": false})),
    )
    .await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/wishes/{wish_id}"),
        Some(&alice),
        Some(json!({"price_minor": 15_000})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Other fields stay editable, and only by the owner.
    let (status, view) = send(
        &app,
        "PATCH",
        &format!("/wishes/{wish_id}"),
        Some(&alice),
        Some(json!({"name": "Espresso machine, chrome"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["name"], "Espresso machine, chrome");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/wishes/{wish_id}"),
        Some(&bob),
        Some(json!({"name": "Mine now"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn copy_bumps_counter_and_resets_funding() {
    let app = test_router().await;
    signup(&app, "alice").await;
    signup(&app, "bob").await;
    let alice = basic_auth("alice", "secret");
    let bob = basic_auth("bob", "secret");

    let wish = create_wish(&app, &alice, 10_000).await;
    let wish_id = wish["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/wishes/{wish_id}/copy"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, copy) = send(
        &app,
        "POST",
        &format!("/wishes/{wish_id}/copy"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copy["raised_minor"], 0);
    assert_eq!(copy["copied"], 0);
    assert_eq!(copy["owner"]["username"], "bob");
    assert_eq!(copy["offers"].as_array().unwrap().len(), 0);
    assert_ne!(copy["id"], wish["id"]);

    let (_, view) = send(&app, "GET", &format!("/wishes/{wish_id}"), None, None).await;
    assert_eq!(view["copied"], 1);
}

#[tokio::test]
async fn wishlists_drop_unknown_ids_and_replace_wholesale() {
    let app = test_router().await;
    signup(&app, "alice").await;
    let alice = basic_auth("alice", "secret");

    let first = create_wish(&app, &alice, 10_000).await;
    let second = create_wish(&app, &alice, 20_000).await;
    let first_id = first["id"].as_str().unwrap().to_string();
    let second_id = second["id"].as_str().unwrap().to_string();

    let (status, wishlist) = send(
        &app,
        "POST",
        "/wishlists",
        Some(&alice),
        Some(json!({
            "name": "Kitchen",
            "image": "https://img.example/kitchen.jpg",
            "item_ids": [first_id, "00000000-0000-4000-8000-000000000000"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(wishlist["items"].as_array().unwrap().len(), 1);
    let wishlist_id = wishlist["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, "GET", "/wishlists", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/wishlists/{wishlist_id}"),
        Some(&alice),
        Some(json!({"item_ids": [second_id]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = updated["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], second["id"]);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/wishlists/{wishlist_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/wishlists/{wishlist_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_wish_cascades_offers() {
    let app = test_router().await;
    signup(&app, "alice").await;
    signup(&app, "bob").await;
    let alice = basic_auth("alice", "secret");
    let bob = basic_auth("bob", "secret");

    let wish = create_wish(&app, &alice, 10_000).await;
    let wish_id = wish["id"].as_str().unwrap().to_string();

    send(
        &app,
        "POST",
        "/offers",
        Some(&bob),
        Some(json!({"item_id": wish_id, "amount_minor": 500, "hidden": false})),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/wishes/{wish_id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/wishes/{wish_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/wishes/{wish_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, offers) = send(&app, "GET", "/offers", Some(&bob), None).await;
    assert_eq!(offers.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn public_listings_and_profiles() {
    let app = test_router().await;
    signup(&app, "alice").await;
    let alice = basic_auth("alice", "secret");
    create_wish(&app, &alice, 10_000).await;

    let (status, last) = send(&app, "GET", "/wishes/last", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(last.as_array().unwrap().len(), 1);

    let (status, top) = send(&app, "GET", "/wishes/top", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(top.as_array().unwrap().len(), 1);

    let (status, profile) = send(&app, "GET", "/users/alice", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "alice");
    // Public profiles never carry the email.
    assert!(profile.get("email").is_none());

    let (status, wishes) = send(&app, "GET", "/users/alice/wishes", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wishes.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/users/nobody", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
