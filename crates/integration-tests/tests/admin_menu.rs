//! Integration tests for the admin menu CRUD API.
//!
//! These tests require:
//! - A migrated database (cargo run -p mensa-cli -- migrate)
//! - The admin server running (cargo run -p mensa-admin)
//!
//! Run with: cargo test -p mensa-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the admin API (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create a client holding a fresh authenticated session.
///
/// Registers a throwaway account; self-registration grants the content
/// manager role, which is sufficient for menu mutations.
async fn authenticated_client() -> Client {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client");

    let email = format!("menu-test-{}@canteen.test", Uuid::new_v4());
    let resp = client
        .post(format!("{}/auth/sign-up", admin_base_url()))
        .json(&json!({
            "email": email,
            "password": "Password1",
            "confirmPassword": "Password1",
        }))
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(resp.status(), StatusCode::CREATED);

    client
}

/// Test helper: create a menu item and return its JSON record.
async fn create_item(client: &Client, body: &Value) -> Value {
    let resp = client
        .post(format!("{}/menu", admin_base_url()))
        .json(body)
        .send()
        .await
        .expect("Failed to create menu item");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_menu_requires_authentication() {
    let anonymous = Client::new();

    let resp = anonymous
        .get(format!("{}/menu", admin_base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = anonymous
        .post(format!("{}/menu", admin_base_url()))
        .json(&json!({
            "name": "Ghost", "price": 1.0,
            "category": "Snacks", "canteenLevel": "Level 1",
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_create_fried_rice_assigns_id_and_timestamp() {
    let client = authenticated_client().await;

    let created = create_item(
        &client,
        &json!({
            "name": "Fried Rice",
            "price": 8.5,
            "category": "Main Course",
            "canteenLevel": "Level 1",
        }),
    )
    .await;

    assert_eq!(created["name"], "Fried Rice");
    assert_eq!(created["price"], 8.5);
    assert_eq!(created["category"], "Main Course");
    assert_eq!(created["canteenLevel"], "Level 1");
    assert!(created["id"].is_string());
    assert!(created["createdAt"].is_string());

    // The listing contains the new item.
    let resp = client
        .get(format!("{}/menu?level=Level%201", admin_base_url()))
        .send()
        .await
        .expect("Failed to list menu");
    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Value> = resp.json().await.expect("Failed to parse listing");
    assert!(items.iter().any(|i| i["id"] == created["id"]));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_create_sanitizes_script_tags() {
    let client = authenticated_client().await;

    let created = create_item(
        &client,
        &json!({
            "name": "<script>alert(1)</script>",
            "price": 10,
            "category": "Main Course",
            "canteenLevel": "Level 1",
        }),
    )
    .await;

    let name = created["name"].as_str().expect("name is a string");
    assert!(!name.contains('<'));
    assert!(!name.contains('>'));
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_negative_price_rejected_before_creation() {
    let client = authenticated_client().await;

    let resp = client
        .post(format!("{}/menu", admin_base_url()))
        .json(&json!({
            "name": "Bad Deal",
            "price": -5,
            "category": "Main Course",
            "canteenLevel": "Level 1",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["field"], "price");
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_update_replaces_previous_values() {
    let client = authenticated_client().await;

    let created = create_item(
        &client,
        &json!({
            "name": "Plain Soup",
            "price": 3.0,
            "category": "Main Course",
            "canteenLevel": "Level 2",
        }),
    )
    .await;

    let resp = client
        .put(format!("{}/menu", admin_base_url()))
        .json(&json!({
            "id": created["id"],
            "name": "Mushroom Soup",
            "price": 4.5,
            "category": "Main Course",
            "canteenLevel": "Level 2",
        }))
        .send()
        .await
        .expect("Failed to update menu item");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let resp = client
        .get(format!("{}/menu?level=Level%202", admin_base_url()))
        .send()
        .await
        .expect("Failed to list menu");
    let items: Vec<Value> = resp.json().await.expect("Failed to parse listing");
    let item = items
        .iter()
        .find(|i| i["id"] == created["id"])
        .expect("updated item still listed");
    assert_eq!(item["name"], "Mushroom Soup");
    assert_eq!(item["price"], 4.5);
}

#[tokio::test]
#[ignore = "Requires running admin server (strict delete policy)"]
async fn test_delete_removes_and_repeat_delete_is_not_found() {
    let client = authenticated_client().await;

    let created = create_item(
        &client,
        &json!({
            "name": "Disposable Toast",
            "price": 2.0,
            "category": "Snacks",
            "canteenLevel": "Level 3",
        }),
    )
    .await;
    let id = created["id"].as_str().expect("id is a string");

    let resp = client
        .delete(format!("{}/menu?id={id}", admin_base_url()))
        .send()
        .await
        .expect("Failed to delete menu item");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/menu", admin_base_url()))
        .send()
        .await
        .expect("Failed to list menu");
    let items: Vec<Value> = resp.json().await.expect("Failed to parse listing");
    assert!(items.iter().all(|i| i["id"] != created["id"]));

    // Under the default strict policy a repeated delete is an error.
    let resp = client
        .delete(format!("{}/menu?id={id}", admin_base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_listing_is_ordered_by_level_category_name() {
    let client = authenticated_client().await;

    let resp = client
        .get(format!("{}/menu", admin_base_url()))
        .send()
        .await
        .expect("Failed to list menu");
    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Value> = resp.json().await.expect("Failed to parse listing");

    let keys: Vec<(String, String, String)> = items
        .iter()
        .map(|i| {
            (
                i["canteenLevel"].as_str().unwrap_or_default().to_owned(),
                i["category"].as_str().unwrap_or_default().to_owned(),
                i["name"].as_str().unwrap_or_default().to_owned(),
            )
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}
