//! Integration tests for the public viewer.
//!
//! These tests require:
//! - A migrated database (cargo run -p mensa-cli -- migrate)
//! - The admin server running (cargo run -p mensa-admin)
//! - The viewer server running (cargo run -p mensa-viewer)
//!
//! Run with: cargo test -p mensa-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the admin API (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Base URL for the viewer API (configurable via environment).
fn viewer_base_url() -> String {
    std::env::var("VIEWER_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create a menu item through the admin API and return its JSON record.
async fn create_item_via_admin(name: &str, level: &str) -> Value {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client");

    let resp = client
        .post(format!("{}/auth/sign-up", admin_base_url()))
        .json(&json!({
            "email": format!("viewer-test-{}@canteen.test", Uuid::new_v4()),
            "password": "Password1",
            "confirmPassword": "Password1",
        }))
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{}/menu", admin_base_url()))
        .json(&json!({
            "name": name,
            "price": 5.5,
            "category": "Snacks",
            "canteenLevel": level,
        }))
        .send()
        .await
        .expect("Failed to create menu item");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore = "Requires running viewer server"]
async fn test_listing_is_anonymous_and_ordered() {
    let resp = Client::new()
        .get(format!("{}/menu", viewer_base_url()))
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

#[tokio::test]
#[ignore = "Requires running viewer server"]
async fn test_unknown_level_filter_is_rejected() {
    let resp = Client::new()
        .get(format!("{}/menu?level=Basement", viewer_base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running admin and viewer servers"]
async fn test_admin_mutation_reaches_the_viewer() {
    let name = format!("Propagated Snack {}", Uuid::new_v4());
    let created = create_item_via_admin(&name, "Level 2").await;

    // The viewer reads the same catalog; a fresh filtered fetch bypasses any
    // stale cache entry only after invalidation, so poll briefly.
    let client = Client::new();
    let mut found = false;
    for _ in 0..20 {
        let resp = client
            .get(format!(
                "{}/menu?level=Level%202&category=Snacks",
                viewer_base_url()
            ))
            .send()
            .await
            .expect("Failed to list menu");
        assert_eq!(resp.status(), StatusCode::OK);
        let items: Vec<Value> = resp.json().await.expect("Failed to parse listing");
        if items.iter().any(|i| i["id"] == created["id"]) {
            found = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    }
    assert!(found, "item created via admin never appeared in the viewer listing");
}

#[tokio::test]
#[ignore = "Requires running viewer server"]
async fn test_filtered_listing_only_contains_requested_level() {
    create_item_via_admin(&format!("Level Filter Check {}", Uuid::new_v4()), "Level 1").await;

    // Give the viewer cache a moment to observe the revision bump.
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    let resp = Client::new()
        .get(format!("{}/menu?level=Level%201", viewer_base_url()))
        .send()
        .await
        .expect("Failed to list menu");
    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Value> = resp.json().await.expect("Failed to parse listing");
    assert!(!items.is_empty());
    assert!(items.iter().all(|i| i["canteenLevel"] == "Level 1"));
}
