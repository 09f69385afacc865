//! API integration tests
//!
//! These run against a live server and database:
//! start the server, then `cargo test -- --ignored`.

use reqwest::{multipart, Client, StatusCode};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080";

/// Unique email per test run
fn fresh_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}@example.com", tag, nanos)
}

/// Register a throwaway account and return its token
async fn register_and_get_token(client: &Client, tag: &str) -> String {
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "email": fresh_email(tag),
            "password": "password123",
            "name": "Test User"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
#[ignore]
async fn test_register_duplicate_email_conflicts() {
    let client = Client::new();
    let email = fresh_email("dup");

    let payload = json!({
        "email": email,
        "password": "password123",
        "name": "First"
    });

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same email again, different case
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "email": email.to_uppercase(),
            "password": "password123",
            "name": "Second"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_login_wrong_password_and_unknown_email() {
    let client = Client::new();
    let email = fresh_email("login");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({"email": email, "password": "password123", "name": ""}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Wrong password
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({"email": email, "password": "wrong-password"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown email: indistinguishable from wrong password
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({"email": fresh_email("ghost"), "password": "password123"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_me_returns_identity() {
    let client = Client::new();
    let token = register_and_get_token(&client, "me").await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["id"].is_number());
    assert_eq!(body["role"], "user");
}

#[tokio::test]
#[ignore]
async fn test_list_books_clamps_pagination() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?limit=500&page=0", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["limit"], 100);
    assert_eq!(body["page"], 1);
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());

    let response = client
        .get(format!("{}/books?limit=0", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["limit"], 10);
}

#[tokio::test]
#[ignore]
async fn test_book_writes_require_token() {
    let client = Client::new();

    let form = multipart::Form::new().text("title", "No Auth");
    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_create_update_delete_book() {
    let client = Client::new();
    let token = register_and_get_token(&client, "crud").await;

    // Create
    let form = multipart::Form::new()
        .text("title", "1984")
        .text("author", "George Orwell")
        .text("category", "Fiction")
        .text("price", "60000")
        .text("stock", "10");
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["id"].as_i64().expect("No book ID");
    assert_eq!(body["title"], "1984");
    assert_eq!(body["stock"], 10);

    // Partial update: empty fields are ignored
    let form = multipart::Form::new()
        .text("title", "")
        .text("price", "45000");
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "1984");
    assert_eq!(body["price"], 45000.0);

    // Delete
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Gone
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_gif_cover_rejected() {
    let client = Client::new();
    let token = register_and_get_token(&client, "gif").await;

    let cover = multipart::Part::bytes(vec![0u8; 16]).file_name("cover.gif");
    let form = multipart::Form::new()
        .text("title", "Bad Cover")
        .part("cover", cover);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_png_cover_accepted_and_served() {
    let client = Client::new();
    let token = register_and_get_token(&client, "png").await;

    let cover = multipart::Part::bytes(vec![0x89, 0x50, 0x4e, 0x47]).file_name("cover.png");
    let form = multipart::Form::new()
        .text("title", "Good Cover")
        .part("cover", cover);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["id"].as_i64().expect("No book ID");
    let cover_url = body["coverUrl"].as_str().expect("No cover URL");
    assert!(cover_url.starts_with("/uploads/"));

    // Stored cover is served statically
    let response = client
        .get(format!("{}{}", BASE_URL, cover_url))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Cleanup; deleting also removes the stored file
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}{}", BASE_URL, cover_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
