//! API integration tests
//!
//! These run against a live server with its database, Redis and an admin
//! account (login "13800000000" / "admin-password") provisioned.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to log in as the provisioned admin and return the token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "phone": "13800000000",
            "password": "admin-password",
            "is_admin": true
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["access_token"]
        .as_str()
        .expect("No token in response")
        .to_string()
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
}

#[tokio::test]
#[ignore]
async fn test_admin_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "phone": "13800000000",
            "password": "admin-password",
            "is_admin": true
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["access_token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["expires_at"].is_i64());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "phone": "13800000000",
            "password": "wrong",
            "is_admin": true
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_protected_endpoint_without_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_protected_endpoint_with_garbage_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", "definitely-not-a-token")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_me_returns_admin_identity() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["is_admin"], true);
    assert_eq!(body["user_name"], "13800000000");
}

#[tokio::test]
#[ignore]
async fn test_logout_revokes_token() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    // Token works before logout
    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/auth/logout", BASE_URL))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to send logout request");
    assert!(response.status().is_success());

    // The same token is rejected afterwards, before its expiry
    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_second_login_supersedes_first() {
    let client = Client::new();

    let first = get_admin_token(&client).await;
    let second = get_admin_token(&client).await;

    // Only the newest token passes the session check
    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", &first)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", &second)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_register_and_reader_login() {
    let client = Client::new();

    // Unique-ish phone per run to avoid conflicts on re-run
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
        % 100_000_000;
    let phone = format!("139{:08}", suffix);

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "reader_name": "Test Reader",
            "email": "reader@example.org",
            "phone": phone,
            "password": "reader-password"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "phone": phone,
            "password": "reader-password"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["access_token"].is_string());
    assert_eq!(body["reader"]["phone"], phone.as_str());
    // The password hash never leaves the server
    assert!(body["reader"]["password"].is_null());
}

/// Helper to register a throwaway reader, returns its id and phone
async fn register_reader(client: &Client) -> (String, String) {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
        % 100_000_000;
    let phone = format!("138{:08}", suffix);

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "reader_name": "History Reader",
            "email": "history@example.org",
            "phone": phone,
            "password": "reader-password"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let reader: Value = response.json().await.expect("Failed to parse response");
    let reader_id = reader["reader_id"].as_str().expect("No reader id").to_string();
    (reader_id, phone)
}

/// Helper to create a book with a unique name and position, returns its id
async fn create_book(client: &Client, token: &str, amount: i32) -> String {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", token)
        .json(&json!({
            "book_name": format!("History Test Book {}", suffix),
            "author": "Test Author",
            "amount": amount,
            "position": format!("H-{}", suffix)
        }))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(response.status(), 201);

    let book: Value = response.json().await.expect("Failed to parse response");
    book["book_id"].as_str().expect("No book id").to_string()
}

/// Helper to run one full loan cycle: borrow the book, then return it
async fn borrow_and_return(client: &Client, token: &str, reader_id: &str, book_id: &str) {
    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .header("Authorization", token)
        .json(&json!({ "reader_id": reader_id, "book_id": book_id }))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 201);

    let borrow: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = borrow["borrow_id"].as_str().expect("No borrow id");

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", token)
        .send()
        .await
        .expect("Failed to send return request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_list_books_with_absurd_page_number() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    // Hostile pagination values must not take the request down
    let response = client
        .get(format!(
            "{}/books?page=9223372036854775807&per_page=9223372036854775807",
            BASE_URL
        ))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].as_array().expect("No items array").is_empty());
}

#[tokio::test]
#[ignore]
async fn test_delete_book_with_returned_loan_history() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let (reader_id, _) = register_reader(&client).await;
    let book_id = create_book(&client, &token, 2).await;
    borrow_and_return(&client, &token, &reader_id, &book_id).await;

    // All copies are back on the shelf, so the delete must succeed even
    // though closed loan records still reference the book
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/readers/{}", BASE_URL, reader_id))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_delete_reader_with_loan_history() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let (reader_id, _) = register_reader(&client).await;
    let book_id = create_book(&client, &token, 2).await;
    borrow_and_return(&client, &token, &reader_id, &book_id).await;

    // No open loans remain, so the account delete must succeed even though
    // closed loan records still reference the reader
    let response = client
        .delete(format!("{}/readers/{}", BASE_URL, reader_id))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_book_lifecycle() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let name = format!("Integration Test Book {}", suffix);
    let position = format!("Z-{}", suffix);

    // Create
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", &token)
        .json(&json!({
            "book_name": name,
            "author": "Test Author",
            "amount": 3,
            "position": position
        }))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(response.status(), 201);

    let book: Value = response.json().await.expect("Failed to parse response");
    let book_id = book["book_id"].as_str().expect("No book id").to_string();
    assert_eq!(book["amount"], 3);
    assert_eq!(book["total_amount"], 3);
    assert_eq!(book["status"], 1);

    // Duplicate name is refused
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", &token)
        .json(&json!({
            "book_name": name,
            "author": "Test Author",
            "amount": 1,
            "position": format!("{}-b", position)
        }))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(response.status(), 409);

    // Stock adjustment moves both columns
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", &token)
        .json(&json!({ "stock_delta": 2 }))
        .send()
        .await
        .expect("Failed to send update request");
    assert!(response.status().is_success());

    let book: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(book["amount"], 5);
    assert_eq!(book["total_amount"], 5);

    // Delete
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);
}
