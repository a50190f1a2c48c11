//! API integration tests
//!
//! These run against a live server with a clean database:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so tests can be re-run against the same database
fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

/// Register a user with the given role and return (username, token)
async fn register_and_login(client: &Client, role: &str) -> (String, String) {
    let username = format!("{}_{}", role, unique_suffix());

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "Sup3rSecret!",
            "role": role
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "Sup3rSecret!"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["data"]["token"]
        .as_str()
        .expect("No token in response")
        .to_string();

    (username, token)
}

/// Create an author, a publisher and a book with the given stock; returns the book id
async fn create_book(client: &Client, token: &str, stock: i64) -> i64 {
    let suffix = unique_suffix();

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(token)
        .json(&json!({"name": format!("Author {}", suffix)}))
        .send()
        .await
        .expect("Failed to create author");
    assert_eq!(response.status(), 201);
    let author: Value = response.json().await.unwrap();

    let response = client
        .post(format!("{}/publishers", BASE_URL))
        .bearer_auth(token)
        .json(&json!({"name": format!("Publisher {}", suffix)}))
        .send()
        .await
        .expect("Failed to create publisher");
    assert_eq!(response.status(), 201);
    let publisher: Value = response.json().await.unwrap();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": format!("Book {}", suffix),
            "author_id": author["data"]["id"],
            "publisher_id": publisher["data"]["id"],
            "summary": "A test book",
            "stock": stock,
            "max_stock": stock
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.unwrap();

    book["data"]["id"].as_i64().expect("No book ID")
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
async fn test_register_rejects_weak_password() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": format!("weak_{}", unique_suffix()),
            "email": "weak@example.com",
            "password": "short",
            "role": "user"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Validation Errors");
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["parameter"] == "password"));
}

#[tokio::test]
#[ignore]
async fn test_register_rejects_invalid_role() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": format!("role_{}", unique_suffix()),
            "email": "role@example.com",
            "password": "Sup3rSecret!",
            "role": "librarian"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_login_with_wrong_password_fails() {
    let client = Client::new();
    let (username, _token) = register_and_login(&client, "user").await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "WrongPassword1!"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_user_role_cannot_list_users() {
    let client = Client::new();
    let (_username, token) = register_and_login(&client, "user").await;

    let response = client
        .get(format!("{}/users", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

/// Look up a user's id from the admin user listing
async fn find_user_id(client: &Client, admin_token: &str, username: &str) -> String {
    let users: Value = client
        .get(format!("{}/users", BASE_URL))
        .bearer_auth(admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    users["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == username)
        .expect("registered user not listed")["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
#[ignore]
async fn test_double_delete_user_conflicts() {
    let client = Client::new();
    let (_admin, admin_token) = register_and_login(&client, "admin").await;
    let (user_name, _user_token) = register_and_login(&client, "user").await;

    let user_id = find_user_id(&client, &admin_token, &user_name).await;

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Second delete must be rejected
    let response = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_request_approval_and_return_lifecycle() {
    let client = Client::new();
    let (_admin, admin_token) = register_and_login(&client, "admin").await;
    let (user_name, user_token) = register_and_login(&client, "user").await;

    let book_id = create_book(&client, &admin_token, 1).await;
    let user_id = find_user_id(&client, &admin_token, &user_name).await;

    // User files a request
    let response = client
        .post(format!("{}/book-requests", BASE_URL))
        .bearer_auth(&user_token)
        .json(&json!({
            "book_id": book_id,
            "user_id": user_id,
            "username": user_name
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let request: Value = response.json().await.unwrap();
    let request_id = request["data"]["id"].as_i64().unwrap();
    assert_eq!(request["data"]["status"], "PROCESSING");

    // Admin approves; the due date comes back
    let response = client
        .post(format!("{}/book-requests/{}/approve", BASE_URL, request_id))
        .bearer_auth(&admin_token)
        .json(&json!({"approved": true, "reason": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let decision: Value = response.json().await.unwrap();
    assert!(decision["data"]["due_date"].is_string());

    // Stock is now exhausted
    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(book["data"]["stock"], 0);

    // A second decision on the same request conflicts
    let response = client
        .post(format!("{}/book-requests/{}/approve", BASE_URL, request_id))
        .bearer_auth(&admin_token)
        .json(&json!({"approved": true, "reason": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    // A fresh request against the empty book fails out-of-stock on creation
    let response = client
        .post(format!("{}/book-requests", BASE_URL))
        .bearer_auth(&user_token)
        .json(&json!({
            "book_id": book_id,
            "user_id": user_id,
            "username": user_name
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // Find the opened loan and return it on time
    let loans: Value = client
        .get(format!("{}/users/{}/loans", BASE_URL, user_id))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let loan = &loans["data"].as_array().unwrap()[0];
    let loan_id = loan["id"].as_i64().unwrap();
    let due_date = loan["due_date"].as_str().unwrap().to_string();

    let response = client
        .put(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .bearer_auth(&admin_token)
        .json(&json!({"return_date": due_date}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let returned: Value = response.json().await.unwrap();
    assert_eq!(returned["data"]["return_status"], true);
    assert_eq!(returned["data"]["late_fee"], 0);

    // Stock is restored
    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(book["data"]["stock"], 1);

    // Returning twice conflicts and leaves the loan untouched
    let response = client
        .put(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .bearer_auth(&admin_token)
        .json(&json!({"return_date": due_date}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    let loan_after: Value = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(loan_after["data"]["late_fee"], 0);
    assert_eq!(loan_after["data"]["return_status"], true);
}

#[tokio::test]
#[ignore]
async fn test_reject_requires_reason() {
    let client = Client::new();
    let (_admin, admin_token) = register_and_login(&client, "admin").await;
    let (user_name, user_token) = register_and_login(&client, "user").await;

    let book_id = create_book(&client, &admin_token, 2).await;
    let user_id = find_user_id(&client, &admin_token, &user_name).await;

    let request: Value = client
        .post(format!("{}/book-requests", BASE_URL))
        .bearer_auth(&user_token)
        .json(&json!({
            "book_id": book_id,
            "user_id": user_id,
            "username": user_name
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let request_id = request["data"]["id"].as_i64().unwrap();

    // Rejection without a reason is a validation error
    let response = client
        .post(format!("{}/book-requests/{}/approve", BASE_URL, request_id))
        .bearer_auth(&admin_token)
        .json(&json!({"approved": false, "reason": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // With a reason the request moves to REJECTED with no stock side effects
    let response = client
        .post(format!("{}/book-requests/{}/approve", BASE_URL, request_id))
        .bearer_auth(&admin_token)
        .json(&json!({"approved": false, "reason": "damaged copy"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let request_after: Value = client
        .get(format!("{}/book-requests/{}", BASE_URL, request_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(request_after["data"]["status"], "REJECTED");
    assert_eq!(request_after["data"]["reason"], "damaged copy");

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(book["data"]["stock"], 2);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_approvals_with_single_copy() {
    let client = Client::new();
    let (_admin, admin_token) = register_and_login(&client, "admin").await;
    let (user_name, user_token) = register_and_login(&client, "user").await;

    let book_id = create_book(&client, &admin_token, 1).await;
    let user_id = find_user_id(&client, &admin_token, &user_name).await;

    // Two requests for the last copy
    let mut request_ids = Vec::new();
    for _ in 0..2 {
        let request: Value = client
            .post(format!("{}/book-requests", BASE_URL))
            .bearer_auth(&user_token)
            .json(&json!({
                "book_id": book_id,
                "user_id": user_id,
                "username": user_name
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        request_ids.push(request["data"]["id"].as_i64().unwrap());
    }

    // Approve both concurrently; exactly one may win the copy
    let approve = |id: i64| {
        let client = client.clone();
        let token = admin_token.clone();
        async move {
            client
                .post(format!("{}/book-requests/{}/approve", BASE_URL, id))
                .bearer_auth(&token)
                .json(&json!({"approved": true, "reason": ""}))
                .send()
                .await
                .unwrap()
                .status()
                .as_u16()
        }
    };

    let (first, second) = tokio::join!(approve(request_ids[0]), approve(request_ids[1]));

    let mut statuses = [first, second];
    statuses.sort_unstable();
    assert_eq!(statuses[0], 200);
    assert_eq!(statuses[1], 422);

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(book["data"]["stock"], 0);
}
