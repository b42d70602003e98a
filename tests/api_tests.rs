//! API integration tests.
//!
//! These drive a running server over HTTP and need a librarian account
//! (login "admin", password "admin") plus at least one reader with id 42.
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore]
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
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_reads_are_public() {
    let client = Client::new();

    for path in ["/books", "/authors", "/genres", "/languages", "/stats"] {
        let response = client
            .get(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success(), "GET {} should be public", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_writes_require_authentication() {
    let client = Client::new();

    let response = client
        .post(format!("{}/genres", BASE_URL))
        .json(&json!({"name": "Unauthorized Genre"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unknown_payload_fields_are_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/genres", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"name": "Valid Name", "surprise": true}))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_client_error());
}

#[tokio::test]
#[ignore]
async fn test_author_book_title_search_scenario() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Create Author{first_name: "Jane", last_name: "Doe"}
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"first_name": "Jane", "last_name": "Doe"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let author: Value = response.json().await.expect("Failed to parse response");
    let author_id = author["id"].as_i64().expect("No author ID");

    // Create Book{title: "Foo Bar", author: Jane, isbn: 13 chars, genre: []}
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Foo Bar",
            "author_id": author_id,
            "summary": "A test book",
            "isbn": "1234567890123",
            "genre_ids": []
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.expect("Failed to parse response");
    let book_id = book["id"].as_i64().expect("No book ID");

    // count(Book, title contains "foo") agrees with the list length
    let response = client
        .get(format!("{}/stats?title_contains=foo", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let stats: Value = response.json().await.expect("Failed to parse response");
    let matching = stats["num_books_matching"].as_i64().expect("No match count");
    assert!(matching >= 1);

    let response = client
        .get(format!("{}/books?title=foo", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let listed: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(listed.as_array().expect("Not an array").len() as i64, matching);

    // Cleanup
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
    let _ = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_loan_round_trip() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Create a book with one available copy
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Loanable Book",
            "summary": "",
            "isbn": "9780000000001",
            "genre_ids": []
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.expect("Failed to parse response");
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/books/{}/instances", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"imprint": "First Edition", "status": "available"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let instance: Value = response.json().await.expect("Failed to parse response");
    let instance_id = instance["id"].as_str().expect("No instance ID").to_string();
    assert_eq!(instance["status"], "available");

    // check_out(instance, user = 42, due_date = 2024-01-01)
    let response = client
        .post(format!("{}/instances/{}/checkout", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"user_id": 42, "due_back": "2024-01-01"}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let checked_out: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(checked_out["status"], "on loan");
    assert_eq!(checked_out["borrower_id"], 42);
    assert_eq!(checked_out["due_back"], "2024-01-01");

    // A second check-out must fail and leave the loan untouched
    let response = client
        .post(format!("{}/instances/{}/checkout", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"user_id": 42, "due_back": "2024-06-01"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Return restores the shelf state
    let response = client
        .post(format!("{}/instances/{}/return", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let returned: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(returned["status"], "available");
    assert!(returned.get("borrower_id").is_none() || returned["borrower_id"].is_null());
    assert!(returned.get("due_back").is_none() || returned["due_back"].is_null());

    // Returning again must fail
    let response = client
        .post(format!("{}/instances/{}/return", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Deleting the book removes its instances with it
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/instances", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    let instances: Value = response.json().await.expect("Failed to parse response");
    assert!(instances
        .as_array()
        .expect("Not an array")
        .iter()
        .all(|i| i["id"] != instance_id.as_str()));
}

#[tokio::test]
#[ignore]
async fn test_my_loans_sorted_by_due_date() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/loans/my", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let loans: Value = response.json().await.expect("Failed to parse response");
    let due_dates: Vec<&str> = loans
        .as_array()
        .expect("Not an array")
        .iter()
        .filter_map(|l| l["due_back"].as_str())
        .collect();
    let mut sorted = due_dates.clone();
    sorted.sort();
    assert_eq!(due_dates, sorted);
}

#[tokio::test]
#[ignore]
async fn test_visit_counter_increments_per_session() {
    let client = Client::new();

    let first = client
        .get(format!("{}/stats", BASE_URL))
        .header("X-Session-Token", "integration-test-session")
        .send()
        .await
        .expect("Failed to send request");
    let first: Value = first.json().await.expect("Failed to parse response");

    let second = client
        .get(format!("{}/stats", BASE_URL))
        .header("X-Session-Token", "integration-test-session")
        .send()
        .await
        .expect("Failed to send request");
    let second: Value = second.json().await.expect("Failed to parse response");

    assert_eq!(
        second["num_visits"].as_i64().unwrap(),
        first["num_visits"].as_i64().unwrap() + 1
    );
}
