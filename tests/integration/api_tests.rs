//! API integration tests
//!
//! These tests run against a live server with a clean database.
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api";

/// Register a fresh user and return its bearer token
async fn register_user(client: &Client, role: &str) -> String {
    let email = format!("user-{}@example.com", Uuid::new_v4());

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "secret123",
            "role": role
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create an author and return its id
async fn create_author(client: &Client, token: &str, name: &str) -> String {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": name,
            "biography": "Test biography",
            "nationality": "British"
        }))
        .send()
        .await
        .expect("Failed to send create author request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse author response");
    body["data"]["id"].as_str().expect("No author ID").to_string()
}

/// Create a book for an author and return its id
async fn create_book(client: &Client, token: &str, author_id: &str, isbn: &str) -> String {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Test Book",
            "description": "A test book",
            "isbn": isbn,
            "author": author_id,
            "publishedDate": "1997-06-26"
        }))
        .send()
        .await
        .expect("Failed to send create book request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse book response");
    body["data"]["id"].as_str().expect("No book ID").to_string()
}

fn unique_isbn() -> String {
    format!("978-{}", &Uuid::new_v4().simple().to_string()[..10])
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
async fn test_register_and_login() {
    let client = Client::new();
    let email = format!("login-{}@example.com", Uuid::new_v4());

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Login Tester",
            "email": email,
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["token"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_login_wrong_password() {
    let client = Client::new();
    let email = format!("wrongpw-{}@example.com", Uuid::new_v4());

    client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Wrong PW",
            "email": email,
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "not-the-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
#[ignore]
async fn test_login_missing_fields() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": "someone@example.com" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Please provide an email and password");
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = register_user(&client, "user").await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["name"], "Test User");
    assert!(body["data"]["password"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_write_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({ "name": "No Auth" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Not authorized to access this route");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_author_name_case_insensitive() {
    let client = Client::new();
    let token = register_user(&client, "user").await;
    let name = format!("Rowling {}", Uuid::new_v4());

    create_author(&client, &token, &name).await;

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": name.to_lowercase() }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Author with this name already exists");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_author_name_wins_over_field_validation() {
    let client = Client::new();
    let token = register_user(&client, "user").await;
    let name = format!("Tolkien {}", Uuid::new_v4());

    create_author(&client, &token, &name).await;

    // Taken name plus an oversized biography: the duplicate error wins
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": name,
            "biography": "b".repeat(501)
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Author with this name already exists");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_rejected() {
    let client = Client::new();
    let token = register_user(&client, "user").await;
    let author_id = create_author(&client, &token, &format!("Author {}", Uuid::new_v4())).await;
    let isbn = unique_isbn();

    create_book(&client, &token, &author_id, &isbn).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Another Book",
            "isbn": isbn,
            "author": author_id
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Book with this ISBN already exists");
}

#[tokio::test]
#[ignore]
async fn test_missing_author_beats_duplicate_isbn() {
    let client = Client::new();
    let token = register_user(&client, "user").await;
    let author_id = create_author(&client, &token, &format!("Author {}", Uuid::new_v4())).await;
    let isbn = unique_isbn();

    create_book(&client, &token, &author_id, &isbn).await;

    // Unknown author and duplicate ISBN in the same payload: the
    // author check runs first, so a 404 wins.
    let missing_author = Uuid::new_v4();
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Orphan Book",
            "isbn": isbn,
            "author": missing_author.to_string()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["error"],
        format!("Author not found with id: {}", missing_author)
    );
}

#[tokio::test]
#[ignore]
async fn test_book_expands_author() {
    let client = Client::new();
    let token = register_user(&client, "user").await;
    let name = format!("Expanded {}", Uuid::new_v4());
    let author_id = create_author(&client, &token, &name).await;
    let book_id = create_book(&client, &token, &author_id, &unique_isbn()).await;

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["author"]["id"], author_id.as_str());
    assert_eq!(body["data"]["author"]["name"], name.as_str());
}

#[tokio::test]
#[ignore]
async fn test_invalid_book_id_format() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/not-a-valid-id", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Invalid book ID format");
}

#[tokio::test]
#[ignore]
async fn test_author_not_found() {
    let client = Client::new();
    let missing = Uuid::new_v4();

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, missing))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["error"],
        format!("Author not found with id: {}", missing)
    );
}

#[tokio::test]
#[ignore]
async fn test_delete_author_with_books_blocked() {
    let client = Client::new();
    let token = register_user(&client, "admin").await;
    let author_id = create_author(&client, &token, &format!("Prolific {}", Uuid::new_v4())).await;
    create_book(&client, &token, &author_id, &unique_isbn()).await;

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["error"],
        "Cannot delete author with associated books. Delete the books first."
    );
}

#[tokio::test]
#[ignore]
async fn test_delete_requires_admin_role() {
    let client = Client::new();
    let admin = register_user(&client, "admin").await;
    let user = register_user(&client, "user").await;
    let author_id = create_author(&client, &admin, &format!("Guarded {}", Uuid::new_v4())).await;

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", user))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["error"],
        "User role user is not authorized to access this route"
    );

    // Admin can delete
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_update_book_keeps_own_isbn() {
    let client = Client::new();
    let token = register_user(&client, "user").await;
    let author_id = create_author(&client, &token, &format!("Updater {}", Uuid::new_v4())).await;
    let isbn = unique_isbn();
    let book_id = create_book(&client, &token, &author_id, &isbn).await;

    // Sending the book's own ISBN back must not trip the duplicate check
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Updated Title",
            "isbn": isbn
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["title"], "Updated Title");
}

#[tokio::test]
#[ignore]
async fn test_list_books_filter_and_select() {
    let client = Client::new();
    let token = register_user(&client, "user").await;
    let author_id = create_author(&client, &token, &format!("Filtered {}", Uuid::new_v4())).await;
    create_book(&client, &token, &author_id, &unique_isbn()).await;

    let response = client
        .get(format!(
            "{}/books?author={}&select=title,isbn",
            BASE_URL, author_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);

    let record = &body["data"][0];
    assert!(record["title"].is_string());
    assert!(record["isbn"].is_string());
    assert!(record["description"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_list_unknown_filter_field_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?price[gt]=10", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_pagination_links() {
    let client = Client::new();
    let token = register_user(&client, "user").await;
    let author_id = create_author(&client, &token, &format!("Pager {}", Uuid::new_v4())).await;

    for _ in 0..12 {
        create_book(&client, &token, &author_id, &unique_isbn()).await;
    }

    let response = client
        .get(format!(
            "{}/books?author={}&page=2&limit=10",
            BASE_URL, author_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["count"], 2);
    assert_eq!(body["pagination"]["prev"]["page"], 1);
    assert_eq!(body["pagination"]["prev"]["limit"], 10);
    assert!(body["pagination"]["next"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_author_books_listing() {
    let client = Client::new();
    let token = register_user(&client, "user").await;
    let name = format!("Shelved {}", Uuid::new_v4());
    let author_id = create_author(&client, &token, &name).await;
    create_book(&client, &token, &author_id, &unique_isbn()).await;
    create_book(&client, &token, &author_id, &unique_isbn()).await;

    let response = client
        .get(format!("{}/authors/{}/books", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["count"], 2);
    assert_eq!(body["author"]["name"], name.as_str());
    assert_eq!(body["data"].as_array().expect("data array").len(), 2);
}
