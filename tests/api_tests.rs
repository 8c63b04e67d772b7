// tests/api_tests.rs

use std::sync::Arc;

use comment_tree::{
    routes,
    service::CommentService,
    state::AppState,
    storage::{RepositoryConfig, RetryPolicy, SqlCommentRepository},
};
use serde_json::{Value, json};

mod common;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // 1. Create an in-memory database with the schema
    let pool = common::test_pool().await;

    // 2. Create test state
    let repository = RepositoryConfig {
        page_size: 10,
        retry: RetryPolicy::none(),
    };
    let service = CommentService::new(Arc::new(SqlCommentRepository::new(pool, repository)));

    let state = AppState { service };

    // 3. Create the router with the app state
    let app = routes::create_router(state);

    // 4. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 5. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn create(client: &reqwest::Client, address: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/api/comments", address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

async fn create_id(client: &reqwest::Client, address: &str, body: Value) -> i64 {
    let response = create(client, address, body).await;
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().expect("id missing from response")
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn create_and_list_thread() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let root = create_id(&client, &address, json!({ "message": "hi" })).await;
    let reply = create_id(
        &client,
        &address,
        json!({ "message": "yo", "parent_id": root }),
    )
    .await;

    let response = client
        .get(format!("{}/api/comments?parent_id={}&page=1", address, root))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let view: Value = response.json().await.unwrap();
    assert_eq!(view["parent"]["id"], root);
    assert_eq!(view["parent"]["message"], "hi");
    assert_eq!(
        view["children"],
        json!([{ "id": reply, "message": "yo", "parent_id": root, "have_next": false }])
    );
}

#[tokio::test]
async fn top_level_listing_with_search() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let pie = create_id(&client, &address, json!({ "message": "apple pie" })).await;
    create_id(&client, &address, json!({ "message": "banana", "parent_id": 0 })).await;
    create_id(
        &client,
        &address,
        json!({ "message": "apple juice", "parent_id": pie }),
    )
    .await;

    let view: Value = client
        .get(format!("{}/api/comments?substr=apple", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["parent"], Value::Null);
    assert_eq!(view["children"].as_array().unwrap().len(), 1);

    let view: Value = client
        .get(format!("{}/api/comments?substr=apple&search_global=true", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["children"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_fails_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let empty = create(&client, &address, json!({ "message": "" })).await;
    assert_eq!(empty.status().as_u16(), 400);

    let negative = create(&client, &address, json!({ "message": "x", "parent_id": -1 })).await;
    assert_eq!(negative.status().as_u16(), 400);

    let unknown_parent =
        create(&client, &address, json!({ "message": "x", "parent_id": 999 })).await;
    assert_eq!(unknown_parent.status().as_u16(), 400);
    let body: Value = unknown_parent.json().await.unwrap();
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn listing_unknown_parent_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/comments?parent_id=12345", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client
        .get(format!("{}/api/comments?parent_id=-3", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn delete_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let id = create_id(&client, &address, json!({ "message": "bye" })).await;

    let response = client
        .delete(format!("{}/api/comments/{}", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let again = client
        .delete(format!("{}/api/comments/{}", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 404);

    let zero = client
        .delete(format!("{}/api/comments/0", address))
        .send()
        .await
        .unwrap();
    assert_eq!(zero.status().as_u16(), 400);
}
