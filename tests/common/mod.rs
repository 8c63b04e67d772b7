// tests/common/mod.rs

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

/// SQLite rendition of `migrations/20250101000000_create_comments.sql`.
pub const COMMENTS_SCHEMA: &str = r#"
    CREATE TABLE comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        message TEXT NOT NULL,
        parent_id INTEGER
    )
"#;

/// Empty in-memory SQLite database behind an `AnyPool`.
pub async fn memory_pool() -> AnyPool {
    sqlx::any::install_default_drivers();

    // A single, never-recycled connection keeps the in-memory database alive.
    AnyPoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite database")
}

/// Fresh in-memory database with the comments schema.
pub async fn test_pool() -> AnyPool {
    let pool = memory_pool().await;

    sqlx::query(COMMENTS_SCHEMA)
        .execute(&pool)
        .await
        .expect("Failed to create comments table");

    pool
}
