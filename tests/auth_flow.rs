//! Account registration and credential checks against in-memory SQLite.

use poker_tracker_server::db::{self, models::User, user_repo};
use poker_tracker_server::error::ApiError;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::init_schema(&pool).await.expect("schema");
    pool
}

async fn new_user(pool: &SqlitePool, username: &str, password: &str) -> User {
    let mut tx = pool.begin().await.unwrap();
    let user = user_repo::create(&mut tx, username, password, "default.png")
        .await
        .unwrap();
    tx.commit().await.unwrap();
    user
}

#[tokio::test]
async fn register_login_roundtrip() {
    let pool = test_pool().await;
    let created = new_user(&pool, "alice", "hunter2").await;

    let found = user_repo::find_by_username(&pool, "alice")
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(found.id, created.id);
    assert_eq!(found.player_id, created.player_id);
    assert!(user_repo::verify_password(&found, "hunter2"));
    assert!(!user_repo::verify_password(&found, "hunter3"));
}

#[tokio::test]
async fn duplicate_username_rejected_and_store_unchanged() {
    let pool = test_pool().await;
    new_user(&pool, "bob", "pw").await;

    let mut tx = pool.begin().await.unwrap();
    let err = user_repo::create(&mut tx, "bob", "other", "default.png")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::DuplicateUsername));
    drop(tx); // rollback

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn player_ids_are_generated_and_distinct() {
    let pool = test_pool().await;
    let a = new_user(&pool, "a", "pw").await;
    let b = new_user(&pool, "b", "pw").await;

    assert!(!a.player_id.is_empty());
    assert_ne!(a.player_id, b.player_id);

    let by_pid = user_repo::find_by_player_id(&pool, &a.player_id)
        .await
        .unwrap()
        .expect("lookup by public id");
    assert_eq!(by_pid.id, a.id);
}

#[tokio::test]
async fn login_history_is_appended() {
    let pool = test_pool().await;
    let user = new_user(&pool, "carol", "pw").await;

    let mut tx = pool.begin().await.unwrap();
    user_repo::record_login(&mut tx, user.id, Some("127.0.0.1"), Some("tests"))
        .await
        .unwrap();
    user_repo::record_login(&mut tx, user.id, None, None)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM login_history WHERE user_id = ?1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn search_matches_substring_case_insensitively_and_excludes_caller() {
    let pool = test_pool().await;
    let alice = new_user(&pool, "Alice", "pw").await;
    new_user(&pool, "alicia", "pw").await;
    new_user(&pool, "bob", "pw").await;

    let hits = user_repo::search(&pool, "ali", alice.id).await.unwrap();
    let names: Vec<_> = hits.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alicia"]);

    // different caller sees both, any casing
    let hits = user_repo::search(&pool, "ALI", 0).await.unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn search_caps_at_ten_results() {
    let pool = test_pool().await;
    for i in 0..12 {
        new_user(&pool, &format!("player{i:02}"), "pw").await;
    }

    let hits = user_repo::search(&pool, "player", 0).await.unwrap();
    assert_eq!(hits.len(), 10);
}
