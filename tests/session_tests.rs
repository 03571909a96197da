//! Session CRUD, result attachment, and the stats query.

use chrono::NaiveDate;
use poker_tracker_server::db::{self, models::PokerSession, player_repo, session_repo};
use poker_tracker_server::stats;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

async fn test_pool() -> SqlitePool {
    // The schema uses plain REFERENCES with no ON DELETE action: per
    // SPEC_FULL §3/§10(a), deleting a session must succeed and leave its
    // result/membership rows orphaned. sqlx defaults PRAGMA foreign_keys
    // = ON, which would instead reject the delete, so enforcement is
    // disabled here to match the documented behavior.
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("sqlite url")
        .foreign_keys(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory sqlite");
    db::init_schema(&pool).await.expect("schema");
    pool
}

async fn new_session(pool: &SqlitePool, date: &str, buy_in: Option<f64>) -> PokerSession {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let mut tx = pool.begin().await.unwrap();
    let session = session_repo::create(&mut tx, date, buy_in, None).await.unwrap();
    tx.commit().await.unwrap();
    session
}

async fn new_player(pool: &SqlitePool, username: &str) -> i64 {
    let mut tx = pool.begin().await.unwrap();
    let player = player_repo::create(&mut tx, username, None).await.unwrap();
    tx.commit().await.unwrap();
    player.id
}

async fn add_result(pool: &SqlitePool, session_id: i64, player_id: i64, final_amount: f64) {
    let mut tx = pool.begin().await.unwrap();
    session_repo::add_result(&mut tx, session_id, player_id, final_amount)
        .await
        .unwrap();
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn list_orders_by_date_descending() {
    let pool = test_pool().await;
    new_session(&pool, "2024-01-05", None).await;
    new_session(&pool, "2024-03-01", None).await;
    new_session(&pool, "2024-02-10", None).await;

    let sessions = session_repo::list(&pool).await.unwrap();
    let dates: Vec<String> = sessions.iter().map(|s| s.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-02-10", "2024-01-05"]);
}

#[tokio::test]
async fn delete_missing_session_reports_absent() {
    let pool = test_pool().await;
    let mut tx = pool.begin().await.unwrap();
    assert!(!session_repo::delete(&mut tx, 999).await.unwrap());
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn delete_leaves_results_orphaned() {
    let pool = test_pool().await;
    let session = new_session(&pool, "2024-01-01", Some(100.0)).await;
    let player = new_player(&pool, "p1").await;
    add_result(&pool, session.id, player, 150.0).await;

    let mut tx = pool.begin().await.unwrap();
    assert!(session_repo::delete(&mut tx, session.id).await.unwrap());
    tx.commit().await.unwrap();

    assert!(session_repo::list(&pool).await.unwrap().is_empty());

    // no cascade: the result and membership rows stay behind
    let orphans: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM player_results WHERE session_id = ?1")
            .bind(session.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(orphans, 1);
    let members: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM session_players WHERE session_id = ?1")
            .bind(session.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(members, 1);

    // the results endpoint still reports them
    let rows = session_repo::results(&pool, session.id).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn results_join_player_names() {
    let pool = test_pool().await;
    let session = new_session(&pool, "2024-01-01", Some(50.0)).await;
    let p1 = new_player(&pool, "shark").await;
    let p2 = new_player(&pool, "fish").await;
    add_result(&pool, session.id, p1, 80.0).await;
    add_result(&pool, session.id, p2, 20.0).await;

    let rows = session_repo::results(&pool, session.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].player_name, "shark");
    assert_eq!(rows[0].final_amount, 80.0);
    assert_eq!(rows[1].player_name, "fish");
}

#[tokio::test]
async fn duplicate_results_accumulate() {
    let pool = test_pool().await;
    let session = new_session(&pool, "2024-01-01", Some(100.0)).await;
    let player = new_player(&pool, "p1").await;
    add_result(&pool, session.id, player, 150.0).await;
    add_result(&pool, session.id, player, 80.0).await;

    let rows = session_repo::results(&pool, session.id).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn stats_for_single_winning_session() {
    let pool = test_pool().await;
    let session = new_session(&pool, "2024-01-01", Some(100.0)).await;
    let player = new_player(&pool, "p1").await;
    add_result(&pool, session.id, player, 150.0).await;

    let outcomes = session_repo::player_outcomes(&pool, player).await.unwrap();
    let s = stats::summarize(&outcomes);
    assert_eq!(s.total_sessions, 1);
    assert_eq!(s.total_profit, 50.0);
    assert_eq!(s.win_rate, 100.0);
}

#[tokio::test]
async fn stats_for_player_with_no_sessions() {
    let pool = test_pool().await;
    let player = new_player(&pool, "p1").await;

    let outcomes = session_repo::player_outcomes(&pool, player).await.unwrap();
    let s = stats::summarize(&outcomes);
    assert_eq!(s.total_sessions, 0);
    assert_eq!(s.total_profit, 0.0);
    assert_eq!(s.win_rate, 0.0);
}

#[tokio::test]
async fn resubmitted_result_counts_the_session_twice() {
    // each add_result also adds a membership row, so the stats join sees
    // the session once per submission, each paired with the first result
    let pool = test_pool().await;
    let session = new_session(&pool, "2024-01-01", Some(100.0)).await;
    let player = new_player(&pool, "p1").await;
    add_result(&pool, session.id, player, 150.0).await;
    add_result(&pool, session.id, player, 80.0).await;

    let outcomes = session_repo::player_outcomes(&pool, player).await.unwrap();
    let s = stats::summarize(&outcomes);
    assert_eq!(s.total_sessions, 2);
    assert_eq!(s.total_profit, 100.0);
    assert_eq!(s.win_rate, 100.0);
}

#[tokio::test]
async fn stats_only_aggregate_first_ten_joined_sessions() {
    let pool = test_pool().await;
    let player = new_player(&pool, "grinder").await;

    // twelve sessions in join order: ten +10 wins, then two big losses
    for i in 0..12 {
        let session = new_session(&pool, &format!("2024-01-{:02}", i + 1), Some(100.0)).await;
        let final_amount = if i < 10 { 110.0 } else { 0.0 };
        add_result(&pool, session.id, player, final_amount).await;
    }

    let outcomes = session_repo::player_outcomes(&pool, player).await.unwrap();
    let s = stats::summarize(&outcomes);
    assert_eq!(s.total_sessions, 12);
    assert_eq!(s.total_profit, 100.0);
    assert_eq!(s.recent_sessions.len(), 10);
    assert_eq!(s.win_rate, 83.3);
}
