//! Shared fixtures for database-backed tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub async fn insert_element(pool: &PgPool, data: &str, created_at: DateTime<Utc>) -> i64 {
    let (id,): (i64,) =
        sqlx::query_as("INSERT INTO elements (data, created_at) VALUES ($1, $2) RETURNING id")
            .bind(data)
            .bind(created_at)
            .fetch_one(pool)
            .await
            .expect("insert element");
    id
}

pub async fn insert_process(pool: &PgPool, status: &str, created_at: DateTime<Utc>) -> i64 {
    let (id,): (i64,) =
        sqlx::query_as("INSERT INTO processes (status, created_at) VALUES ($1, $2) RETURNING id")
            .bind(status)
            .bind(created_at)
            .fetch_one(pool)
            .await
            .expect("insert process");
    id
}

pub async fn insert_claim(pool: &PgPool, process_id: i64, element_id: i64) {
    sqlx::query("INSERT INTO process_elements (process_id, element_id) VALUES ($1, $2)")
        .bind(process_id)
        .bind(element_id)
        .execute(pool)
        .await
        .expect("insert claim record");
}

pub async fn process_status(pool: &PgPool, id: i64) -> String {
    let (status,): (String,) = sqlx::query_as("SELECT status FROM processes WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("fetch process status");
    status
}

pub async fn process_count(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM processes")
        .fetch_one(pool)
        .await
        .expect("count processes");
    count
}

pub async fn element_data(pool: &PgPool, id: i64) -> String {
    let (data,): (String,) = sqlx::query_as("SELECT data FROM elements WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("fetch element data");
    data
}

pub async fn claim_count(pool: &PgPool, process_id: i64) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM process_elements WHERE process_id = $1")
            .bind(process_id)
            .fetch_one(pool)
            .await
            .expect("count claim records");
    count
}

/// Drop the single-RUNNING guard to simulate external invariant corruption.
pub async fn drop_single_running_guard(pool: &PgPool) {
    sqlx::query("DROP INDEX processes_one_running")
        .execute(pool)
        .await
        .expect("drop partial unique index");
}
