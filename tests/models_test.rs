//! Store-level tests for the process and element models.

mod common;

use chrono::{Duration, Utc};
use common::*;
use sqlx::PgPool;

use batchproc::models::{Element, Process, ProcessStatus};
use batchproc::ProcessorError;

#[sqlx::test(migrations = "./migrations")]
async fn create_running_assigns_id_and_timestamp(pool: PgPool) {
    let process = Process::create_running(&pool).await.expect("create");

    assert!(process.id > 0);
    assert_eq!(process.status, ProcessStatus::Running);
    assert!(process.created_at <= Utc::now());
}

#[sqlx::test(migrations = "./migrations")]
async fn create_running_rejected_while_one_runs(pool: PgPool) {
    Process::create_running(&pool).await.expect("first create");

    let err = Process::create_running(&pool).await.unwrap_err();

    assert!(matches!(err, ProcessorError::RunningProcessExists));
    assert_eq!(process_count(&pool).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn create_running_allowed_after_completion(pool: PgPool) {
    let first = Process::create_running(&pool).await.expect("create");
    Process::update_status(&pool, first.id, ProcessStatus::Complete)
        .await
        .expect("complete");

    let second = Process::create_running(&pool).await.expect("second create");

    assert_ne!(first.id, second.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn find_by_status_filters(pool: PgPool) {
    let now = Utc::now();
    insert_process(&pool, "COMPLETE", now - Duration::hours(2)).await;
    insert_process(&pool, "COMPLETE", now - Duration::hours(1)).await;
    let running_id = insert_process(&pool, "RUNNING", now).await;

    let running = Process::find_by_status(&pool, ProcessStatus::Running)
        .await
        .expect("query");
    let complete = Process::find_by_status(&pool, ProcessStatus::Complete)
        .await
        .expect("query");

    assert_eq!(running.len(), 1);
    assert_eq!(running[0].id, running_id);
    assert_eq!(complete.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn find_latest_returns_most_recent(pool: PgPool) {
    let now = Utc::now();
    insert_process(&pool, "COMPLETE", now - Duration::hours(2)).await;
    let latest_id = insert_process(&pool, "PAUSED", now).await;

    let latest = Process::find_latest(&pool).await.expect("query").unwrap();

    assert_eq!(latest.id, latest_id);
    assert_eq!(latest.status, ProcessStatus::Paused);
}

#[sqlx::test(migrations = "./migrations")]
async fn find_latest_on_empty_table(pool: PgPool) {
    assert!(Process::find_latest(&pool).await.expect("query").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn claim_respects_cutoff_limit_and_existing_claims(pool: PgPool) {
    let now = Utc::now();
    let process_id = insert_process(&pool, "RUNNING", now).await;
    let claimed = insert_element(&pool, "claimed", now - Duration::hours(1)).await;
    let eligible_a = insert_element(&pool, "a", now - Duration::hours(1)).await;
    let eligible_b = insert_element(&pool, "b", now - Duration::minutes(30)).await;
    insert_element(&pool, "too new", now + Duration::hours(1)).await;
    insert_claim(&pool, process_id, claimed).await;

    let mut tx = pool.begin().await.expect("begin");
    let batch = Element::claim_for_update(&mut *tx, process_id, now, 10)
        .await
        .expect("claim");
    let ids: Vec<i64> = batch.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![eligible_a, eligible_b]);

    let limited = Element::claim_for_update(&mut *tx, process_id, now, 1)
        .await
        .expect("claim limited");
    assert_eq!(limited.len(), 1);
    tx.rollback().await.expect("rollback");
}

#[sqlx::test(migrations = "./migrations")]
async fn claim_skips_rows_locked_by_other_transaction(pool: PgPool) {
    let now = Utc::now();
    let process_id = insert_process(&pool, "RUNNING", now).await;
    let held = insert_element(&pool, "held", now - Duration::hours(1)).await;
    let free = insert_element(&pool, "free", now - Duration::hours(1)).await;

    let mut holder = pool.begin().await.expect("begin holder");
    sqlx::query("SELECT id FROM elements WHERE id = $1 FOR UPDATE")
        .bind(held)
        .fetch_all(&mut *holder)
        .await
        .expect("hold row");

    // The other worker's claim does not block; it just skips the held row.
    let mut tx = pool.begin().await.expect("begin claimer");
    let batch = Element::claim_for_update(&mut *tx, process_id, now, 10)
        .await
        .expect("claim");

    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].id, free);

    tx.rollback().await.expect("rollback");
    holder.rollback().await.expect("rollback holder");
}

#[sqlx::test(migrations = "./migrations")]
async fn update_and_claim_writes_payload_and_claim_atomically(pool: PgPool) {
    let now = Utc::now();
    let process_id = insert_process(&pool, "RUNNING", now).await;
    let element_id = insert_element(&pool, "payload", now - Duration::hours(1)).await;

    let mut tx = pool.begin().await.expect("begin");
    let mut batch = Element::claim_for_update(&mut *tx, process_id, now, 1)
        .await
        .expect("claim");
    let mut element = batch.remove(0);
    element.data = element.data.to_uppercase();
    Element::update_and_claim(&mut *tx, &element, process_id)
        .await
        .expect("update and claim");
    tx.commit().await.expect("commit");

    assert_eq!(element_data(&pool, element_id).await, "PAYLOAD");
    assert_eq!(claim_count(&pool, process_id).await, 1);

    // Uncommitted work leaves nothing behind.
    let another = insert_element(&pool, "rolled back", now - Duration::hours(1)).await;
    let mut tx = pool.begin().await.expect("begin");
    let mut batch = Element::claim_for_update(&mut *tx, process_id, now, 1)
        .await
        .expect("claim");
    let mut element = batch.remove(0);
    assert_eq!(element.id, another);
    element.data = element.data.to_uppercase();
    Element::update_and_claim(&mut *tx, &element, process_id)
        .await
        .expect("update and claim");
    tx.rollback().await.expect("rollback");

    assert_eq!(element_data(&pool, another).await, "rolled back");
    assert_eq!(claim_count(&pool, process_id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn counts(pool: PgPool) {
    let now = Utc::now();
    let process_id = insert_process(&pool, "RUNNING", now).await;
    let e1 = insert_element(&pool, "a", now - Duration::hours(1)).await;
    insert_element(&pool, "b", now - Duration::hours(1)).await;
    insert_element(&pool, "c", now + Duration::hours(1)).await;
    insert_claim(&pool, process_id, e1).await;

    assert_eq!(
        Element::count_claimed_by(&pool, process_id).await.unwrap(),
        1
    );
    assert_eq!(
        Element::count_created_before(&pool, now).await.unwrap(),
        2
    );
}
