//! # Element Model
//!
//! One row per unit of work. An element is eligible for a process when it was
//! created before the process's cutoff and carries no claim record for it.
//!
//! `claim_for_update` is the concurrency linchpin: `FOR UPDATE SKIP LOCKED`
//! excludes rows exclusively held by another open transaction instead of
//! waiting on them, so concurrent workers each carve off a disjoint slice of
//! the backlog rather than serializing behind one another's batches. The row
//! locks are held until the caller's transaction ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::FromRow;

/// One unit of work with a mutable text payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Element {
    pub id: i64,
    pub data: String,
    pub created_at: DateTime<Utc>,
}

impl Element {
    /// Select up to `limit` unclaimed elements created before `cutoff`,
    /// locking them for the remainder of the enclosing transaction.
    ///
    /// Rows locked by another in-flight claim are skipped, not waited on.
    pub async fn claim_for_update<'e, E>(
        executor: E,
        process_id: i64,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Element>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = r#"
            SELECT e.id, e.data, e.created_at
            FROM elements AS e
            WHERE NOT EXISTS (
                SELECT 1 FROM process_elements
                WHERE process_id = $1 AND element_id = e.id
            )
            AND e.created_at < $2
            ORDER BY e.id
            LIMIT $3
            FOR UPDATE OF e SKIP LOCKED
        "#;

        sqlx::query_as::<_, Element>(query)
            .bind(process_id)
            .bind(cutoff)
            .bind(limit)
            .fetch_all(executor)
            .await
    }

    /// Persist the element's mutated payload and record the claim, as one
    /// atomic unit within the enclosing transaction. The claim record is a
    /// permanent fact: once committed, no transaction re-selects this element
    /// for this process.
    pub async fn update_and_claim(
        conn: &mut sqlx::PgConnection,
        element: &Element,
        process_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE elements SET data = $1 WHERE id = $2")
            .bind(&element.data)
            .bind(element.id)
            .execute(&mut *conn)
            .await?;

        sqlx::query("INSERT INTO process_elements (process_id, element_id) VALUES ($1, $2)")
            .bind(process_id)
            .bind(element.id)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Number of claim records held by the given process.
    pub async fn count_claimed_by<'e, E>(executor: E, process_id: i64) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM process_elements WHERE process_id = $1")
                .bind(process_id)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }

    /// Number of elements created before the cutoff, i.e. the total workload
    /// a process with that cutoff is responsible for.
    pub async fn count_created_before<'e, E>(
        executor: E,
        cutoff: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM elements WHERE created_at < $1")
                .bind(cutoff)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }
}
