//! # Process Model
//!
//! One row per logical run of the backlog-draining job. The `status` column
//! is the serialization point for lifecycle transitions: a partial unique
//! index (`processes_one_running`) guarantees at most one RUNNING row
//! system-wide, so "is anything running?" and "insert a new RUNNING row" are
//! a single atomic INSERT rather than a check-then-act sequence.
//!
//! `created_at` doubles as the cutoff that freezes which elements are in
//! scope for the process: elements created later are excluded, which is what
//! guarantees the process terminates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::FromRow;

use crate::error::ProcessorError;

/// Lifecycle status of a process. COMPLETE is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessStatus {
    Running,
    Paused,
    Complete,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Running => "RUNNING",
            ProcessStatus::Paused => "PAUSED",
            ProcessStatus::Complete => "COMPLETE",
        }
    }
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One run of the backlog-draining job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Process {
    pub id: i64,
    pub status: ProcessStatus,
    pub created_at: DateTime<Utc>,
}

impl Process {
    /// Insert a new RUNNING process and return it.
    ///
    /// The store enforces the single-RUNNING invariant: if another RUNNING
    /// row exists, the partial unique index rejects the insert and this
    /// returns `RunningProcessExists`. No application-level pre-check is
    /// involved, so two racing creators cannot both succeed.
    pub async fn create_running<'e, E>(executor: E) -> Result<Process, ProcessorError>
    where
        E: PgExecutor<'e>,
    {
        let query = r#"
            INSERT INTO processes (status)
            VALUES ($1)
            RETURNING id, status, created_at
        "#;

        sqlx::query_as::<_, Process>(query)
            .bind(ProcessStatus::Running)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ProcessorError::RunningProcessExists
                } else {
                    ProcessorError::Database(e)
                }
            })
    }

    /// Persist a status change for an existing process.
    ///
    /// RUNNING-producing flips (resume) go through the same partial unique
    /// index as creation, so a resume racing a create cannot yield two
    /// RUNNING rows either.
    pub async fn update_status<'e, E>(
        executor: E,
        id: i64,
        status: ProcessStatus,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("UPDATE processes SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// All processes with the given status. Callers assert cardinality.
    pub async fn find_by_status<'e, E>(
        executor: E,
        status: ProcessStatus,
    ) -> Result<Vec<Process>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Process>(
            "SELECT id, status, created_at FROM processes WHERE status = $1",
        )
        .bind(status)
        .fetch_all(executor)
        .await
    }

    /// The most recently created process, if any.
    pub async fn find_latest<'e, E>(executor: E) -> Result<Option<Process>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Process>(
            r#"
            SELECT id, status, created_at FROM processes
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(executor)
        .await
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
