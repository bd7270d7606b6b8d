/// Subtask model and database operations
///
/// Subtasks hang off a task within a project. `completed_by` tracks who
/// toggled the completion flag and is cleared whenever the subtask is marked
/// incomplete again.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE subtasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     completed_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Subtask model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subtask {
    /// Unique subtask ID
    pub id: Uuid,

    /// Project this subtask belongs to
    pub project_id: Uuid,

    /// Parent task
    pub task_id: Uuid,

    /// Subtask title
    pub title: String,

    /// Completion flag
    pub is_completed: bool,

    /// Who completed it; NULL while incomplete
    pub completed_by: Option<Uuid>,

    /// User who created the subtask
    pub created_by: Uuid,

    /// When the subtask was created
    pub created_at: DateTime<Utc>,

    /// When the subtask was last updated
    pub updated_at: DateTime<Utc>,
}

const SUBTASK_COLUMNS: &str = "id, project_id, task_id, title, is_completed, completed_by, \
     created_by, created_at, updated_at";

impl Subtask {
    /// Creates a new subtask under a task.
    pub async fn create(
        pool: &PgPool,
        project_id: Uuid,
        task_id: Uuid,
        title: String,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Subtask>(&format!(
            r#"
            INSERT INTO subtasks (project_id, task_id, title, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {SUBTASK_COLUMNS}
            "#
        ))
        .bind(project_id)
        .bind(task_id)
        .bind(title)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    /// Lists a task's subtasks in creation order.
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Subtask>(&format!(
            "SELECT {SUBTASK_COLUMNS} FROM subtasks WHERE task_id = $1 ORDER BY created_at ASC"
        ))
        .bind(task_id)
        .fetch_all(pool)
        .await
    }

    /// Full update: title and/or completion, manager tier only (enforced by
    /// the caller). When `is_completed` is supplied, `completed_by` follows
    /// it: set to `actor` on true, cleared on false.
    ///
    /// # Returns
    ///
    /// The updated subtask, or `None` if it does not exist in the project.
    pub async fn update(
        pool: &PgPool,
        project_id: Uuid,
        id: Uuid,
        title: Option<String>,
        is_completed: Option<bool>,
        actor: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Subtask>(&format!(
            r#"
            UPDATE subtasks
            SET title = COALESCE($3, title),
                is_completed = COALESCE($4, is_completed),
                completed_by = CASE
                    WHEN $4 IS NULL THEN completed_by
                    WHEN $4 THEN $5
                    ELSE NULL
                END,
                updated_at = NOW()
            WHERE id = $1 AND project_id = $2
            RETURNING {SUBTASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(project_id)
        .bind(title)
        .bind(is_completed)
        .bind(actor)
        .fetch_optional(pool)
        .await
    }

    /// Restricted update for plain members: only the completion flag and its
    /// actor reference change, never the title.
    pub async fn set_completion(
        pool: &PgPool,
        project_id: Uuid,
        id: Uuid,
        is_completed: bool,
        actor: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Subtask>(&format!(
            r#"
            UPDATE subtasks
            SET is_completed = $3,
                completed_by = CASE WHEN $3 THEN $4 ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1 AND project_id = $2
            RETURNING {SUBTASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(project_id)
        .bind(is_completed)
        .bind(actor)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a subtask within a project.
    pub async fn delete(pool: &PgPool, project_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all subtasks.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subtasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
