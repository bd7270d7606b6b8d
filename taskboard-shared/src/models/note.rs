/// Note model and database operations
///
/// Project notes: readable by any member, writable only by project-role
/// admins (strictly; the project_admin tier is not enough).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     content TEXT NOT NULL DEFAULT '',
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Note model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    /// Unique note ID
    pub id: Uuid,

    /// Project this note belongs to
    pub project_id: Uuid,

    /// Note title
    pub title: String,

    /// Note body
    pub content: String,

    /// User who created the note
    pub created_by: Uuid,

    /// When the note was created
    pub created_at: DateTime<Utc>,

    /// When the note was last updated
    pub updated_at: DateTime<Utc>,
}

const NOTE_COLUMNS: &str = "id, project_id, title, content, created_by, created_at, updated_at";

impl Note {
    /// Creates a new note.
    pub async fn create(
        pool: &PgPool,
        project_id: Uuid,
        title: String,
        content: String,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Note>(&format!(
            r#"
            INSERT INTO notes (project_id, title, content, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(project_id)
        .bind(title)
        .bind(content)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    /// Finds a note by ID within a project.
    pub async fn find_in_project(
        pool: &PgPool,
        project_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 AND project_id = $2"
        ))
        .bind(id)
        .bind(project_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a project's notes, newest first.
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE project_id = $1 ORDER BY created_at DESC"
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Updates title and/or content. Omitted fields are left unchanged.
    pub async fn update(
        pool: &PgPool,
        project_id: Uuid,
        id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Note>(&format!(
            r#"
            UPDATE notes
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = NOW()
            WHERE id = $1 AND project_id = $2
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(project_id)
        .bind(title)
        .bind(content)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a note within a project.
    pub async fn delete(pool: &PgPool, project_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all notes.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
