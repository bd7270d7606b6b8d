/// Project model and database operations
///
/// Projects own memberships, tasks, subtasks, and notes; deleting a project
/// cascades to all of them (enforced by the schema).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::membership::ProjectRole;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// User who created the project
    pub created_by: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Description (empty string if omitted)
    pub description: String,

    /// Creator; auto-added as a project-role admin member
    pub created_by: Uuid,
}

/// A project as listed for a user, with its member count
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Per-project member counts for the admin overview
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectMemberCount {
    pub project_id: Uuid,
    pub name: String,
    pub member_count: i64,
    pub last_updated: DateTime<Utc>,
}

impl Project {
    /// Creates a project and enrolls the creator as a project-role admin.
    ///
    /// Both inserts happen in one transaction so a project can never exist
    /// without its admin membership.
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_by, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id, role)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(project.id)
        .bind(data.created_by)
        .bind(ProjectRole::Admin)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Loads a project together with the given user's membership role, in a
    /// single round trip. The request-authorization middleware depends on
    /// this being one lookup.
    ///
    /// # Returns
    ///
    /// `None` if the project does not exist; otherwise the project and the
    /// user's project-scoped role (`None` when they are not a member).
    pub async fn find_with_role(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<(Self, Option<ProjectRole>)>, sqlx::Error> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: Uuid,
            name: String,
            description: String,
            created_by: Uuid,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
            member_role: Option<ProjectRole>,
        }

        let row = sqlx::query_as::<_, Row>(
            r#"
            SELECT p.id, p.name, p.description, p.created_by, p.created_at, p.updated_at,
                   pm.role AS member_role
            FROM projects p
            LEFT JOIN project_members pm
                   ON pm.project_id = p.id AND pm.user_id = $2
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| {
            (
                Project {
                    id: r.id,
                    name: r.name,
                    description: r.description,
                    created_by: r.created_by,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                },
                r.member_role,
            )
        }))
    }

    /// Lists the projects a user belongs to, newest first, with member counts.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        sqlx::query_as::<_, ProjectSummary>(
            r#"
            SELECT p.id, p.name, p.description, p.created_by,
                   (SELECT COUNT(*) FROM project_members c WHERE c.project_id = p.id) AS member_count,
                   p.created_at
            FROM projects p
            JOIN project_members pm ON pm.project_id = p.id
            WHERE pm.user_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Updates name and/or description. Omitted fields are left unchanged.
    ///
    /// # Returns
    ///
    /// The updated project, or `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a project; memberships, tasks, subtasks, and notes go with it.
    ///
    /// # Returns
    ///
    /// `true` if the project existed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all projects.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts projects updated on or after the given instant.
    pub async fn count_active_since(
        pool: &PgPool,
        since: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE updated_at >= $1")
                .bind(since)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Per-project member counts, most recently updated first.
    pub async fn member_count_overview(
        pool: &PgPool,
    ) -> Result<Vec<ProjectMemberCount>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMemberCount>(
            r#"
            SELECT p.id AS project_id, p.name,
                   (SELECT COUNT(*) FROM project_members c WHERE c.project_id = p.id) AS member_count,
                   p.updated_at AS last_updated
            FROM projects p
            ORDER BY p.updated_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// The most recently created projects, for the admin activity feed.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM projects
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
