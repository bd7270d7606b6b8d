/// Project membership model and database operations
///
/// This module is the membership store: it owns the `project_members` table
/// linking users to projects with a project-scoped role. A user appears at
/// most once per project, enforced by the composite primary key.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_role AS ENUM ('admin', 'project_admin', 'member');
///
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role project_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// The project-scoped role is distinct from the account-level
/// [`UserRole`](crate::models::user::UserRole) and the two are never compared
/// against each other:
///
/// - **admin**: manage members, notes, project settings, and everything below
/// - **project_admin**: manage tasks and subtasks
/// - **member**: view the project, toggle subtask completion
///
/// # Concurrency
///
/// Every mutation here is a single conditional statement. `add` uses an
/// `ON CONFLICT DO NOTHING` guard instead of check-then-insert, so two
/// concurrent adds of the same user cannot both succeed.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::UserRole;

/// Project-scoped roles for memberships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    /// Full control within the project: members, notes, settings
    Admin,

    /// Can manage tasks and subtasks
    ProjectAdmin,

    /// Can view the project and toggle subtask completion
    Member,
}

impl ProjectRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Admin => "admin",
            ProjectRole::ProjectAdmin => "project_admin",
            ProjectRole::Member => "member",
        }
    }

    /// Whether this role sits in the manager tier (admin or project_admin),
    /// authorized for task and subtask management.
    pub fn is_manager(&self) -> bool {
        matches!(self, ProjectRole::Admin | ProjectRole::ProjectAdmin)
    }
}

impl Default for ProjectRole {
    fn default() -> Self {
        ProjectRole::Member
    }
}

/// A membership row: one (project, user) pair with its project-scoped role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the project
    pub role: ProjectRole,

    /// When the membership was created; member lists are ordered by this
    pub created_at: DateTime<Utc>,
}

/// A membership enriched with the member's profile fields, as returned by
/// [`Membership::list`]
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberProfile {
    /// User ID
    pub user_id: Uuid,

    /// Username of the member
    pub username: String,

    /// Email of the member
    pub email: String,

    /// The member's account-level role (informational; never used for
    /// project-scoped decisions)
    pub account_role: UserRole,

    /// Role within the project
    pub role: ProjectRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Adds a user to a project with the given role.
    ///
    /// The insert is conditional on the (project, user) pair not existing,
    /// evaluated atomically by the store.
    ///
    /// # Returns
    ///
    /// `true` if the user was added, `false` if they were already a member
    /// (callers map `false` to a conflict error).
    pub async fn add(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        role: ProjectRole,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (project_id, user_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates a member's project-scoped role.
    ///
    /// # Returns
    ///
    /// The updated membership, or `None` if the user is not a member of the
    /// project.
    pub async fn update_role(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        role: ProjectRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE project_members
            SET role = $3
            WHERE project_id = $1 AND user_id = $2
            RETURNING project_id, user_id, role, created_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Removes a user from a project.
    ///
    /// Idempotent: removing a user who is not a member is a successful no-op.
    ///
    /// # Returns
    ///
    /// `true` if a membership row was deleted, `false` if none existed.
    pub async fn remove(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the members of a project in insertion order, joined with user
    /// profile fields (username, email, account role).
    pub async fn list(pool: &PgPool, project_id: Uuid) -> Result<Vec<MemberProfile>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberProfile>(
            r#"
            SELECT pm.user_id, u.username, u.email, u.role AS account_role,
                   pm.role, pm.created_at
            FROM project_members pm
            JOIN users u ON u.id = pm.user_id
            WHERE pm.project_id = $1
            ORDER BY pm.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Gets a user's project-scoped role, or `None` if they are not a member.
    pub async fn role_of(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ProjectRole>, sqlx::Error> {
        let role: Option<ProjectRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Checks whether a user is a member of a project (any role).
    pub async fn is_member(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM project_members
                WHERE project_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Counts members in a project.
    pub async fn count(pool: &PgPool, project_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM project_members WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_role_as_str() {
        assert_eq!(ProjectRole::Admin.as_str(), "admin");
        assert_eq!(ProjectRole::ProjectAdmin.as_str(), "project_admin");
        assert_eq!(ProjectRole::Member.as_str(), "member");
    }

    #[test]
    fn test_manager_tier() {
        assert!(ProjectRole::Admin.is_manager());
        assert!(ProjectRole::ProjectAdmin.is_manager());
        assert!(!ProjectRole::Member.is_manager());
    }

    #[test]
    fn test_default_role_is_member() {
        assert_eq!(ProjectRole::default(), ProjectRole::Member);
    }

    #[test]
    fn test_project_role_serde_names() {
        assert_eq!(
            serde_json::to_string(&ProjectRole::ProjectAdmin).unwrap(),
            "\"project_admin\""
        );
        let role: ProjectRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, ProjectRole::Admin);
    }

    // Store-backed properties (double add conflicts, idempotent removal,
    // insertion-ordered listing) are covered in tests/membership_store_tests.rs
}
