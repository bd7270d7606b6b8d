/// User model and database operations
///
/// This module provides the User model and CRUD operations for accounts.
/// Users join projects through the Membership model; the account-level
/// `role` here is independent of any project-scoped role.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'project_admin', 'member');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(100) NOT NULL UNIQUE,
///     email CITEXT NOT NULL UNIQUE,
///     email_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'member',
///     banned BOOLEAN NOT NULL DEFAULT FALSE,
///     avatar_url VARCHAR(512),
///     verification_token_hash VARCHAR(64),
///     verification_token_expires_at TIMESTAMPTZ,
///     reset_token_hash VARCHAR(64),
///     reset_token_expires_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Account-level roles
///
/// `Admin` gates the admin analytics endpoints. It grants no project-scoped
/// rights on its own; those come only from a project membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform administrator: admin dashboard and user statistics
    Admin,

    /// May create projects
    ProjectAdmin,

    /// Regular account
    Member,
}

impl UserRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::ProjectAdmin => "project_admin",
            UserRole::Member => "member",
        }
    }

    /// Whether this account may create projects
    pub fn can_create_projects(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::ProjectAdmin)
    }
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. One-time
/// verification and reset tokens are stored as SHA-256 digests.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Unique username
    pub username: String,

    /// Email address (case-insensitive via CITEXT)
    pub email: String,

    /// Whether the email address has been verified
    pub email_verified: bool,

    /// Argon2id password hash
    pub password_hash: String,

    /// Account-level role
    pub role: UserRole,

    /// Banned accounts fail authentication
    pub banned: bool,

    /// Optional avatar/profile picture URL
    pub avatar_url: Option<String>,

    /// SHA-256 digest of the pending email-verification token
    pub verification_token_hash: Option<String>,

    /// Expiry of the pending verification token
    pub verification_token_expires_at: Option<DateTime<Utc>>,

    /// SHA-256 digest of the pending password-reset token
    pub reset_token_hash: Option<String>,

    /// Expiry of the pending reset token
    pub reset_token_expires_at: Option<DateTime<Utc>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Unique username
    pub username: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Account-level role (registration always passes `Member`)
    pub role: UserRole,
}

/// A user's public profile: everything a client may see.
///
/// Never serialize [`User`] directly in a response; it carries the password
/// hash and token digests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub email_verified: bool,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            email_verified: user.email_verified,
            role: user.role,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, email_verified, password_hash, role, banned, \
     avatar_url, verification_token_hash, verification_token_expires_at, \
     reset_token_hash, reset_token_expires_at, created_at, updated_at, last_login_at";

impl User {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation if the email or username is
    /// already taken; callers map that to a conflict response.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Records a successful login.
    pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Replaces a user's password hash.
    pub async fn update_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Stores a new email-verification token digest, replacing any pending one.
    pub async fn store_verification_token(
        pool: &PgPool,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET verification_token_hash = $2,
                verification_token_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Consumes an unexpired verification token and marks the email verified.
    ///
    /// # Returns
    ///
    /// The verified user, or `None` if no user holds that token or it has
    /// expired.
    pub async fn verify_email_by_token(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email_verified = TRUE,
                verification_token_hash = NULL,
                verification_token_expires_at = NULL,
                updated_at = NOW()
            WHERE verification_token_hash = $1
              AND verification_token_expires_at > NOW()
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Stores a new password-reset token digest, replacing any pending one.
    pub async fn store_reset_token(
        pool: &PgPool,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token_hash = $2,
                reset_token_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Consumes an unexpired reset token and replaces the password hash.
    ///
    /// # Returns
    ///
    /// The user whose password was reset, or `None` if the token is unknown
    /// or expired.
    pub async fn reset_password_by_token(
        pool: &PgPool,
        token_hash: &str,
        password_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET password_hash = $2,
                reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                updated_at = NOW()
            WHERE reset_token_hash = $1
              AND reset_token_expires_at > NOW()
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(token_hash)
        .bind(password_hash)
        .fetch_optional(pool)
        .await
    }

    /// Counts all users.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts users with a verified email.
    pub async fn count_verified(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE email_verified = TRUE")
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Counts users holding a given account-level role.
    pub async fn count_with_role(pool: &PgPool, role: UserRole) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::ProjectAdmin.as_str(), "project_admin");
        assert_eq!(UserRole::Member.as_str(), "member");
    }

    #[test]
    fn test_project_creation_gate() {
        assert!(UserRole::Admin.can_create_projects());
        assert!(UserRole::ProjectAdmin.can_create_projects());
        assert!(!UserRole::Member.can_create_projects());
    }

    #[test]
    fn test_profile_omits_secrets() {
        let json = serde_json::to_value(UserProfile {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            email_verified: true,
            role: UserRole::Member,
            avatar_url: None,
            created_at: Utc::now(),
            last_login_at: None,
        })
        .unwrap();

        assert!(json.get("password_hash").is_none());
        assert!(json.get("verification_token_hash").is_none());
        assert!(json.get("reset_token_hash").is_none());
    }
}
