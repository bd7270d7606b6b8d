/// Authentication context and errors shared with the HTTP layer
///
/// The API server's JWT layer validates the bearer token, loads the account,
/// rejects banned users, and inserts an [`AuthContext`] into request
/// extensions. Handlers extract it with Axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Authentication context added to request extensions after a successful
/// token check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Account-level role, read from the user row (not the token) so role
    /// changes take effect on the next request
    pub role: UserRole,
}

impl AuthContext {
    /// Creates an auth context for a user
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Whether this account holds the platform admin role
    pub fn is_platform_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Error type for authentication
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),

    /// The account no longer exists
    UnknownUser,

    /// The account is banned
    Banned,

    /// Database error while loading the account
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::UnknownUser => {
                (StatusCode::UNAUTHORIZED, "Unknown user").into_response()
            }
            AuthError::Banned => {
                (StatusCode::FORBIDDEN, "Account is banned").into_response()
            }
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_admin_check() {
        assert!(AuthContext::new(Uuid::new_v4(), UserRole::Admin).is_platform_admin());
        assert!(!AuthContext::new(Uuid::new_v4(), UserRole::ProjectAdmin).is_platform_admin());
        assert!(!AuthContext::new(Uuid::new_v4(), UserRole::Member).is_platform_admin());
    }
}
