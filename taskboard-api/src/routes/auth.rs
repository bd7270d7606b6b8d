/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/v1/auth/register` - Register a new account
/// - `POST /api/v1/auth/login` - Login and get tokens
/// - `POST /api/v1/auth/refresh` - Refresh the access token
/// - `GET  /api/v1/auth/verify-email/:token` - Consume a verification token
/// - `POST /api/v1/auth/forgot-password` - Request a password reset
/// - `POST /api/v1/auth/reset-password/:token` - Consume a reset token
/// - `GET  /api/v1/auth/current-user` - The caller's profile (authed)
/// - `POST /api/v1/auth/change-password` - Rotate the password (authed)
/// - `POST /api/v1/auth/resend-verification` - Rotate the verification token (authed)
///
/// Verification and reset tokens are generated here and stored hashed;
/// delivering them to the user's mailbox is another service's job, so in
/// development they are surfaced through the log only.
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use taskboard_shared::{
    auth::{jwt, middleware::AuthContext, password, token},
    models::user::{CreateUser, User, UserProfile, UserRole},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    response::ApiResponse,
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Unique username
    #[validate(length(min = 3, max = 100, message = "Username must be 3-100 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The created account
    pub user: UserProfile,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The logged-in account
    pub user: UserProfile,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Change password request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password
    pub old_password: String,

    /// Replacement password
    pub new_password: String,
}

/// Forgot password request
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address of the account
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Reset password request
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// Replacement password
    pub new_password: String,
}

/// Registers a new account with the `member` role and a pending
/// email-verification token.
///
/// # Errors
///
/// - `422`: validation failed
/// - `409`: email or username already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<ApiResponse<RegisterResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            role: UserRole::Member,
        },
    )
    .await?;

    let (verification_token, token_hash) = token::generate_token();
    User::store_verification_token(&state.db, user.id, &token_hash, token::verification_expiry())
        .await?;

    // Mail delivery is out of scope; in development the token is in the log.
    tracing::info!(
        user_id = %user.id,
        verification_token,
        "Generated email verification token"
    );

    Ok(ApiResponse::created(
        RegisterResponse { user: user.into() },
        "User registered successfully",
    ))
}

/// Authenticates an account and returns JWT tokens.
///
/// # Errors
///
/// - `401`: unknown email, wrong password, or banned account
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if user.banned {
        return Err(ApiError::Unauthorized("Account is banned".to_string()));
    }

    User::touch_last_login(&state.db, user.id).await?;

    let access_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(ApiResponse::ok(
        LoginResponse {
            user: user.into(),
            access_token,
            refresh_token,
        },
        "Logged in successfully",
    ))
}

/// Exchanges a refresh token for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<ApiResponse<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(ApiResponse::ok(
        RefreshResponse { access_token },
        "Access token refreshed",
    ))
}

/// Consumes an email-verification token.
///
/// # Errors
///
/// - `400`: unknown or expired token
pub async fn verify_email(
    State(state): State<AppState>,
    Path(verification_token): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let token_hash = token::hash_token(&verification_token);

    User::verify_email_by_token(&state.db, &token_hash)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest("Verification token is invalid or expired".to_string())
        })?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Email verified successfully",
    ))
}

/// Rotates the caller's verification token.
///
/// # Errors
///
/// - `409`: email already verified
pub async fn resend_verification(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    if user.email_verified {
        return Err(ApiError::Conflict("Email is already verified".to_string()));
    }

    let (verification_token, token_hash) = token::generate_token();
    User::store_verification_token(&state.db, user.id, &token_hash, token::verification_expiry())
        .await?;

    tracing::info!(
        user_id = %user.id,
        verification_token,
        "Regenerated email verification token"
    );

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Verification email sent",
    ))
}

/// Changes the caller's password after checking the current one.
///
/// # Errors
///
/// - `401`: current password is wrong
/// - `422`: replacement fails the strength policy
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let valid = password::verify_password(&req.old_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    password::validate_password_strength(&req.new_password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "new_password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.new_password)?;
    User::update_password(&state.db, user.id, &password_hash).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

/// Starts a password reset.
///
/// Always returns 200 so the endpoint cannot be used to probe for accounts;
/// a reset token is generated only when the email exists.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    req.validate().map_err(ApiError::from_validation)?;

    if let Some(user) = User::find_by_email(&state.db, &req.email).await? {
        let (reset_token, token_hash) = token::generate_token();
        User::store_reset_token(&state.db, user.id, &token_hash, token::reset_expiry()).await?;

        tracing::info!(user_id = %user.id, reset_token, "Generated password reset token");
    }

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "If the email exists, a reset link has been sent",
    ))
}

/// Consumes a reset token and sets a new password.
///
/// # Errors
///
/// - `400`: unknown or expired token
/// - `422`: replacement fails the strength policy
pub async fn reset_password(
    State(state): State<AppState>,
    Path(reset_token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    password::validate_password_strength(&req.new_password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "new_password".to_string(),
            message: e,
        }])
    })?;

    let token_hash = token::hash_token(&reset_token);
    let password_hash = password::hash_password(&req.new_password)?;

    User::reset_password_by_token(&state.db, &token_hash, &password_hash)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Reset token is invalid or expired".to_string()))?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password reset successfully",
    ))
}

/// Returns the caller's profile.
pub async fn current_user(
    Extension(auth): Extension<AuthContext>,
    Extension(user): Extension<User>,
) -> ApiResult<ApiResponse<UserProfile>> {
    debug_assert_eq!(auth.user_id, user.id);

    Ok(ApiResponse::ok(
        user.into(),
        "Current user fetched successfully",
    ))
}
