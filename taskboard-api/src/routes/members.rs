/// Project member endpoints
///
/// # Endpoints
///
/// - `GET    /api/v1/projects/:project_id/members` - List members
/// - `POST   /api/v1/projects/:project_id/members` - Add by email
/// - `PUT    /api/v1/projects/:project_id/members/:user_id` - Change role
/// - `DELETE /api/v1/projects/:project_id/members/:user_id` - Remove (idempotent)
///
/// All writes require the project-role `admin` tier. The membership store's
/// conditional statements make these race-free; there is no
/// check-then-write here.
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use taskboard_shared::{
    auth::policy::ProjectAction,
    models::{
        membership::{MemberProfile, Membership, ProjectRole},
        user::User,
    },
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::project_access::ProjectAccess,
    response::ApiResponse,
};

/// Add member request
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    /// Email of the user to add
    #[validate(email(message = "Valid email required"))]
    pub email: String,

    /// Project-scoped role to assign (defaults to member)
    #[serde(default)]
    pub role: ProjectRole,
}

/// Update member role request
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRoleRequest {
    /// New project-scoped role
    pub role: ProjectRole,
}

/// Lists members in insertion order with profile fields.
pub async fn list_members(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
) -> ApiResult<ApiResponse<Vec<MemberProfile>>> {
    let members = Membership::list(&state.db, access.project.id).await?;

    Ok(ApiResponse::ok(members, "Members fetched"))
}

/// Adds a user to the project by email lookup.
///
/// # Errors
///
/// - `403`: caller is not a project-role admin
/// - `404`: no account with that email
/// - `409`: user is already a member
pub async fn add_member(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    access.require(ProjectAction::ManageMembers)?;

    req.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let added = Membership::add(&state.db, access.project.id, user.id, req.role).await?;
    if !added {
        return Err(ApiError::Conflict(
            "User already a project member".to_string(),
        ));
    }

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Member added to project",
    ))
}

/// Changes a member's project-scoped role.
///
/// # Errors
///
/// - `403`: caller is not a project-role admin
/// - `404`: target is not a member
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Path((_, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateMemberRoleRequest>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    access.require(ProjectAction::ManageMembers)?;

    Membership::update_role(&state.db, access.project.id, user_id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    Ok(ApiResponse::ok(serde_json::json!({}), "Member role updated"))
}

/// Removes a user from the project.
///
/// Idempotent: removing someone who is not a member still returns 200.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Path((_, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    access.require(ProjectAction::ManageMembers)?;

    Membership::remove(&state.db, access.project.id, user_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Member removed from project",
    ))
}
