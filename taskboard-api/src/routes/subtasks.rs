/// Subtask endpoints
///
/// # Endpoints
///
/// - `GET    /api/v1/subtasks/:project_id/t/:task_id/subtasks` - List
/// - `POST   /api/v1/subtasks/:project_id/t/:task_id/subtasks` - Create (manager tier)
/// - `PUT    /api/v1/subtasks/:project_id/st/:subtask_id` - Update (see below)
/// - `DELETE /api/v1/subtasks/:project_id/st/:subtask_id` - Delete (manager tier)
///
/// Update branches on the caller's tier: managers may change any field,
/// while a plain member may flip `is_completed` and nothing else. Either
/// way `completed_by` follows the flag: set to the caller on completion,
/// cleared on un-completion.
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use taskboard_shared::{
    auth::{middleware::AuthContext, policy::ProjectAction},
    models::{subtask::Subtask, task::Task},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::project_access::ProjectAccess,
    response::ApiResponse,
};

/// Create subtask request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubtaskRequest {
    /// Subtask title
    #[validate(length(min = 2, max = 255, message = "Title must be at least 2 characters"))]
    pub title: String,
}

/// Update subtask request
#[derive(Debug, Deserialize)]
pub struct UpdateSubtaskRequest {
    /// New title (manager tier only)
    pub title: Option<String>,

    /// New completion state
    pub is_completed: Option<bool>,
}

/// Lists a task's subtasks.
pub async fn list_subtasks(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Path((_, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<ApiResponse<Vec<Subtask>>> {
    Task::find_in_project(&state.db, access.project.id, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let subtasks = Subtask::list_by_task(&state.db, task_id).await?;

    Ok(ApiResponse::ok(subtasks, "Subtasks fetched successfully"))
}

/// Creates a subtask under a task. Manager tier only.
pub async fn create_subtask(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Extension(auth): Extension<AuthContext>,
    Path((_, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CreateSubtaskRequest>,
) -> ApiResult<ApiResponse<Subtask>> {
    access.require(ProjectAction::ManageSubtasksFull)?;

    req.validate().map_err(ApiError::from_validation)?;

    Task::find_in_project(&state.db, access.project.id, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let subtask = Subtask::create(
        &state.db,
        access.project.id,
        task_id,
        req.title,
        auth.user_id,
    )
    .await?;

    Ok(ApiResponse::created(subtask, "Subtask created successfully"))
}

/// Updates a subtask.
///
/// Managers get a full update. A plain member is limited to the restricted
/// completion mutation: supplying anything but `is_completed` is a 403.
pub async fn update_subtask(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Extension(auth): Extension<AuthContext>,
    Path((_, subtask_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateSubtaskRequest>,
) -> ApiResult<ApiResponse<Subtask>> {
    if access.can(ProjectAction::ManageSubtasksFull) {
        let subtask = Subtask::update(
            &state.db,
            access.project.id,
            subtask_id,
            req.title,
            req.is_completed,
            auth.user_id,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Subtask not found".to_string()))?;

        return Ok(ApiResponse::ok(subtask, "Subtask updated successfully"));
    }

    // Member branch: completion toggle only
    access.require(ProjectAction::ToggleSubtaskCompletion)?;

    if req.title.is_some() {
        return Err(ApiError::Forbidden(
            "Members cannot modify subtask details".to_string(),
        ));
    }

    let is_completed = req.is_completed.ok_or_else(|| {
        ApiError::Forbidden("Members cannot modify subtask details".to_string())
    })?;

    let subtask = Subtask::set_completion(
        &state.db,
        access.project.id,
        subtask_id,
        is_completed,
        auth.user_id,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Subtask not found".to_string()))?;

    Ok(ApiResponse::ok(subtask, "Subtask status updated"))
}

/// Deletes a subtask. Manager tier only.
pub async fn delete_subtask(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Path((_, subtask_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    access.require(ProjectAction::ManageSubtasksFull)?;

    let deleted = Subtask::delete(&state.db, access.project.id, subtask_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Subtask not found".to_string()));
    }

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Subtask deleted successfully",
    ))
}
