/// Task endpoints
///
/// # Endpoints
///
/// - `GET    /api/v1/tasks/:project_id` - List project tasks
/// - `POST   /api/v1/tasks/:project_id` - Create (manager tier)
/// - `GET    /api/v1/tasks/:project_id/t/:task_id` - Task details
/// - `PUT    /api/v1/tasks/:project_id/t/:task_id` - Update (manager tier)
/// - `DELETE /api/v1/tasks/:project_id/t/:task_id` - Delete (manager tier)
///
/// An assignee, when given, must be a member of the project; a bad assignee
/// is a 400, not a policy denial.
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use taskboard_shared::{
    auth::{middleware::AuthContext, policy::ProjectAction},
    models::{
        membership::Membership,
        task::{Attachment, CreateTask, Task, TaskStatus, UpdateTask},
    },
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::project_access::ProjectAccess,
    response::ApiResponse,
};

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional assignee; must be a project member
    pub assigned_to: Option<Uuid>,

    /// Attachment metadata
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Update task request; omitted fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
}

async fn ensure_assignee_is_member(
    state: &AppState,
    project_id: Uuid,
    assignee: Uuid,
) -> ApiResult<()> {
    if !Membership::is_member(&state.db, project_id, assignee).await? {
        return Err(ApiError::BadRequest(
            "Assigned user is not a project member".to_string(),
        ));
    }

    Ok(())
}

/// Lists a project's tasks.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
) -> ApiResult<ApiResponse<Vec<Task>>> {
    let tasks = Task::list_by_project(&state.db, access.project.id).await?;

    Ok(ApiResponse::ok(tasks, "Tasks fetched successfully"))
}

/// Creates a task. Manager tier only.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<ApiResponse<Task>> {
    access.require(ProjectAction::ManageTasks)?;

    req.validate().map_err(ApiError::from_validation)?;

    if let Some(assignee) = req.assigned_to {
        ensure_assignee_is_member(&state, access.project.id, assignee).await?;
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id: access.project.id,
            title: req.title,
            description: req.description.unwrap_or_default(),
            assigned_to: req.assigned_to,
            attachments: req.attachments,
            created_by: auth.user_id,
        },
    )
    .await?;

    Ok(ApiResponse::created(task, "Task created successfully"))
}

/// Returns one task.
pub async fn get_task(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Path((_, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<ApiResponse<Task>> {
    let task = Task::find_in_project(&state.db, access.project.id, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(ApiResponse::ok(task, "Task details fetched"))
}

/// Updates a task. Manager tier only; a changed assignee is re-validated.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Path((_, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<ApiResponse<Task>> {
    access.require(ProjectAction::ManageTasks)?;

    if let Some(assignee) = req.assigned_to {
        ensure_assignee_is_member(&state, access.project.id, assignee).await?;
    }

    let task = Task::update(
        &state.db,
        access.project.id,
        task_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assigned_to: req.assigned_to,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(ApiResponse::ok(task, "Task updated successfully"))
}

/// Deletes a task. Manager tier only.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Path((_, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    access.require(ProjectAction::ManageTasks)?;

    let deleted = Task::delete(&state.db, access.project.id, task_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Task deleted successfully",
    ))
}
