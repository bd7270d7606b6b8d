/// Project endpoints
///
/// # Endpoints
///
/// - `GET    /api/v1/projects` - Projects the caller belongs to
/// - `POST   /api/v1/projects` - Create a project (account role gate)
/// - `GET    /api/v1/projects/:project_id` - Project + populated members
/// - `PUT    /api/v1/projects/:project_id` - Update (project admin)
/// - `DELETE /api/v1/projects/:project_id` - Delete (project admin), cascades
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use taskboard_shared::{
    auth::{middleware::AuthContext, policy::ProjectAction},
    models::{
        membership::{MemberProfile, Membership},
        project::{CreateProject, Project, ProjectSummary},
    },
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::project_access::ProjectAccess,
    response::ApiResponse,
};

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Update project request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New name
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

/// Project details with its populated member list
#[derive(Debug, Serialize)]
pub struct ProjectDetails {
    /// The project
    #[serde(flatten)]
    pub project: Project,

    /// Members in insertion order, enriched with profile fields
    pub members: Vec<MemberProfile>,
}

/// Lists the caller's projects with member counts.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<Vec<ProjectSummary>>> {
    let projects = Project::list_for_user(&state.db, auth.user_id).await?;

    Ok(ApiResponse::ok(projects, "Projects fetched successfully"))
}

/// Creates a project; the creator is auto-added as a project-role admin.
///
/// Only accounts with the `admin` or `project_admin` role may create
/// projects.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<ApiResponse<Project>> {
    if !auth.role.can_create_projects() {
        return Err(ApiError::Forbidden(
            "You are not authorized to create projects".to_string(),
        ));
    }

    req.validate().map_err(ApiError::from_validation)?;

    let project = Project::create(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description.unwrap_or_default(),
            created_by: auth.user_id,
        },
    )
    .await?;

    Ok(ApiResponse::created(
        project,
        "Project created successfully",
    ))
}

/// Returns the project with its populated member list.
///
/// The view floor was already enforced by the authorization middleware.
pub async fn get_project(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
) -> ApiResult<ApiResponse<ProjectDetails>> {
    let members = Membership::list(&state.db, access.project.id).await?;

    Ok(ApiResponse::ok(
        ProjectDetails {
            project: access.project,
            members,
        },
        "Project details fetched",
    ))
}

/// Updates a project's name/description. Project-role admin only.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<ApiResponse<Project>> {
    // Project settings share the member-management tier: project-role admin.
    access.require(ProjectAction::ManageMembers)?;

    req.validate().map_err(ApiError::from_validation)?;

    let project = Project::update(&state.db, access.project.id, req.name, req.description)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(ApiResponse::ok(project, "Project updated successfully"))
}

/// Deletes a project and everything in it. Project-role admin only.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    access.require(ProjectAction::ManageMembers)?;

    Project::delete(&state.db, access.project.id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Project deleted successfully",
    ))
}
