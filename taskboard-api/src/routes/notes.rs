/// Note endpoints
///
/// # Endpoints
///
/// - `GET    /api/v1/notes/:project_id` - List notes (any member)
/// - `POST   /api/v1/notes/:project_id` - Create (project-role admin only)
/// - `GET    /api/v1/notes/:project_id/n/:note_id` - Note details
/// - `PUT    /api/v1/notes/:project_id/n/:note_id` - Update (admin only)
/// - `DELETE /api/v1/notes/:project_id/n/:note_id` - Delete (admin only)
///
/// Note writes require the project-role `admin` strictly; the
/// `project_admin` tier does not qualify.
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use taskboard_shared::{
    auth::{middleware::AuthContext, policy::ProjectAction},
    models::note::Note,
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::project_access::ProjectAccess,
    response::ApiResponse,
};

/// Create note request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    /// Note title
    #[validate(length(min = 1, max = 255, message = "Note title is required"))]
    pub title: String,

    /// Optional body
    pub content: Option<String>,
}

/// Update note request; omitted fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Lists a project's notes.
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
) -> ApiResult<ApiResponse<Vec<Note>>> {
    let notes = Note::list_by_project(&state.db, access.project.id).await?;

    Ok(ApiResponse::ok(notes, "Notes fetched successfully"))
}

/// Creates a note. Project-role admin only.
pub async fn create_note(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateNoteRequest>,
) -> ApiResult<ApiResponse<Note>> {
    access.require(ProjectAction::ManageNotes)?;

    req.validate().map_err(ApiError::from_validation)?;

    let note = Note::create(
        &state.db,
        access.project.id,
        req.title,
        req.content.unwrap_or_default(),
        auth.user_id,
    )
    .await?;

    Ok(ApiResponse::created(note, "Note created successfully"))
}

/// Returns one note.
pub async fn get_note(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Path((_, note_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<ApiResponse<Note>> {
    let note = Note::find_in_project(&state.db, access.project.id, note_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(ApiResponse::ok(note, "Note details fetched"))
}

/// Updates a note. Project-role admin only.
pub async fn update_note(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Path((_, note_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateNoteRequest>,
) -> ApiResult<ApiResponse<Note>> {
    access.require(ProjectAction::ManageNotes)?;

    let note = Note::update(&state.db, access.project.id, note_id, req.title, req.content)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(ApiResponse::ok(note, "Note updated successfully"))
}

/// Deletes a note. Project-role admin only.
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(access): Extension<ProjectAccess>,
    Path((_, note_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    access.require(ProjectAction::ManageNotes)?;

    let deleted = Note::delete(&state.db, access.project.id, note_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Note deleted successfully",
    ))
}
