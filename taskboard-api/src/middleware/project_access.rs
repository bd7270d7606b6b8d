/// Project authorization middleware
///
/// Runs after JWT authentication on every route carrying a `:project_id`
/// path parameter. It performs exactly one store lookup (project row joined
/// with the caller's membership), rejects missing projects with 404 and
/// non-members who are not the creator with 403, and attaches a
/// [`ProjectAccess`] to request extensions.
///
/// Handlers refine with [`ProjectAccess::require`], a pure policy check
/// with no further lookups:
///
/// ```ignore
/// async fn create_note(
///     Extension(access): Extension<ProjectAccess>,
///     ...
/// ) -> ApiResult<...> {
///     access.require(ProjectAction::ManageNotes)?;
///     // ...
/// }
/// ```
use axum::{
    extract::{RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use taskboard_shared::auth::middleware::AuthContext;
use taskboard_shared::auth::policy::{can_perform, ProjectAction};
use taskboard_shared::models::membership::ProjectRole;
use taskboard_shared::models::project::Project;

use crate::{app::AppState, error::ApiError};

/// The caller's standing on the project named in the request path
///
/// Built once per request by [`project_access_layer`]; everything needed for
/// policy decisions is captured here so handlers never re-query membership.
#[derive(Debug, Clone)]
pub struct ProjectAccess {
    /// The loaded project
    pub project: Project,

    /// The caller's project-scoped role (`None` when not a member)
    pub role: Option<ProjectRole>,

    /// Whether the caller is the project's creator
    pub is_creator: bool,
}

impl ProjectAccess {
    /// Pure policy check for `action`
    pub fn can(&self, action: ProjectAction) -> bool {
        can_perform(self.role, self.is_creator, action)
    }

    /// Policy check that denies with a 403 carrying a per-action message
    pub fn require(&self, action: ProjectAction) -> Result<(), ApiError> {
        if self.can(action) {
            return Ok(());
        }

        let message = match action {
            ProjectAction::ViewProject => "You do not have access to this project",
            ProjectAction::ManageMembers => "Admin role required",
            ProjectAction::ManageTasks => "Only Admin or Project Admin can manage tasks",
            ProjectAction::ManageSubtasksFull => {
                "Only Admin or Project Admin can manage subtasks"
            }
            ProjectAction::ToggleSubtaskCompletion => "You are not part of this project",
            ProjectAction::ManageNotes => "Admin access required to manage notes",
        };

        Err(ApiError::Forbidden(message.to_string()))
    }
}

/// Loads the project for the `:project_id` path parameter and attaches a
/// [`ProjectAccess`] to the request.
///
/// # Errors
///
/// - 404 if the project does not exist
/// - 403 if the caller is neither a member nor the creator (`ViewProject`
///   is the floor for every project-scoped route)
pub async fn project_access_layer(
    State(state): State<AppState>,
    params: RawPathParams,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| ApiError::Unauthorized("Missing credentials".to_string()))?;

    let project_id = params
        .iter()
        .find(|(name, _)| *name == "project_id")
        .map(|(_, value)| value)
        .ok_or_else(|| ApiError::InternalError("Route is missing :project_id".to_string()))?;

    let project_id = Uuid::parse_str(project_id)
        .map_err(|_| ApiError::BadRequest("Invalid project id".to_string()))?;

    let (project, role) = Project::find_with_role(&state.db, project_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let access = ProjectAccess {
        is_creator: project.created_by == auth.user_id,
        project,
        role,
    };

    access.require(ProjectAction::ViewProject)?;

    req.extensions_mut().insert(access);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn access(role: Option<ProjectRole>, is_creator: bool) -> ProjectAccess {
        let creator = Uuid::new_v4();
        ProjectAccess {
            project: Project {
                id: Uuid::new_v4(),
                name: "Test".to_string(),
                description: String::new(),
                created_by: creator,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            role,
            is_creator,
        }
    }

    #[test]
    fn test_require_maps_denial_to_forbidden() {
        let member = access(Some(ProjectRole::Member), false);

        assert!(member.require(ProjectAction::ViewProject).is_ok());
        assert!(matches!(
            member.require(ProjectAction::ManageMembers),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_creator_without_membership_passes_view_floor() {
        let creator = access(None, true);
        assert!(creator.require(ProjectAction::ViewProject).is_ok());
        assert!(creator.require(ProjectAction::ManageTasks).is_err());
    }
}
