/// Platform-admin analytics endpoints
///
/// # Endpoints
///
/// - `GET /api/v1/admin/dashboard` - Entity totals + recent activity count
/// - `GET /api/v1/admin/users` - Verification and role distribution
/// - `GET /api/v1/admin/projects` - Per-project member counts
/// - `GET /api/v1/admin/tasks` - Task status distribution
/// - `GET /api/v1/admin/activity` - Recent tasks and projects
///
/// Gated on the account-level `admin` role. This is the only place the
/// account role grants anything; it never implies project-scoped access.
use axum::{extract::State, Extension};
use chrono::{Duration, Utc};
use serde::Serialize;

use taskboard_shared::{
    auth::middleware::AuthContext,
    models::{
        note::Note,
        project::{Project, ProjectMemberCount},
        subtask::Subtask,
        task::{Task, TaskStatus},
        user::{User, UserRole},
    },
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
};

fn require_platform_admin(auth: &AuthContext) -> Result<(), ApiError> {
    if !auth.is_platform_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    Ok(())
}

/// Entity totals
#[derive(Debug, Serialize)]
pub struct DashboardTotals {
    pub users: i64,
    pub projects: i64,
    pub tasks: i64,
    pub subtasks: i64,
    pub notes: i64,
}

/// Dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub totals: DashboardTotals,
    pub active_projects_last_7_days: i64,
}

/// User statistics response
#[derive(Debug, Serialize)]
pub struct UserStats {
    pub total_users: i64,
    pub verified_users: i64,
    pub unverified_users: i64,
    pub role_distribution: RoleDistribution,
}

/// Account-role distribution
#[derive(Debug, Serialize)]
pub struct RoleDistribution {
    pub admin: i64,
    pub project_admin: i64,
    pub member: i64,
}

/// Project statistics response
#[derive(Debug, Serialize)]
pub struct ProjectStats {
    pub total_projects: i64,
    pub project_member_counts: Vec<ProjectMemberCount>,
}

/// Task statistics response
#[derive(Debug, Serialize)]
pub struct TaskStats {
    pub total_tasks: i64,
    pub status_distribution: StatusDistribution,
}

/// Task-status distribution
#[derive(Debug, Serialize)]
pub struct StatusDistribution {
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
}

/// Recent activity response
#[derive(Debug, Serialize)]
pub struct RecentActivity {
    pub recent_tasks: Vec<Task>,
    pub recent_projects: Vec<Project>,
}

/// Overview dashboard: totals plus projects touched in the last 7 days.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<DashboardStats>> {
    require_platform_admin(&auth)?;

    let totals = DashboardTotals {
        users: User::count_all(&state.db).await?,
        projects: Project::count_all(&state.db).await?,
        tasks: Task::count_all(&state.db).await?,
        subtasks: Subtask::count_all(&state.db).await?,
        notes: Note::count_all(&state.db).await?,
    };

    let active_projects_last_7_days =
        Project::count_active_since(&state.db, Utc::now() - Duration::days(7)).await?;

    Ok(ApiResponse::ok(
        DashboardStats {
            totals,
            active_projects_last_7_days,
        },
        "Admin dashboard stats fetched",
    ))
}

/// User verification counts and account-role distribution.
pub async fn user_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<UserStats>> {
    require_platform_admin(&auth)?;

    let total_users = User::count_all(&state.db).await?;
    let verified_users = User::count_verified(&state.db).await?;

    let role_distribution = RoleDistribution {
        admin: User::count_with_role(&state.db, UserRole::Admin).await?,
        project_admin: User::count_with_role(&state.db, UserRole::ProjectAdmin).await?,
        member: User::count_with_role(&state.db, UserRole::Member).await?,
    };

    Ok(ApiResponse::ok(
        UserStats {
            total_users,
            verified_users,
            unverified_users: total_users - verified_users,
            role_distribution,
        },
        "User stats fetched",
    ))
}

/// Per-project member counts.
pub async fn project_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<ProjectStats>> {
    require_platform_admin(&auth)?;

    let total_projects = Project::count_all(&state.db).await?;
    let project_member_counts = Project::member_count_overview(&state.db).await?;

    Ok(ApiResponse::ok(
        ProjectStats {
            total_projects,
            project_member_counts,
        },
        "Project statistics fetched",
    ))
}

/// Task status distribution.
pub async fn task_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<TaskStats>> {
    require_platform_admin(&auth)?;

    let total_tasks = Task::count_all(&state.db).await?;

    let status_distribution = StatusDistribution {
        todo: Task::count_with_status(&state.db, TaskStatus::Todo).await?,
        in_progress: Task::count_with_status(&state.db, TaskStatus::InProgress).await?,
        done: Task::count_with_status(&state.db, TaskStatus::Done).await?,
    };

    Ok(ApiResponse::ok(
        TaskStats {
            total_tasks,
            status_distribution,
        },
        "Task stats fetched",
    ))
}

/// The ten most recent tasks and projects.
pub async fn recent_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<RecentActivity>> {
    require_platform_admin(&auth)?;

    let recent_tasks = Task::recent(&state.db, 10).await?;
    let recent_projects = Project::recent(&state.db, 10).await?;

    Ok(ApiResponse::ok(
        RecentActivity {
            recent_tasks,
            recent_projects,
        },
        "Recent activity fetched",
    ))
}
