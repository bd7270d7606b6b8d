/// Database models for Taskboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Accounts with the account-level role
/// - `project`: Projects, owned by their creator
/// - `membership`: (project, user, project-scoped role) join entity
/// - `task`: Tasks within a project
/// - `subtask`: Subtasks under a task, with completion tracking
/// - `note`: Project notes
pub mod membership;
pub mod note;
pub mod project;
pub mod subtask;
pub mod task;
pub mod user;
