/// Project authorization policy
///
/// Single decision point for every project-scoped permission check. Handlers
/// and middleware never re-derive membership predicates; they ask
/// [`can_perform`] about one of the [`ProjectAction`]s below.
///
/// # Rules
///
/// | action                    | requirement                                |
/// |---------------------------|--------------------------------------------|
/// | `ViewProject`             | creator OR member of any role              |
/// | `ManageMembers`           | project-scoped role `admin`                |
/// | `ManageTasks`             | manager tier (`admin` or `project_admin`)  |
/// | `ManageSubtasksFull`      | manager tier                               |
/// | `ToggleSubtaskCompletion` | any member                                 |
/// | `ManageNotes`             | project-scoped role `admin`                |
///
/// Creator status grants `ViewProject` only. A creator who is not also a
/// member (possible after removing themselves) cannot write anything,
/// including membership changes. The account-level role never appears here;
/// platform admins get no implicit project access.
use crate::models::membership::ProjectRole;

/// A project-scoped action subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    /// Read the project, its members, tasks, subtasks, and notes
    ViewProject,

    /// Add members, change their roles, remove them
    ManageMembers,

    /// Create, update, and delete tasks
    ManageTasks,

    /// Create, fully update, and delete subtasks
    ManageSubtasksFull,

    /// Flip a subtask's completion flag (restricted mutation)
    ToggleSubtaskCompletion,

    /// Create, update, and delete notes
    ManageNotes,
}

/// Decides whether a caller may perform `action` on a project.
///
/// Pure and side-effect free: `role` is the caller's project-scoped role
/// (`None` when they are not a member) and `is_creator` whether they are the
/// project's `created_by`. Both come from the single lookup the
/// authorization middleware performs.
pub fn can_perform(role: Option<ProjectRole>, is_creator: bool, action: ProjectAction) -> bool {
    match action {
        ProjectAction::ViewProject => is_creator || role.is_some(),
        ProjectAction::ManageMembers | ProjectAction::ManageNotes => {
            matches!(role, Some(ProjectRole::Admin))
        }
        ProjectAction::ManageTasks | ProjectAction::ManageSubtasksFull => {
            role.is_some_and(|r| r.is_manager())
        }
        ProjectAction::ToggleSubtaskCompletion => role.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProjectAction::*;
    use ProjectRole::*;

    const ALL_ACTIONS: [ProjectAction; 6] = [
        ViewProject,
        ManageMembers,
        ManageTasks,
        ManageSubtasksFull,
        ToggleSubtaskCompletion,
        ManageNotes,
    ];

    #[test]
    fn test_admin_member_can_do_everything() {
        for action in ALL_ACTIONS {
            assert!(can_perform(Some(Admin), false, action), "{action:?}");
        }
    }

    #[test]
    fn test_project_admin_manages_tasks_not_members_or_notes() {
        assert!(can_perform(Some(ProjectAdmin), false, ViewProject));
        assert!(can_perform(Some(ProjectAdmin), false, ManageTasks));
        assert!(can_perform(Some(ProjectAdmin), false, ManageSubtasksFull));
        assert!(can_perform(Some(ProjectAdmin), false, ToggleSubtaskCompletion));

        assert!(!can_perform(Some(ProjectAdmin), false, ManageMembers));
        assert!(!can_perform(Some(ProjectAdmin), false, ManageNotes));
    }

    #[test]
    fn test_plain_member_views_and_toggles_only() {
        assert!(can_perform(Some(Member), false, ViewProject));
        assert!(can_perform(Some(Member), false, ToggleSubtaskCompletion));

        assert!(!can_perform(Some(Member), false, ManageMembers));
        assert!(!can_perform(Some(Member), false, ManageTasks));
        assert!(!can_perform(Some(Member), false, ManageSubtasksFull));
        assert!(!can_perform(Some(Member), false, ManageNotes));
    }

    #[test]
    fn test_non_member_denied_everything() {
        for action in ALL_ACTIONS {
            assert!(!can_perform(None, false, action), "{action:?}");
        }
    }

    #[test]
    fn test_creator_without_membership_views_only() {
        assert!(can_perform(None, true, ViewProject));

        assert!(!can_perform(None, true, ManageMembers));
        assert!(!can_perform(None, true, ManageTasks));
        assert!(!can_perform(None, true, ManageSubtasksFull));
        assert!(!can_perform(None, true, ToggleSubtaskCompletion));
        assert!(!can_perform(None, true, ManageNotes));
    }

    #[test]
    fn test_creator_status_does_not_elevate_a_member() {
        // creator who downgraded themselves to plain member
        assert!(!can_perform(Some(Member), true, ManageMembers));
        assert!(!can_perform(Some(Member), true, ManageNotes));
        assert!(can_perform(Some(Member), true, ToggleSubtaskCompletion));
    }
}
