use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use super::plan::Plan;
use super::user::{OwnerSnapshot, User};

// Workflow states for a website build request
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Pending,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    /// Wire/form value, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<ProjectStatus> {
        match value {
            "pending" => Some(ProjectStatus::Pending),
            "in-progress" => Some(ProjectStatus::InProgress),
            "completed" => Some(ProjectStatus::Completed),
            "cancelled" => Some(ProjectStatus::Cancelled),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "Pending",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }

    /// State machine: pending -> {in-progress, cancelled},
    /// in-progress -> {completed, cancelled}; completed and cancelled
    /// are terminal. Setting the current status again is allowed so the
    /// admin can revise notes without changing state.
    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            ProjectStatus::Pending => {
                matches!(next, ProjectStatus::InProgress | ProjectStatus::Cancelled)
            }
            ProjectStatus::InProgress => {
                matches!(next, ProjectStatus::Completed | ProjectStatus::Cancelled)
            }
            ProjectStatus::Completed | ProjectStatus::Cancelled => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Project {
    pub id: String,
    pub user: OwnerSnapshot,
    pub website_name: String,
    pub description: String,
    pub plan: Plan,
    pub status: ProjectStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(owner: &User, website_name: String, description: String, plan: Plan) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user: owner.snapshot(),
            website_name,
            description,
            plan,
            status: ProjectStatus::Pending,
            admin_notes: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Outcome of an in-list status rewrite, see [`update_status_in`].
#[derive(Debug, PartialEq, Eq)]
pub enum StatusUpdate {
    Applied,
    IllegalTransition,
    NotFound,
}

/// Rewrites the entry with the given id in place: new status, notes and an
/// `updated_at` stamp. The list is left untouched when the id is absent or
/// the state machine forbids the transition.
pub fn update_status_in(
    projects: &mut [Project],
    project_id: &str,
    status: ProjectStatus,
    notes: Option<String>,
) -> StatusUpdate {
    match projects.iter_mut().find(|p| p.id == project_id) {
        Some(project) => {
            if !project.status.can_transition_to(status) {
                return StatusUpdate::IllegalTransition;
            }
            project.status = status;
            project.admin_notes = notes;
            project.updated_at = Some(Utc::now());
            StatusUpdate::Applied
        }
        None => StatusUpdate::NotFound,
    }
}

/// Drops the entry with the given id. Idempotent: unknown ids leave the
/// list unchanged.
pub fn remove_from(projects: &mut Vec<Project>, project_id: &str) {
    projects.retain(|p| p.id != project_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: "u1".into(),
            email: "a@x.com".into(),
            name: "Ada".into(),
            company_name: "Acme".into(),
            phone: "+1 555 0100".into(),
            company_size: "1-10".into(),
            password_hash: "hash".into(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_project_is_pending() {
        let user = test_user();
        let project = Project::new(&user, "site1".into(), "a shop".into(), Plan::Starter);
        assert_eq!(project.status, ProjectStatus::Pending);
        assert_eq!(project.user.email, "a@x.com");
        assert!(project.admin_notes.is_none());
        assert!(project.updated_at.is_none());
    }

    #[test]
    fn test_status_wire_values() {
        let json = serde_json::to_string(&ProjectStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ProjectStatus::parse("done"), None);
    }

    #[test]
    fn test_transition_guard() {
        use ProjectStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!InProgress.can_transition_to(Pending));
        for status in ProjectStatus::ALL {
            // revising notes keeps the current state legal
            assert!(status.can_transition_to(status));
            if status != Completed {
                assert!(!Completed.can_transition_to(status));
            }
            if status != Cancelled {
                assert!(!Cancelled.can_transition_to(status));
            }
        }
    }

    #[test]
    fn test_update_status_stamps_entry() {
        let user = test_user();
        let mut projects = vec![
            Project::new(&user, "site1".into(), "".into(), Plan::Starter),
            Project::new(&user, "site2".into(), "".into(), Plan::Advanced),
        ];
        let id = projects[0].id.clone();

        let outcome = update_status_in(
            &mut projects,
            &id,
            ProjectStatus::InProgress,
            Some("started".into()),
        );
        assert_eq!(outcome, StatusUpdate::Applied);
        assert_eq!(projects[0].status, ProjectStatus::InProgress);
        assert_eq!(projects[0].admin_notes.as_deref(), Some("started"));
        assert!(projects[0].updated_at.is_some());
        // the other entry stays untouched
        assert_eq!(projects[1].status, ProjectStatus::Pending);
    }

    #[test]
    fn test_update_status_unknown_id() {
        let user = test_user();
        let mut projects = vec![Project::new(&user, "site1".into(), "".into(), Plan::Starter)];
        let outcome = update_status_in(&mut projects, "missing", ProjectStatus::Cancelled, None);
        assert_eq!(outcome, StatusUpdate::NotFound);
        assert_eq!(projects[0].status, ProjectStatus::Pending);
        assert!(projects[0].updated_at.is_none());
    }

    #[test]
    fn test_update_status_illegal_transition() {
        let user = test_user();
        let mut projects = vec![Project::new(&user, "site1".into(), "".into(), Plan::Starter)];
        let id = projects[0].id.clone();
        let outcome =
            update_status_in(&mut projects, &id, ProjectStatus::Completed, Some("no".into()));
        assert_eq!(outcome, StatusUpdate::IllegalTransition);
        assert_eq!(projects[0].status, ProjectStatus::Pending);
        assert!(projects[0].admin_notes.is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let user = test_user();
        let mut projects = vec![
            Project::new(&user, "site1".into(), "".into(), Plan::Starter),
            Project::new(&user, "site2".into(), "".into(), Plan::Advanced2),
        ];
        let id = projects[0].id.clone();

        remove_from(&mut projects, &id);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].website_name, "site2");

        remove_from(&mut projects, &id);
        remove_from(&mut projects, "never-existed");
        assert_eq!(projects.len(), 1);
    }

    #[test]
    fn test_admin_workflow_scenario() {
        // register -> empty list -> create -> pending -> admin completes with note
        let user = test_user();
        let mut projects: Vec<Project> = Vec::new();
        assert!(projects.is_empty());

        projects.push(Project::new(&user, "site1".into(), "".into(), Plan::Starter));
        let id = projects[0].id.clone();
        assert_eq!(projects[0].status, ProjectStatus::Pending);

        assert_eq!(
            update_status_in(&mut projects, &id, ProjectStatus::InProgress, None),
            StatusUpdate::Applied
        );
        assert_eq!(
            update_status_in(&mut projects, &id, ProjectStatus::Completed, Some("done".into())),
            StatusUpdate::Applied
        );
        assert_eq!(projects[0].status, ProjectStatus::Completed);
        assert_eq!(projects[0].admin_notes.as_deref(), Some("done"));
    }
}
