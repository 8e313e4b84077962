use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::handlers::html_escape;
use crate::handlers::landing::error_banner;
use crate::models::{
    update_status_in, Project, ProjectStatus, StatusUpdate, StatusUpdateForm, User,
};
use crate::services::Store;

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub error: Option<String>,
    pub status: Option<String>,
}

pub async fn serve_admin_panel(
    State((store, _config)): State<(Store, Config)>,
    Query(query): Query<AdminQuery>,
) -> AppResult<Response> {
    tracing::info!("Rendering admin panel");

    let mut users = store.scan_users().await?;
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let mut projects = flatten_project_lists(store.scan_project_lists().await?);
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let template = std::fs::read_to_string("templates/admin.html").map_err(|e| {
        tracing::error!("Failed to read admin template: {}", e);
        AppError::Template(e)
    })?;

    let theme = store.get_theme().await?;
    // stats always cover the whole store, filtered or not
    let pending = count_with(&projects, ProjectStatus::Pending);
    let in_progress = count_with(&projects, ProjectStatus::InProgress);
    let completed = count_with(&projects, ProjectStatus::Completed);
    let total = projects.len();

    let filter = query.status.as_deref().and_then(ProjectStatus::parse);
    let visible = filter_by_status(projects, filter);

    let html = template
        .replace("{{theme}}", &theme)
        .replace("{{error}}", &error_banner(query.error.as_deref()))
        .replace("{{user_count}}", &users.len().to_string())
        .replace("{{project_count}}", &total.to_string())
        .replace("{{pending_count}}", &pending.to_string())
        .replace("{{in_progress_count}}", &in_progress.to_string())
        .replace("{{completed_count}}", &completed.to_string())
        .replace("{{filter_options}}", &filter_options(filter))
        .replace("{{users}}", &user_rows(&users))
        .replace("{{projects}}", &project_rows(&visible));

    Ok(Html(html).into_response())
}

pub async fn update_project_status(
    State((store, _config)): State<(Store, Config)>,
    Form(form): Form<StatusUpdateForm>,
) -> AppResult<Response> {
    let status = ProjectStatus::parse(&form.status)
        .ok_or_else(|| AppError::Form(format!("Unknown status {}", form.status)))?;
    let notes = if form.notes.trim().is_empty() {
        None
    } else {
        Some(form.notes.trim().to_string())
    };

    match apply_status_update(&store, &form.project_id, status, notes).await? {
        StatusUpdate::Applied => {
            tracing::info!("Project {} set to {}", form.project_id, status.as_str());
            Ok(Redirect::to("/admin").into_response())
        }
        StatusUpdate::IllegalTransition => {
            tracing::warn!(
                "Rejected illegal transition to {} for project {}",
                status.as_str(),
                form.project_id
            );
            Ok(redirect_with_error(&format!(
                "Cannot move this project to {}",
                status.display_name()
            )))
        }
        StatusUpdate::NotFound => {
            tracing::warn!("Status update for unknown project {}", form.project_id);
            Ok(redirect_with_error("Project not found"))
        }
    }
}

/// Walks every stored project list and rewrites the first entry matching the
/// id. Only the owning list is written back; nothing is persisted on a miss
/// or a rejected transition.
async fn apply_status_update(
    store: &Store,
    project_id: &str,
    status: ProjectStatus,
    notes: Option<String>,
) -> AppResult<StatusUpdate> {
    for (user_id, mut projects) in store.scan_project_lists().await? {
        match update_status_in(&mut projects, project_id, status, notes.clone()) {
            StatusUpdate::NotFound => continue,
            StatusUpdate::Applied => {
                store.save_projects(&user_id, &projects).await?;
                return Ok(StatusUpdate::Applied);
            }
            StatusUpdate::IllegalTransition => return Ok(StatusUpdate::IllegalTransition),
        }
    }
    Ok(StatusUpdate::NotFound)
}

fn redirect_with_error(msg: &str) -> Response {
    Redirect::to(&format!("/admin?error={}", urlencoding::encode(msg))).into_response()
}

/// One flat sequence over every owner's list, in scan order.
fn flatten_project_lists(lists: Vec<(String, Vec<Project>)>) -> Vec<Project> {
    lists.into_iter().flat_map(|(_, list)| list).collect()
}

fn filter_by_status(projects: Vec<Project>, filter: Option<ProjectStatus>) -> Vec<Project> {
    match filter {
        Some(status) => projects.into_iter().filter(|p| p.status == status).collect(),
        None => projects,
    }
}

fn filter_options(current: Option<ProjectStatus>) -> String {
    let mut options = vec![format!(
        r#"<option value=""{sel}>All statuses</option>"#,
        sel = if current.is_none() { " selected" } else { "" },
    )];
    options.extend(ProjectStatus::ALL.iter().map(|status| {
        format!(
            r#"<option value="{value}"{sel}>{label}</option>"#,
            value = status.as_str(),
            sel = if current == Some(*status) { " selected" } else { "" },
            label = status.display_name(),
        )
    }));
    options.join("\n")
}

fn count_with(projects: &[Project], status: ProjectStatus) -> usize {
    projects.iter().filter(|p| p.status == status).count()
}

fn user_rows(users: &[User]) -> String {
    if users.is_empty() {
        return r#"<tr><td colspan="6" class="empty">No users yet</td></tr>"#.to_string();
    }
    users
        .iter()
        .map(|user| {
            format!(
                r#"<tr>
                    <td>{name}{admin_tag}</td>
                    <td>{email}</td>
                    <td>{company}</td>
                    <td>{phone}</td>
                    <td>{size}</td>
                    <td>{created}</td>
                </tr>"#,
                name = html_escape(&user.name),
                admin_tag = if user.is_admin {
                    r#" <span class="tag">admin</span>"#
                } else {
                    ""
                },
                email = html_escape(&user.email),
                company = html_escape(&user.company_name),
                phone = html_escape(&user.phone),
                size = html_escape(&user.company_size),
                created = user.created_at.format("%Y-%m-%d"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn project_rows(projects: &[Project]) -> String {
    if projects.is_empty() {
        return r#"<tr><td colspan="7" class="empty">No projects yet</td></tr>"#.to_string();
    }
    projects
        .iter()
        .map(|project| {
            format!(
                r#"<tr>
                    <td>{name}</td>
                    <td>{owner} ({owner_email})</td>
                    <td>{plan}</td>
                    <td><span class="status status-{status}">{status_label}</span></td>
                    <td>{created}</td>
                    <td>{notes}</td>
                    <td class="action-cell">
                        <form method="post" action="/admin/projects/status" class="status-form">
                            <input type="hidden" name="project_id" value="{id}">
                            <select name="status">{options}</select>
                            <input type="text" name="notes" value="{notes_value}" placeholder="Notes">
                            <button type="submit">Save</button>
                        </form>
                    </td>
                </tr>"#,
                name = html_escape(&project.website_name),
                owner = html_escape(&project.user.name),
                owner_email = html_escape(&project.user.email),
                plan = project.plan.display_name(),
                status = project.status.as_str(),
                status_label = project.status.display_name(),
                created = project.created_at.format("%Y-%m-%d %H:%M"),
                notes = html_escape(project.admin_notes.as_deref().unwrap_or("-")),
                id = project.id,
                options = status_options(project.status),
                notes_value = html_escape(project.admin_notes.as_deref().unwrap_or("")),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_options(current: ProjectStatus) -> String {
    ProjectStatus::ALL
        .iter()
        .filter(|next| current.can_transition_to(**next))
        .map(|next| {
            format!(
                r#"<option value="{value}"{sel}>{label}</option>"#,
                value = next.as_str(),
                sel = if *next == current { " selected" } else { "" },
                label = next.display_name(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Plan;
    use chrono::Utc;

    fn test_user(id: &str, email: &str) -> User {
        User {
            id: id.into(),
            email: email.into(),
            name: "Ada".into(),
            company_name: "Acme".into(),
            phone: String::new(),
            company_size: String::new(),
            password_hash: String::new(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_flatten_is_union_of_owner_lists() {
        let alice = test_user("u1", "a@x.com");
        let bob = test_user("u2", "b@x.com");
        let a1 = Project::new(&alice, "a-one".into(), "".into(), Plan::Starter);
        let a2 = Project::new(&alice, "a-two".into(), "".into(), Plan::Advanced);
        let b1 = Project::new(&bob, "b-one".into(), "".into(), Plan::Advanced2);
        let expected: Vec<String> = vec![a1.id.clone(), a2.id.clone(), b1.id.clone()];

        let flat = flatten_project_lists(vec![
            ("u1".to_string(), vec![a1, a2]),
            ("u2".to_string(), vec![b1]),
        ]);

        assert_eq!(flat.len(), 3);
        // the union, order unconstrained
        let mut ids: Vec<String> = flat.iter().map(|p| p.id.clone()).collect();
        let mut expected = expected;
        ids.sort();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_filter_by_status() {
        let user = test_user("u1", "a@x.com");
        let mut projects = vec![
            Project::new(&user, "s1".into(), "".into(), Plan::Starter),
            Project::new(&user, "s2".into(), "".into(), Plan::Starter),
            Project::new(&user, "s3".into(), "".into(), Plan::Starter),
        ];
        projects[1].status = ProjectStatus::Completed;

        let all = filter_by_status(projects.clone(), None);
        assert_eq!(all.len(), 3);

        let completed = filter_by_status(projects.clone(), Some(ProjectStatus::Completed));
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].website_name, "s2");

        let cancelled = filter_by_status(projects, Some(ProjectStatus::Cancelled));
        assert!(cancelled.is_empty());
    }

    #[test]
    fn test_filter_options_preselect() {
        let html = filter_options(None);
        assert!(html.contains(r#"value="" selected"#));
        assert!(html.contains(r#"value="pending""#));

        let html = filter_options(Some(ProjectStatus::InProgress));
        assert!(html.contains(r#"value="in-progress" selected"#));
        assert!(!html.contains(r#"value="" selected"#));
    }

    #[test]
    fn test_status_options_respect_state_machine() {
        let html = status_options(ProjectStatus::Pending);
        assert!(html.contains(r#"value="pending" selected"#));
        assert!(html.contains(r#"value="in-progress""#));
        assert!(html.contains(r#"value="cancelled""#));
        assert!(!html.contains(r#"value="completed""#));

        // terminal states only offer themselves
        let html = status_options(ProjectStatus::Completed);
        assert!(html.contains(r#"value="completed" selected"#));
        assert!(!html.contains(r#"value="pending""#));
    }

    #[test]
    fn test_count_with() {
        let user = test_user("u1", "a@x.com");
        let mut projects = vec![
            Project::new(&user, "s1".into(), "".into(), Plan::Starter),
            Project::new(&user, "s2".into(), "".into(), Plan::Starter),
        ];
        projects[1].status = ProjectStatus::Completed;
        assert_eq!(count_with(&projects, ProjectStatus::Pending), 1);
        assert_eq!(count_with(&projects, ProjectStatus::Completed), 1);
        assert_eq!(count_with(&projects, ProjectStatus::Cancelled), 0);
    }
}
