use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::handlers::auth::email_available;
use crate::handlers::html_escape;
use crate::handlers::landing::{error_banner, plan_options};
use crate::middleware::SESSION_USER;
use crate::models::{remove_from, NewProjectForm, Plan, ProfileForm, Project, User};
use crate::services::Store;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub error: Option<String>,
}

pub async fn serve_dashboard(
    State((store, _config)): State<(Store, Config)>,
    session: Session,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Response> {
    let user = current_user(&store, &session).await?;
    tracing::info!("Rendering dashboard for {}", user.email);

    let mut projects = store.list_projects(&user.id).await?;
    // newest first
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let template = std::fs::read_to_string("templates/dashboard.html").map_err(|e| {
        tracing::error!("Failed to read dashboard template: {}", e);
        AppError::Template(e)
    })?;

    let theme = store.get_theme().await?;
    let html = template
        .replace("{{theme}}", &theme)
        .replace("{{error}}", &error_banner(query.error.as_deref()))
        .replace("{{name}}", &html_escape(&user.name))
        .replace("{{email}}", &html_escape(&user.email))
        .replace("{{company_name}}", &html_escape(&user.company_name))
        .replace("{{phone}}", &html_escape(&user.phone))
        .replace("{{company_size}}", &html_escape(&user.company_size))
        .replace("{{project_count}}", &projects.len().to_string())
        .replace("{{projects}}", &project_rows(&projects))
        .replace("{{plan_options}}", &plan_options("starter"));

    Ok(Html(html).into_response())
}

pub async fn create_project(
    State((store, config)): State<(Store, Config)>,
    session: Session,
    Form(form): Form<NewProjectForm>,
) -> AppResult<Response> {
    let user = current_user(&store, &session).await?;

    let plan = Plan::parse(&form.plan)
        .ok_or_else(|| AppError::Form(format!("Unknown plan {}", form.plan)))?;

    let project = Project::new(&user, form.website_name, form.description, plan);
    let mut projects = store.list_projects(&user.id).await?;
    projects.push(project.clone());
    store.save_projects(&user.id, &projects).await?;

    // stands in for the project request email, no delivery happens
    tracing::info!(
        "Notification to {}: new project {} ({} plan) requested by {}",
        config.notifications.operator_email,
        project.website_name,
        project.plan.display_name(),
        user.email,
    );

    Ok(Redirect::to("/dashboard").into_response())
}

pub async fn delete_project(
    State((store, _config)): State<(Store, Config)>,
    session: Session,
    Path(project_id): Path<String>,
) -> AppResult<Response> {
    let user = current_user(&store, &session).await?;
    tracing::info!("Deleting project {} for {}", project_id, user.email);

    // idempotent: an unknown id just rewrites the list unchanged
    let mut projects = store.list_projects(&user.id).await?;
    remove_from(&mut projects, &project_id);
    store.save_projects(&user.id, &projects).await?;

    Ok(Redirect::to("/dashboard").into_response())
}

pub async fn update_profile(
    State((store, _config)): State<(Store, Config)>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let mut user = current_user(&store, &session).await?;

    let email_changed = user.email != form.email;
    if email_changed {
        // claiming another user's address would overwrite their record
        let existing = store.get_user(&form.email).await?;
        if !email_available(&form.email, existing.as_ref()) {
            return Ok(
                Redirect::to("/dashboard?error=Email%20already%20registered").into_response(),
            );
        }
    }

    user.name = form.name;
    user.email = form.email;
    user.company_name = form.company_name;
    user.phone = form.phone;

    store.save_user(&user).await?;
    if email_changed {
        // the session follows the email-keyed slot
        session
            .insert(SESSION_USER, user.email.clone())
            .await
            .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?;
    }

    tracing::info!("Profile updated for {}", user.email);
    Ok(Redirect::to("/dashboard").into_response())
}

#[derive(Debug, Deserialize)]
pub struct ThemeQuery {
    pub back: Option<String>,
}

pub async fn toggle_theme(
    State((store, _config)): State<(Store, Config)>,
    Query(query): Query<ThemeQuery>,
) -> AppResult<Response> {
    let next = match store.get_theme().await?.as_str() {
        "dark" => "light",
        _ => "dark",
    };
    store.set_theme(next).await?;

    // only same-site targets
    let back = match query.back.as_deref() {
        Some(path) if path.starts_with('/') => path.to_string(),
        _ => "/".to_string(),
    };
    Ok(Redirect::to(&back).into_response())
}

async fn current_user(store: &Store, session: &Session) -> AppResult<User> {
    let email = session
        .get::<String>(SESSION_USER)
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?
        .ok_or_else(|| AppError::Auth("Not authenticated".into()))?;

    store
        .get_user(&email)
        .await?
        .ok_or_else(|| AppError::Auth("User not found".into()))
}

fn project_rows(projects: &[Project]) -> String {
    if projects.is_empty() {
        return r#"<tr><td colspan="6" class="empty">No projects yet</td></tr>"#.to_string();
    }
    projects
        .iter()
        .map(|project| {
            format!(
                r#"<tr>
                    <td>{name}</td>
                    <td>{plan}</td>
                    <td><span class="status status-{status}">{status_label}</span></td>
                    <td>{created}</td>
                    <td>{notes}</td>
                    <td class="action-cell">
                        <a href="/projects/delete/{id}" class="delete-btn">Delete</a>
                    </td>
                </tr>"#,
                name = html_escape(&project.website_name),
                plan = project.plan.display_name(),
                status = project.status.as_str(),
                status_label = project.status.display_name(),
                created = project.created_at.format("%Y-%m-%d %H:%M"),
                notes = html_escape(project.admin_notes.as_deref().unwrap_or("-")),
                id = project.id,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectStatus;
    use chrono::Utc;

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
    fn test_project_rows_empty() {
        assert!(project_rows(&[]).contains("No projects yet"));
    }

    #[test]
    fn test_project_rows_render_status_and_notes() {
        let user = test_user();
        let mut project = Project::new(&user, "site1".into(), "".into(), Plan::Advanced2);
        project.status = ProjectStatus::InProgress;
        project.admin_notes = Some("kickoff call booked".into());
        let html = project_rows(&[project]);
        assert!(html.contains("site1"));
        assert!(html.contains("Advanced 2"));
        assert!(html.contains("status-in-progress"));
        assert!(html.contains("kickoff call booked"));
    }

    #[test]
    fn test_project_rows_escape_user_input() {
        let user = test_user();
        let project = Project::new(
            &user,
            "<script>alert(1)</script>".into(),
            "".into(),
            Plan::Starter,
        );
        let html = project_rows(&[project]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
