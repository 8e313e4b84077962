use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::fs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::plan::{CATALOG, FAQS};
use crate::services::Store;

#[derive(Debug, Deserialize)]
pub struct LandingQuery {
    pub error: Option<String>,
    pub plan: Option<String>,
}

pub async fn serve_landing(
    State((store, _config)): State<(Store, Config)>,
    Query(query): Query<LandingQuery>,
) -> AppResult<Response> {
    tracing::debug!("Serving landing page");

    let template = fs::read_to_string("templates/landing.html").map_err(|e| {
        tracing::error!("Failed to read landing template: {}", e);
        AppError::Template(e)
    })?;

    let theme = store.get_theme().await?;
    let selected_plan = query.plan.as_deref().unwrap_or("starter");

    let html = template
        .replace("{{theme}}", &theme)
        .replace("{{error}}", &error_banner(query.error.as_deref()))
        .replace("{{plans}}", &pricing_cards())
        .replace("{{plan_options}}", &plan_options(selected_plan))
        .replace("{{faqs}}", &faq_items());

    Ok(Html(html).into_response())
}

pub(crate) fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(msg) if !msg.is_empty() => {
            // the query echo is attacker-controlled, escape it
            format!(r#"<div class="alert">{}</div>"#, super::html_escape(msg))
        }
        _ => String::new(),
    }
}

fn pricing_cards() -> String {
    CATALOG
        .iter()
        .map(|info| {
            let features = info
                .features
                .iter()
                .map(|f| format!("<li>{}</li>", f))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                r#"<div class="plan-card {gradient}{popular_class}">
                    {badge}
                    <h3>{name}</h3>
                    <p class="price">&euro;{price}<span>/project</span></p>
                    <ul>{features}</ul>
                    <a href="/?plan={value}#signup" class="plan-btn">Get Started</a>
                </div>"#,
                gradient = info.gradient,
                popular_class = if info.popular { " popular" } else { "" },
                badge = if info.popular {
                    r#"<span class="badge">Most Popular</span>"#
                } else {
                    ""
                },
                name = info.plan.display_name(),
                price = info.plan.price(),
                features = features,
                value = info.plan.as_str(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn plan_options(selected: &str) -> String {
    CATALOG
        .iter()
        .map(|info| {
            format!(
                r#"<option value="{value}"{sel}>{name} &mdash; &euro;{price}/project</option>"#,
                value = info.plan.as_str(),
                sel = if info.plan.as_str() == selected {
                    " selected"
                } else {
                    ""
                },
                name = info.plan.display_name(),
                price = info.plan.price(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn faq_items() -> String {
    FAQS.iter()
        .map(|faq| {
            format!(
                r#"<details class="faq-item">
                    <summary>{}</summary>
                    <p>{}</p>
                </details>"#,
                faq.question, faq.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
