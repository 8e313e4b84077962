use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use tower_sessions::Session;
use uuid::Uuid;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::middleware::{SESSION_ADMIN, SESSION_USER};
use crate::models::{LoginForm, RegisterForm, User};
use crate::services::Store;

// The single operator account. Created lazily on first startup if absent.
pub const ADMIN_EMAIL: &str = "admin@siternos.com";
pub const ADMIN_PASSWORD: &str = "siternos2025!";

/// One record per email: an address is free only when no user holds it and
/// it is not the reserved administrator address. Applied at registration and
/// again whenever a profile edit changes the email.
pub(crate) fn email_available(email: &str, existing: Option<&User>) -> bool {
    email != ADMIN_EMAIL && existing.is_none()
}

/// Writes the fixed administrator record under `admin_<email>` unless one is
/// already stored.
pub async fn seed_admin(store: &Store) -> AppResult<()> {
    if store.get_admin(ADMIN_EMAIL).await?.is_some() {
        return Ok(());
    }
    let password_hash = hash(ADMIN_PASSWORD.as_bytes(), DEFAULT_COST)
        .map_err(|e| AppError::Auth(format!("Failed to hash admin password: {}", e)))?;
    let admin = User {
        id: Uuid::new_v4().to_string(),
        email: ADMIN_EMAIL.to_string(),
        name: "Siternos Admin".to_string(),
        company_name: "Siternos".to_string(),
        phone: String::new(),
        company_size: String::new(),
        password_hash,
        is_admin: true,
        created_at: Utc::now(),
    };
    store.save_user(&admin).await?;
    tracing::info!("Seeded administrator account {}", ADMIN_EMAIL);
    Ok(())
}

#[axum::debug_handler]
pub async fn handle_login(
    State((store, _config)): State<(Store, Config)>,
    session: Session,
    Form(login_form): Form<LoginForm>,
) -> Response {
    tracing::info!("Login attempt for {}", login_form.email);

    // The fixed operator credentials always resolve to the seeded record,
    // regardless of what has been registered since.
    if login_form.email == ADMIN_EMAIL && login_form.password == ADMIN_PASSWORD {
        return match store.get_admin(ADMIN_EMAIL).await {
            Ok(Some(_)) => {
                if let Err(e) = start_session(&session, ADMIN_EMAIL, true).await {
                    tracing::error!("Session error: {}", e);
                    return Redirect::to("/?error=Server%20error").into_response();
                }
                Redirect::to("/admin").into_response()
            }
            Ok(None) => {
                tracing::error!("Administrator record missing from store");
                Redirect::to("/?error=Server%20error").into_response()
            }
            Err(e) => {
                tracing::error!("Store error: {}", e);
                Redirect::to("/?error=Server%20error").into_response()
            }
        };
    }

    match store.get_user(&login_form.email).await {
        Ok(Some(user)) => {
            if verify(&login_form.password, &user.password_hash).unwrap_or(false) {
                if let Err(e) = start_session(&session, &user.email, false).await {
                    tracing::error!("Session error: {}", e);
                    return Redirect::to("/?error=Server%20error").into_response();
                }
                tracing::info!("User {} logged in", user.email);
                Redirect::to("/dashboard").into_response()
            } else {
                tracing::info!("Invalid password for {}", login_form.email);
                Redirect::to("/?error=Password%20is%20incorrect%2C%20please%20re-enter&form=login")
                    .into_response()
            }
        }
        Ok(None) => {
            tracing::info!("No account for {}", login_form.email);
            Redirect::to("/?error=No%20account%20found%2C%20please%20register%20first&form=login")
                .into_response()
        }
        Err(e) => {
            tracing::error!("Store error: {}", e);
            Redirect::to("/?error=Server%20error").into_response()
        }
    }
}

pub async fn handle_register(
    State((store, config)): State<(Store, Config)>,
    session: Session,
    Form(register_form): Form<RegisterForm>,
) -> AppResult<Response> {
    if register_form.password != register_form.confirm_password {
        return Ok(
            Redirect::to("/?error=Passwords%20don't%20match&form=register").into_response(),
        );
    }

    let existing = store.get_user(&register_form.email).await?;
    if !email_available(&register_form.email, existing.as_ref()) {
        return Ok(
            Redirect::to("/?error=Email%20already%20registered&form=register").into_response(),
        );
    }

    let password_hash = hash(register_form.password.as_bytes(), DEFAULT_COST)
        .map_err(|e| AppError::Auth(format!("Failed to hash password: {}", e)))?;
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: register_form.email,
        name: register_form.name,
        company_name: register_form.company_name,
        phone: register_form.phone,
        company_size: register_form.company_size,
        password_hash,
        is_admin: false,
        created_at: Utc::now(),
    };

    store.save_user(&user).await?;

    // stands in for the signup notification email, no delivery happens
    tracing::info!(
        "Notification to {}: new signup {} ({}) selected plan {}",
        config.notifications.operator_email,
        user.name,
        user.email,
        register_form.plan.as_deref().unwrap_or("none"),
    );

    start_session(&session, &user.email, false)
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?;

    Ok(Redirect::to("/dashboard").into_response())
}

#[axum::debug_handler]
pub async fn handle_logout(session: Session) -> Response {
    if let Err(e) = session.remove::<String>(SESSION_USER).await {
        tracing::warn!("Session removal error: {}", e);
    }
    if let Err(e) = session.remove::<bool>(SESSION_ADMIN).await {
        tracing::warn!("Session removal error: {}", e);
    }
    Redirect::to("/").into_response()
}

async fn start_session(
    session: &Session,
    email: &str,
    is_admin: bool,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(SESSION_USER, email.to_string()).await?;
    session.insert(SESSION_ADMIN, is_admin).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_user(email: &str) -> User {
        User {
            id: "u1".into(),
            email: email.into(),
            name: "Bea".into(),
            company_name: "Beacon".into(),
            phone: "+1 555 0101".into(),
            company_size: "11-50".into(),
            password_hash: "hash".into(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_email_available_for_fresh_address() {
        assert!(email_available("new@x.com", None));
    }

    #[test]
    fn test_email_taken_by_existing_user() {
        // a taken address must never be claimable, whether at registration
        // or through a profile edit: claiming it would overwrite the other
        // user's record
        let victim = stored_user("b@x.com");
        assert!(!email_available("b@x.com", Some(&victim)));
    }

    #[test]
    fn test_admin_address_is_reserved() {
        assert!(!email_available(ADMIN_EMAIL, None));
    }
}
