use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

pub const SESSION_USER: &str = "user_session";
pub const SESSION_ADMIN: &str = "is_admin";

pub async fn require_auth(session: Session, req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path();

    // landing page, auth endpoints and assets stay public; the theme
    // preference is independent of any session
    if path == "/"
        || path == "/login"
        || path == "/register"
        || path == "/theme/toggle"
        || path.starts_with("/static")
    {
        return next.run(req).await;
    }

    if path.starts_with("/admin") {
        return match session.get::<bool>(SESSION_ADMIN).await {
            Ok(Some(true)) => next.run(req).await,
            _ => Redirect::to("/").into_response(),
        };
    }

    match session.get::<String>(SESSION_USER).await {
        Ok(Some(_)) => next.run(req).await,
        _ => Redirect::to("/").into_response(),
    }
}
