pub(crate) mod auth;
pub(crate) mod landing;
mod dashboard;
mod admin;

pub use auth::{handle_login, handle_logout, handle_register, seed_admin};
pub use landing::serve_landing;
pub use dashboard::{
    create_project, delete_project, serve_dashboard, toggle_theme, update_profile,
};
pub use admin::{serve_admin_panel, update_project_status};

/// Escapes user-supplied text before it is interpolated into a template.
pub(crate) fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
        assert_eq!(html_escape("Fish & Chips"), "Fish &amp; Chips");
        assert_eq!(html_escape("plain"), "plain");
    }
}
