use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub company_name: String,
    pub phone: String,
    pub company_size: String,
    // carried over from the pricing card the visitor clicked, if any
    pub plan: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewProjectForm {
    pub website_name: String,
    pub description: String,
    pub plan: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateForm {
    pub project_id: String,
    pub status: String,
    #[serde(default)]
    pub notes: String,
}
