mod user;
mod forms;
mod project;
pub mod plan;

pub use user::{OwnerSnapshot, User};
pub use forms::{LoginForm, NewProjectForm, ProfileForm, RegisterForm, StatusUpdateForm};
pub use project::{remove_from, update_status_in, Project, ProjectStatus, StatusUpdate};
pub use plan::Plan;
