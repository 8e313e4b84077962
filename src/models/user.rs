use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub company_name: String,
    pub phone: String,
    pub company_size: String,
    pub password_hash: String,  // bcrypt, never the plain text
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Contact-field snapshot embedded into every project this user creates.
    pub fn snapshot(&self) -> OwnerSnapshot {
        OwnerSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            company_name: self.company_name.clone(),
            phone: self.phone.clone(),
            company_size: self.company_size.clone(),
        }
    }
}

/// Owner contact fields frozen at project-creation time. Later profile edits
/// do not rewrite snapshots already stored inside project records.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OwnerSnapshot {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub phone: String,
    pub company_size: String,
}
