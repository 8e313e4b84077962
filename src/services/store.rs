use redis::{AsyncCommands, Client};
use std::sync::Arc;
use crate::models::{Project, User};

pub const USER_PREFIX: &str = "user_";
pub const ADMIN_PREFIX: &str = "admin_";
pub const PROJECTS_PREFIX: &str = "projects_";
const THEME_KEY: &str = "theme";

pub fn user_key(email: &str) -> String {
    format!("{}{}", USER_PREFIX, email)
}

pub fn admin_key(email: &str) -> String {
    format!("{}{}", ADMIN_PREFIX, email)
}

pub fn projects_key(user_id: &str) -> String {
    format!("{}{}", PROJECTS_PREFIX, user_id)
}

/// Key-value persistence layer. Users live under `user_<email>` (the seeded
/// administrator under `admin_<email>`), each customer's project list as one
/// JSON array under `projects_<userId>`, and the theme preference as a
/// singleton key.
pub struct Store {
    client: Arc<Client>,
}

impl Store {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    pub async fn get_user(&self, email: &str) -> Result<Option<User>, redis::RedisError> {
        self.get_record(&user_key(email)).await
    }

    pub async fn get_admin(&self, email: &str) -> Result<Option<User>, redis::RedisError> {
        self.get_record(&admin_key(email)).await
    }

    pub async fn save_user(&self, user: &User) -> Result<(), redis::RedisError> {
        let key = if user.is_admin {
            admin_key(&user.email)
        } else {
            user_key(&user.email)
        };
        let mut conn = self.client.get_async_connection().await?;
        conn.set(key, encode(user)?).await
    }

    pub async fn list_projects(&self, user_id: &str) -> Result<Vec<Project>, redis::RedisError> {
        Ok(self.get_record(&projects_key(user_id)).await?.unwrap_or_default())
    }

    pub async fn save_projects(
        &self,
        user_id: &str,
        projects: &[Project],
    ) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let key = projects_key(user_id);
        // an empty list and an absent key read back the same; drop the key
        if projects.is_empty() {
            conn.del(&key).await
        } else {
            conn.set(&key, encode(&projects)?).await
        }
    }

    /// Every stored user, ordinary and administrator alike. Scan order is
    /// whatever the key space yields; callers sort for display.
    pub async fn scan_users(&self) -> Result<Vec<User>, redis::RedisError> {
        let mut entries = self.raw_entries(USER_PREFIX).await?;
        entries.extend(self.raw_entries(ADMIN_PREFIX).await?);
        Ok(decode_records(entries))
    }

    /// Every `(owner user id, project list)` pair in the store.
    pub async fn scan_project_lists(
        &self,
    ) -> Result<Vec<(String, Vec<Project>)>, redis::RedisError> {
        let entries = self.raw_entries(PROJECTS_PREFIX).await?;
        Ok(decode_project_lists(entries))
    }

    pub async fn get_theme(&self) -> Result<String, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let theme: Option<String> = conn.get(THEME_KEY).await?;
        Ok(theme.unwrap_or_else(|| "dark".to_string()))
    }

    pub async fn set_theme(&self, theme: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        conn.set(THEME_KEY, theme).await
    }

    async fn get_record<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let data: Option<String> = conn.get(key).await?;
        match data {
            Some(data) => {
                let record = serde_json::from_str(&data).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::TypeError,
                        "Failed to parse stored record",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn raw_entries(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, String)>, redis::RedisError> {
        let mut conn = self.client.get_async_connection().await?;
        let keys: Vec<String> = conn.keys(format!("{}*", prefix)).await?;
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(data) = conn.get::<_, Option<String>>(&key).await? {
                entries.push((key, data));
            }
        }
        Ok(entries)
    }
}

/// Parses each `(key, json)` entry, dropping the ones that fail to decode.
/// One corrupt value must not take down a whole listing.
fn decode_records<T: serde::de::DeserializeOwned>(entries: Vec<(String, String)>) -> Vec<T> {
    entries
        .into_iter()
        .filter_map(|(key, data)| match serde_json::from_str(&data) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed record at {}: {}", key, e);
                None
            }
        })
        .collect()
}

/// Same decode-and-skip pass for project lists, stripping the key prefix
/// back to the owner's user id.
fn decode_project_lists(entries: Vec<(String, String)>) -> Vec<(String, Vec<Project>)> {
    entries
        .into_iter()
        .filter_map(|(key, data)| match serde_json::from_str(&data) {
            Ok(projects) => {
                let user_id = key.trim_start_matches(PROJECTS_PREFIX).to_string();
                Some((user_id, projects))
            }
            Err(e) => {
                tracing::warn!("Skipping malformed record at {}: {}", key, e);
                None
            }
        })
        .collect()
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, redis::RedisError> {
    serde_json::to_string(value).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "Failed to serialize record",
            e.to_string(),
        ))
    })
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}
