use thiserror::Error;

pub mod response;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    // #[from] converts a redis::RedisError into AppError::Store automatically
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("Template error: {0}")]
    Template(#[from] std::io::Error),

    #[error("Invalid form value: {0}")]
    Form(String),
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
