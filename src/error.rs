use crate::config::Backend;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timeout waiting for server response")]
    Timeout,

    /// Возможность должна существовать, но адаптер её ещё не реализует.
    /// Сигнал для разработчика, в рабочих путях вызова не ожидается.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Unsupported backend: {0:?}")]
    UnsupportedBackend(Backend),

    #[error("{0}")]
    Custom(String),
}

impl AppError {
    /// Переводит ошибку reqwest в нашу таксономию (таймаут отдельно)
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout
        } else {
            AppError::NetworkError(e)
        }
    }

    pub fn not_implemented(backend: Backend, capability: &str) -> Self {
        AppError::NotImplemented(format!("{} adapter: {}", backend.as_str(), capability))
    }
}

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Custom(s)
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        AppError::Custom(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_implemented_is_tagged() {
        let err = AppError::not_implemented(Backend::Bluesky, "poster account id");
        assert!(matches!(err, AppError::NotImplemented(_)));
        assert_eq!(
            err.to_string(),
            "Not implemented: bluesky adapter: poster account id"
        );
    }

    #[test]
    fn test_string_conversion() {
        let err: AppError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }
}
