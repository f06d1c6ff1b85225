pub mod bluesky;
pub mod mastodon;
pub mod misskey;

use crate::config::Backend;
use crate::error::{AppError, AppResult};
use crate::models::Credentials;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::error;

const USER_AGENT: &str = concat!("fedinorm/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 30;

/// Предки (от корня к родителю) и потомки поста в сыром виде бэкенда
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadContext {
    pub ancestors: Vec<Value>,
    pub descendants: Vec<Value>,
}

/// Тонкий маршрутизатор запросов к одному бэкенду.
///
/// Каждый метод делает ровно один HTTP запрос (контекст Misskey два)
/// и возвращает сырой ответ для адаптеров. Повторов нет: первая ошибка
/// транспорта уходит вызывающему коду.
#[async_trait]
pub trait BackendRouter: Send + Sync {
    fn backend(&self) -> Backend;

    /// Сырой пост по идентификатору
    async fn get_status(&self, id: &str) -> AppResult<Value>;

    /// Предки и ответы поста
    async fn get_status_context(&self, id: &str) -> AppResult<ThreadContext>;

    /// Сырой профиль по идентификатору
    async fn get_profile(&self, id: &str) -> AppResult<Value>;
}

/// Фабрика для создания API клиента по тегу бэкенда
pub fn create_api_client(backend: Backend, cred: Credentials) -> AppResult<Box<dyn BackendRouter>> {
    match backend {
        Backend::Mastodon => Ok(Box::new(mastodon::MastodonClient::new(cred))),
        Backend::Misskey => Ok(Box::new(misskey::MisskeyClient::new(cred))),
        Backend::Bluesky => Ok(Box::new(bluesky::BlueskyClient::new(cred))),
        Backend::Unknown => Err(AppError::UnsupportedBackend(backend)),
    }
}

/// Приводит адрес инстанции к базовому URL: добавляет схему, убирает `/` в конце
pub fn normalize_instance(instance: &str) -> String {
    let instance = instance.trim().trim_end_matches('/');
    if instance.starts_with("https://") || instance.starts_with("http://") {
        instance.to_string()
    } else {
        format!("https://{}", instance)
    }
}

/// Домен инстанции без схемы и пути (нужен для ссылок Misskey)
pub fn instance_host(instance: &str) -> &str {
    let instance = instance.trim();
    let without_scheme = instance
        .strip_prefix("https://")
        .or_else(|| instance.strip_prefix("http://"))
        .unwrap_or(instance);
    without_scheme.split('/').next().unwrap_or(without_scheme)
}

pub(crate) fn build_http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Проверяет HTTP статус и разбирает тело как JSON
pub(crate) async fn read_json(response: Response, what: &str) -> AppResult<Value> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        error!("Access denied while fetching {}: {}", what, status);
        return Err(AppError::InvalidCredentials);
    }

    if status == StatusCode::NOT_FOUND {
        error!("{} not found", what);
        return Err(AppError::NotFound(what.to_string()));
    }

    if !status.is_success() {
        error!("API returned status: {} for {}", status, what);
        return Err(AppError::ApiError(format!("Failed to fetch {}: HTTP {}", what, status)));
    }

    let body = response.text().await.map_err(|e| {
        error!("Failed to read {} response: {}", what, e);
        AppError::from_transport(e)
    })?;

    serde_json::from_str(&body).map_err(|e| {
        error!("Failed to parse {} JSON: {}", what, e);
        AppError::JsonError(e)
    })
}
