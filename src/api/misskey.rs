use super::{build_http_client, normalize_instance, read_json, BackendRouter, ThreadContext};
use crate::config::Backend;
use crate::error::{AppError, AppResult};
use crate::models::Credentials;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info};

/// Сколько заметок запрашивать для контекста треда
const CONTEXT_LIMIT: u32 = 30;

/// Клиент Misskey API: все методы это POST с JSON телом,
/// токен передаётся в поле `i`
pub struct MisskeyClient {
    http_client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl MisskeyClient {
    pub fn new(cred: Credentials) -> Self {
        MisskeyClient {
            http_client: build_http_client(),
            base_url: normalize_instance(&cred.instance),
            access_token: cred.access_token,
        }
    }

    async fn request(&self, endpoint: &str, mut body: Value) -> AppResult<Value> {
        debug!("Calling Misskey endpoint: {}", endpoint);

        if let Some(token) = &self.access_token {
            body["i"] = Value::String(token.clone());
        }

        let response = self
            .http_client
            .post(format!("{}/api/{}", self.base_url, endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to call Misskey {}: {}", endpoint, e);
                AppError::from_transport(e)
            })?;

        read_json(response, endpoint).await
    }

    fn into_list(value: Value) -> Vec<Value> {
        match value {
            Value::Array(items) => items,
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl BackendRouter for MisskeyClient {
    fn backend(&self) -> Backend {
        Backend::Misskey
    }

    async fn get_status(&self, id: &str) -> AppResult<Value> {
        let note = self.request("notes/show", json!({ "noteId": id })).await?;
        info!("Fetched Misskey note {}", id);
        Ok(note)
    }

    async fn get_status_context(&self, id: &str) -> AppResult<ThreadContext> {
        // conversation отдаёт предков от родителя к корню
        let mut ancestors = Self::into_list(
            self.request(
                "notes/conversation",
                json!({ "noteId": id, "limit": CONTEXT_LIMIT }),
            )
            .await?,
        );
        ancestors.reverse();

        let descendants = Self::into_list(
            self.request(
                "notes/children",
                json!({ "noteId": id, "limit": CONTEXT_LIMIT }),
            )
            .await?,
        );

        info!(
            "Fetched Misskey context for {}: {} ancestors, {} descendants",
            id,
            ancestors.len(),
            descendants.len()
        );
        Ok(ThreadContext {
            ancestors,
            descendants,
        })
    }

    async fn get_profile(&self, id: &str) -> AppResult<Value> {
        let user = self.request("users/show", json!({ "userId": id })).await?;
        info!("Fetched Misskey user {}", id);
        Ok(user)
    }
}
