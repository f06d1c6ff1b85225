use super::{build_http_client, normalize_instance, read_json, BackendRouter, ThreadContext};
use crate::config::Backend;
use crate::error::{AppError, AppResult};
use crate::models::Credentials;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, error, info};

pub struct MastodonClient {
    http_client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl MastodonClient {
    pub fn new(cred: Credentials) -> Self {
        MastodonClient {
            http_client: build_http_client(),
            base_url: normalize_instance(&cred.instance),
            access_token: cred.access_token,
        }
    }

    fn get_auth_header(token: &str) -> String {
        format!("Bearer {}", token)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self.http_client.get(format!("{}{}", self.base_url, path));
        match &self.access_token {
            Some(token) => request.header("Authorization", Self::get_auth_header(token)),
            None => request,
        }
    }

    async fn fetch(&self, path: &str, what: &str) -> AppResult<Value> {
        debug!("Fetching Mastodon {} from: {}{}", what, self.base_url, path);

        let response = self.get(path).send().await.map_err(|e| {
            error!("Failed to fetch Mastodon {}: {}", what, e);
            AppError::from_transport(e)
        })?;

        read_json(response, what).await
    }
}

fn value_list(value: &mut Value, key: &str) -> Vec<Value> {
    match value.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

#[async_trait]
impl BackendRouter for MastodonClient {
    fn backend(&self) -> Backend {
        Backend::Mastodon
    }

    async fn get_status(&self, id: &str) -> AppResult<Value> {
        let status = self.fetch(&format!("/api/v1/statuses/{}", id), "status").await?;
        info!("Fetched Mastodon status {}", id);
        Ok(status)
    }

    async fn get_status_context(&self, id: &str) -> AppResult<ThreadContext> {
        let mut context = self
            .fetch(&format!("/api/v1/statuses/{}/context", id), "status context")
            .await?;

        let context = ThreadContext {
            ancestors: value_list(&mut context, "ancestors"),
            descendants: value_list(&mut context, "descendants"),
        };
        info!(
            "Fetched Mastodon context for {}: {} ancestors, {} descendants",
            id,
            context.ancestors.len(),
            context.descendants.len()
        );
        Ok(context)
    }

    async fn get_profile(&self, id: &str) -> AppResult<Value> {
        let account = self.fetch(&format!("/api/v1/accounts/{}", id), "account").await?;
        info!("Fetched Mastodon account {}", id);
        Ok(account)
    }
}
