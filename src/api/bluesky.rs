use super::{build_http_client, normalize_instance, read_json, BackendRouter, ThreadContext};
use crate::config::Backend;
use crate::error::{AppError, AppResult};
use crate::models::Credentials;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info};

/// Публичный AppView, если инстанция не задана
pub const PUBLIC_APPVIEW_URL: &str = "https://public.api.bsky.app";

const THREAD_DEPTH: u32 = 6;
const THREAD_PARENT_HEIGHT: u32 = 20;

pub struct BlueskyClient {
    http_client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl BlueskyClient {
    pub fn new(cred: Credentials) -> Self {
        let base_url = if cred.instance.trim().is_empty() {
            PUBLIC_APPVIEW_URL.to_string()
        } else {
            normalize_instance(&cred.instance)
        };

        BlueskyClient {
            http_client: build_http_client(),
            base_url,
            access_token: cred.access_token,
        }
    }

    async fn xrpc(&self, method: &str, query: &[(&str, String)]) -> AppResult<Value> {
        debug!("Calling Bluesky XRPC method: {}", method);

        let mut request = self
            .http_client
            .get(format!("{}/xrpc/{}", self.base_url, method))
            .query(query);
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| {
            error!("Failed to call Bluesky {}: {}", method, e);
            AppError::from_transport(e)
        })?;

        read_json(response, method).await
    }
}

/// Элемент треда с постом (не notFound/blocked)
fn thread_post(node: &Value) -> Option<&Value> {
    node.get("post").filter(|p| !p.is_null())
}

fn envelope(post: &Value, parent: Option<&Value>, root: Option<&Value>) -> Value {
    match (parent, root) {
        (Some(parent), Some(root)) => json!({
            "post": post,
            "reply": { "parent": parent, "root": root }
        }),
        _ => json!({ "post": post }),
    }
}

fn collect_replies(node: &Value, parent: &Value, root: &Value, out: &mut Vec<Value>) {
    let Some(replies) = node.get("replies").and_then(Value::as_array) else {
        return;
    };
    for reply in replies {
        if let Some(post) = thread_post(reply) {
            out.push(envelope(post, Some(parent), Some(root)));
            collect_replies(reply, post, root, out);
        }
    }
}

/// Разворачивает дерево `getPostThread` в плоские элементы ленты с контекстом ответа
pub(crate) fn flatten_thread(thread: &Value) -> AppResult<ThreadContext> {
    let focal = thread_post(thread)
        .ok_or_else(|| AppError::NotFound("post thread".to_string()))?;

    let mut chain = Vec::new();
    let mut cursor = thread.get("parent");
    while let Some(post) = cursor.and_then(thread_post) {
        chain.push(post);
        cursor = cursor.and_then(|c| c.get("parent"));
    }
    chain.reverse();

    let root = chain.first().copied().unwrap_or(focal);

    let ancestors = chain
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let parent = i.checked_sub(1).map(|p| chain[p]);
            envelope(post, parent, Some(root))
        })
        .collect();

    let mut descendants = Vec::new();
    collect_replies(thread, focal, root, &mut descendants);

    Ok(ThreadContext {
        ancestors,
        descendants,
    })
}

#[async_trait]
impl BackendRouter for BlueskyClient {
    fn backend(&self) -> Backend {
        Backend::Bluesky
    }

    /// Возвращает элемент ленты `{ "post": PostView }`
    async fn get_status(&self, id: &str) -> AppResult<Value> {
        let mut result = self
            .xrpc("app.bsky.feed.getPosts", &[("uris", id.to_string())])
            .await?;

        let post = match result.get_mut("posts").map(Value::take) {
            Some(Value::Array(mut posts)) if !posts.is_empty() => posts.swap_remove(0),
            _ => {
                error!("Bluesky post not found: {}", id);
                return Err(AppError::NotFound(id.to_string()));
            }
        };

        info!("Fetched Bluesky post {}", id);
        Ok(json!({ "post": post }))
    }

    async fn get_status_context(&self, id: &str) -> AppResult<ThreadContext> {
        let result = self
            .xrpc(
                "app.bsky.feed.getPostThread",
                &[
                    ("uri", id.to_string()),
                    ("depth", THREAD_DEPTH.to_string()),
                    ("parentHeight", THREAD_PARENT_HEIGHT.to_string()),
                ],
            )
            .await?;

        let context = flatten_thread(result.get("thread").unwrap_or(&Value::Null))?;
        info!(
            "Fetched Bluesky thread for {}: {} ancestors, {} descendants",
            id,
            context.ancestors.len(),
            context.descendants.len()
        );
        Ok(context)
    }

    async fn get_profile(&self, id: &str) -> AppResult<Value> {
        let profile = self
            .xrpc("app.bsky.actor.getProfile", &[("actor", id.to_string())])
            .await?;
        info!("Fetched Bluesky profile {}", id);
        Ok(profile)
    }
}
