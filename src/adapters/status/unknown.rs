use super::Status;
use crate::config::Backend;
use crate::error::AppResult;
use crate::models::{MediaAttachment, Mention, Visibility};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Null-object адаптер для неизвестного бэкенда: все флаги false,
/// все коллекции пустые, исходный ответ доступен через `raw()`.
#[derive(Debug, Clone, Default)]
pub struct UnknownStatus {
    raw: Value,
}

impl UnknownStatus {
    pub fn new(raw: Value) -> Self {
        UnknownStatus { raw }
    }
}

impl Status for UnknownStatus {
    fn backend(&self) -> Backend {
        Backend::Unknown
    }

    fn is_valid(&self) -> bool {
        false
    }

    fn id(&self) -> Option<&str> {
        None
    }

    fn uri(&self) -> Option<&str> {
        None
    }

    fn raw(&self) -> &Value {
        &self.raw
    }

    fn username(&self) -> Option<&str> {
        None
    }

    fn display_name(&self) -> Option<&str> {
        None
    }

    fn avatar_url(&self) -> Option<&str> {
        None
    }

    fn account_url(&self, _my_subdomain: Option<&str>) -> Option<String> {
        None
    }

    fn poster_account_id(&self) -> AppResult<Option<&str>> {
        Ok(None)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn visibility(&self) -> Option<Visibility> {
        None
    }

    fn content(&self) -> Option<&str> {
        None
    }

    fn is_sensitive(&self) -> bool {
        false
    }

    fn spoiler_text(&self) -> Option<&str> {
        None
    }

    fn mentions(&self) -> Vec<Mention> {
        Vec::new()
    }

    fn is_reply(&self) -> bool {
        false
    }

    fn is_share(&self) -> bool {
        false
    }

    fn is_quote(&self) -> bool {
        false
    }

    fn parent_status_id(&self) -> Option<&str> {
        None
    }

    fn parent_raw(&self) -> Option<&Value> {
        None
    }

    fn parent_status(&self) -> Option<Box<dyn Status>> {
        None
    }

    fn root_raw(&self) -> Option<&Value> {
        None
    }

    fn root_status(&self) -> Option<Box<dyn Status>> {
        None
    }

    fn reposted_status(&self) -> Option<Box<dyn Status>> {
        None
    }

    fn reposted_status_raw(&self) -> Option<Value> {
        None
    }

    fn replies_count(&self) -> u64 {
        0
    }

    fn reposts_count(&self) -> u64 {
        0
    }

    fn favourites_count(&self) -> u64 {
        0
    }

    fn is_liked(&self) -> bool {
        false
    }

    fn is_reposted_by_me(&self) -> bool {
        false
    }

    fn media_attachments(&self) -> Vec<MediaAttachment> {
        Vec::new()
    }
}
