use super::Profile;
use crate::config::Backend;
use crate::error::{AppError, AppResult};
use crate::models::{EmojiMapValue, ProfileField};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// Null-object профиль для неизвестного бэкенда
#[derive(Debug, Clone, Default)]
pub struct UnknownProfile {
    raw: Value,
}

impl UnknownProfile {
    pub fn new(raw: Value) -> Self {
        UnknownProfile { raw }
    }
}

impl Profile for UnknownProfile {
    fn backend(&self) -> Backend {
        Backend::Unknown
    }

    fn is_valid(&self) -> bool {
        false
    }

    fn raw(&self) -> Option<&Value> {
        Some(&self.raw).filter(|v| !v.is_null())
    }

    fn id(&self) -> Option<&str> {
        None
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

    fn avatar_blurhash(&self) -> Option<&str> {
        None
    }

    fn banner_url(&self) -> Option<&str> {
        None
    }

    fn banner_blurhash(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn birthday(&self) -> Option<NaiveDate> {
        None
    }

    fn fields(&self) -> Vec<ProfileField> {
        Vec::new()
    }

    fn followers_count(&self) -> Option<u64> {
        None
    }

    fn following_count(&self) -> Option<u64> {
        None
    }

    fn post_count(&self) -> Option<u64> {
        None
    }

    fn is_bot(&self) -> Option<bool> {
        None
    }

    fn is_locked(&self) -> Option<bool> {
        None
    }

    fn has_pending_follow_request_from_you(&self) -> Option<bool> {
        None
    }

    fn has_pending_follow_request_to_you(&self) -> Option<bool> {
        None
    }

    fn emoji_map(&self) -> HashMap<String, EmojiMapValue> {
        HashMap::new()
    }

    fn instance_host(&self) -> Option<&str> {
        None
    }

    fn account_url(&self, _my_subdomain: Option<&str>) -> Option<String> {
        None
    }

    fn app_display_account_url(&self, _my_domain: &str) -> AppResult<String> {
        Err(AppError::UnsupportedBackend(Backend::Unknown))
    }
}
