use super::Profile;
use crate::adapters::{array_at, str_at, u64_at};
use crate::config::Backend;
use crate::convert::parse_datetime;
use crate::error::{AppError, AppResult};
use crate::models::{EmojiMapValue, ProfileField};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// `ProfileViewDetailed` (или `ProfileViewBasic`) AT Protocol.
/// Закрытых аккаунтов, запросов на подписку и своих эмодзи у Bluesky нет.
#[derive(Debug, Clone)]
pub struct BlueskyProfile {
    raw: Value,
}

impl BlueskyProfile {
    pub fn new(raw: Value) -> Self {
        BlueskyProfile { raw }
    }

    pub fn did(&self) -> Option<&str> {
        str_at(&self.raw, "/did")
    }

    /// Подписан ли текущий пользователь (at:// URI записи follow)
    pub fn following_uri(&self) -> Option<&str> {
        str_at(&self.raw, "/viewer/following")
    }
}

impl Profile for BlueskyProfile {
    fn backend(&self) -> Backend {
        Backend::Bluesky
    }

    fn is_valid(&self) -> bool {
        self.raw.is_object()
    }

    fn raw(&self) -> Option<&Value> {
        Some(&self.raw).filter(|v| !v.is_null())
    }

    fn id(&self) -> Option<&str> {
        self.did()
    }

    fn username(&self) -> Option<&str> {
        str_at(&self.raw, "/handle")
    }

    fn display_name(&self) -> Option<&str> {
        str_at(&self.raw, "/displayName")
    }

    fn avatar_url(&self) -> Option<&str> {
        str_at(&self.raw, "/avatar")
    }

    fn avatar_blurhash(&self) -> Option<&str> {
        None
    }

    fn banner_url(&self) -> Option<&str> {
        str_at(&self.raw, "/banner")
    }

    fn banner_blurhash(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        str_at(&self.raw, "/description")
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        str_at(&self.raw, "/createdAt")
            .or_else(|| str_at(&self.raw, "/indexedAt"))
            .and_then(parse_datetime)
    }

    fn birthday(&self) -> Option<NaiveDate> {
        None
    }

    fn fields(&self) -> Vec<ProfileField> {
        Vec::new()
    }

    fn followers_count(&self) -> Option<u64> {
        u64_at(&self.raw, "/followersCount")
    }

    fn following_count(&self) -> Option<u64> {
        u64_at(&self.raw, "/followsCount")
    }

    fn post_count(&self) -> Option<u64> {
        u64_at(&self.raw, "/postsCount")
    }

    fn is_bot(&self) -> Option<bool> {
        if !self.is_valid() {
            return None;
        }
        Some(
            array_at(&self.raw, "/labels")
                .iter()
                .any(|l| str_at(l, "/val") == Some("bot")),
        )
    }

    fn is_locked(&self) -> Option<bool> {
        self.is_valid().then_some(false)
    }

    fn has_pending_follow_request_from_you(&self) -> Option<bool> {
        self.is_valid().then_some(false)
    }

    fn has_pending_follow_request_to_you(&self) -> Option<bool> {
        self.is_valid().then_some(false)
    }

    fn emoji_map(&self) -> HashMap<String, EmojiMapValue> {
        HashMap::new()
    }

    fn instance_host(&self) -> Option<&str> {
        None
    }

    fn account_url(&self, _my_subdomain: Option<&str>) -> Option<String> {
        self.username()
            .map(|handle| format!("https://bsky.app/profile/{}", handle))
    }

    fn app_display_account_url(&self, _my_domain: &str) -> AppResult<String> {
        self.account_url(None)
            .ok_or_else(|| AppError::ApiError("Profile has no handle".to_string()))
    }
}
