use super::Profile;
use crate::adapters::{array_at, bool_at, non_empty_str_at, present, str_at, u64_at};
use crate::config::Backend;
use crate::convert::parse_datetime;
use crate::error::{AppError, AppResult};
use crate::models::{EmojiMapValue, ProfileField};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// Аккаунт Mastodon-совместимого сервера
#[derive(Debug, Clone)]
pub struct MastodonProfile {
    raw: Value,
}

impl MastodonProfile {
    pub fn new(raw: Value) -> Self {
        MastodonProfile { raw }
    }

    pub fn acct(&self) -> Option<&str> {
        str_at(&self.raw, "/acct")
    }
}

impl Profile for MastodonProfile {
    fn backend(&self) -> Backend {
        Backend::Mastodon
    }

    fn is_valid(&self) -> bool {
        self.raw.is_object()
    }

    fn raw(&self) -> Option<&Value> {
        Some(&self.raw).filter(|v| !v.is_null())
    }

    fn id(&self) -> Option<&str> {
        str_at(&self.raw, "/id")
    }

    fn username(&self) -> Option<&str> {
        str_at(&self.raw, "/username")
    }

    fn display_name(&self) -> Option<&str> {
        str_at(&self.raw, "/display_name")
    }

    fn avatar_url(&self) -> Option<&str> {
        str_at(&self.raw, "/avatar")
    }

    fn avatar_blurhash(&self) -> Option<&str> {
        None
    }

    fn banner_url(&self) -> Option<&str> {
        non_empty_str_at(&self.raw, "/header")
    }

    fn banner_blurhash(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        str_at(&self.raw, "/note")
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        str_at(&self.raw, "/created_at").and_then(parse_datetime)
    }

    fn birthday(&self) -> Option<NaiveDate> {
        None
    }

    fn fields(&self) -> Vec<ProfileField> {
        array_at(&self.raw, "/fields")
            .iter()
            .filter_map(|f| {
                Some(ProfileField {
                    name: str_at(f, "/name")?.to_string(),
                    value: str_at(f, "/value").unwrap_or_default().to_string(),
                    verified: present(f, "/verified_at").is_some(),
                })
            })
            .collect()
    }

    fn followers_count(&self) -> Option<u64> {
        u64_at(&self.raw, "/followers_count")
    }

    fn following_count(&self) -> Option<u64> {
        u64_at(&self.raw, "/following_count")
    }

    fn post_count(&self) -> Option<u64> {
        u64_at(&self.raw, "/statuses_count")
    }

    fn is_bot(&self) -> Option<bool> {
        bool_at(&self.raw, "/bot")
    }

    fn is_locked(&self) -> Option<bool> {
        bool_at(&self.raw, "/locked")
    }

    // Запросы на подписку приходят в Relationship, а не в Account
    fn has_pending_follow_request_from_you(&self) -> Option<bool> {
        self.is_valid().then_some(false)
    }

    fn has_pending_follow_request_to_you(&self) -> Option<bool> {
        self.is_valid().then_some(false)
    }

    fn emoji_map(&self) -> HashMap<String, EmojiMapValue> {
        array_at(&self.raw, "/emojis")
            .iter()
            .filter_map(|e| {
                Some((
                    str_at(e, "/shortcode")?.to_string(),
                    EmojiMapValue {
                        url: str_at(e, "/url")?.to_string(),
                        static_url: str_at(e, "/static_url").map(str::to_owned),
                        visible_in_picker: bool_at(e, "/visible_in_picker").unwrap_or(true),
                    },
                ))
            })
            .collect()
    }

    fn instance_host(&self) -> Option<&str> {
        self.acct()
            .and_then(|acct| acct.rsplit_once('@'))
            .map(|(_, host)| host)
    }

    fn account_url(&self, _my_subdomain: Option<&str>) -> Option<String> {
        str_at(&self.raw, "/url").map(str::to_owned)
    }

    fn app_display_account_url(&self, my_domain: &str) -> AppResult<String> {
        let acct = self
            .acct()
            .ok_or_else(|| AppError::ApiError("Account has no acct".to_string()))?;
        Ok(format!("https://{}/@{}", my_domain, acct))
    }
}
