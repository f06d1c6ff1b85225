use super::Profile;
use crate::adapters::{array_at, bool_at, str_at, u64_at};
use crate::config::Backend;
use crate::convert::{parse_date, parse_datetime};
use crate::error::{AppError, AppResult};
use crate::models::{EmojiMapValue, ProfileField};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// `UserDetailed` Misskey-совместимого сервера.
///
/// Ответ может отсутствовать (null), тогда профиль невалиден и каждый
/// геттер возвращает `None`.
#[derive(Debug, Clone)]
pub struct MisskeyProfile {
    instance: Option<Value>,
}

impl MisskeyProfile {
    pub fn new(raw: Value) -> Self {
        MisskeyProfile {
            instance: Some(raw).filter(|v| !v.is_null()),
        }
    }

    fn str_field(&self, pointer: &str) -> Option<&str> {
        self.instance.as_ref().and_then(|i| str_at(i, pointer))
    }

    fn u64_field(&self, pointer: &str) -> Option<u64> {
        self.instance.as_ref().and_then(|i| u64_at(i, pointer))
    }

    fn bool_field(&self, pointer: &str) -> Option<bool> {
        self.instance.as_ref().and_then(|i| bool_at(i, pointer))
    }

    pub fn pinned_note_ids(&self) -> Vec<&str> {
        self.instance
            .as_ref()
            .map(|i| array_at(i, "/pinnedNoteIds"))
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    /// online, active, offline или unknown
    pub fn online_status(&self) -> Option<&str> {
        self.str_field("/onlineStatus")
    }
}

impl Profile for MisskeyProfile {
    fn backend(&self) -> Backend {
        Backend::Misskey
    }

    fn is_valid(&self) -> bool {
        self.instance.is_some()
    }

    fn raw(&self) -> Option<&Value> {
        self.instance.as_ref()
    }

    fn id(&self) -> Option<&str> {
        self.str_field("/id")
    }

    fn username(&self) -> Option<&str> {
        self.str_field("/username")
    }

    fn display_name(&self) -> Option<&str> {
        self.str_field("/name")
    }

    fn avatar_url(&self) -> Option<&str> {
        self.str_field("/avatarUrl")
    }

    fn avatar_blurhash(&self) -> Option<&str> {
        self.str_field("/avatarBlurhash")
    }

    fn banner_url(&self) -> Option<&str> {
        self.str_field("/bannerUrl")
    }

    fn banner_blurhash(&self) -> Option<&str> {
        self.str_field("/bannerBlurhash")
    }

    fn description(&self) -> Option<&str> {
        self.str_field("/description")
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.str_field("/createdAt").and_then(parse_datetime)
    }

    fn birthday(&self) -> Option<NaiveDate> {
        self.str_field("/birthday").and_then(parse_date)
    }

    fn fields(&self) -> Vec<ProfileField> {
        let Some(instance) = self.instance.as_ref() else {
            return Vec::new();
        };
        array_at(instance, "/fields")
            .iter()
            .filter_map(|f| {
                Some(ProfileField {
                    name: str_at(f, "/name")?.to_string(),
                    value: str_at(f, "/value").unwrap_or_default().to_string(),
                    verified: false,
                })
            })
            .collect()
    }

    fn followers_count(&self) -> Option<u64> {
        self.u64_field("/followersCount")
    }

    fn following_count(&self) -> Option<u64> {
        self.u64_field("/followingCount")
    }

    fn post_count(&self) -> Option<u64> {
        self.u64_field("/notesCount")
    }

    fn is_bot(&self) -> Option<bool> {
        self.bool_field("/isBot")
    }

    fn is_locked(&self) -> Option<bool> {
        self.instance.as_ref()?;
        Some(self.bool_field("/isLocked").unwrap_or(false))
    }

    fn has_pending_follow_request_from_you(&self) -> Option<bool> {
        self.bool_field("/hasPendingFollowRequestFromYou")
    }

    fn has_pending_follow_request_to_you(&self) -> Option<bool> {
        self.bool_field("/hasPendingFollowRequestToYou")
    }

    fn emoji_map(&self) -> HashMap<String, EmojiMapValue> {
        self.instance
            .as_ref()
            .and_then(|i| i.get("emojis"))
            .and_then(Value::as_object)
            .map(|emojis| {
                emojis
                    .iter()
                    .filter_map(|(name, url)| {
                        Some((
                            name.clone(),
                            EmojiMapValue {
                                url: url.as_str()?.to_string(),
                                static_url: None,
                                visible_in_picker: true,
                            },
                        ))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn instance_host(&self) -> Option<&str> {
        self.str_field("/host")
    }

    fn account_url(&self, my_subdomain: Option<&str>) -> Option<String> {
        let username = self.username()?;
        let host = self.instance_host().or(my_subdomain)?;
        Some(format!("https://{}/@{}", host, username))
    }

    fn app_display_account_url(&self, _my_domain: &str) -> AppResult<String> {
        Err(AppError::not_implemented(Backend::Misskey, "app display account url"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_null_instance_is_invalid() {
        let profile = MisskeyProfile::new(Value::Null);

        assert!(!profile.is_valid());
        assert!(profile.raw().is_none());
        assert_eq!(profile.id(), None);
        assert_eq!(profile.username(), None);
        assert_eq!(profile.avatar_blurhash(), None);
        assert_eq!(profile.created_at(), None);
        assert_eq!(profile.birthday(), None);
        assert_eq!(profile.followers_count(), None);
        assert_eq!(profile.is_locked(), None);
        assert_eq!(profile.has_pending_follow_request_to_you(), None);
        assert_eq!(profile.account_url(Some("misskey.example")), None);
        assert!(profile.fields().is_empty());
        assert!(profile.emoji_map().is_empty());
        assert!(profile.pinned_note_ids().is_empty());
    }

    #[test]
    fn test_projection() {
        let profile = MisskeyProfile::new(json!({
            "id": "9x1",
            "username": "rin",
            "name": "Rin :cat:",
            "host": null,
            "avatarUrl": "https://misskey.example/avatar/9x1",
            "avatarBlurhash": "eQG*|o?v9Fof",
            "bannerUrl": null,
            "description": "hello",
            "createdAt": "2023-03-03T03:03:03.000Z",
            "birthday": "2000-02-29",
            "fields": [{ "name": "site", "value": "https://rin.example" }],
            "followersCount": 7,
            "followingCount": 8,
            "notesCount": 9,
            "isBot": true,
            "isLocked": false,
            "hasPendingFollowRequestFromYou": true,
            "hasPendingFollowRequestToYou": false,
            "emojis": { "cat": "https://misskey.example/emoji/cat.png" },
            "pinnedNoteIds": ["n1", "n2"],
            "onlineStatus": "active"
        }));

        assert!(profile.is_valid());
        assert_eq!(profile.birthday(), NaiveDate::from_ymd_opt(2000, 2, 29));
        assert_eq!(profile.banner_url(), None);
        assert_eq!(profile.is_bot(), Some(true));
        assert_eq!(profile.has_pending_follow_request_from_you(), Some(true));
        assert_eq!(profile.pinned_note_ids(), vec!["n1", "n2"]);
        assert_eq!(profile.online_status(), Some("active"));
        assert!(profile.find_emoji("cat").is_some());
        assert_eq!(
            profile.account_url(Some("misskey.example")).as_deref(),
            Some("https://misskey.example/@rin")
        );
        assert!(matches!(
            profile.app_display_account_url("misskey.example"),
            Err(AppError::NotImplemented(_))
        ));
    }
}
