//! Адаптеры приводят сырые ответы Mastodon, Misskey и Bluesky к единым
//! интерфейсам [`Status`] и [`Profile`]. Вызывающему коду не нужно знать,
//! с каким бэкендом он работает.

pub mod media;
pub mod profile;
pub mod status;

use crate::config::Backend;
use serde_json::Value;
use tracing::warn;

pub use profile::{
    BlueskyProfile, MastodonProfile, MisskeyProfile, Profile, UnknownProfile,
};
pub use status::{BlueskyStatus, MastodonStatus, MisskeyStatus, Status, UnknownStatus};

/// Фабрика адаптера поста по тегу бэкенда.
/// Неизвестный тег даёт null-object адаптер, а не ошибку.
pub fn select_status_adapter(raw: Value, backend: Backend) -> Box<dyn Status> {
    match backend {
        Backend::Mastodon => Box::new(MastodonStatus::new(raw)),
        Backend::Misskey => Box::new(MisskeyStatus::new(raw)),
        Backend::Bluesky => Box::new(BlueskyStatus::from_feed_item(raw)),
        Backend::Unknown => {
            warn!("No status adapter for backend tag {:?}, using null adapter", backend);
            Box::new(UnknownStatus::new(raw))
        }
    }
}

/// Фабрика адаптера профиля по тегу бэкенда
pub fn select_profile_adapter(raw: Value, backend: Backend) -> Box<dyn Profile> {
    match backend {
        Backend::Mastodon => Box::new(MastodonProfile::new(raw)),
        Backend::Misskey => Box::new(MisskeyProfile::new(raw)),
        Backend::Bluesky => Box::new(BlueskyProfile::new(raw)),
        Backend::Unknown => {
            warn!("No profile adapter for backend tag {:?}, using null adapter", backend);
            Box::new(UnknownProfile::new(raw))
        }
    }
}

// Доступ к полям по JSON pointer. Отсутствующее поле и null считаются одним и тем же.

pub(crate) fn present<'a>(value: &'a Value, pointer: &str) -> Option<&'a Value> {
    value.pointer(pointer).filter(|v| !v.is_null())
}

pub(crate) fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

pub(crate) fn non_empty_str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    str_at(value, pointer).filter(|s| !s.is_empty())
}

pub(crate) fn u64_at(value: &Value, pointer: &str) -> Option<u64> {
    value.pointer(pointer).and_then(Value::as_u64)
}

pub(crate) fn bool_at(value: &Value, pointer: &str) -> Option<bool> {
    value.pointer(pointer).and_then(Value::as_bool)
}

pub(crate) fn flag_at(value: &Value, pointer: &str) -> bool {
    bool_at(value, pointer).unwrap_or(false)
}

pub(crate) fn array_at<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_routing_picks_backend_family() {
        let mastodon = select_status_adapter(json!({ "id": "1" }), Backend::Mastodon);
        let misskey = select_status_adapter(json!({ "id": "2" }), Backend::Misskey);
        let bluesky = select_status_adapter(
            json!({ "post": { "uri": "at://did:plc:a/app.bsky.feed.post/3" } }),
            Backend::Bluesky,
        );

        assert_eq!(mastodon.backend(), Backend::Mastodon);
        assert_eq!(misskey.backend(), Backend::Misskey);
        assert_eq!(bluesky.backend(), Backend::Bluesky);
        assert_eq!(bluesky.id(), Some("at://did:plc:a/app.bsky.feed.post/3"));
    }

    #[test]
    fn test_unknown_tag_gives_null_adapters() {
        let status = select_status_adapter(json!({ "id": "1" }), Backend::Unknown);
        assert!(!status.is_valid());
        assert_eq!(status.id(), None);

        let profile = select_profile_adapter(json!({ "id": "1" }), Backend::Unknown);
        assert!(!profile.is_valid());
        assert_eq!(profile.username(), None);
    }

    #[test]
    fn test_accessors_treat_null_as_absent() {
        let value = json!({ "a": null, "b": "", "c": [1, 2], "d": true });
        assert!(present(&value, "/a").is_none());
        assert_eq!(non_empty_str_at(&value, "/b"), None);
        assert_eq!(array_at(&value, "/c").len(), 2);
        assert!(array_at(&value, "/missing").is_empty());
        assert!(flag_at(&value, "/d"));
        assert!(!flag_at(&value, "/a"));
    }
}
