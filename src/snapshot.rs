//! Сериализуемые снимки нормализованных объектов (вывод CLI).

use crate::adapters::{Profile, Status};
use crate::config::Backend;
use crate::models::{MediaAttachment, Mention, ProfileField, Reaction, Visibility};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub backend: Backend,
    pub id: Option<String>,
    pub uri: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub account_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub visibility: Option<Visibility>,
    pub text: Option<String>,
    pub spoiler_text: Option<String>,
    pub sensitive: bool,
    pub mentions: Vec<Mention>,
    pub is_reply: bool,
    pub is_share: bool,
    pub is_quote: bool,
    pub parent_status_id: Option<String>,
    pub replies_count: u64,
    pub reposts_count: u64,
    pub favourites_count: u64,
    pub quotes_count: Option<u64>,
    pub liked: bool,
    pub reposted_by_me: bool,
    pub bookmarked: bool,
    pub pinned: bool,
    pub reactions: Vec<Reaction>,
    pub media: Vec<MediaAttachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reposted: Option<Box<StatusSnapshot>>,
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

impl StatusSnapshot {
    /// `my_subdomain` нужен Misskey для ссылок на локальные аккаунты
    pub fn capture(status: &dyn Status, my_subdomain: Option<&str>) -> Self {
        let mut snapshot = Self::capture_flat(status, my_subdomain);
        // Вложенная обёртка строится без контекста репоста, поэтому одного уровня достаточно
        snapshot.reposted = status
            .reposted_status()
            .map(|inner| Box::new(Self::capture_flat(inner.as_ref(), my_subdomain)));
        snapshot
    }

    fn capture_flat(status: &dyn Status, my_subdomain: Option<&str>) -> Self {
        StatusSnapshot {
            backend: status.backend(),
            id: owned(status.id()),
            uri: owned(status.uri()),
            username: owned(status.username()),
            display_name: owned(status.display_name()),
            avatar_url: owned(status.avatar_url()),
            account_url: status.account_url(my_subdomain),
            created_at: status.created_at(),
            visibility: status.visibility(),
            text: status.plain_text(),
            spoiler_text: owned(status.spoiler_text()),
            sensitive: status.is_sensitive(),
            mentions: status.mentions(),
            is_reply: status.is_reply(),
            is_share: status.is_share(),
            is_quote: status.is_quote(),
            parent_status_id: owned(status.parent_status_id()),
            replies_count: status.replies_count(),
            reposts_count: status.reposts_count(),
            favourites_count: status.favourites_count(),
            quotes_count: status.quotes_count(),
            liked: status.is_liked(),
            reposted_by_me: status.is_reposted_by_me(),
            bookmarked: status.is_bookmarked(),
            pinned: status.is_pinned(),
            reactions: status.reactions(),
            media: status.media_attachments(),
            reposted: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSnapshot {
    pub backend: Backend,
    pub valid: bool,
    pub id: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub birthday: Option<NaiveDate>,
    pub fields: Vec<ProfileField>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub post_count: Option<u64>,
    pub bot: Option<bool>,
    pub locked: Option<bool>,
    pub account_url: Option<String>,
}

impl ProfileSnapshot {
    pub fn capture(profile: &dyn Profile, my_subdomain: Option<&str>) -> Self {
        ProfileSnapshot {
            backend: profile.backend(),
            valid: profile.is_valid(),
            id: owned(profile.id()),
            username: owned(profile.username()),
            display_name: owned(profile.display_name()),
            avatar_url: owned(profile.avatar_url()),
            banner_url: owned(profile.banner_url()),
            description: owned(profile.description()),
            created_at: profile.created_at(),
            birthday: profile.birthday(),
            fields: profile.fields(),
            followers_count: profile.followers_count(),
            following_count: profile.following_count(),
            post_count: profile.post_count(),
            bot: profile.is_bot(),
            locked: profile.is_locked(),
            account_url: profile.account_url(my_subdomain),
        }
    }
}
