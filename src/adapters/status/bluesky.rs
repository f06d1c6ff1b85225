use super::Status;
use crate::adapters::{array_at, flag_at, media, non_empty_str_at, present, str_at, u64_at};
use crate::config::Backend;
use crate::convert::parse_datetime;
use crate::error::{AppError, AppResult};
use crate::models::{MediaAttachment, Mention, Visibility};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

pub(crate) const REASON_REPOST: &str = "app.bsky.feed.defs#reasonRepost";
const NOT_FOUND_POST: &str = "app.bsky.feed.defs#notFoundPost";
const BLOCKED_POST: &str = "app.bsky.feed.defs#blockedPost";

const EMBED_RECORD_VIEW: &str = "app.bsky.embed.record#view";
const EMBED_RECORD_WITH_MEDIA_VIEW: &str = "app.bsky.embed.recordWithMedia#view";
const EMBED_IMAGES_VIEW: &str = "app.bsky.embed.images#view";
const EMBED_IMAGES: &str = "app.bsky.embed.images";
const EMBED_VIDEO_VIEW: &str = "app.bsky.embed.video#view";
const VIEW_RECORD: &str = "app.bsky.embed.record#viewRecord";

const MENTION_FEATURE: &str = "app.bsky.richtext.facet#mention";

/// Self-label'ы, при которых медиа скрывается
const SENSITIVE_LABELS: [&str; 5] = ["porn", "sexual", "nudity", "graphic-media", "gore"];

/// Пост AT Protocol.
///
/// Контекст репоста (`reason`) и ответа (`reply`) приходит рядом с постом
/// в элементе ленты, а не внутри него. Обёртка хранит их отдельно.
/// Поддерживается и `PostView` ленты, и `viewRecord` процитированного поста.
#[derive(Debug, Clone)]
pub struct BlueskyStatus {
    post: Value,
    reply: Option<Value>,
    reason: Option<Value>,
}

impl BlueskyStatus {
    pub fn new(post: Value, reply: Option<Value>, reason: Option<Value>) -> Self {
        BlueskyStatus {
            post,
            reply: reply.filter(|v| !v.is_null()),
            reason: reason.filter(|v| !v.is_null()),
        }
    }

    /// Элемент ленты `{ post, reply?, reason? }`. Голый пост тоже принимается.
    pub fn from_feed_item(item: Value) -> Self {
        match item {
            Value::Object(mut map) if map.contains_key("post") => {
                let post = map.remove("post").unwrap_or(Value::Null);
                let reply = map.remove("reply");
                let reason = map.remove("reason");
                BlueskyStatus::new(post, reply, reason)
            }
            other => BlueskyStatus::new(other, None, None),
        }
    }

    /// Обёртка над тем же постом без контекста репоста и ответа
    fn stripped(post: &Value) -> BlueskyStatus {
        BlueskyStatus::new(post.clone(), None, None)
    }

    pub fn cid(&self) -> Option<&str> {
        str_at(&self.post, "/cid")
    }

    pub fn like_uri(&self) -> Option<&str> {
        str_at(&self.post, "/viewer/like")
    }

    pub fn repost_uri(&self) -> Option<&str> {
        str_at(&self.post, "/viewer/repost")
    }

    /// `viewer.pinned` бывает строкой с URI записи или булевым флагом
    pub fn pin_uri(&self) -> Option<&str> {
        str_at(&self.post, "/viewer/pinned")
    }

    pub fn is_reply_disabled(&self) -> bool {
        flag_at(&self.post, "/viewer/replyDisabled")
    }

    pub fn is_thread_muted(&self) -> bool {
        flag_at(&self.post, "/viewer/threadMuted")
    }

    pub fn is_embedding_disabled(&self) -> bool {
        flag_at(&self.post, "/viewer/embeddingDisabled")
    }

    /// Автор репоста (`reason.by`)
    pub fn reposted_by(&self) -> Option<&Value> {
        if !self.is_share() {
            return None;
        }
        self.reason.as_ref().and_then(|r| present(r, "/by"))
    }

    fn embed_type(&self) -> Option<&str> {
        str_at(&self.post, "/embed/$type")
    }

    fn author(&self) -> Option<&Value> {
        self.reposted_by().or_else(|| present(&self.post, "/author"))
    }

    fn quoted_post(&self) -> Option<&Value> {
        match self.embed_type() {
            Some(EMBED_RECORD_WITH_MEDIA_VIEW) => present(&self.post, "/embed/record/record"),
            Some(EMBED_RECORD_VIEW) => present(&self.post, "/embed/record"),
            _ => None,
        }
    }

    /// Ссылка на пост из `reply`; notFound/blocked считаются отсутствующими
    fn reply_ref(&self, key: &str) -> Option<&Value> {
        let target = present(self.reply.as_ref()?, key)?;
        match str_at(target, "/$type") {
            Some(NOT_FOUND_POST) | Some(BLOCKED_POST) => None,
            _ => Some(target),
        }
    }

    fn media_from_embed(embed: &Value) -> Vec<MediaAttachment> {
        match str_at(embed, "/$type") {
            Some(EMBED_IMAGES_VIEW) | Some(EMBED_IMAGES) => array_at(embed, "/images")
                .iter()
                .map(media::bluesky_image)
                .collect(),
            Some(EMBED_VIDEO_VIEW) => vec![media::bluesky_video(embed)],
            // Медиа принадлежит цитирующему посту, а не процитированной записи
            Some(EMBED_RECORD_WITH_MEDIA_VIEW) => present(embed, "/media")
                .map(Self::media_from_embed)
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl Status for BlueskyStatus {
    fn backend(&self) -> Backend {
        Backend::Bluesky
    }

    fn id(&self) -> Option<&str> {
        str_at(&self.post, "/uri")
    }

    fn uri(&self) -> Option<&str> {
        str_at(&self.post, "/uri")
    }

    fn raw(&self) -> &Value {
        &self.post
    }

    fn username(&self) -> Option<&str> {
        self.author().and_then(|a| str_at(a, "/handle"))
    }

    fn display_name(&self) -> Option<&str> {
        self.author().and_then(|a| str_at(a, "/displayName"))
    }

    fn avatar_url(&self) -> Option<&str> {
        self.author().and_then(|a| str_at(a, "/avatar"))
    }

    fn account_url(&self, _my_subdomain: Option<&str>) -> Option<String> {
        self.username()
            .map(|handle| format!("https://bsky.app/profile/{}", handle))
    }

    fn poster_account_id(&self) -> AppResult<Option<&str>> {
        Err(AppError::not_implemented(Backend::Bluesky, "poster account id"))
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        // Время появления репоста в ленте определяет сам репост
        let raw = if self.is_share() {
            self.reason.as_ref().and_then(|r| str_at(r, "/indexedAt"))
        } else {
            str_at(&self.post, "/record/createdAt")
                .or_else(|| str_at(&self.post, "/value/createdAt"))
                .or_else(|| str_at(&self.post, "/indexedAt"))
        };
        raw.and_then(parse_datetime)
    }

    fn visibility(&self) -> Option<Visibility> {
        Some(Visibility::Public)
    }

    /// `record` у `postView`, `value` у `viewRecord` (процитированный пост)
    fn content(&self) -> Option<&str> {
        if self.is_share() {
            return None;
        }
        non_empty_str_at(&self.post, "/record/text")
            .or_else(|| non_empty_str_at(&self.post, "/value/text"))
    }

    fn is_sensitive(&self) -> bool {
        array_at(&self.post, "/labels")
            .iter()
            .filter_map(|l| str_at(l, "/val"))
            .any(|val| SENSITIVE_LABELS.contains(&val))
    }

    fn spoiler_text(&self) -> Option<&str> {
        None
    }

    fn mentions(&self) -> Vec<Mention> {
        let facets = present(&self.post, "/record/facets")
            .or_else(|| present(&self.post, "/value/facets"));
        let Some(facets) = facets.and_then(Value::as_array) else {
            return Vec::new();
        };

        facets
            .iter()
            .flat_map(|facet| array_at(facet, "/features"))
            .filter(|feature| str_at(feature, "/$type") == Some(MENTION_FEATURE))
            .filter_map(|feature| str_at(feature, "/did"))
            .map(Mention::with_id)
            .collect()
    }

    fn is_reply(&self) -> bool {
        self.reply.is_some()
            || present(&self.post, "/record/reply").is_some()
            || present(&self.post, "/value/reply").is_some()
    }

    fn is_share(&self) -> bool {
        self.reason
            .as_ref()
            .and_then(|r| str_at(r, "/$type"))
            == Some(REASON_REPOST)
    }

    fn is_quote(&self) -> bool {
        matches!(
            self.embed_type(),
            Some(EMBED_RECORD_VIEW) | Some(EMBED_RECORD_WITH_MEDIA_VIEW)
        )
    }

    fn parent_status_id(&self) -> Option<&str> {
        str_at(&self.post, "/record/reply/parent/uri")
            .or_else(|| str_at(&self.post, "/value/reply/parent/uri"))
    }

    fn parent_raw(&self) -> Option<&Value> {
        self.reply_ref("/parent")
    }

    fn parent_status(&self) -> Option<Box<dyn Status>> {
        self.parent_raw()
            .map(|p| Box::new(Self::stripped(p)) as Box<dyn Status>)
    }

    fn root_raw(&self) -> Option<&Value> {
        self.reply_ref("/root")
    }

    fn root_status(&self) -> Option<Box<dyn Status>> {
        self.root_raw()
            .map(|r| Box::new(Self::stripped(r)) as Box<dyn Status>)
    }

    fn reposted_status(&self) -> Option<Box<dyn Status>> {
        if self.is_share() {
            // Без reason вложенная обёртка не станет снова репостом.
            // Ответ для репостнутого поста не нужен.
            return Some(Box::new(Self::stripped(&self.post)));
        }
        self.quoted_post()
            .map(|q| Box::new(Self::stripped(q)) as Box<dyn Status>)
    }

    fn reposted_status_raw(&self) -> Option<Value> {
        if self.is_share() {
            return Some(json!({ "post": self.post }));
        }
        self.quoted_post().map(|q| json!({ "post": q }))
    }

    fn replies_count(&self) -> u64 {
        u64_at(&self.post, "/replyCount").unwrap_or(0)
    }

    fn reposts_count(&self) -> u64 {
        u64_at(&self.post, "/repostCount").unwrap_or(0)
    }

    fn favourites_count(&self) -> u64 {
        u64_at(&self.post, "/likeCount").unwrap_or(0)
    }

    fn quotes_count(&self) -> Option<u64> {
        Some(u64_at(&self.post, "/quoteCount").unwrap_or(0))
    }

    fn is_liked(&self) -> bool {
        self.like_uri().is_some()
    }

    fn is_reposted_by_me(&self) -> bool {
        self.repost_uri().is_some()
    }

    fn is_pinned(&self) -> bool {
        flag_at(&self.post, "/viewer/pinned") || self.pin_uri().is_some()
    }

    fn media_attachments(&self) -> Vec<MediaAttachment> {
        if str_at(&self.post, "/$type") == Some(VIEW_RECORD) {
            return array_at(&self.post, "/embeds")
                .iter()
                .flat_map(Self::media_from_embed)
                .collect();
        }

        present(&self.post, "/embed")
            .map(Self::media_from_embed)
            .unwrap_or_default()
    }
}
