use super::Status;
use crate::adapters::{
    array_at, flag_at, media, non_empty_str_at, present, str_at, u64_at,
};
use crate::config::Backend;
use crate::convert::{html_to_text, parse_datetime};
use crate::error::AppResult;
use crate::models::{MediaAttachment, Mention, Reaction, Visibility};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// Статус Mastodon-совместимого сервера (Mastodon, Pleroma, Akkoma, GoToSocial).
///
/// Сам статус не содержит родителя и корня треда, только `in_reply_to_id`.
/// Их передаёт сборщик треда через [`MastodonStatus::with_reply_context`].
#[derive(Debug, Clone)]
pub struct MastodonStatus {
    raw: Value,
    parent: Option<Value>,
    root: Option<Value>,
}

impl MastodonStatus {
    pub fn new(raw: Value) -> Self {
        MastodonStatus {
            raw,
            parent: None,
            root: None,
        }
    }

    pub fn with_reply_context(mut self, parent: Option<Value>, root: Option<Value>) -> Self {
        self.parent = parent.filter(|v| !v.is_null());
        self.root = root.filter(|v| !v.is_null());
        self
    }

    fn reblog(&self) -> Option<&Value> {
        present(&self.raw, "/reblog")
    }

    /// Mastodon 4.4 отдаёт `quote: { state, quoted_status }`,
    /// Pleroma/Akkoma и Fedibird кладут в `quote` сам статус.
    fn quoted(&self) -> Option<&Value> {
        let quote = present(&self.raw, "/quote")?;
        if quote.get("state").is_some() || quote.get("quoted_status").is_some() {
            present(quote, "/quoted_status")
        } else {
            Some(quote)
        }
    }

    fn emoji_reactions(&self) -> &[Value] {
        let pleroma = array_at(&self.raw, "/pleroma/emoji_reactions");
        if pleroma.is_empty() {
            array_at(&self.raw, "/emoji_reactions")
        } else {
            pleroma
        }
    }
}

impl Status for MastodonStatus {
    fn backend(&self) -> Backend {
        Backend::Mastodon
    }

    fn id(&self) -> Option<&str> {
        str_at(&self.raw, "/id")
    }

    fn uri(&self) -> Option<&str> {
        non_empty_str_at(&self.raw, "/url").or_else(|| str_at(&self.raw, "/uri"))
    }

    fn raw(&self) -> &Value {
        &self.raw
    }

    fn username(&self) -> Option<&str> {
        str_at(&self.raw, "/account/username")
    }

    fn display_name(&self) -> Option<&str> {
        str_at(&self.raw, "/account/display_name")
    }

    fn avatar_url(&self) -> Option<&str> {
        str_at(&self.raw, "/account/avatar")
    }

    fn account_url(&self, _my_subdomain: Option<&str>) -> Option<String> {
        str_at(&self.raw, "/account/url").map(str::to_owned)
    }

    fn poster_account_id(&self) -> AppResult<Option<&str>> {
        Ok(str_at(&self.raw, "/account/id"))
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        str_at(&self.raw, "/created_at").and_then(parse_datetime)
    }

    fn visibility(&self) -> Option<Visibility> {
        str_at(&self.raw, "/visibility").and_then(Visibility::from_mastodon)
    }

    fn content(&self) -> Option<&str> {
        // У буста собственный content пустой
        if self.is_share() {
            return None;
        }
        str_at(&self.raw, "/content")
    }

    fn plain_text(&self) -> Option<String> {
        self.content().map(html_to_text)
    }

    fn is_sensitive(&self) -> bool {
        flag_at(&self.raw, "/sensitive")
    }

    fn spoiler_text(&self) -> Option<&str> {
        non_empty_str_at(&self.raw, "/spoiler_text")
    }

    fn mentions(&self) -> Vec<Mention> {
        array_at(&self.raw, "/mentions")
            .iter()
            .filter_map(|m| {
                Some(Mention {
                    id: str_at(m, "/id")?.to_string(),
                    username: str_at(m, "/username").map(str::to_owned),
                    acct: str_at(m, "/acct").map(str::to_owned),
                    url: str_at(m, "/url").map(str::to_owned),
                })
            })
            .collect()
    }

    fn is_reply(&self) -> bool {
        present(&self.raw, "/in_reply_to_id").is_some()
    }

    fn is_share(&self) -> bool {
        self.reblog().is_some()
    }

    fn is_quote(&self) -> bool {
        self.quoted().is_some()
    }

    fn parent_status_id(&self) -> Option<&str> {
        str_at(&self.raw, "/in_reply_to_id")
    }

    fn parent_raw(&self) -> Option<&Value> {
        self.parent.as_ref()
    }

    fn parent_status(&self) -> Option<Box<dyn Status>> {
        let parent = self.parent.as_ref()?;
        Some(Box::new(MastodonStatus::new(parent.clone())))
    }

    fn root_raw(&self) -> Option<&Value> {
        self.root.as_ref()
    }

    fn root_status(&self) -> Option<Box<dyn Status>> {
        let root = self.root.as_ref()?;
        Some(Box::new(MastodonStatus::new(root.clone())))
    }

    fn reposted_status(&self) -> Option<Box<dyn Status>> {
        let inner = self.reblog().or_else(|| self.quoted())?;
        let mut inner = inner.clone();
        // Буст буста протоколом не допускается, но вложенная обёртка
        // в любом случае не должна снова стать репостом
        if self.is_share() {
            if let Some(map) = inner.as_object_mut() {
                map.remove("reblog");
            }
        }
        Some(Box::new(MastodonStatus::new(inner)))
    }

    fn reposted_status_raw(&self) -> Option<Value> {
        self.reblog().or_else(|| self.quoted()).cloned()
    }

    fn replies_count(&self) -> u64 {
        u64_at(&self.raw, "/replies_count").unwrap_or(0)
    }

    fn reposts_count(&self) -> u64 {
        u64_at(&self.raw, "/reblogs_count").unwrap_or(0)
    }

    fn favourites_count(&self) -> u64 {
        u64_at(&self.raw, "/favourites_count").unwrap_or(0)
    }

    fn quotes_count(&self) -> Option<u64> {
        u64_at(&self.raw, "/quotes_count")
    }

    fn is_liked(&self) -> bool {
        flag_at(&self.raw, "/favourited")
    }

    fn is_reposted_by_me(&self) -> bool {
        flag_at(&self.raw, "/reblogged")
    }

    fn is_bookmarked(&self) -> bool {
        flag_at(&self.raw, "/bookmarked")
    }

    fn is_pinned(&self) -> bool {
        flag_at(&self.raw, "/pinned")
    }

    fn reactions(&self) -> Vec<Reaction> {
        self.emoji_reactions()
            .iter()
            .filter_map(|r| {
                Some(Reaction {
                    name: str_at(r, "/name")?.to_string(),
                    count: u64_at(r, "/count").unwrap_or(0),
                    me: flag_at(r, "/me"),
                    url: str_at(r, "/url").map(str::to_owned),
                })
            })
            .collect()
    }

    fn cached_emojis(&self) -> HashMap<String, String> {
        array_at(&self.raw, "/emojis")
            .iter()
            .filter_map(|e| {
                Some((
                    str_at(e, "/shortcode")?.to_string(),
                    str_at(e, "/url")?.to_string(),
                ))
            })
            .collect()
    }

    fn my_reaction(&self) -> Option<&str> {
        self.emoji_reactions()
            .iter()
            .find(|r| flag_at(r, "/me"))
            .and_then(|r| str_at(r, "/name"))
    }

    fn media_attachments(&self) -> Vec<MediaAttachment> {
        array_at(&self.raw, "/media_attachments")
            .iter()
            .map(media::mastodon)
            .collect()
    }
}
