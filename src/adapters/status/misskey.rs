use super::Status;
use crate::adapters::{array_at, flag_at, media, non_empty_str_at, present, str_at, u64_at};
use crate::config::Backend;
use crate::convert::parse_datetime;
use crate::error::AppResult;
use crate::models::{MediaAttachment, Mention, Reaction, Visibility};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// Заметка Misskey-совместимого сервера (Misskey, Firefish, Sharkey и т.д.).
///
/// Ренот без собственного текста, CW, файлов и опроса считается репостом,
/// ренот с любым из них считается цитатой.
#[derive(Debug, Clone)]
pub struct MisskeyStatus {
    raw: Value,
}

impl MisskeyStatus {
    pub fn new(raw: Value) -> Self {
        MisskeyStatus { raw }
    }

    pub fn renote_id(&self) -> Option<&str> {
        str_at(&self.raw, "/renoteId")
    }

    pub fn reply_id(&self) -> Option<&str> {
        str_at(&self.raw, "/replyId")
    }

    fn renote(&self) -> Option<&Value> {
        present(&self.raw, "/renote")
    }

    /// Без вложенного `renote` развернуть нечего, такая заметка не считается репостом
    fn has_renote(&self) -> bool {
        self.renote().is_some()
    }

    fn has_own_body(&self) -> bool {
        non_empty_str_at(&self.raw, "/text").is_some()
            || non_empty_str_at(&self.raw, "/cw").is_some()
            || !array_at(&self.raw, "/files").is_empty()
            || present(&self.raw, "/poll").is_some()
    }

    /// Ключ реакции `:blobcat@.:` -> `blobcat@.`
    fn emoji_key(reaction: &str) -> &str {
        reaction.trim_matches(':')
    }
}

impl Status for MisskeyStatus {
    fn backend(&self) -> Backend {
        Backend::Misskey
    }

    fn id(&self) -> Option<&str> {
        str_at(&self.raw, "/id")
    }

    fn uri(&self) -> Option<&str> {
        // uri есть только у удалённых заметок
        non_empty_str_at(&self.raw, "/url").or_else(|| str_at(&self.raw, "/uri"))
    }

    fn raw(&self) -> &Value {
        &self.raw
    }

    fn username(&self) -> Option<&str> {
        str_at(&self.raw, "/user/username")
    }

    fn display_name(&self) -> Option<&str> {
        str_at(&self.raw, "/user/name")
    }

    fn avatar_url(&self) -> Option<&str> {
        str_at(&self.raw, "/user/avatarUrl")
    }

    fn account_url(&self, my_subdomain: Option<&str>) -> Option<String> {
        let username = self.username()?;
        let host = str_at(&self.raw, "/user/host").or(my_subdomain)?;
        Some(format!("https://{}/@{}", host, username))
    }

    fn poster_account_id(&self) -> AppResult<Option<&str>> {
        Ok(str_at(&self.raw, "/userId").or_else(|| str_at(&self.raw, "/user/id")))
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        str_at(&self.raw, "/createdAt").and_then(parse_datetime)
    }

    fn visibility(&self) -> Option<Visibility> {
        str_at(&self.raw, "/visibility").and_then(Visibility::from_misskey)
    }

    fn content(&self) -> Option<&str> {
        if self.is_share() {
            return None;
        }
        str_at(&self.raw, "/text")
    }

    fn is_sensitive(&self) -> bool {
        array_at(&self.raw, "/files")
            .iter()
            .any(|f| flag_at(f, "/isSensitive"))
    }

    fn spoiler_text(&self) -> Option<&str> {
        non_empty_str_at(&self.raw, "/cw")
    }

    fn mentions(&self) -> Vec<Mention> {
        array_at(&self.raw, "/mentions")
            .iter()
            .filter_map(Value::as_str)
            .map(Mention::with_id)
            .collect()
    }

    fn is_reply(&self) -> bool {
        self.reply_id().is_some() || present(&self.raw, "/reply").is_some()
    }

    fn is_share(&self) -> bool {
        self.has_renote() && !self.has_own_body()
    }

    fn is_quote(&self) -> bool {
        self.has_renote() && self.has_own_body()
    }

    fn parent_status_id(&self) -> Option<&str> {
        self.reply_id()
            .or_else(|| self.parent_raw().and_then(|p| str_at(p, "/id")))
    }

    fn parent_raw(&self) -> Option<&Value> {
        present(&self.raw, "/reply")
    }

    fn parent_status(&self) -> Option<Box<dyn Status>> {
        let parent = self.parent_raw()?;
        Some(Box::new(MisskeyStatus::new(parent.clone())))
    }

    // Корень треда Misskey в заметке не передаёт
    fn root_raw(&self) -> Option<&Value> {
        None
    }

    fn root_status(&self) -> Option<Box<dyn Status>> {
        None
    }

    fn reposted_status(&self) -> Option<Box<dyn Status>> {
        // Вложенный renote это отдельная заметка со своими флагами
        let renote = self.renote()?;
        Some(Box::new(MisskeyStatus::new(renote.clone())))
    }

    fn reposted_status_raw(&self) -> Option<Value> {
        self.renote().cloned()
    }

    fn replies_count(&self) -> u64 {
        u64_at(&self.raw, "/repliesCount").unwrap_or(0)
    }

    fn reposts_count(&self) -> u64 {
        u64_at(&self.raw, "/renoteCount").unwrap_or(0)
    }

    fn favourites_count(&self) -> u64 {
        u64_at(&self.raw, "/reactionCount").unwrap_or_else(|| {
            self.raw
                .get("reactions")
                .and_then(Value::as_object)
                .map(|reactions| reactions.values().filter_map(Value::as_u64).sum())
                .unwrap_or(0)
        })
    }

    fn is_liked(&self) -> bool {
        self.my_reaction().is_some()
    }

    fn is_reposted_by_me(&self) -> bool {
        false
    }

    fn reactions(&self) -> Vec<Reaction> {
        let Some(counts) = self.raw.get("reactions").and_then(Value::as_object) else {
            return Vec::new();
        };
        let emojis = self.cached_emojis();
        let mine = self.my_reaction();

        let mut reactions: Vec<Reaction> = counts
            .iter()
            .map(|(name, count)| {
                let key = Self::emoji_key(name);
                // Локальные эмодзи приходят как name@. , в карте их может не быть
                let url = emojis
                    .get(key)
                    .or_else(|| emojis.get(key.trim_end_matches("@.")))
                    .cloned();
                Reaction {
                    name: name.clone(),
                    count: count.as_u64().unwrap_or(0),
                    me: mine == Some(name.as_str()),
                    url,
                }
            })
            .collect();

        reactions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        reactions
    }

    fn cached_emojis(&self) -> HashMap<String, String> {
        let mut emojis = HashMap::new();

        // Старые версии: emojis массивом [{name, url}], новые: объект name -> url
        match self.raw.get("emojis") {
            Some(Value::Array(items)) => {
                for item in items {
                    if let (Some(name), Some(url)) = (str_at(item, "/name"), str_at(item, "/url")) {
                        emojis.insert(name.to_string(), url.to_string());
                    }
                }
            }
            Some(Value::Object(map)) => {
                for (name, url) in map {
                    if let Some(url) = url.as_str() {
                        emojis.insert(name.clone(), url.to_string());
                    }
                }
            }
            _ => {}
        }

        if let Some(map) = self.raw.get("reactionEmojis").and_then(Value::as_object) {
            for (name, url) in map {
                if let Some(url) = url.as_str() {
                    emojis.insert(name.clone(), url.to_string());
                }
            }
        }

        emojis
    }

    fn my_reaction(&self) -> Option<&str> {
        str_at(&self.raw, "/myReaction")
    }

    fn media_attachments(&self) -> Vec<MediaAttachment> {
        array_at(&self.raw, "/files")
            .iter()
            .map(media::misskey)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn note(id: &str, text: Option<&str>) -> Value {
        json!({
            "id": id,
            "createdAt": "2024-06-01T09:30:00.000Z",
            "userId": "u1",
            "user": {
                "id": "u1",
                "username": "miku",
                "name": "Miku",
                "host": null,
                "avatarUrl": "https://misskey.example/avatar/u1"
            },
            "text": text,
            "cw": null,
            "visibility": "home",
            "renoteCount": 4,
            "repliesCount": 1,
            "reactions": {},
            "reactionEmojis": {},
            "files": [],
            "replyId": null,
            "renoteId": null,
            "mentions": []
        })
    }

    #[test]
    fn test_pure_renote_is_share() {
        let mut raw = note("n2", None);
        raw["renoteId"] = json!("n1");
        raw["renote"] = note("n1", Some("original"));

        let adapter = MisskeyStatus::new(raw.clone());
        assert!(adapter.is_share());
        assert!(!adapter.is_quote());
        assert!(adapter.is_reposted());
        assert_eq!(adapter.content(), None);

        let inner = adapter.reposted_status().unwrap();
        assert!(!inner.is_share());
        assert!(!inner.is_quote());
        assert_eq!(inner.content(), Some("original"));
        assert_eq!(adapter.reposted_status_raw(), Some(raw["renote"].clone()));
    }

    #[test]
    fn test_renote_with_text_is_quote() {
        let mut raw = note("n3", Some("so true"));
        raw["renoteId"] = json!("n1");
        raw["renote"] = note("n1", Some("original"));

        let adapter = MisskeyStatus::new(raw);
        assert!(adapter.is_quote());
        assert!(!adapter.is_share());
        assert_eq!(adapter.content(), Some("so true"));
        assert_eq!(adapter.renote_id(), Some("n1"));
    }

    #[test]
    fn test_renote_with_only_cw_is_quote() {
        let mut raw = note("n4", None);
        raw["cw"] = json!("spoiler");
        raw["renoteId"] = json!("n1");
        raw["renote"] = note("n1", Some("original"));

        let adapter = MisskeyStatus::new(raw);
        assert!(adapter.is_quote());
        assert!(!adapter.is_share());
        assert_eq!(adapter.spoiler_text(), Some("spoiler"));
        assert_eq!(adapter.content(), None);
        assert_eq!(adapter.reposted_status().unwrap().id(), Some("n1"));
    }

    #[test]
    fn test_renote_id_without_renote_object() {
        let mut raw = note("n5", None);
        raw["renoteId"] = json!("gone");

        let adapter = MisskeyStatus::new(raw);
        assert_eq!(adapter.renote_id(), Some("gone"));
        assert!(!adapter.is_share());
        assert!(!adapter.is_quote());
        assert!(!adapter.is_reposted());
        assert!(adapter.reposted_status().is_none());
        assert!(adapter.reposted_status_raw().is_none());
    }

    #[test]
    fn test_account_url_uses_subdomain_for_local_users() {
        let adapter = MisskeyStatus::new(note("n1", Some("hi")));
        assert_eq!(adapter.account_url(None), None);
        assert_eq!(
            adapter.account_url(Some("misskey.example")).as_deref(),
            Some("https://misskey.example/@miku")
        );

        let mut remote = note("n2", Some("hi"));
        remote["user"]["host"] = json!("remote.example");
        assert_eq!(
            MisskeyStatus::new(remote).account_url(Some("misskey.example")).as_deref(),
            Some("https://remote.example/@miku")
        );
    }

    #[test]
    fn test_reactions_sorted_with_urls() {
        let mut raw = note("n4", Some("react to me"));
        raw["reactions"] = json!({ "👍": 2, ":blobcat@.:": 5, ":party@remote.example:": 2 });
        raw["reactionEmojis"] = json!({ "party@remote.example": "https://remote.example/emoji/party.png" });
        raw["emojis"] = json!({ "blobcat": "https://misskey.example/emoji/blobcat.png" });
        raw["myReaction"] = json!(":blobcat@.:");

        let adapter = MisskeyStatus::new(raw);
        let reactions = adapter.reactions();
        let names: Vec<_> = reactions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec![":blobcat@.:", ":party@remote.example:", "👍"]);

        assert!(reactions[0].me);
        assert_eq!(
            reactions[0].url.as_deref(),
            Some("https://misskey.example/emoji/blobcat.png")
        );
        assert_eq!(
            reactions[1].url.as_deref(),
            Some("https://remote.example/emoji/party.png")
        );
        assert_eq!(reactions[2].url, None);
        assert!(adapter.is_liked());
        assert_eq!(adapter.favourites_count(), 9);
    }

    #[test]
    fn test_reply_and_files() {
        let mut raw = note("n5", Some("answer"));
        raw["replyId"] = json!("n0");
        raw["reply"] = note("n0", Some("question"));
        raw["cw"] = json!("spoilers");
        raw["files"] = json!([
            { "id": "f1", "type": "image/webp", "url": "https://misskey.example/f1.webp", "isSensitive": true, "properties": { "width": 10, "height": 20 } }
        ]);

        let adapter = MisskeyStatus::new(raw);
        assert!(adapter.is_reply());
        assert!(adapter.has_parent_available());
        assert!(!adapter.has_root_available());
        assert_eq!(adapter.parent_status().unwrap().content(), Some("question"));
        assert!(adapter.is_sensitive());
        assert_eq!(adapter.spoiler_text(), Some("spoilers"));
        assert_eq!(adapter.visibility(), Some(Visibility::Unlisted));
        assert_eq!(adapter.media_attachments()[0].height, Some(20));
    }
}
