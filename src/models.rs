use serde::{Deserialize, Serialize};

/// Данные для доступа к инстанции
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub instance: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
    Direct,
}

impl Visibility {
    pub fn from_mastodon(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Visibility::Public),
            "unlisted" => Some(Visibility::Unlisted),
            "private" => Some(Visibility::Private),
            "direct" => Some(Visibility::Direct),
            _ => None,
        }
    }

    pub fn from_misskey(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Visibility::Public),
            "home" => Some(Visibility::Unlisted),
            "followers" => Some(Visibility::Private),
            "specified" => Some(Visibility::Direct),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Unknown,
}

/// Вложение в едином виде для всех бэкендов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub id: Option<String>,
    pub url: String,
    pub preview_url: Option<String>,
    pub kind: MediaKind,
    pub blurhash: Option<String>,
    pub alt_text: Option<String>,
    pub width: Option<u64>,
    pub height: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub id: String,
    pub username: Option<String>,
    pub acct: Option<String>,
    pub url: Option<String>,
}

impl Mention {
    pub fn with_id(id: impl Into<String>) -> Self {
        Mention {
            id: id.into(),
            username: None,
            acct: None,
            url: None,
        }
    }
}

/// Эмодзи-реакция на пост
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub name: String,
    pub count: u64,
    pub me: bool,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiMapValue {
    pub url: String,
    pub static_url: Option<String>,
    pub visible_in_picker: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileField {
    pub name: String,
    pub value: String,
    pub verified: bool,
}
