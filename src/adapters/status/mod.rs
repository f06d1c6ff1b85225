mod bluesky;
mod mastodon;
mod misskey;
mod unknown;

pub use bluesky::BlueskyStatus;
pub use mastodon::MastodonStatus;
pub use misskey::MisskeyStatus;
pub use unknown::UnknownStatus;

use crate::config::Backend;
use crate::error::AppResult;
use crate::models::{MediaAttachment, Mention, Reaction, Visibility};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;

/// Единый интерфейс поста.
///
/// Каждый метод является чистой проекцией обёрнутого ответа: повторный вызов
/// возвращает то же значение. Возможности, которых у бэкенда нет, отдают
/// `false`, `None` или пустую коллекцию. Ошибку возвращают только заглушки
/// (`AppError::NotImplemented`).
pub trait Status: Send + Sync + Debug {
    fn backend(&self) -> Backend;

    /// `false` только у null-object адаптера
    fn is_valid(&self) -> bool {
        true
    }

    // Идентичность

    fn id(&self) -> Option<&str>;
    fn uri(&self) -> Option<&str>;
    /// Исходный ответ сервера без изменений
    fn raw(&self) -> &Value;

    // Автор
    //
    // Для репоста (`is_share`) это автор репоста, а не исходного поста.
    // Автора оригинала отдаёт `reposted_status()`.

    /// Имя автора; у репоста это тот, кто репостнул
    fn username(&self) -> Option<&str>;
    fn display_name(&self) -> Option<&str>;
    fn avatar_url(&self) -> Option<&str>;
    /// Ссылка на профиль в схеме адресов бэкенда.
    /// `my_subdomain` нужен для локальных аккаунтов Misskey, у которых нет host.
    fn account_url(&self, my_subdomain: Option<&str>) -> Option<String>;
    fn poster_account_id(&self) -> AppResult<Option<&str>>;

    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn visibility(&self) -> Option<Visibility>;

    // Содержимое

    /// Текст поста как его отдал сервер. `None` для чистого репоста.
    fn content(&self) -> Option<&str>;
    fn plain_text(&self) -> Option<String> {
        self.content().map(str::to_owned)
    }
    fn is_sensitive(&self) -> bool;
    fn spoiler_text(&self) -> Option<&str>;
    fn mentions(&self) -> Vec<Mention>;

    // Связи

    fn is_reply(&self) -> bool;
    fn is_share(&self) -> bool;
    fn is_quote(&self) -> bool;
    fn is_reposted(&self) -> bool {
        self.is_share() || self.is_quote()
    }

    fn parent_status_id(&self) -> Option<&str>;
    fn parent_raw(&self) -> Option<&Value>;
    fn has_parent_available(&self) -> bool {
        self.parent_raw().is_some()
    }
    fn parent_status(&self) -> Option<Box<dyn Status>>;

    fn root_raw(&self) -> Option<&Value>;
    fn has_root_available(&self) -> bool {
        self.root_raw().is_some()
    }
    fn root_status(&self) -> Option<Box<dyn Status>>;

    /// Репостнутый или процитированный пост. Вложенный адаптер строится
    /// без контекста репоста и ответа, поэтому его флаги не наследуются.
    fn reposted_status(&self) -> Option<Box<dyn Status>>;
    fn reposted_status_raw(&self) -> Option<Value>;

    // Счётчики

    fn replies_count(&self) -> u64;
    fn reposts_count(&self) -> u64;
    fn favourites_count(&self) -> u64;
    fn quotes_count(&self) -> Option<u64> {
        None
    }

    // Состояние для текущего пользователя

    fn is_liked(&self) -> bool;
    fn is_reposted_by_me(&self) -> bool;
    fn is_bookmarked(&self) -> bool {
        false
    }
    fn is_pinned(&self) -> bool {
        false
    }

    // Реакции

    fn reactions(&self) -> Vec<Reaction> {
        Vec::new()
    }
    /// shortcode -> url
    fn cached_emojis(&self) -> HashMap<String, String> {
        HashMap::new()
    }
    fn my_reaction(&self) -> Option<&str> {
        None
    }

    fn media_attachments(&self) -> Vec<MediaAttachment>;
}
