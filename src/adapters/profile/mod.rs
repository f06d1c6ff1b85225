mod bluesky;
mod mastodon;
mod misskey;
mod unknown;

pub use bluesky::BlueskyProfile;
pub use mastodon::MastodonProfile;
pub use misskey::MisskeyProfile;
pub use unknown::UnknownProfile;

use crate::config::Backend;
use crate::error::AppResult;
use crate::models::{EmojiMapValue, ProfileField};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;

/// Единый интерфейс профиля.
///
/// Перед использованием нужно проверить [`Profile::is_valid`]: у профиля без
/// исходных данных все геттеры возвращают `None`.
pub trait Profile: Send + Sync + Debug {
    fn backend(&self) -> Backend;
    fn is_valid(&self) -> bool;
    fn raw(&self) -> Option<&Value>;

    fn id(&self) -> Option<&str>;
    fn username(&self) -> Option<&str>;
    fn display_name(&self) -> Option<&str>;

    fn avatar_url(&self) -> Option<&str>;
    fn avatar_blurhash(&self) -> Option<&str>;
    fn banner_url(&self) -> Option<&str>;
    fn banner_blurhash(&self) -> Option<&str>;

    fn description(&self) -> Option<&str>;
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn birthday(&self) -> Option<NaiveDate>;
    fn fields(&self) -> Vec<ProfileField>;

    fn followers_count(&self) -> Option<u64>;
    fn following_count(&self) -> Option<u64>;
    fn post_count(&self) -> Option<u64>;

    fn is_bot(&self) -> Option<bool>;
    fn is_locked(&self) -> Option<bool>;
    fn has_pending_follow_request_from_you(&self) -> Option<bool>;
    fn has_pending_follow_request_to_you(&self) -> Option<bool>;

    /// shortcode -> эмодзи для отображаемого имени и описания
    fn emoji_map(&self) -> HashMap<String, EmojiMapValue>;
    fn find_emoji(&self, shortcode: &str) -> Option<EmojiMapValue> {
        self.emoji_map().remove(shortcode.trim_matches(':'))
    }

    /// Домен инстанции аккаунта, `None` для локального
    fn instance_host(&self) -> Option<&str>;
    fn account_url(&self, my_subdomain: Option<&str>) -> Option<String>;
    /// Адрес профиля внутри приложения для домена текущего аккаунта
    fn app_display_account_url(&self, my_domain: &str) -> AppResult<String>;
}
