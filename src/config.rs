use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Семейство серверов, по которому выбирается адаптер
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[value(name = "mastodon")]
    Mastodon,
    #[value(name = "misskey")]
    Misskey,
    #[value(name = "bluesky")]
    Bluesky,
    #[value(name = "unknown")]
    Unknown,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Mastodon => "mastodon",
            Backend::Misskey => "misskey",
            Backend::Bluesky => "bluesky",
            Backend::Unknown => "unknown",
        }
    }

    /// Определяет семейство по имени ПО из nodeinfo (без учёта регистра)
    pub fn from_software(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mastodon" | "pleroma" | "akkoma" | "gotosocial" | "friendica" | "hometown"
            | "glitch" | "glitchsoc" => Backend::Mastodon,
            "misskey" | "firefish" | "sharkey" | "iceshrimp" | "calckey" | "foundkey"
            | "cherrypick" | "meisskey" => Backend::Misskey,
            "bluesky" | "atproto" => Backend::Bluesky,
            _ => Backend::Unknown,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "fedinorm")]
#[command(author = "Dabe Vlohn")]
#[command(version = "0.1.0")]
#[command(about = "Fetch a Mastodon/Misskey/Bluesky item and print its normalized view")]
pub struct Config {
    /// Семейство сервера: mastodon, misskey или bluesky
    /// env: FEDINORM_BACKEND
    #[arg(long, env = "FEDINORM_BACKEND", value_enum, default_value = "mastodon")]
    pub backend: Backend,

    /// Адрес инстанции (mastodon.social или https://misskey.io)
    /// Для bluesky по умолчанию используется публичный AppView
    /// env: FEDINORM_INSTANCE
    #[arg(long, env = "FEDINORM_INSTANCE")]
    pub instance: Option<String>,

    /// Токен доступа (необязателен для публичных объектов)
    /// env: FEDINORM_TOKEN
    #[arg(long, env = "FEDINORM_TOKEN")]
    pub token: Option<String>,

    /// Идентификатор поста (для bluesky: at:// URI)
    #[arg(long)]
    pub status: Option<String>,

    /// Идентификатор профиля (для bluesky: handle или DID)
    #[arg(long)]
    pub profile: Option<String>,

    /// Дополнительно загрузить контекст треда для --status
    #[arg(long, env = "FEDINORM_CONTEXT")]
    pub context: bool,

    /// Debug режим: выводить сырой JSON вместо нормализованного
    #[arg(long, env = "FEDINORM_RAW")]
    pub raw: bool,
}

impl Config {
    /// Валидирует конфигурацию при запуске
    pub fn validate(&self) -> crate::error::AppResult<()> {
        if self.backend == Backend::Unknown {
            return Err(crate::error::AppError::Config(
                "Backend must be one of mastodon, misskey, bluesky".to_string(),
            ));
        }

        match (&self.status, &self.profile) {
            (Some(_), Some(_)) => {
                return Err("Use either --status or --profile, not both".into());
            }
            (None, None) => {
                return Err("Provide --status or --profile".into());
            }
            _ => {}
        }

        if self.context && self.status.is_none() {
            return Err("--context requires --status".into());
        }

        if self.backend != Backend::Bluesky && self.instance.is_none() {
            return Err(crate::error::AppError::Config(format!(
                "--instance is required for {}",
                self.backend.as_str()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            backend: Backend::Mastodon,
            instance: Some("mastodon.social".to_string()),
            token: None,
            status: Some("1".to_string()),
            profile: None,
            context: false,
            raw: false,
        }
    }

    #[test]
    fn test_from_software() {
        assert_eq!(Backend::from_software("Akkoma"), Backend::Mastodon);
        assert_eq!(Backend::from_software("sharkey"), Backend::Misskey);
        assert_eq!(Backend::from_software(" bluesky "), Backend::Bluesky);
        assert_eq!(Backend::from_software("lemmy"), Backend::Unknown);
    }

    #[test]
    fn test_validate() {
        assert!(base().validate().is_ok());

        let mut both = base();
        both.profile = Some("2".to_string());
        assert!(both.validate().is_err());

        let mut context_without_status = base();
        context_without_status.status = None;
        context_without_status.profile = Some("2".to_string());
        context_without_status.context = true;
        assert!(context_without_status.validate().is_err());

        let mut no_instance = base();
        no_instance.instance = None;
        assert!(no_instance.validate().is_err());

        no_instance.backend = Backend::Bluesky;
        assert!(no_instance.validate().is_ok());

        let mut unknown = base();
        unknown.backend = Backend::Unknown;
        assert!(unknown.validate().is_err());
    }
}
