//! Слой нормализации протоколов: сырые ответы Mastodon, Misskey и Bluesky
//! приводятся к единым интерфейсам поста, профиля и вложения.

pub mod adapters;
pub mod api;
pub mod config;
pub mod convert;
pub mod error;
pub mod models;
pub mod snapshot;
pub mod thread;

pub use adapters::{select_profile_adapter, select_status_adapter, Profile, Status};
pub use api::{create_api_client, BackendRouter, ThreadContext};
pub use config::Backend;
pub use error::{AppError, AppResult};
