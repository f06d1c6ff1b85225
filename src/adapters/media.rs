//! Адаптеры вложений: по одной фабрике на форму описания вложения у бэкенда.

use super::{non_empty_str_at, str_at, u64_at};
use crate::models::{MediaAttachment, MediaKind};
use serde_json::Value;

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

/// Элемент `media_attachments` Mastodon
pub fn mastodon(raw: &Value) -> MediaAttachment {
    let kind = match str_at(raw, "/type") {
        Some("image") => MediaKind::Image,
        Some("gifv") | Some("video") => MediaKind::Video,
        Some("audio") => MediaKind::Audio,
        _ => MediaKind::Unknown,
    };

    // Удалённое вложение, которое сервер ещё не скачал, приходит с url = null
    let url = non_empty_str_at(raw, "/url")
        .or_else(|| non_empty_str_at(raw, "/remote_url"))
        .unwrap_or_default()
        .to_string();

    MediaAttachment {
        id: owned(str_at(raw, "/id")),
        url,
        preview_url: owned(non_empty_str_at(raw, "/preview_url")),
        kind,
        blurhash: owned(str_at(raw, "/blurhash")),
        alt_text: owned(non_empty_str_at(raw, "/description")),
        width: u64_at(raw, "/meta/original/width"),
        height: u64_at(raw, "/meta/original/height"),
    }
}

/// Файл диска Misskey (`files` у заметки)
pub fn misskey(raw: &Value) -> MediaAttachment {
    let mime = str_at(raw, "/type").unwrap_or_default();
    let kind = match mime.split('/').next() {
        Some("image") => MediaKind::Image,
        Some("video") => MediaKind::Video,
        Some("audio") => MediaKind::Audio,
        _ => MediaKind::Unknown,
    };

    MediaAttachment {
        id: owned(str_at(raw, "/id")),
        url: str_at(raw, "/url").unwrap_or_default().to_string(),
        preview_url: owned(str_at(raw, "/thumbnailUrl")),
        kind,
        blurhash: owned(str_at(raw, "/blurhash")),
        alt_text: owned(non_empty_str_at(raw, "/comment")),
        width: u64_at(raw, "/properties/width"),
        height: u64_at(raw, "/properties/height"),
    }
}

/// Картинка из `app.bsky.embed.images#view`
pub fn bluesky_image(raw: &Value) -> MediaAttachment {
    MediaAttachment {
        id: None,
        url: str_at(raw, "/fullsize")
            .or_else(|| str_at(raw, "/thumb"))
            .unwrap_or_default()
            .to_string(),
        preview_url: owned(str_at(raw, "/thumb")),
        kind: MediaKind::Image,
        blurhash: None,
        alt_text: owned(non_empty_str_at(raw, "/alt")),
        width: u64_at(raw, "/aspectRatio/width"),
        height: u64_at(raw, "/aspectRatio/height"),
    }
}

/// Видео из `app.bsky.embed.video#view`
pub fn bluesky_video(raw: &Value) -> MediaAttachment {
    MediaAttachment {
        id: owned(str_at(raw, "/cid")),
        url: str_at(raw, "/playlist").unwrap_or_default().to_string(),
        preview_url: owned(str_at(raw, "/thumbnail")),
        kind: MediaKind::Video,
        blurhash: None,
        alt_text: owned(non_empty_str_at(raw, "/alt")),
        width: u64_at(raw, "/aspectRatio/width"),
        height: u64_at(raw, "/aspectRatio/height"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_mastodon_gifv_is_video() {
        let raw = json!({
            "id": "22345792",
            "type": "gifv",
            "url": "https://files.mastodon.social/media_attachments/files/022/345/792/original/e96.mp4",
            "preview_url": "https://files.mastodon.social/media_attachments/files/022/345/792/small/e96.png",
            "description": null,
            "blurhash": "URHT%Jm,2a1d%MRO%LozkrNH$*n*oMn$Rjt7",
            "meta": { "original": { "width": 400, "height": 400 } }
        });

        let media = mastodon(&raw);
        assert_eq!(media.kind, MediaKind::Video);
        assert_eq!(media.width, Some(400));
        assert_eq!(media.alt_text, None);
        assert!(media.url.ends_with("e96.mp4"));
    }

    #[test]
    fn test_mastodon_falls_back_to_remote_url() {
        let raw = json!({
            "id": "1",
            "type": "image",
            "url": null,
            "remote_url": "https://remote.example/a.png"
        });
        assert_eq!(mastodon(&raw).url, "https://remote.example/a.png");
    }

    #[test]
    fn test_misskey_kind_from_mime() {
        let raw = json!({
            "id": "9abc",
            "type": "audio/mpeg",
            "url": "https://misskey.example/files/a.mp3",
            "thumbnailUrl": null,
            "blurhash": null,
            "comment": "a song",
            "properties": {}
        });

        let media = misskey(&raw);
        assert_eq!(media.kind, MediaKind::Audio);
        assert_eq!(media.alt_text.as_deref(), Some("a song"));
        assert_eq!(media.width, None);
    }

    #[test]
    fn test_bluesky_image_and_video() {
        let image = bluesky_image(&json!({
            "thumb": "https://cdn.bsky.app/img/feed_thumbnail/a@jpeg",
            "fullsize": "https://cdn.bsky.app/img/feed_fullsize/a@jpeg",
            "alt": "",
            "aspectRatio": { "width": 1200, "height": 800 }
        }));
        assert_eq!(image.url, "https://cdn.bsky.app/img/feed_fullsize/a@jpeg");
        assert_eq!(image.alt_text, None);
        assert_eq!(image.height, Some(800));

        let video = bluesky_video(&json!({
            "$type": "app.bsky.embed.video#view",
            "cid": "bafyvideo",
            "playlist": "https://video.bsky.app/watch/a/playlist.m3u8",
            "thumbnail": "https://video.bsky.app/watch/a/thumbnail.jpg"
        }));
        assert_eq!(video.kind, MediaKind::Video);
        assert_eq!(video.id.as_deref(), Some("bafyvideo"));
        assert!(video.url.ends_with("playlist.m3u8"));
    }
}
