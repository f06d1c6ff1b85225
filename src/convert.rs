// convert.rs - общие преобразования текста и дат для адаптеров

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fancy_regex::Regex;
use std::sync::OnceLock;
use tracing::error;

fn tag_regex() -> Option<&'static Regex> {
    static TAG: OnceLock<Option<Regex>> = OnceLock::new();
    TAG.get_or_init(|| match Regex::new(r"<[^>]*>") {
        Ok(re) => Some(re),
        Err(e) => {
            error!("Failed to compile HTML tag regex: {}", e);
            None
        }
    })
    .as_ref()
}

/// Конвертирует HTML (контент Mastodon) в обычный текст
pub fn html_to_text(html: &str) -> String {
    // Блочные теги превращаем в переводы строк
    let mut text = html
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</p><p>", "\n\n")
        .replace("</p>", "\n")
        .replace("</li>", "\n");

    if let Some(re) = tag_regex() {
        text = re.replace_all(&text, "").to_string();
    }

    // &amp; последним, чтобы не раскрыть сущность дважды
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");

    text.lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Разбирает отметку времени любого из бэкендов.
/// Текущее время не подставляется: повторный вызов геттера
/// обязан давать тот же результат.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    formats.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(date_str, format)
            .ok()
            .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
    })
}

/// Дата без времени (день рождения в Misskey)
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_html_to_text() {
        let html = "<p>Hello <b>world</b>!</p><p>Second</p>";
        assert_eq!(html_to_text(html), "Hello world!\n\nSecond");
    }

    #[test]
    fn test_html_entities() {
        let html = "&lt;test&gt; &amp;lt; &quot;quotes&quot;";
        assert_eq!(html_to_text(html), "<test> &lt; \"quotes\"");
    }

    #[test]
    fn test_parse_datetime_variants() {
        let dt = parse_datetime("2024-11-05T10:20:30.123Z").unwrap();
        assert_eq!((dt.year(), dt.hour(), dt.second()), (2024, 10, 30));

        let offset = parse_datetime("2024-11-05T12:20:30+02:00").unwrap();
        assert_eq!(offset.hour(), 10);

        assert!(parse_datetime("2024-11-05T10:20:30").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("1990-04-01"),
            NaiveDate::from_ymd_opt(1990, 4, 1)
        );
        assert_eq!(parse_date("04/01"), None);
    }
}
