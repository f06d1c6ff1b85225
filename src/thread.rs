//! Таблица потомков треда.
//!
//! Адаптеры неизменяемы, поэтому список ответов хранится снаружи:
//! id поста -> прямые ответы. Таблицу заполняет один сборщик треда,
//! после чего её можно раздавать читателям через `Arc`.

use crate::adapters::{present, select_status_adapter, MastodonStatus, Status};
use crate::api::ThreadContext;
use crate::config::Backend;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
pub struct DescendantTable {
    children: HashMap<String, Vec<Arc<dyn Status>>>,
}

impl DescendantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Группирует плоский список постов по `parent_status_id`.
    /// Порядок ответов внутри родителя сохраняется.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Status>>,
    {
        let mut table = Self::new();
        for status in statuses {
            let Some(parent_id) = status.parent_status_id().map(str::to_owned) else {
                continue;
            };
            table.children.entry(parent_id).or_default().push(status);
        }
        debug!("Assembled descendants for {} parents", table.children.len());
        table
    }

    /// Заменяет список ответов поста
    pub fn set_descendants(&mut self, status_id: impl Into<String>, items: Vec<Arc<dyn Status>>) {
        self.children.insert(status_id.into(), items);
    }

    pub fn descendants(&self, status_id: &str) -> &[Arc<dyn Status>] {
        self.children
            .get(status_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ответы на конкретный пост; для поста без id пусто
    pub fn descendants_of(&self, status: &dyn Status) -> &[Arc<dyn Status>] {
        status
            .id()
            .map(|id| self.descendants(id))
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Собранный тред: предки (от корня), сам пост и таблица ответов
#[derive(Debug)]
pub struct Thread {
    pub focal: Arc<dyn Status>,
    pub ancestors: Vec<Arc<dyn Status>>,
    pub replies: DescendantTable,
}

impl Thread {
    /// Прямые ответы на сам пост
    pub fn focal_replies(&self) -> &[Arc<dyn Status>] {
        self.replies.descendants_of(self.focal.as_ref())
    }
}

/// Оборачивает пост и его контекст в адаптеры и строит таблицу ответов.
///
/// Misskey и Bluesky несут контекст ответа в самих элементах. Статусу Mastodon
/// родитель и корень подставляются из контекста по `in_reply_to_id`.
pub fn assemble(focal: Value, context: ThreadContext, backend: Backend) -> Thread {
    let ThreadContext {
        ancestors,
        descendants,
    } = context;

    let by_id: HashMap<String, Value> = if backend == Backend::Mastodon {
        ancestors
            .iter()
            .chain(std::iter::once(&focal))
            .chain(descendants.iter())
            .filter_map(|raw| Some((raw.get("id")?.as_str()?.to_string(), raw.clone())))
            .collect()
    } else {
        HashMap::new()
    };
    // Без предков корнем треда является сам пост, если он не ответ
    let root = ancestors.first().cloned().or_else(|| {
        present(&focal, "/in_reply_to_id")
            .is_none()
            .then(|| focal.clone())
    });

    let wrap = |raw: Value| -> Arc<dyn Status> {
        if backend != Backend::Mastodon {
            return Arc::from(select_status_adapter(raw, backend));
        }
        let parent = raw
            .get("in_reply_to_id")
            .and_then(Value::as_str)
            .and_then(|id| by_id.get(id))
            .cloned();
        let root = root.clone().filter(|r| r.get("id") != raw.get("id"));
        Arc::new(MastodonStatus::new(raw).with_reply_context(parent, root))
    };

    let focal = wrap(focal);
    let ancestors: Vec<_> = ancestors.into_iter().map(&wrap).collect();
    let descendants: Vec<_> = descendants.into_iter().map(&wrap).collect();

    Thread {
        focal,
        ancestors,
        replies: DescendantTable::from_statuses(descendants),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::UnknownStatus;
    use serde_json::json;

    fn reply(id: &str, parent: Option<&str>) -> Arc<dyn Status> {
        Arc::new(MastodonStatus::new(json!({
            "id": id,
            "in_reply_to_id": parent,
            "content": format!("<p>{id}</p>")
        })))
    }

    #[test]
    fn test_from_statuses_groups_by_parent() {
        let table = DescendantTable::from_statuses(vec![
            reply("1", None),
            reply("2", Some("1")),
            reply("3", Some("1")),
            reply("4", Some("2")),
        ]);

        assert_eq!(table.len(), 2);
        let ids: Vec<_> = table.descendants("1").iter().filter_map(|s| s.id()).collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert_eq!(table.descendants("4").len(), 0);

        let root = reply("2", Some("1"));
        assert_eq!(table.descendants_of(root.as_ref())[0].id(), Some("4"));
    }

    #[test]
    fn test_set_and_shared_read() {
        let mut table = DescendantTable::new();
        assert!(table.is_empty());
        table.set_descendants("10", vec![reply("11", Some("10"))]);
        table.set_descendants("10", vec![reply("12", Some("10")), reply("13", Some("10"))]);

        let shared = Arc::new(table);
        let reader = Arc::clone(&shared);
        let handle = std::thread::spawn(move || reader.descendants("10").len());
        assert_eq!(handle.join().unwrap(), 2);

        let orphan = UnknownStatus::new(Value::Null);
        assert!(shared.descendants_of(&orphan).is_empty());
    }

    #[test]
    fn test_assemble_mastodon_thread_fills_reply_context() {
        let context = ThreadContext {
            ancestors: vec![
                json!({ "id": "1", "in_reply_to_id": null, "content": "<p>root</p>" }),
                json!({ "id": "2", "in_reply_to_id": "1", "content": "<p>middle</p>" }),
            ],
            descendants: vec![
                json!({ "id": "4", "in_reply_to_id": "3", "content": "<p>child</p>" }),
                json!({ "id": "5", "in_reply_to_id": "4", "content": "<p>grandchild</p>" }),
            ],
        };
        let focal = json!({ "id": "3", "in_reply_to_id": "2", "content": "<p>focal</p>" });

        let thread = assemble(focal, context, Backend::Mastodon);

        assert!(thread.focal.has_parent_available());
        assert_eq!(thread.focal.parent_raw().unwrap()["id"], "2");
        assert_eq!(thread.focal.root_raw().unwrap()["id"], "1");
        assert!(!thread.ancestors[0].has_root_available());

        let replies = thread.focal_replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].id(), Some("4"));
        assert_eq!(thread.replies.descendants("4")[0].id(), Some("5"));
    }

    #[test]
    fn test_assemble_root_focal_thread() {
        let context = ThreadContext {
            ancestors: Vec::new(),
            descendants: vec![
                json!({ "id": "2", "in_reply_to_id": "1", "content": "<p>reply</p>" }),
                json!({ "id": "3", "in_reply_to_id": "2", "content": "<p>nested</p>" }),
            ],
        };
        let focal = json!({ "id": "1", "in_reply_to_id": null, "content": "<p>root</p>" });

        let thread = assemble(focal, context, Backend::Mastodon);

        assert!(!thread.focal.has_root_available());
        assert!(!thread.focal.has_parent_available());

        let reply = &thread.focal_replies()[0];
        assert!(reply.has_parent_available());
        assert!(reply.has_root_available());
        assert_eq!(reply.root_raw().unwrap()["id"], "1");

        let nested = &thread.replies.descendants("2")[0];
        assert_eq!(nested.parent_raw().unwrap()["id"], "2");
        assert_eq!(nested.root_raw().unwrap()["id"], "1");
    }

    #[test]
    fn test_assemble_without_ancestors_keeps_reply_focal_rootless() {
        let context = ThreadContext {
            ancestors: Vec::new(),
            descendants: vec![json!({ "id": "6", "in_reply_to_id": "5", "content": "<p>child</p>" })],
        };
        let focal = json!({ "id": "5", "in_reply_to_id": "4", "content": "<p>focal</p>" });

        let thread = assemble(focal, context, Backend::Mastodon);

        assert!(!thread.focal.has_root_available());
        assert!(!thread.focal_replies()[0].has_root_available());
    }

    #[test]
    fn test_assemble_bluesky_thread_uses_envelopes() {
        let post = |rkey: &str| json!({ "uri": format!("at://did:plc:a/app.bsky.feed.post/{rkey}"), "record": { "text": rkey } });
        let mut reply = post("r1");
        reply["record"]["reply"] = json!({ "parent": { "uri": "at://did:plc:a/app.bsky.feed.post/focal" }, "root": { "uri": "at://did:plc:a/app.bsky.feed.post/focal" } });

        let context = ThreadContext {
            ancestors: Vec::new(),
            descendants: vec![json!({ "post": reply, "reply": { "parent": post("focal"), "root": post("focal") } })],
        };
        let thread = assemble(json!({ "post": post("focal") }), context, Backend::Bluesky);

        let replies = thread.focal_replies();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].has_parent_available());
        assert_eq!(replies[0].content(), Some("r1"));
    }
}
