use std::collections::BTreeMap;

use crate::annotate::{AnnotatedPassage, ParagraphState};
use crate::store::keys::{RecordKind, user_key};
use crate::store::kv::{SharedStore, read_json, write_json};

pub type SavedHighlights = BTreeMap<String, Vec<ParagraphState>>;

/// Per-user highlighted paragraph markup, keyed by week and passage.
pub struct HighlightStore {
    store: SharedStore,
    namespace: String,
}

fn slot(week_id: u32, passage: usize) -> String {
    format!("{week_id}:{passage}")
}

impl HighlightStore {
    pub fn new(store: SharedStore, namespace: &str) -> Self {
        Self {
            store,
            namespace: namespace.to_string(),
        }
    }

    fn key(&self, user_id: &str) -> String {
        user_key(&self.namespace, RecordKind::Highlights, user_id)
    }

    fn all(&self, user_id: &str) -> SavedHighlights {
        read_json(self.store.as_ref(), &self.key(user_id))
    }

    pub fn load(&self, user_id: &str, week_id: u32, passage: usize) -> Option<Vec<ParagraphState>> {
        if user_id.is_empty() {
            return None;
        }
        self.all(user_id).remove(&slot(week_id, passage))
    }

    /// Open a passage with whatever highlights were saved for it.
    pub fn open(&self, user_id: &str, week_id: u32, passage: usize, content_html: &str) -> AnnotatedPassage {
        AnnotatedPassage::restore(content_html, self.load(user_id, week_id, passage))
    }

    pub fn save(&self, user_id: &str, week_id: u32, passage: usize, state: &AnnotatedPassage) {
        if user_id.is_empty() {
            return;
        }
        let mut all = self.all(user_id);
        all.insert(slot(week_id, passage), state.paragraphs().to_vec());
        self.write(user_id, &all);
    }

    pub fn clear(&self, user_id: &str, week_id: u32, passage: usize) {
        if user_id.is_empty() {
            return;
        }
        let mut all = self.all(user_id);
        if all.remove(&slot(week_id, passage)).is_some() {
            self.write(user_id, &all);
        }
    }

    fn write(&self, user_id: &str, all: &SavedHighlights) {
        let key = self.key(user_id);
        if let Err(e) = write_json(self.store.as_ref(), &key, all) {
            tracing::warn!(key, error = %e, "failed to persist highlights");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::annotate::{HighlightColor, TextRange};
    use crate::store::kv::{KeyValueStore, MemoryStore};

    const CONTENT: &str = "<p>Alpha beta.</p><p>Gamma delta.</p>";

    #[test]
    fn highlights_survive_a_reload() {
        let kv = Rc::new(MemoryStore::new());
        let store = HighlightStore::new(kv.clone(), "mita");

        let mut passage = store.open("aio", 3, 0, CONTENT);
        let sel = TextRange::new(passage.point_at(1, 0).unwrap(), passage.point_at(1, 5).unwrap());
        assert!(passage.apply_highlight(Some(&sel), HighlightColor::Evidence).is_applied());
        store.save("aio", 3, 0, &passage);
        assert!(kv.get("mita_highlights_aio").is_some());

        let reopened = store.open("aio", 3, 0, CONTENT);
        assert!(reopened.has_highlight(1));
        assert_eq!(reopened.marks()[0].text, "Gamma");

        assert!(!store.open("aio", 3, 1, CONTENT).has_highlight(1));
        assert!(!store.open("jalil", 3, 0, CONTENT).has_highlight(1));
    }

    #[test]
    fn clear_forgets_one_passage() {
        let kv = Rc::new(MemoryStore::new());
        let store = HighlightStore::new(kv, "mita");
        let passage = AnnotatedPassage::new(CONTENT);
        store.save("aio", 1, 0, &passage);
        store.save("aio", 1, 1, &passage);
        store.clear("aio", 1, 0);
        assert!(store.load("aio", 1, 0).is_none());
        assert!(store.load("aio", 1, 1).is_some());
    }

    #[test]
    fn corrupt_record_opens_clean() {
        let kv = Rc::new(MemoryStore::new());
        kv.set("mita_highlights_aio", "{broken").unwrap();
        let store = HighlightStore::new(kv, "mita");
        assert_eq!(store.open("aio", 1, 0, CONTENT).to_html(), CONTENT);
    }
}
