use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::store::kv::KeyValueStore;

/// File-backed key-value store: one `<key>.json` file per key.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("readcoach");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_key(key)))
    }

    /// Clean up `.tmp` files left behind by a write that never reached its
    /// rename. Returns how many were removed.
    pub fn sweep_stale_temp_files(&self) -> usize {
        let Ok(entries) = fs::read_dir(&self.base_dir) else {
            return 0;
        };
        let mut removed = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().and_then(|x| x.to_str()) == Some("tmp")
                && fs::remove_file(&path).is_ok()
            {
                removed += 1;
            }
        }
        removed
    }
}

impl KeyValueStore for JsonStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.file_path(key);
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read stored value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.file_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Reversible key-to-filename mapping: ASCII alphanumerics, `-` and `.` pass
/// through, every other byte (including `_`) becomes `_xx` hex.
fn sanitize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("_{byte:02x}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_set_then_get_round_trips_value() {
        let (_dir, store) = make_test_store();
        store.set("mita_progress_aio", "[1,2]").unwrap();
        assert_eq!(store.get("mita_progress_aio").as_deref(), Some("[1,2]"));
        assert!(store.file_path("mita_progress_aio").exists());
    }

    #[test]
    fn test_missing_key_is_none() {
        let (_dir, store) = make_test_store();
        assert!(store.get("nothing_here").is_none());
    }

    #[test]
    fn test_remove_deletes_file_and_is_idempotent() {
        let (_dir, store) = make_test_store();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
        store.remove("k").unwrap();
    }

    #[test]
    fn test_write_leaves_no_tmp_files() {
        let (dir, store) = make_test_store();
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
        assert_eq!(store.get("a").as_deref(), Some("2"));
    }

    #[test]
    fn test_sweep_stale_temp_files() {
        let (dir, store) = make_test_store();
        fs::write(dir.path().join("half_written.tmp"), "{").unwrap();
        assert_eq!(store.sweep_stale_temp_files(), 1);
        assert_eq!(store.sweep_stale_temp_files(), 0);
    }

    #[test]
    fn test_keys_with_path_characters_stay_inside_base_dir() {
        let (dir, store) = make_test_store();
        store.set("../escape/attempt", "x").unwrap();
        assert!(store.file_path("../escape/attempt").starts_with(dir.path()));
        assert_eq!(store.get("../escape/attempt").as_deref(), Some("x"));
    }

    #[test]
    fn test_keys_differing_only_in_escaped_chars_stay_apart() {
        let (_dir, store) = make_test_store();
        store.set("mita_progress_mary ann", "[7]").unwrap();
        store.set("mita_progress_mary_ann", "[]").unwrap();
        store.set("mita_progress_mary/ann", "[2]").unwrap();
        assert_eq!(store.get("mita_progress_mary ann").as_deref(), Some("[7]"));
        assert_eq!(store.get("mita_progress_mary_ann").as_deref(), Some("[]"));
        assert_eq!(store.get("mita_progress_mary/ann").as_deref(), Some("[2]"));
        assert_ne!(
            store.file_path("mita_progress_mary ann"),
            store.file_path("mita_progress_mary_ann")
        );
    }

    #[test]
    fn test_sanitize_key_escapes_underscore_and_non_ascii() {
        assert_eq!(sanitize_key("a_b"), "a_5fb");
        assert_eq!(sanitize_key("a b"), "a_20b");
        assert_eq!(sanitize_key("zoë"), "zo_c3_ab");
        assert_eq!(sanitize_key("week-1.v2"), "week-1.v2");
    }
}
