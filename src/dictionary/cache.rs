use std::fs;
use std::path::{Path, PathBuf};

/// Flat directory of cached lookup responses, one file per key.
pub struct DiskCache {
    base_dir: PathBuf,
}

impl DiskCache {
    pub fn new(subdir: &str) -> Option<Self> {
        Self::at(dirs::data_dir()?.join("readcoach").join(subdir))
    }

    pub fn at(base: impl AsRef<Path>) -> Option<Self> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base).ok()?;
        Some(Self { base_dir: base })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    pub fn put(&self, key: &str, content: &str) -> bool {
        match fs::write(self.path_for(key), content) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to write dictionary cache");
                false
            }
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_key(key)))
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(feature = "network")]
pub fn fetch_url(url: &str) -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .ok()?;
    let response = client.get(url).send().ok()?;
    if response.status().is_success() {
        response.text().ok()
    } else {
        tracing::debug!(url, status = %response.status(), "dictionary request failed");
        None
    }
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(_url: &str) -> Option<String> {
    None
}
