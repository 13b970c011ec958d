//! Word definitions for the passage reader: curated offline entries first,
//! then cached or fetched dictionary responses.

pub mod cache;

use serde::Deserialize;

use crate::curriculum::VocabItem;
use crate::curriculum::vocab::offline_definition;

use self::cache::{DiskCache, fetch_url};

const API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";
const MAX_MEANINGS: usize = 2;
const OFFLINE_PART_OF_SPEECH: &str = "Curated Vocabulary";
const STRIPPED: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~', '(', ')',
];

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: String,
    pub definitions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub word: String,
    pub phonetic: Option<String>,
    pub meanings: Vec<Meaning>,
    /// True when the entry came from the curated vocabulary.
    pub offline: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupResult {
    Found(Definition),
    NotFound,
}

pub trait DictionaryLookup {
    fn lookup(&self, word: &str) -> LookupResult;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEntry {
    word: String,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
}

#[derive(Deserialize)]
struct ApiDefinition {
    definition: String,
}

/// Drop the punctuation a click on a word tends to carry along.
pub fn clean_word(word: &str) -> String {
    word.trim().chars().filter(|c| !STRIPPED.contains(c)).collect()
}

/// First entry of a dictionary API response, keeping at most two meanings.
pub fn parse_response(body: &str) -> Option<Definition> {
    let entries: Vec<ApiEntry> = serde_json::from_str(body).ok()?;
    let entry = entries.into_iter().next()?;
    let meanings: Vec<Meaning> = entry
        .meanings
        .into_iter()
        .take(MAX_MEANINGS)
        .map(|m| Meaning {
            part_of_speech: m.part_of_speech,
            definitions: m.definitions.into_iter().map(|d| d.definition).collect(),
        })
        .collect();
    if meanings.is_empty() {
        return None;
    }
    Some(Definition {
        word: entry.word,
        phonetic: entry.phonetic,
        meanings,
        offline: false,
    })
}

pub struct Dictionary {
    offline: Vec<VocabItem>,
    cache: Option<DiskCache>,
    remote: bool,
}

impl Dictionary {
    pub fn new(offline: Vec<VocabItem>, remote: bool) -> Self {
        Self {
            offline,
            cache: DiskCache::new("definitions"),
            remote,
        }
    }

    pub fn with_cache(mut self, cache: Option<DiskCache>) -> Self {
        self.cache = cache;
        self
    }

    fn offline_entry(&self, word: &str) -> Option<Definition> {
        let definition = offline_definition(&self.offline, word)?;
        Some(Definition {
            word: word.trim().to_string(),
            phonetic: None,
            meanings: vec![Meaning {
                part_of_speech: OFFLINE_PART_OF_SPEECH.to_string(),
                definitions: vec![definition.to_string()],
            }],
            offline: true,
        })
    }

    fn cached_or_fetched(&self, clean: &str) -> Option<Definition> {
        if let Some(body) = self.cache.as_ref().and_then(|c| c.get(clean))
            && let Some(def) = parse_response(&body)
        {
            return Some(def);
        }
        if !self.remote {
            return None;
        }
        let body = fetch_url(&format!("{API_URL}{clean}"))?;
        let def = parse_response(&body)?;
        if let Some(cache) = &self.cache {
            cache.put(clean, &body);
        }
        Some(def)
    }
}

impl DictionaryLookup for Dictionary {
    fn lookup(&self, word: &str) -> LookupResult {
        if let Some(def) = self.offline_entry(word) {
            return LookupResult::Found(def);
        }
        let clean = clean_word(word);
        if clean.is_empty() {
            return LookupResult::NotFound;
        }
        match self.cached_or_fetched(&clean) {
            Some(def) => LookupResult::Found(def),
            None => {
                tracing::debug!(word = %clean, "no definition found");
                LookupResult::NotFound
            }
        }
    }
}
