use rand::Rng;
use rand::seq::SliceRandom;

use crate::curriculum::model::{VocabItem, Week};

/// Week vocabulary is topped up with the curated list below the size.
pub const MIN_POOL_SIZE: usize = 50;

const CURATED: &[(&str, &str, u32)] = &[
    ("Utilitarianism", "A philosophy maximizing overall happiness.", 1),
    ("Deontological", "Ethical theory based on duty and rules.", 1),
    ("Inherently", "Fundamentally; by nature.", 1),
    ("Algorithmic Bias", "Systematic and repeatable errors in a computer system.", 1),
    ("Autonomy", "The right or condition of self-government.", 2),
    (
        "Echo Chamber",
        "An environment where a person only encounters information or opinions that reflect and reinforce their own.",
        3,
    ),
    (
        "Confirmation Bias",
        "The tendency to interpret new evidence as confirmation of one's existing beliefs.",
        3,
    ),
    ("Ubiquitous", "Present, appearing, or found everywhere.", 4),
    ("Ephemeral", "Lasting for a very short time.", 5),
    ("Nuanced", "Characterized by subtle shades of meaning or expression.", 6),
    ("Paradigm", "A typical example or pattern of something; a model.", 7),
    (
        "Dichotomy",
        "A division or contrast between two things that are or are represented as being opposed or entirely different.",
        8,
    ),
    (
        "Egalitarian",
        "Believing in the principle that all people are equal and deserve equal rights and opportunities.",
        9,
    ),
    (
        "Cognitive Dissonance",
        "The state of having inconsistent thoughts, beliefs, or attitudes.",
        10,
    ),
    (
        "Meritocracy",
        "Government or the holding of power by people selected on the basis of their ability.",
        40,
    ),
    (
        "Immersive",
        "Generating a three-dimensional image which appears to surround the user.",
        40,
    ),
    (
        "Supply Chain",
        "The sequence of processes involved in the production and distribution of a commodity.",
        39,
    ),
    (
        "Greenwashing",
        "Disinformation disseminated by an organization so as to present an environmentally responsible public image.",
        39,
    ),
];

pub fn curated_vocabulary() -> Vec<VocabItem> {
    CURATED
        .iter()
        .map(|&(word, definition, week_id)| VocabItem::new(word, definition, week_id))
        .collect()
}

/// Every week's vocabulary, stamped with its week id, plus the curated list
/// when the weeks alone give fewer than `MIN_POOL_SIZE` entries.
pub fn all_vocabulary(weeks: &[Week]) -> Vec<VocabItem> {
    let mut pool: Vec<VocabItem> = weeks
        .iter()
        .flat_map(|week| {
            week.vocabulary.iter().map(move |v| VocabItem {
                week_id: week.id,
                ..v.clone()
            })
        })
        .collect();
    if pool.len() < MIN_POOL_SIZE {
        pool.extend(curated_vocabulary());
    }
    pool
}

/// Every week's own vocabulary ordered by week, without the curated top-up.
pub fn repository(weeks: &[Week]) -> Vec<VocabItem> {
    let mut items: Vec<VocabItem> = weeks
        .iter()
        .flat_map(|week| {
            week.vocabulary.iter().map(move |v| VocabItem {
                week_id: week.id,
                ..v.clone()
            })
        })
        .collect();
    items.sort_by_key(|v| v.week_id);
    items
}

/// Case-insensitive substring filter over the word, the definition and the
/// `week N` label. A blank query keeps everything.
pub fn search<'a>(pool: &'a [VocabItem], query: &str) -> Vec<&'a VocabItem> {
    let query = query.trim().to_lowercase();
    pool.iter()
        .filter(|v| {
            v.word.to_lowercase().contains(&query)
                || v.definition.to_lowercase().contains(&query)
                || format!("week {}", v.week_id).contains(&query)
        })
        .collect()
}

/// Offline definition for a word, matched case-insensitively.
pub fn offline_definition<'a>(pool: &'a [VocabItem], word: &str) -> Option<&'a str> {
    let word = word.trim();
    pool.iter()
        .find(|v| v.word.eq_ignore_ascii_case(word))
        .map(|v| v.definition.as_str())
}

/// Up to `count` wrong definitions. Entries whose definition equals the
/// correct one by value are excluded and duplicate definitions collapse.
pub fn distractors<R: Rng + ?Sized>(
    correct_definition: &str,
    pool: &[VocabItem],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut candidates: Vec<&str> = Vec::new();
    for item in pool {
        let def = item.definition.as_str();
        if def != correct_definition && !candidates.contains(&def) {
            candidates.push(def);
        }
    }
    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates.into_iter().map(str::to_string).collect()
}
