//! Feature name synthesis.
//!
//! Turns a free-text description into a short slug and keeps assembled
//! branch names under the ref-name byte ceiling git hosts enforce.

use std::collections::HashSet;

/// Longest branch name, in UTF-8 bytes, that is accepted unchanged.
pub const MAX_BRANCH_BYTES: usize = 244;

/// Words that never carry meaning in a feature name.
pub const STOP_WORDS: &[&str] = &[
    "i", "a", "an", "the", "to", "for", "of", "in", "on", "at", "by", "with", "from", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "should", "could", "can", "may", "might", "must", "shall", "this", "that", "these",
    "those", "my", "your", "our", "their", "want", "need", "add", "get", "set",
];

const MIN_WORD_LEN: usize = 3;
const ACRONYM_MAX_LEN: usize = 3;

// ---------------------------------------------------------------------------
// NamingRules
// ---------------------------------------------------------------------------

/// Immutable inputs to name synthesis.
#[derive(Debug, Clone)]
pub struct NamingRules {
    pub stop_words: HashSet<&'static str>,
    pub max_branch_bytes: usize,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            max_branch_bytes: MAX_BRANCH_BYTES,
        }
    }
}

// ---------------------------------------------------------------------------
// NameSynthesizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct NameSynthesizer {
    rules: NamingRules,
}

impl NameSynthesizer {
    pub fn new(rules: NamingRules) -> Self {
        Self { rules }
    }

    /// Derive a slug from a description.
    ///
    /// Keeps the first three meaningful words (all four when exactly four
    /// remain). Falls back to [`clean_branch_name`] cut to three segments
    /// when nothing meaningful survives, which can still be empty for input
    /// with no ASCII letters or digits at all.
    pub fn generate(&self, description: &str) -> String {
        let meaningful: Vec<String> = tokens(description)
            .filter(|token| self.is_meaningful(token))
            .map(|token| token.to_ascii_lowercase())
            .collect();

        if meaningful.is_empty() {
            let cleaned = clean_branch_name(description);
            return cleaned.split('-').take(3).collect::<Vec<_>>().join("-");
        }

        let take = if meaningful.len() == 4 { 4 } else { 3 };
        meaningful
            .into_iter()
            .take(take)
            .collect::<Vec<_>>()
            .join("-")
    }

    fn is_meaningful(&self, token: &str) -> bool {
        let word = token.to_ascii_lowercase();
        if self.rules.stop_words.contains(word.as_str()) {
            return false;
        }
        word.len() >= MIN_WORD_LEN || is_acronym(token)
    }

    /// Cut `branch_name` so it fits the byte ceiling.
    ///
    /// The `NNN-` prefix is preserved and the remainder is cut on a character
    /// boundary, so the result never exceeds the ceiling even for multi-byte
    /// text. Names that already fit come back untouched, which also makes the
    /// operation idempotent.
    pub fn truncate_for_byte_limit(&self, branch_name: &str) -> String {
        let limit = self.rules.max_branch_bytes;
        if branch_name.len() <= limit {
            return branch_name.to_string();
        }

        let (prefix, suffix) = match branch_name.find('-') {
            Some(i) if i + 1 < limit => branch_name.split_at(i + 1),
            _ => ("000-", branch_name),
        };
        let budget = limit.saturating_sub(prefix.len());
        let truncated = format!(
            "{prefix}{}",
            floor_to_char_boundary(suffix, budget).trim_end_matches('-')
        );

        tracing::warn!(
            original_bytes = branch_name.len(),
            truncated_bytes = truncated.len(),
            "branch name exceeded {limit} bytes and was truncated to '{truncated}'"
        );
        truncated
    }
}

/// Lowercase `name`, turn every character outside `[a-z0-9]` into a hyphen,
/// collapse hyphen runs and trim hyphens from both ends.
pub fn clean_branch_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Split on runs of anything that is not an ASCII letter or digit, keeping
/// the original case so acronyms can still be recognised.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
}

/// Short all-caps tokens such as `UI` or `DB`. Bare digits like `42` do not count.
fn is_acronym(token: &str) -> bool {
    token.len() <= ACRONYM_MAX_LEN
        && token.chars().any(|c| c.is_ascii_alphabetic())
        && !token.chars().any(|c| c.is_ascii_lowercase())
}

fn floor_to_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
