//! Vocabulary filter - whole-word redaction of disallowed terms.
//!
//! Terms are compiled to case-insensitive word-boundary patterns once at
//! load time. Redaction keeps the first character of each match and masks
//! the rest, so output length (in characters) always equals input length.

use anyhow::{Context, Result, bail};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

/// Compiled vocabulary applied to both prompts and answers.
#[derive(Debug)]
pub struct VocabularyFilter {
    rules: Vec<Regex>,
}

impl VocabularyFilter {
    /// Load a vocabulary from a JSON array of terms.
    ///
    /// Any failure here is a startup failure: the service must not run
    /// without its filter.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file: {}", path.display()))?;
        let terms: Vec<String> = serde_json::from_str(&data)
            .with_context(|| format!("Invalid vocabulary file: {}", path.display()))?;
        Self::from_terms(terms)
    }

    /// Compile a filter from raw terms, preserving their order.
    ///
    /// Terms are trimmed, lowercased, and deduplicated. Regex metacharacters
    /// inside a term are escaped so every term matches literally.
    pub fn from_terms<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();

        for term in terms {
            let normalized = term.as_ref().trim().to_lowercase();
            if normalized.is_empty() {
                bail!("Vocabulary terms must not be empty");
            }
            if !seen.insert(normalized.clone()) {
                continue;
            }

            let pattern = format!(r"(?i)\b{}\b", regex::escape(&normalized));
            let rule = Regex::new(&pattern)
                .with_context(|| format!("Invalid vocabulary term: {normalized}"))?;
            rules.push(rule);
        }

        Ok(Self { rules })
    }

    /// Number of compiled terms.
    pub fn term_count(&self) -> usize {
        self.rules.len()
    }

    /// Redact every whole-word occurrence of every term.
    ///
    /// Terms are applied in load order, one pass over the text each. Text
    /// without matches is returned unchanged.
    pub fn redact(&self, text: &str) -> String {
        let mut redacted = Cow::Borrowed(text);
        for rule in &self.rules {
            let pass = rule.replace_all(&redacted, |caps: &regex::Captures| mask_word(&caps[0]));
            if let Cow::Owned(changed) = pass {
                redacted = Cow::Owned(changed);
            }
        }
        redacted.into_owned()
    }
}

/// Keep the first character, mask the rest. Single-character matches come
/// back unchanged.
fn mask_word(occurrence: &str) -> String {
    let mut chars = occurrence.chars();
    match chars.next() {
        Some(first) => {
            let mut masked = String::with_capacity(occurrence.len());
            masked.push(first);
            for _ in chars {
                masked.push('*');
            }
            masked
        }
        None => String::new(),
    }
}
