// src/services/sanitizer.rs
use regex::{NoExpand, Regex, RegexBuilder};

/// Case-insensitive scrubbing of provider and model names from replies.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    pattern: Option<Regex>,
    placeholder: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SanitizerError {
    #[error("invalid sanitize pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("placeholder {0:?} contains a sanitized name")]
    PlaceholderMatches(String),

    #[error("placeholder {placeholder:?} can join with surrounding text to form {pattern:?}")]
    PlaceholderOverlaps { placeholder: String, pattern: String },
}

impl Sanitizer {
    pub fn new<I, S>(patterns: I, placeholder: impl Into<String>) -> Result<Self, SanitizerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let placeholder = placeholder.into();
        let mut words: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if words.is_empty() {
            return Ok(Self::disabled());
        }

        // Longest first so "chatgpt" wins over a shorter overlapping name.
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        words.dedup();
        let alternation = words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
        let pattern = RegexBuilder::new(&alternation).case_insensitive(true).build()?;

        if pattern.is_match(&placeholder) {
            return Err(SanitizerError::PlaceholderMatches(placeholder));
        }
        if let Some(word) = words.iter().find(|w| overlaps_edges(w, &placeholder)) {
            return Err(SanitizerError::PlaceholderOverlaps {
                pattern: word.clone(),
                placeholder,
            });
        }

        Ok(Self {
            pattern: Some(pattern),
            placeholder,
        })
    }

    pub fn disabled() -> Self {
        Self {
            pattern: None,
            placeholder: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn apply(&self, text: &str) -> String {
        match &self.pattern {
            Some(re) => re.replace_all(text, NoExpand(self.placeholder.as_str())).into_owned(),
            None => text.to_string(),
        }
    }
}

/// True when an inserted placeholder could complete `word` together with the
/// text around it: the word contains the placeholder, or a proper prefix of
/// the word ends the placeholder, or a proper suffix of the word starts it.
fn overlaps_edges(word: &str, placeholder: &str) -> bool {
    let word = word.to_lowercase();
    let placeholder = placeholder.to_lowercase();
    if placeholder.is_empty() {
        return false;
    }
    if word.contains(&placeholder) {
        return true;
    }
    word.char_indices().skip(1).any(|(i, _)| {
        placeholder.ends_with(&word[..i]) || placeholder.starts_with(&word[i..])
    })
}
