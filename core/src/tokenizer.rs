use crate::error::{Result, SearchError};
use std::collections::HashSet;

/// Split text into words on runs of the ASCII space. Other ASCII whitespace is
/// a control character and fails validation; Unicode separators such as
/// U+3000 stay inside the word. The iterator is lazy and can be cloned to
/// restart it.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> + Clone + '_ {
    text.split(' ').filter(|w| !w.is_empty())
}

/// A word is valid when it holds no character below 0x20.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| c < ' ')
}

/// `-` alone or a `--` prefix.
pub fn is_malformed_minus(word: &str) -> bool {
    word == "-" || word.starts_with("--")
}

/// Immutable set of words dropped from documents and queries.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidContent(word.to_string()));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words of `text` that are not stop words, each validated.
    pub fn split_no_stop<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if self.contains(word) {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidContent(word.to_string()));
            }
            words.push(word);
        }
        Ok(words)
    }
}

/// Query split into required and excluded words, borrowing from the raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery<'a> {
    pub plus_words: Vec<&'a str>,
    pub minus_words: Vec<&'a str>,
}

/// Parse a raw query. Stop words are dropped as raw tokens, before the minus
/// sign is interpreted. Minus words are always sorted and deduplicated; plus
/// words only when `dedupe_plus` is set.
pub fn parse_query<'a>(text: &'a str, stop_words: &StopWords, dedupe_plus: bool) -> Result<ParsedQuery<'a>> {
    let mut query = ParsedQuery::default();
    for word in split_into_words(text) {
        if stop_words.contains(word) {
            continue;
        }
        if is_malformed_minus(word) {
            return Err(SearchError::MalformedMinus(word.to_string()));
        }
        if !is_valid_word(word) {
            return Err(SearchError::InvalidContent(word.to_string()));
        }
        match word.strip_prefix('-') {
            Some(minus) => query.minus_words.push(minus),
            None => query.plus_words.push(word),
        }
    }
    query.minus_words.sort_unstable();
    query.minus_words.dedup();
    if dedupe_plus {
        query.plus_words.sort_unstable();
        query.plus_words.dedup();
    }
    Ok(query)
}
