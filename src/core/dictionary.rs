// File: src/core/dictionary.rs
use crate::core::types::SymbolId;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Longest word the dictionary will store. Longer input is truncated.
pub const MAX_WORD_LEN: usize = 255;

/// The symbol table: the only authoritative mapping between words and the
/// 16-bit IDs the tries store. IDs follow insertion order; 0 and 1 are the
/// reserved sentinels. Words are kept uppercased, so lookups are
/// case-insensitive.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dictionary {
    /// Word bytes indexed by symbol ID.
    words: Vec<Vec<u8>>,
    /// Symbol IDs ordered by word bytes, for O(log n) lookup.
    by_word: Vec<SymbolId>,
}

impl Dictionary {
    pub fn new() -> Self {
        let mut dict = Self {
            words: Vec::new(),
            by_word: Vec::new(),
        };
        dict.push_word(b"<ERROR>".to_vec());
        dict.push_word(b"<FIN>".to_vec());
        dict
    }

    /// Rebuilds a dictionary from words in insertion order, sentinels
    /// included. Used when importing a brain file.
    pub(crate) fn from_words(words: Vec<Vec<u8>>) -> Self {
        let mut dict = Self {
            words: Vec::new(),
            by_word: Vec::new(),
        };
        for word in words {
            dict.push_word(word);
        }
        dict
    }

    /// Returns the existing ID for `word` or assigns the next one.
    /// Fails only once all 2^16 IDs are taken.
    pub fn intern(&mut self, word: &[u8]) -> Result<SymbolId, EngineError> {
        let word = normalize(word);
        if let Some(id) = self.find(&word) {
            return Ok(id);
        }
        if self.words.len() > SymbolId::MAX as usize {
            return Err(EngineError::SymbolSpaceExhausted(self.words.len()));
        }
        Ok(self.push_word(word))
    }

    /// Looks up `word` without assigning an ID.
    pub fn lookup(&self, word: &[u8]) -> Option<SymbolId> {
        self.find(&normalize(word))
    }

    /// The word bytes behind an ID. IDs come from `intern`/`lookup`, so an
    /// out-of-range ID is a caller bug.
    pub fn word_of(&self, id: SymbolId) -> &[u8] {
        &self.words[id as usize]
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn find(&self, word: &[u8]) -> Option<SymbolId> {
        self.by_word
            .binary_search_by(|&id| self.words[id as usize].as_slice().cmp(word))
            .ok()
            .map(|pos| self.by_word[pos])
    }

    fn push_word(&mut self, word: Vec<u8>) -> SymbolId {
        let id = self.words.len() as SymbolId;
        let pos = self
            .by_word
            .partition_point(|&w| self.words[w as usize].as_slice() < word.as_slice());
        self.words.push(word);
        self.by_word.insert(pos, id);
        id
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(word: &[u8]) -> Vec<u8> {
    word.iter()
        .take(MAX_WORD_LEN)
        .map(u8::to_ascii_uppercase)
        .collect()
}
