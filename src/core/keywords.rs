// File: src/core/keywords.rs
use crate::core::dictionary::Dictionary;
use crate::core::types::SymbolId;
use std::collections::{HashMap, HashSet};

/// Uppercased from-word to its rewrite targets. A single from-word may
/// carry several targets ("YOU" maps to both "I" and "ME").
pub type SwapMap = HashMap<Vec<u8>, Vec<Vec<u8>>>;

/// Keywords extracted from one input: primaries in token order, then the
/// auxiliary words, duplicates collapsed. Auxiliaries ride along only when
/// at least one primary survived.
pub struct Keywords {
    ids: Vec<SymbolId>,
}

impl Keywords {
    pub fn none() -> Self {
        Self { ids: Vec::new() }
    }

    pub fn extract(
        tokens: &[Vec<u8>],
        dict: &Dictionary,
        banned: &HashSet<Vec<u8>>,
        aux: &HashSet<Vec<u8>>,
        swaps: &SwapMap,
    ) -> Self {
        let mut primary: Vec<SymbolId> = Vec::new();
        let mut auxiliary: Vec<SymbolId> = Vec::new();

        for token in tokens {
            let candidates = match swaps.get(token.as_slice()) {
                Some(targets) => targets.as_slice(),
                None => std::slice::from_ref(token),
            };
            for candidate in candidates {
                if !candidate.first().is_some_and(|b| b.is_ascii_alphanumeric()) {
                    continue;
                }
                if banned.contains(candidate.as_slice()) {
                    continue;
                }
                let Some(id) = dict.lookup(candidate) else {
                    continue;
                };
                if primary.contains(&id) || auxiliary.contains(&id) {
                    continue;
                }
                if aux.contains(candidate.as_slice()) {
                    auxiliary.push(id);
                } else {
                    primary.push(id);
                }
            }
        }

        let mut ids = primary;
        if !ids.is_empty() {
            ids.extend(auxiliary);
        }
        Self { ids }
    }

    pub fn as_slice(&self) -> &[SymbolId] {
        &self.ids
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokenizer::tokenize;

    fn set(words: &[&str]) -> HashSet<Vec<u8>> {
        words.iter().map(|w| w.as_bytes().to_vec()).collect()
    }

    fn dict_with(words: &[&str]) -> Dictionary {
        let mut dict = Dictionary::new();
        for w in words {
            dict.intern(w.as_bytes()).unwrap();
        }
        dict
    }

    #[test]
    fn unknown_and_separator_tokens_are_rejected() {
        let dict = dict_with(&["CAT"]);
        let keys = Keywords::extract(
            &tokenize("cat and dog."),
            &dict,
            &HashSet::new(),
            &HashSet::new(),
            &SwapMap::new(),
        );
        // Only CAT is interned; separators and unknown words drop out.
        assert_eq!(keys.as_slice(), &[dict.lookup(b"CAT").unwrap()]);
    }

    #[test]
    fn banned_words_are_rejected() {
        let dict = dict_with(&["CAT", "DOG"]);
        let keys = Keywords::extract(
            &tokenize("cat dog"),
            &dict,
            &set(&["CAT"]),
            &HashSet::new(),
            &SwapMap::new(),
        );
        assert_eq!(keys.as_slice(), &[dict.lookup(b"DOG").unwrap()]);
    }

    #[test]
    fn swap_rewrites_apply_to_all_targets() {
        let dict = dict_with(&["I", "ME", "CATS"]);
        let mut swaps = SwapMap::new();
        swaps.insert(b"YOU".to_vec(), vec![b"I".to_vec(), b"ME".to_vec()]);
        let keys = Keywords::extract(
            &tokenize("you like cats"),
            &dict,
            &HashSet::new(),
            &HashSet::new(),
            &swaps,
        );
        assert_eq!(
            keys.as_slice(),
            &[
                dict.lookup(b"I").unwrap(),
                dict.lookup(b"ME").unwrap(),
                dict.lookup(b"CATS").unwrap(),
            ]
        );
    }

    #[test]
    fn aux_words_follow_primaries() {
        let dict = dict_with(&["ME", "CATS"]);
        let keys = Keywords::extract(
            &tokenize("me and my cats"),
            &dict,
            &HashSet::new(),
            &set(&["ME"]),
            &SwapMap::new(),
        );
        // CATS leads even though ME appears first in the input.
        assert_eq!(
            keys.as_slice(),
            &[dict.lookup(b"CATS").unwrap(), dict.lookup(b"ME").unwrap()]
        );
    }

    #[test]
    fn aux_words_alone_yield_nothing() {
        let dict = dict_with(&["ME"]);
        let keys = Keywords::extract(
            &tokenize("me me me"),
            &dict,
            &HashSet::new(),
            &set(&["ME"]),
            &SwapMap::new(),
        );
        assert!(keys.is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let dict = dict_with(&["CAT"]);
        let keys = Keywords::extract(
            &tokenize("cat cat cat"),
            &dict,
            &HashSet::new(),
            &HashSet::new(),
            &SwapMap::new(),
        );
        assert_eq!(keys.len(), 1);
    }
}
