// File: src/wordlist.rs
//
// Parsers for the support word-list formats. Each list arrives as a text
// blob: one entry per line, blank lines and "#" comments skipped, with
// swap files carrying whitespace-separated from/to pairs. Output is
// uppercased byte-strings ready for `EngineConfig`.
use crate::core::keywords::SwapMap;
use std::collections::HashSet;

pub fn parse_words(text: &str) -> HashSet<Vec<u8>> {
    entries(text).map(|line| upper(line)).collect()
}

pub fn parse_greetings(text: &str) -> Vec<Vec<u8>> {
    entries(text).map(|line| upper(line)).collect()
}

pub fn parse_swaps(text: &str) -> SwapMap {
    let mut swaps = SwapMap::new();
    for line in entries(text) {
        let mut fields = line.split_whitespace();
        if let (Some(from), Some(to)) = (fields.next(), fields.next()) {
            swaps
                .entry(upper(from))
                .or_default()
                .push(upper(to));
        }
    }
    swaps
}

fn entries(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn upper(word: &str) -> Vec<u8> {
    word.bytes().map(|b| b.to_ascii_uppercase()).collect()
}
