// src/core/types.rs
use serde::{Deserialize, Serialize};

/// A unique identifier for an interned word.
/// The dictionary caps out at 2^16 entries, so a u16 covers the ID space.
pub type SymbolId = u16;

/// Reserved symbol returned for unknown-word lookups. Never part of a
/// learned trie path and treated as a stop by generation.
pub const SYMBOL_ERROR: SymbolId = 0;

/// Reserved sentence terminator. Appended to every learned line and
/// recognized as a stop by generation.
pub const SYMBOL_FIN: SymbolId = 1;

/// Default Markov depth: predictions condition on up to this many prior
/// symbols.
pub const DEFAULT_ORDER: usize = 5;

/// Upper bound on babble steps per direction when growing a reply.
pub const MAX_REPLY_STEPS: usize = 200;

/// Summary of one learning call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnStats {
    /// Tokens fed into the tries, separators included.
    pub tokens_learned: usize,
    /// Lines that actually extended the model.
    pub lines_learned: usize,
    /// All lines seen, including blanks, comments, and too-short input.
    pub lines_processed: usize,
}
