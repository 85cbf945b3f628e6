// File: src/core/engine.rs
use crate::core::dictionary::Dictionary;
use crate::core::keywords::{Keywords, SwapMap};
use crate::core::reply;
use crate::core::tokenizer::tokenize;
use crate::core::trie::Model;
use crate::core::types::{LearnStats, SymbolId, DEFAULT_ORDER, SYMBOL_ERROR};
use crate::error::EngineError;
use crate::learning;
use crate::persistence::{load_from_disk, save_to_disk};
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Given when the model has nothing usable to say.
pub const FALLBACK_REPLY: &str = "I don't know enough to answer you yet!";

/// Everything a collaborator supplies at initialization. All lists are
/// optional; entries are uppercased on intake.
pub struct EngineConfig {
    pub order: usize,
    pub banned: HashSet<Vec<u8>>,
    pub aux: HashSet<Vec<u8>>,
    pub swaps: SwapMap,
    pub greetings: Vec<Vec<u8>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            banned: HashSet::new(),
            aux: HashSet::new(),
            swaps: SwapMap::new(),
            greetings: Vec::new(),
        }
    }
}

/// The conversational engine: the dual-trie model, its dictionary, and the
/// support word lists. Single writer; replies never mutate the model.
#[derive(Debug)]
pub struct Engine {
    pub(crate) model: Model,
    pub(crate) dictionary: Dictionary,
    pub(crate) banned: HashSet<Vec<u8>>,
    pub(crate) aux: HashSet<Vec<u8>>,
    pub(crate) swaps: SwapMap,
    pub(crate) greetings: Vec<Vec<u8>>,
    brain_path: Option<String>,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            model: Model::new(config.order),
            dictionary: Dictionary::new(),
            banned: upper_set(config.banned),
            aux: upper_set(config.aux),
            swaps: upper_swaps(config.swaps),
            greetings: config.greetings.iter().map(|w| upper(w)).collect(),
            brain_path: None,
        }
    }

    /// Loads a saved brain from `path`, or starts fresh if none loads.
    /// Either way the engine remembers the path for `save_brain`.
    pub fn from_file_or_new(path: &str) -> Self {
        let mut engine = load_from_disk(Path::new(path)).unwrap_or_else(|_| Self::new());
        engine.brain_path = Some(path.to_string());
        engine
    }

    pub fn save_brain(&self) -> Result<(), EngineError> {
        if let Some(path) = &self.brain_path {
            save_to_disk(self, Path::new(path))
        } else {
            Ok(())
        }
    }

    pub fn order(&self) -> usize {
        self.model.order()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Trains on a text blob, one line at a time. Blank and "#"-prefixed
    /// lines count as processed but teach nothing, as do lines too short
    /// to form a full context.
    pub fn learn(&mut self, text: &str) -> Result<LearnStats, EngineError> {
        let mut stats = LearnStats::default();
        for line in text.lines() {
            let line = line.trim();
            stats.lines_processed += 1;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens = tokenize(line);
            let learned = learning::learn_line(&mut self.model, &mut self.dictionary, &tokens)?;
            if learned > 0 {
                stats.lines_learned += 1;
                stats.tokens_learned += learned;
            }
        }
        debug!(
            lines = stats.lines_learned,
            tokens = stats.tokens_learned,
            nodes = self.model.node_count(),
            "learned input"
        );
        Ok(stats)
    }

    /// Runs one conversational turn without learning. Always yields a
    /// string; an unusable model falls back to a canned answer.
    pub fn reply(&self, text: &str, num_candidates: usize) -> String {
        self.reply_with(&mut rand::thread_rng(), text, num_candidates)
    }

    /// `reply` against a caller-supplied randomness stream.
    pub fn reply_with<R: Rng>(&self, rng: &mut R, text: &str, num_candidates: usize) -> String {
        let tokens = tokenize(text);
        // Unknown input tokens map to <ERROR>, which no generated reply
        // can contain, so they never defeat the echo check.
        let input_symbols: Vec<SymbolId> = tokens
            .iter()
            .map(|t| self.dictionary.lookup(t).unwrap_or(SYMBOL_ERROR))
            .collect();
        let keywords = Keywords::extract(
            &tokens,
            &self.dictionary,
            &self.banned,
            &self.aux,
            &self.swaps,
        );
        debug!(keywords = keywords.len(), "extracted keywords");

        let mut best_score = f64::NEG_INFINITY;
        let mut best: Option<Vec<SymbolId>> = None;

        // One unbiased candidate anchors the field at score zero.
        let baseline = reply::generate(&self.model, &self.dictionary, &Keywords::none(), &self.aux, rng);
        if baseline.len() > 1 && baseline != input_symbols {
            best_score = 0.0;
            best = Some(baseline);
        }

        for _ in 0..num_candidates {
            let candidate =
                reply::generate(&self.model, &self.dictionary, &keywords, &self.aux, rng);
            if candidate.len() <= 1 || candidate == input_symbols {
                continue;
            }
            let score = reply::evaluate(&self.model, &keywords, &candidate);
            if score > best_score {
                best_score = score;
                best = Some(candidate);
            }
        }

        match best {
            Some(symbols) => {
                debug!(score = best_score, length = symbols.len(), "selected reply");
                reply::format_output(&self.dictionary, &symbols)
            }
            None => FALLBACK_REPLY.to_string(),
        }
    }

    /// Opens a conversation from a random greeting word.
    pub fn greet(&self, num_candidates: usize) -> String {
        self.greet_with(&mut rand::thread_rng(), num_candidates)
    }

    pub fn greet_with<R: Rng>(&self, rng: &mut R, num_candidates: usize) -> String {
        if self.greetings.is_empty() {
            return self.reply_with(rng, "", num_candidates);
        }
        let word = &self.greetings[rng.gen_range(0..self.greetings.len())];
        let text = String::from_utf8_lossy(word).into_owned();
        self.reply_with(rng, &text, num_candidates)
    }

    /// Learns from the input, then replies to it.
    pub fn converse(&mut self, text: &str, num_candidates: usize) -> Result<String, EngineError> {
        self.converse_with(&mut rand::thread_rng(), text, num_candidates)
    }

    pub fn converse_with<R: Rng>(
        &mut self,
        rng: &mut R,
        text: &str,
        num_candidates: usize,
    ) -> Result<String, EngineError> {
        self.learn(text)?;
        Ok(self.reply_with(rng, text, num_candidates))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn upper(word: &[u8]) -> Vec<u8> {
    word.iter().map(u8::to_ascii_uppercase).collect()
}

fn upper_set(set: HashSet<Vec<u8>>) -> HashSet<Vec<u8>> {
    set.iter().map(|w| upper(w)).collect()
}

fn upper_swaps(swaps: SwapMap) -> SwapMap {
    swaps
        .into_iter()
        .map(|(from, tos)| (upper(&from), tos.iter().map(|t| upper(t)).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn learn_reports_processed_and_learned_lines() {
        let mut engine = Engine::new();
        let text = "# a comment\nThe cat sat on the mat.\n\nhi\nDogs are wonderful pets.";
        let stats = engine.learn(text).unwrap();
        assert_eq!(stats.lines_processed, 5);
        assert_eq!(stats.lines_learned, 2);
        assert!(stats.tokens_learned >= 20);
    }

    #[test]
    fn short_input_leaves_the_dictionary_alone() {
        let mut engine = Engine::new();
        engine
            .learn("The quick brown fox jumps over the lazy dog.")
            .unwrap();
        let before = engine.dictionary().len();
        let stats = engine.learn("THE").unwrap();
        assert_eq!(stats.lines_learned, 0);
        assert_eq!(stats.lines_processed, 1);
        assert_eq!(engine.dictionary().len(), before);
    }

    #[test]
    fn reply_on_a_fresh_model_is_the_fallback() {
        let engine = Engine::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(engine.reply_with(&mut rng, "hello", 1), FALLBACK_REPLY);
    }

    #[test]
    fn reply_is_not_an_echo() {
        let mut engine = Engine::new();
        engine
            .learn("The quick brown fox jumps over the lazy dog.")
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let reply = engine.reply_with(&mut rng, "fox", 5);
        assert!(!reply.is_empty());
        assert_ne!(reply.to_uppercase(), "FOX.");
    }

    #[test]
    fn config_lists_are_uppercased_on_intake() {
        let mut config = EngineConfig::default();
        config.banned.insert(b"the".to_vec());
        config.greetings.push(b"hello".to_vec());
        let engine = Engine::with_config(config);
        assert!(engine.banned.contains(&b"THE".to_vec()));
        assert_eq!(engine.greetings, vec![b"HELLO".to_vec()]);
    }
}
