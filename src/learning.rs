// File: src/learning.rs
use crate::core::context::Context;
use crate::core::dictionary::Dictionary;
use crate::core::trie::{Model, BACKWARD_ROOT, FORWARD_ROOT};
use crate::core::types::{SymbolId, SYMBOL_FIN};
use crate::error::EngineError;

/// Feeds one tokenized line into both tries, extending every n-gram path
/// up to depth order + 1 in each direction and terminating both passes
/// with `<FIN>`. Lines of order or fewer tokens are skipped whole, before
/// anything is interned. Returns the number of tokens learned.
pub fn learn_line(
    model: &mut Model,
    dict: &mut Dictionary,
    tokens: &[Vec<u8>],
) -> Result<usize, EngineError> {
    if tokens.len() <= model.order() {
        return Ok(0);
    }

    let mut symbols: Vec<SymbolId> = Vec::with_capacity(tokens.len());
    for token in tokens {
        symbols.push(dict.intern(token)?);
    }

    let mut ctx = Context::new(model.order());

    ctx.reset(FORWARD_ROOT);
    for &sym in &symbols {
        ctx.observe(model, sym);
    }
    ctx.observe(model, SYMBOL_FIN);

    ctx.reset(BACKWARD_ROOT);
    for &sym in symbols.iter().rev() {
        ctx.observe(model, sym);
    }
    ctx.observe(model, SYMBOL_FIN);

    Ok(symbols.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokenizer::tokenize;
    use crate::core::trie::NodeId;

    #[test]
    fn short_lines_touch_nothing() {
        let mut model = Model::new(5);
        let mut dict = Dictionary::new();
        let learned = learn_line(&mut model, &mut dict, &tokenize("the")).unwrap();
        assert_eq!(learned, 0);
        assert_eq!(model.node_count(), 2);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn both_tries_carry_every_prefix_path() {
        let mut model = Model::new(5);
        let mut dict = Dictionary::new();
        let tokens = tokenize("the quick brown fox jumps over the lazy dog.");
        let learned = learn_line(&mut model, &mut dict, &tokens).unwrap();
        assert_eq!(learned, tokens.len());

        let symbols: Vec<SymbolId> = tokens.iter().map(|t| dict.lookup(t).unwrap()).collect();

        // Forward: every window of 1..=order+1 consecutive symbols is a path.
        for start in 0..symbols.len() {
            let mut node: NodeId = FORWARD_ROOT;
            for &sym in symbols.iter().skip(start).take(model.order() + 1) {
                node = model.child_of(node, sym).expect("missing forward path");
            }
        }
        // Backward: the same windows reversed.
        for start in 0..symbols.len() {
            let mut node: NodeId = BACKWARD_ROOT;
            for &sym in symbols.iter().rev().skip(start).take(model.order() + 1) {
                node = model.child_of(node, sym).expect("missing backward path");
            }
        }
    }

    #[test]
    fn fin_terminates_both_directions() {
        let mut model = Model::new(2);
        let mut dict = Dictionary::new();
        learn_line(&mut model, &mut dict, &tokenize("a b c")).unwrap();
        // Forward: <FIN> follows the final ".".
        let dot = dict.lookup(b".").unwrap();
        let tail = model.child_of(FORWARD_ROOT, dot).unwrap();
        assert!(model.child_of(tail, SYMBOL_FIN).is_some());
        // Backward: <FIN> follows the first word.
        let a = dict.lookup(b"A").unwrap();
        let head = model.child_of(BACKWARD_ROOT, a).unwrap();
        assert!(model.child_of(head, SYMBOL_FIN).is_some());
    }

    #[test]
    fn learning_twice_doubles_every_count() {
        let mut once = Model::new(5);
        let mut dict_once = Dictionary::new();
        let tokens = tokenize("the cat sat on the mat.");
        learn_line(&mut once, &mut dict_once, &tokens).unwrap();

        let mut twice = Model::new(5);
        let mut dict_twice = Dictionary::new();
        learn_line(&mut twice, &mut dict_twice, &tokens).unwrap();
        learn_line(&mut twice, &mut dict_twice, &tokens).unwrap();

        assert_eq!(once.node_count(), twice.node_count());
        for root in [FORWARD_ROOT, BACKWARD_ROOT] {
            compare_doubled(&once, &twice, root, root);
        }
    }

    fn compare_doubled(once: &Model, twice: &Model, a: NodeId, b: NodeId) {
        assert_eq!(once.node(a).symbol, twice.node(b).symbol);
        assert_eq!(once.node(a).count as u32 * 2, twice.node(b).count as u32);
        assert_eq!(once.node(a).usage * 2, twice.node(b).usage);
        let left = once.children_of(a);
        let right = twice.children_of(b);
        assert_eq!(left.len(), right.len());
        for (&ca, &cb) in left.iter().zip(right) {
            compare_doubled(once, twice, ca, cb);
        }
    }
}
