// File: src/core/reply.rs
use crate::core::context::Context;
use crate::core::dictionary::Dictionary;
use crate::core::keywords::Keywords;
use crate::core::trie::{Model, NodeId, BACKWARD_ROOT, FORWARD_ROOT};
use crate::core::types::{SymbolId, MAX_REPLY_STEPS, SYMBOL_ERROR, SYMBOL_FIN};
use rand::Rng;
use std::collections::HashSet;

/// Picks the symbol a candidate reply grows from. A random circular scan
/// of the keywords looks for a primary (non-aux) keyword; failing that, a
/// uniform draw over the forward root's non-sentinel children. Returns
/// `SYMBOL_ERROR` when the model has nothing to offer.
pub(crate) fn seed<R: Rng>(
    model: &Model,
    dict: &Dictionary,
    keys: &Keywords,
    aux: &HashSet<Vec<u8>>,
    rng: &mut R,
) -> SymbolId {
    if !keys.is_empty() {
        let ids = keys.as_slice();
        let start = rng.gen_range(0..ids.len());
        for offset in 0..ids.len() {
            let id = ids[(start + offset) % ids.len()];
            if !aux.contains(dict.word_of(id)) {
                return id;
            }
        }
    }

    let eligible: Vec<SymbolId> = model
        .children_of(FORWARD_ROOT)
        .iter()
        .map(|&child| model.node(child).symbol)
        .filter(|&sym| sym > SYMBOL_FIN)
        .collect();
    if eligible.is_empty() {
        return SYMBOL_ERROR;
    }
    eligible[rng.gen_range(0..eligible.len())]
}

/// The weighted-random child draw with keyword priority. A keyword child
/// not yet in the reply wins outright, aux keywords only once `used_key`
/// is set; otherwise each child eats `count` out of a random credit drawn
/// below `usage`, and the one that spends it is returned. At most `branch`
/// children are visited. Returns `SYMBOL_ERROR` at a dead end.
pub(crate) fn babble<R: Rng>(
    model: &Model,
    dict: &Dictionary,
    ctx: &Context,
    keys: &Keywords,
    aux: &HashSet<Vec<u8>>,
    reply: &[SymbolId],
    used_key: &mut bool,
    rng: &mut R,
) -> SymbolId {
    let Some(node_id) = ctx.deepest() else {
        return SYMBOL_ERROR;
    };
    let node = model.node(node_id);
    let branch = node.branch();
    if branch == 0 {
        return SYMBOL_ERROR;
    }

    let start = rng.gen_range(0..branch);
    let mut credit: i64 = if node.usage > 0 {
        rng.gen_range(0..node.usage as i64)
    } else {
        0
    };

    let children = model.children_of(node_id);
    for offset in 0..branch {
        let child = model.node(children[(start + offset) % branch]);
        let sym = child.symbol;
        if keys.contains(sym)
            && (*used_key || !aux.contains(dict.word_of(sym)))
            && !reply.contains(&sym)
        {
            *used_key = true;
            return sym;
        }
        credit -= child.count as i64;
        if credit < 0 {
            return sym;
        }
    }
    SYMBOL_ERROR
}

/// Grows one candidate reply: forward babble from a seed, then backward
/// babble prepending from the reply's left edge. Both directions stop on a
/// sentinel or after the step cap.
pub(crate) fn generate<R: Rng>(
    model: &Model,
    dict: &Dictionary,
    keys: &Keywords,
    aux: &HashSet<Vec<u8>>,
    rng: &mut R,
) -> Vec<SymbolId> {
    let mut used_key = false;
    let mut ctx = Context::new(model.order());

    ctx.reset(FORWARD_ROOT);
    let first = seed(model, dict, keys, aux, rng);
    if first <= SYMBOL_FIN {
        return vec![SYMBOL_FIN];
    }
    let mut reply = vec![first];
    ctx.walk(model, first);

    for _ in 0..MAX_REPLY_STEPS {
        let sym = babble(model, dict, &ctx, keys, aux, &reply, &mut used_key, rng);
        if sym <= SYMBOL_FIN {
            break;
        }
        reply.push(sym);
        ctx.walk(model, sym);
    }

    // Re-establish the backward context at the reply's left edge before
    // growing leftward.
    ctx.reset(BACKWARD_ROOT);
    let prime_from = (reply.len() - 1).min(model.order());
    for i in (0..=prime_from).rev() {
        ctx.walk(model, reply[i]);
    }

    for _ in 0..MAX_REPLY_STEPS {
        let sym = babble(model, dict, &ctx, keys, aux, &reply, &mut used_key, rng);
        if sym <= SYMBOL_FIN {
            break;
        }
        reply.insert(0, sym);
        ctx.walk(model, sym);
    }

    reply
}

/// Surprise score: the length-penalized sum of -ln(P(keyword | context))
/// averaged across context depths, in both directions. Only keywords
/// contribute; a keyword unreachable from every live depth is not counted.
pub(crate) fn evaluate(model: &Model, keys: &Keywords, reply: &[SymbolId]) -> f64 {
    let mut entropy = 0.0;
    let mut num = 0usize;
    score_pass(
        model,
        keys,
        FORWARD_ROOT,
        reply.iter().copied(),
        &mut entropy,
        &mut num,
    );
    score_pass(
        model,
        keys,
        BACKWARD_ROOT,
        reply.iter().rev().copied(),
        &mut entropy,
        &mut num,
    );

    if num >= 8 {
        entropy /= ((num - 1) as f64).sqrt();
    }
    if num >= 16 {
        entropy /= num as f64;
    }
    entropy
}

fn score_pass(
    model: &Model,
    keys: &Keywords,
    root: NodeId,
    symbols: impl Iterator<Item = SymbolId>,
    entropy: &mut f64,
    num: &mut usize,
) {
    let mut ctx = Context::new(model.order());
    ctx.reset(root);
    for sym in symbols {
        if keys.contains(sym) {
            let mut prob = 0.0;
            let mut n = 0u32;
            // Scoring reads only the shallow depths; the deepest levels are
            // written by training and generation but skipped here.
            for depth in 0..model.order() {
                let Some(node_id) = ctx.slot(depth) else {
                    continue;
                };
                let Some(child) = model.child_of(node_id, sym) else {
                    continue;
                };
                let usage = model.node(node_id).usage;
                if usage > 0 {
                    prob += model.node(child).count as f64 / usage as f64;
                    n += 1;
                }
            }
            if n > 0 {
                *entropy -= (prob / n as f64).ln();
                *num += 1;
            }
        }
        ctx.walk(model, sym);
    }
}

/// Joins the reply's words and applies sentence casing: first letter
/// uppercased, everything else lowercased, with a fresh capital after
/// terminal punctuation followed by whitespace.
pub(crate) fn format_output(dict: &Dictionary, reply: &[SymbolId]) -> String {
    let mut bytes = Vec::new();
    for &sym in reply {
        bytes.extend_from_slice(dict.word_of(sym));
    }

    let mut capitalize = true;
    for i in 0..bytes.len() {
        if i > 0 && bytes[i].is_ascii_whitespace() && matches!(bytes[i - 1], b'!' | b'.' | b'?') {
            capitalize = true;
        }
        if bytes[i].is_ascii_alphabetic() {
            bytes[i] = if capitalize {
                bytes[i].to_ascii_uppercase()
            } else {
                bytes[i].to_ascii_lowercase()
            };
            capitalize = false;
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}
