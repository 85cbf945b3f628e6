// File: src/persistence.rs
use crate::core::dictionary::Dictionary;
use crate::core::engine::{Engine, EngineConfig};
use crate::core::keywords::SwapMap;
use crate::core::trie::{Model, NodeId, BACKWARD_ROOT, FORWARD_ROOT};
use crate::core::types::SymbolId;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const BRAIN_MAGIC: &[u8; 9] = b"MegaHALv8";

/// The serializable state of an engine: the model plus everything needed
/// to keep its behavior after a reload.
#[derive(Serialize, Deserialize)]
struct SerializableState {
    model: Model,
    dictionary: Dictionary,
    banned: HashSet<Vec<u8>>,
    aux: HashSet<Vec<u8>>,
    swaps: SwapMap,
    greetings: Vec<Vec<u8>>,
}

/// Writes a snapshot next to `path` and atomically replaces it.
pub fn save_to_disk(engine: &Engine, path: &Path) -> Result<(), EngineError> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let state = SerializableState {
        model: engine.model.clone(),
        dictionary: engine.dictionary.clone(),
        banned: engine.banned.clone(),
        aux: engine.aux.clone(),
        swaps: engine.swaps.clone(),
        greetings: engine.greetings.clone(),
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    let writer = BufWriter::new(&temp_file);
    bincode::serialize_into(writer, &state)?;
    temp_file.persist(path).map_err(|e| EngineError::Io(e.error))?;
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<Engine, EngineError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let state: SerializableState = bincode::deserialize_from(reader)?;

    let mut engine = Engine::with_config(EngineConfig {
        order: state.model.order(),
        banned: state.banned,
        aux: state.aux,
        swaps: state.swaps,
        greetings: state.greetings,
    });
    engine.model = state.model;
    engine.dictionary = state.dictionary;
    Ok(engine)
}

/// Dumps the model in the classic brain layout: magic, order byte, the
/// forward then backward trees pre-order, then the dictionary in
/// insertion order. All integers little-endian.
pub fn export_classic<W: Write>(engine: &Engine, writer: &mut W) -> Result<(), EngineError> {
    writer.write_all(BRAIN_MAGIC)?;
    writer.write_all(&[engine.model.order() as u8])?;
    write_node(&engine.model, FORWARD_ROOT, writer)?;
    write_node(&engine.model, BACKWARD_ROOT, writer)?;

    let dict = &engine.dictionary;
    writer.write_all(&(dict.len() as u32).to_le_bytes())?;
    for id in 0..dict.len() {
        let word = dict.word_of(id as SymbolId);
        writer.write_all(&[word.len() as u8])?;
        writer.write_all(word)?;
    }
    Ok(())
}

/// Rebuilds an engine from a classic brain dump. Word lists are not part
/// of the layout and come back empty.
pub fn import_classic<R: Read>(reader: &mut R) -> Result<Engine, EngineError> {
    let mut magic = [0u8; 9];
    reader.read_exact(&mut magic)?;
    if &magic != BRAIN_MAGIC {
        return Err(EngineError::BrainFormat(format!(
            "bad magic {:?}",
            String::from_utf8_lossy(&magic)
        )));
    }
    let order = read_u8(reader)? as usize;

    let mut engine = Engine::with_config(EngineConfig {
        order,
        ..EngineConfig::default()
    });
    read_root(&mut engine.model, FORWARD_ROOT, reader)?;
    read_root(&mut engine.model, BACKWARD_ROOT, reader)?;

    let size = read_u32(reader)? as usize;
    let mut words = Vec::with_capacity(size);
    for _ in 0..size {
        let len = read_u8(reader)? as usize;
        let mut word = vec![0u8; len];
        reader.read_exact(&mut word)?;
        words.push(word);
    }
    engine.dictionary = Dictionary::from_words(words);
    Ok(engine)
}

fn write_node<W: Write>(model: &Model, id: NodeId, writer: &mut W) -> Result<(), EngineError> {
    let node = model.node(id);
    writer.write_all(&node.symbol.to_le_bytes())?;
    writer.write_all(&node.usage.to_le_bytes())?;
    writer.write_all(&node.count.to_le_bytes())?;
    writer.write_all(&(node.branch() as u16).to_le_bytes())?;
    for &child in model.children_of(id) {
        write_node(model, child, writer)?;
    }
    Ok(())
}

fn read_root<R: Read>(model: &mut Model, root: NodeId, reader: &mut R) -> Result<(), EngineError> {
    let (_, usage, count, branch) = read_node_header(reader)?;
    model.set_root_stats(root, count, usage);
    for _ in 0..branch {
        read_child(model, root, reader)?;
    }
    Ok(())
}

fn read_child<R: Read>(
    model: &mut Model,
    parent: NodeId,
    reader: &mut R,
) -> Result<(), EngineError> {
    let (symbol, usage, count, branch) = read_node_header(reader)?;
    let id = model.insert_node(parent, symbol, count, usage);
    for _ in 0..branch {
        read_child(model, id, reader)?;
    }
    Ok(())
}

fn read_node_header<R: Read>(reader: &mut R) -> Result<(SymbolId, u32, u16, u16), EngineError> {
    let symbol = read_u16(reader)?;
    let usage = read_u32(reader)?;
    let count = read_u16(reader)?;
    let branch = read_u16(reader)?;
    Ok((symbol, usage, count, branch))
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8, EngineError> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16<R: Read>(reader: &mut R) -> Result<u16, EngineError> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, EngineError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
