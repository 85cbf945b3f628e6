use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("symbol space exhausted: {0} words already interned")]
    SymbolSpaceExhausted(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot codec error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("brain file error: {0}")]
    BrainFormat(String),
}
