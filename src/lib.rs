// File: src/lib.rs

pub mod core;
pub mod error;
pub mod learning;
pub mod persistence;
pub mod wordlist;

pub use crate::core::engine::{Engine, EngineConfig, FALLBACK_REPLY};
pub use crate::core::types::LearnStats;
pub use crate::error::EngineError;
