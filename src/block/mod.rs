// src/block/mod.rs
//! Fixed-capacity byte blocks, the unit of pooled allocation

pub mod core;
pub(crate) mod ops;
pub(crate) mod storage;

pub use self::core::{BLOCK_MAX_SIZE, RawBlock};
