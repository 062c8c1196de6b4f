// src/pool/mod.rs
//! Block pool implementation with single-threaded and shared modes.

pub(crate) mod config;
pub(crate) mod shared;
pub(crate) mod standard;
pub(crate) mod stats;

pub use config::PoolConfig;
pub use shared::{PooledBlock, SharedBufferPool};
pub use standard::BufferPool;
pub use stats::PoolStats;
