// src/view/mod.rs
//! Zero-copy windows over block memory.

pub mod core;
pub(crate) mod ops;

pub use self::core::View;
