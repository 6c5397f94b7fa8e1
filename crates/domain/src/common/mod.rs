//! Common utility functions shared across the FateSheet crates.
//!
//! # Design Principles
//!
//! - **Pure functions only** - no side effects, no I/O
//! - **WASM compatible** - all code must work in both native and WASM targets

pub mod string;

// Re-export commonly used functions at module root for convenience
pub use string::{name_key, non_blank, normalize_text, slugify};
