//! Shared foundational types used across the rtlscope analysis engine.
//!
//! This crate provides content hashing for cache keys and change
//! detection.

#![warn(missing_docs)]

pub mod hash;

pub use hash::ContentHash;
