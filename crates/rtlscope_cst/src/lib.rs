//! Reconstruction of concrete syntax trees from indentation-based dumps.
//!
//! An external CST-dumping tool serializes a parse tree one node or leaf
//! per line, with fixed-width indentation encoding nesting depth:
//!
//! ```text
//! Node @0 (tag: kModuleDeclaration)
//!   Leaf @1 (#"module" @0-6: "module")
//!   Leaf @2 (#SymbolIdentifier @7-10: "dff")
//! ```
//!
//! This crate decodes that line stream back into a [`SyntaxTree`]: a flat,
//! index-addressed arena of nodes and leaves with an explicit parent stack,
//! so nesting depth is bounded only by input size and never by the call
//! stack. The main entry point is [`decode`].

#![warn(missing_docs)]

pub mod decode;
pub mod tree;

pub use decode::{decode, DecodeError};
pub use tree::{NodeId, SyntaxEntry, SyntaxTree};
