//! Decoder for the indentation-based CST dump format.
//!
//! Two line grammars are recognized:
//!
//! ```text
//! <indent>Node @<id> (tag: <TAG>)
//! <indent>Leaf @<id> (#<TAG> @<START>-<END>: "<TEXT>")
//! ```
//!
//! Indentation is a fixed number of spaces per nesting level; the unit is
//! inferred from the first indented line. Decoding is lenient: lines that
//! match neither grammar are skipped and reported as warnings through the
//! sink, so a locally corrupted dump still yields a usable tree. The only
//! hard failure is a dump with no valid root node line.

use crate::tree::{NodeId, SyntaxTree};
use rtlscope_diagnostics::code::codes;
use rtlscope_diagnostics::{Diagnostic, DiagnosticSink};
use rtlscope_source::Span;

/// Failure to reconstruct a tree from a dump.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The dump contained no line matching the node grammar at depth zero.
    #[error("CST dump contains no valid root node line")]
    NoRoot,
}

/// Decodes a CST dump into a [`SyntaxTree`].
///
/// Unrecognized lines are skipped with a warning diagnostic carrying the
/// 1-indexed dump line number. Returns [`DecodeError::NoRoot`] if no root
/// node was found.
pub fn decode(dump: &str, sink: &DiagnosticSink) -> Result<SyntaxTree, DecodeError> {
    let mut tree = SyntaxTree::new();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut indent_unit: Option<usize> = None;

    for (idx, raw) in dump.lines().enumerate() {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        let body = line.trim_start();
        let indent = line.len() - body.len();
        let depth = match indent_unit {
            Some(unit) => indent / unit,
            None => {
                if indent > 0 {
                    indent_unit = Some(indent);
                    1
                } else {
                    0
                }
            }
        };

        if let Some(tag) = parse_node_line(body) {
            stack.truncate(depth);
            match stack.last().copied() {
                Some(parent) => {
                    let id = tree.add_node(Some(parent), tag);
                    stack.push(id);
                }
                None => {
                    if tree.root().is_some() {
                        skip(sink, idx, "node line outside the root tree");
                        continue;
                    }
                    let id = tree.add_node(None, tag);
                    stack.push(id);
                }
            }
        } else if let Some(leaf) = parse_leaf_line(body) {
            stack.truncate(depth);
            match stack.last().copied() {
                Some(parent) => {
                    tree.add_leaf(parent, leaf.tag, leaf.text, leaf.start, leaf.end);
                }
                None => skip(sink, idx, "leaf line with no enclosing node"),
            }
        } else {
            skip(sink, idx, "line matches neither node nor leaf grammar");
        }
    }

    match tree.root() {
        Some(_) => Ok(tree),
        None => {
            sink.emit(Diagnostic::error(
                codes::NO_ROOT_NODE,
                "CST dump contains no valid root node line",
                Span::DUMMY,
            ));
            Err(DecodeError::NoRoot)
        }
    }
}

fn skip(sink: &DiagnosticSink, line_idx: usize, reason: &str) {
    sink.emit(
        Diagnostic::warning(
            codes::SKIPPED_DUMP_LINE,
            format!("skipped unrecognized dump line: {reason}"),
            Span::DUMMY,
        )
        .with_note(format!("dump line {}", line_idx + 1)),
    );
}

/// Parses `Node @<id> (tag: <TAG>)`, returning the tag.
fn parse_node_line(body: &str) -> Option<&str> {
    let rest = body.strip_prefix("Node @")?;
    let after_id = skip_digits(rest)?;
    let tag_and_close = after_id.strip_prefix(" (tag: ")?;
    let tag = tag_and_close.strip_suffix(')')?;
    if tag.is_empty() {
        return None;
    }
    Some(tag)
}

/// A parsed leaf line.
struct LeafLine<'a> {
    tag: &'a str,
    text: String,
    start: u32,
    end: u32,
}

/// Parses `Leaf @<id> (#<TAG> @<START>-<END>: "<TEXT>")`.
fn parse_leaf_line(body: &str) -> Option<LeafLine<'_>> {
    let rest = body.strip_prefix("Leaf @")?;
    let after_id = skip_digits(rest)?;
    let rest = after_id.strip_prefix(" (#")?;

    // The tag runs up to the ` @` that introduces the byte range. Leaf text
    // only starts after `: "`, so this split cannot land inside the text.
    let at = rest.find(" @")?;
    let tag = &rest[..at];
    let rest = &rest[at + 2..];

    let dash = rest.find('-')?;
    let start: u32 = rest[..dash].parse().ok()?;
    let rest = &rest[dash + 1..];

    let colon = rest.find(": \"")?;
    let end: u32 = rest[..colon].parse().ok()?;
    if end < start {
        return None;
    }

    let text_raw = rest[colon + 3..].strip_suffix("\")")?;
    Some(LeafLine {
        tag,
        text: unescape(text_raw),
        start,
        end,
    })
}

/// Skips a non-empty run of ASCII digits, returning the remainder.
fn skip_digits(s: &str) -> Option<&str> {
    let n = s.bytes().take_while(|b| b.is_ascii_digit()).count();
    if n == 0 {
        None
    } else {
        Some(&s[n..])
    }
}

/// Resolves `\"`, `\\`, `\n`, `\t`, and `\r` escapes in leaf text.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
