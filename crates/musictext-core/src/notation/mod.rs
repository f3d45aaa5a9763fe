//! Notation text → canonical beat tree.
//!
//! - [`parser`]: grammar and syntax errors
//! - [`semantics`]: syntax nodes → pitches
//! - [`ast`]: the resulting [`Beat`]/[`Score`] tree

pub mod ast;
pub mod parser;
pub mod semantics;

pub use ast::{Beat, Score, rendered_len};
pub use parser::{MAX_NESTING, ParseErrorKind, ParseFailure, parse_score, parse_score_with};
pub use semantics::{AccidentalNode, NoteNode, PitchSemantics, Semantics};
