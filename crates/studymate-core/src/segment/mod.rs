//! Message segmentation.
//!
//! Assistant replies mix prose with math written in several competing
//! delimiter syntaxes. This module splits a reply into an ordered list of
//! [`Segment`]s so a renderer can typeset formulas and lay out text around
//! them.
//!
//! # Module Structure
//!
//! - `model`: segment and token types (`Segment`, `FormulaSyntax`, `Token`)
//! - `scanner`: the pure scanner (`scan`, `tokenize`)

mod model;
mod scanner;

pub use model::{FormulaSyntax, Segment, Token, TokenKind};
pub use scanner::{MESSAGE_TEXT_MIN_CHARS, SCAN_TEXT_MIN_CHARS, filter_for_message, scan, tokenize};
