//! Segment and token types produced by the scanner.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A classified fragment of message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// Plain prose, already trimmed.
    Text(String),
    /// A formula body with its delimiters stripped.
    Formula { body: String, is_inline: bool },
}

impl Segment {
    /// Creates a text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a formula segment.
    pub fn formula(body: impl Into<String>, is_inline: bool) -> Self {
        Self::Formula {
            body: body.into(),
            is_inline,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Self::Formula { .. })
    }
}

/// The delimiter syntax a formula was written in.
///
/// Variants are listed in match priority order: when two syntaxes could
/// start at the same position, the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaSyntax {
    /// ```` ```latex ... ``` ````
    LatexBlock,
    /// `` `math:x^2` ``
    MathTick,
    /// `` `latexx^2` ``
    LatexTick,
    /// `` `x^2` ``
    Backtick,
    /// `math:(x^2)`
    MathParen,
    /// `\[ x^2 \]`
    DisplayBracket,
    /// `\( x^2 \)`
    InlineParen,
}

impl FormulaSyntax {
    /// All syntaxes in priority order.
    pub const ALL: [FormulaSyntax; 7] = [
        Self::LatexBlock,
        Self::MathTick,
        Self::LatexTick,
        Self::Backtick,
        Self::MathParen,
        Self::DisplayBracket,
        Self::InlineParen,
    ];

    /// Whether formulas in this syntax render inline with the text.
    pub fn is_inline(self) -> bool {
        !matches!(self, Self::LatexBlock | Self::DisplayBracket)
    }

    /// Opening and closing delimiter wrapped around the body.
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::LatexBlock => ("```latex", "```"),
            Self::MathTick => ("`math:", "`"),
            Self::LatexTick => ("`latex", "`"),
            Self::Backtick => ("`", "`"),
            Self::MathParen => ("math:(", ")"),
            Self::DisplayBracket => ("\\[", "\\]"),
            Self::InlineParen => ("\\(", "\\)"),
        }
    }

    /// Strips this syntax's delimiters from a matched span and trims the body.
    ///
    /// Returns the span trimmed as-is when the delimiters are absent, which
    /// cannot happen for spans produced by the scanner.
    pub fn strip<'a>(self, raw: &'a str) -> &'a str {
        let (open, close) = self.delimiters();
        raw.strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
            .unwrap_or(raw)
            .trim()
    }
}

/// What a scanned span of the input is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Text between formulas (or before the first / after the last).
    Gap,
    /// A complete delimited formula.
    Formula(FormulaSyntax),
}

/// A span of the scanned input, delimiters included.
///
/// Tokens returned by [`tokenize`](super::tokenize) cover the input
/// contiguously, so concatenating their spans reproduces it exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range into the scanned input.
    pub range: Range<usize>,
}

impl Token {
    /// The raw text of this token within `input`.
    pub fn as_str<'a>(&self, input: &'a str) -> &'a str {
        &input[self.range.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_classification() {
        assert!(!FormulaSyntax::LatexBlock.is_inline());
        assert!(!FormulaSyntax::DisplayBracket.is_inline());
        for syntax in [
            FormulaSyntax::MathTick,
            FormulaSyntax::LatexTick,
            FormulaSyntax::Backtick,
            FormulaSyntax::MathParen,
            FormulaSyntax::InlineParen,
        ] {
            assert!(syntax.is_inline(), "{syntax:?} should be inline");
        }
    }

    #[test]
    fn test_strip_removes_delimiters_and_whitespace() {
        assert_eq!(FormulaSyntax::LatexBlock.strip("```latex\nE=mc^2\n```"), "E=mc^2");
        assert_eq!(FormulaSyntax::MathTick.strip("`math: x^2 `"), "x^2");
        assert_eq!(FormulaSyntax::LatexTick.strip("`latexx^2`"), "x^2");
        assert_eq!(FormulaSyntax::MathParen.strip("math:(a+b)"), "a+b");
        assert_eq!(FormulaSyntax::DisplayBracket.strip("\\[ x \\]"), "x");
        assert_eq!(FormulaSyntax::InlineParen.strip("\\(y\\)"), "y");
    }
}
