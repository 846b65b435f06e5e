//! Pure text → segment scanner.
//!
//! A single compiled alternation finds every delimited formula left to right.
//! The regex engine uses leftmost-first semantics, so the earliest match
//! position wins and, at equal positions, the branch listed first wins. That
//! is what puts ```` ```latex ```` ahead of the single-backtick forms and the
//! `math:` / `latex` prefixed ticks ahead of a bare tick.
//!
//! Text lengths are counted in grapheme clusters, so a letter with a
//! combining accent counts once.

use super::model::{FormulaSyntax, Segment, Token, TokenKind};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use unicode_segmentation::UnicodeSegmentation;

/// Gap text must be longer than this many characters (after trimming) to be
/// emitted by [`scan`].
pub const SCAN_TEXT_MIN_CHARS: usize = 2;

/// Text segments must be longer than this many characters (after trimming)
/// to survive [`filter_for_message`].
pub const MESSAGE_TEXT_MIN_CHARS: usize = 3;

static FORMULA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?P<latex_block>```latex[\s\S]*?```)
        |
        # Other fenced blocks, double-backtick code and unpaired fence
        # markers stay literal text; scanning resumes right after them
        (?P<literal_fence>```(?:[\s\S]*?```)?|``(?:[^`\n]+``)?)
        |
        # Single-tick forms never span a line break
        (?P<math_tick>`math:[^`\n]+`)
        |
        (?P<latex_tick>`latex[^`\n]+`)
        |
        (?P<backtick>`[^`\n]+`)
        |
        # One level of nested parentheses inside the body
        (?P<math_paren>math:\((?:[^()]|\([^()]*\))*\))
        |
        (?P<display_bracket>\\\[[\s\S]*?\\\])
        |
        (?P<inline_paren>\\\([\s\S]*?\\\))
        ",
    )
    .expect("FORMULA_PATTERN is a valid static regex pattern")
});

fn group_name(syntax: FormulaSyntax) -> &'static str {
    match syntax {
        FormulaSyntax::LatexBlock => "latex_block",
        FormulaSyntax::MathTick => "math_tick",
        FormulaSyntax::LatexTick => "latex_tick",
        FormulaSyntax::Backtick => "backtick",
        FormulaSyntax::MathParen => "math_paren",
        FormulaSyntax::DisplayBracket => "display_bracket",
        FormulaSyntax::InlineParen => "inline_paren",
    }
}

/// Returns the syntax of a match, or `None` for a literal fence.
fn classify(caps: &Captures<'_>) -> Option<FormulaSyntax> {
    FormulaSyntax::ALL
        .into_iter()
        .find(|syntax| caps.name(group_name(*syntax)).is_some())
}

/// Splits `input` into contiguous gap and formula tokens.
///
/// Literal spans (fenced blocks that are not LaTeX, double-backtick code,
/// and a fence marker with no closing fence) are folded into the surrounding
/// gap. Empty gaps are not emitted.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut gap_start = 0;

    for caps in FORMULA_PATTERN.captures_iter(input) {
        let Some(syntax) = classify(&caps) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if gap_start < whole.start() {
            tokens.push(Token {
                kind: TokenKind::Gap,
                range: gap_start..whole.start(),
            });
        }
        tokens.push(Token {
            kind: TokenKind::Formula(syntax),
            range: whole.range(),
        });
        gap_start = whole.end();
    }

    if gap_start < input.len() {
        tokens.push(Token {
            kind: TokenKind::Gap,
            range: gap_start..input.len(),
        });
    }

    tokens
}

/// Classifies `input` into an ordered sequence of segments.
///
/// Gap text is trimmed and kept only when longer than
/// [`SCAN_TEXT_MIN_CHARS`]; formula bodies are trimmed and always kept, so
/// two formulas separated by a short run of whitespace come out adjacent.
pub fn scan(input: &str) -> Vec<Segment> {
    tokenize(input)
        .into_iter()
        .filter_map(|token| {
            let raw = token.as_str(input);
            match token.kind {
                TokenKind::Gap => {
                    let text = raw.trim();
                    (visible_len(text) > SCAN_TEXT_MIN_CHARS).then(|| Segment::text(text))
                }
                TokenKind::Formula(syntax) => {
                    Some(Segment::formula(syntax.strip(raw), syntax.is_inline()))
                }
            }
        })
        .collect()
}

/// Applies the coarser text filter used when segments are shown for a
/// message: text of [`MESSAGE_TEXT_MIN_CHARS`] characters or fewer is dropped.
pub fn filter_for_message(segments: Vec<Segment>) -> Vec<Segment> {
    segments
        .into_iter()
        .filter(|segment| match segment {
            Segment::Text(text) => visible_len(text.trim()) > MESSAGE_TEXT_MIN_CHARS,
            Segment::Formula { .. } => true,
        })
        .collect()
}

fn visible_len(text: &str) -> usize {
    text.graphemes(true).count()
}
