//! Terminal rendering of conversation messages.

use colored::Colorize;
use studymate_core::{Message, MessageRole, Segment};

/// Lays segments out as terminal lines.
///
/// Text and inline formulas share a line; display formulas get their own.
pub fn compose(segments: &[Segment], style: impl Fn(&Segment) -> String) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for segment in segments {
        match segment {
            Segment::Formula {
                is_inline: false, ..
            } => {
                if !current.is_empty() {
                    lines.push(current.join(" "));
                    current.clear();
                }
                lines.push(format!("    {}", style(segment)));
            }
            _ => current.push(style(segment)),
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    lines
}

/// Plain-text form of a segment: `$...$` for inline and `$$ ... $$` for display math.
pub fn plain(segment: &Segment) -> String {
    match segment {
        Segment::Text(text) => text.clone(),
        Segment::Formula {
            body,
            is_inline: true,
        } => format!("${}$", body),
        Segment::Formula {
            body,
            is_inline: false,
        } => format!("$$ {} $$", body),
    }
}

fn colored(segment: &Segment) -> String {
    match segment {
        Segment::Text(_) => plain(segment).bright_blue().to_string(),
        Segment::Formula { .. } => plain(segment).yellow().to_string(),
    }
}

pub fn print_message(message: &Message) {
    match message.role {
        MessageRole::DateMarker => {
            println!("{}", format!("── {} ──", message.content).bright_black());
        }
        MessageRole::User => {
            let attachment = if message.has_image() { " [image]" } else { "" };
            println!("{}", format!("> {}{}", message.content, attachment).green());
        }
        MessageRole::Assistant if message.is_loading => {
            println!("{}", "…".bright_black());
        }
        MessageRole::Assistant => {
            for line in compose(&message.segments(), colored) {
                println!("{}", line);
            }
            println!();
        }
        MessageRole::System => {}
    }
}
