//! `studymate scan`: print the segments of a text.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Read;
use studymate_core::segment::{self, Segment};

pub fn run(input: &str, json: bool) -> Result<()> {
    let text = read_input(input)?;
    let segments = segment::scan(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
        return Ok(());
    }

    for segment in &segments {
        let line = describe(segment);
        if segment.is_formula() {
            println!("{}", line.yellow());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Cannot read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("Cannot read {}", input))
}

fn describe(segment: &Segment) -> String {
    match segment {
        Segment::Text(text) => format!("[text]    {}", text),
        Segment::Formula {
            body,
            is_inline: true,
        } => format!("[inline]  {}", body),
        Segment::Formula {
            body,
            is_inline: false,
        } => format!("[display] {}", body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_describe_labels_segment_kinds() {
        let lines: Vec<_> = segment::scan("Area: \\(\\pi r^2\\) and \\[ E = mc^2 \\]")
            .iter()
            .map(describe)
            .collect();
        assert_eq!(
            lines,
            vec![
                "[text]    Area:",
                "[inline]  \\pi r^2",
                "[text]    and",
                "[display] E = mc^2",
            ]
        );
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "x `math:y`").unwrap();
        assert_eq!(read_input(file.path().to_str().unwrap()).unwrap(), "x `math:y`");
        assert!(read_input("/definitely/not/here.txt").is_err());
    }
}
