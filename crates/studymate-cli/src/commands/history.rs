//! `studymate history`: list and delete stored chats.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use studymate_application::HistoryUseCase;
use studymate_infrastructure::{StudymatePaths, TomlSessionRepository};

const PREVIEW_CHARS: usize = 60;

async fn history(paths: &StudymatePaths) -> Result<HistoryUseCase> {
    let repository = TomlSessionRepository::from_paths(paths).await?;
    Ok(HistoryUseCase::new(Arc::new(repository)))
}

pub async fn list(paths: &StudymatePaths) -> Result<()> {
    let sessions = history(paths).await?.list().await?;
    if sessions.is_empty() {
        println!("{}", "No saved chats yet.".bright_black());
        return Ok(());
    }

    let mut current_label = None;
    for (session, label) in sessions {
        if current_label != Some(label) {
            println!("{}", label.to_string().bright_magenta().bold());
            current_label = Some(label);
        }
        println!(
            "  {}  {}  {}",
            session.id.bright_black(),
            session.subject.label().cyan(),
            preview(&session.first_question)
        );
    }
    Ok(())
}

pub async fn delete(paths: &StudymatePaths, id: &str) -> Result<()> {
    let history = history(paths).await?;
    // Deleting is idempotent; unknown IDs should still report NotFound.
    history.find(id).await?;
    history.delete(id).await?;
    println!("{}", format!("Deleted chat {}", id).bright_green());
    Ok(())
}

/// First line of `text`, shortened to a list-friendly length.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= PREVIEW_CHARS && !text.contains('\n') {
        return line.to_string();
    }
    let short: String = line.chars().take(PREVIEW_CHARS).collect();
    format!("{}…", short.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("What is 2 + 2?"), "What is 2 + 2?");
        assert_eq!(preview("first line\nsecond"), "first line…");
        assert_eq!(preview(""), "");

        let long = "x".repeat(80);
        assert_eq!(preview(&long), format!("{}…", "x".repeat(60)));
    }
}
