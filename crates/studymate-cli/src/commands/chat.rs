//! `studymate chat`: interactive REPL over one conversation.

use crate::render::print_message;
use crate::repl_helper::ChatHelper;
use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use studymate_application::{ChatUseCase, HistoryUseCase};
use studymate_core::attachment::{ImageCodec, JpegDataUriCodec};
use studymate_core::config::AppConfig;
use studymate_core::{Message, Subject};
use studymate_infrastructure::{StudymatePaths, TomlSessionRepository};
use studymate_interaction::OpenAiCompletionProvider;

pub struct ChatOptions {
    pub subject: Option<String>,
    pub translate: bool,
    pub from: String,
    pub to: String,
    pub resume: Option<String>,
}

impl ChatOptions {
    fn subject(&self) -> Subject {
        if self.translate {
            return Subject::Translate;
        }
        match &self.subject {
            Some(label) => Subject::from(label.clone()),
            None => Subject::OpenTopic,
        }
    }
}

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Empty,
    Quit,
    Clear,
    Explain,
    Image { path: PathBuf, question: String },
    Say(String),
    Unknown(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if !line.starts_with('/') {
            return Self::Say(line.to_string());
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "/quit" | "/exit" => Self::Quit,
            "/clear" => Self::Clear,
            "/explain" => Self::Explain,
            "/image" if !rest.trim().is_empty() => {
                let rest = rest.trim();
                let (path, question) = rest.split_once(' ').unwrap_or((rest, ""));
                Self::Image {
                    path: PathBuf::from(path),
                    question: question.trim().to_string(),
                }
            }
            _ => Self::Unknown(command.to_string()),
        }
    }
}

pub async fn run(config: &AppConfig, paths: &StudymatePaths, options: ChatOptions) -> Result<()> {
    let provider = Arc::new(OpenAiCompletionProvider::from_config(
        &config.completion,
        config.prompts.clone(),
    )?);
    let repository = Arc::new(TomlSessionRepository::from_paths(paths).await?);
    let chat = ChatUseCase::new(config.prompts.clone(), provider, repository.clone());

    let replay = match &options.resume {
        Some(id) => {
            let session = HistoryUseCase::new(repository).find(id).await?;
            Some(chat.resume(session).await?)
        }
        None => {
            chat.start(options.subject()).await?;
            None
        }
    };

    let subject = chat.subject().await.unwrap_or_default();
    let translating = subject == Subject::Translate;

    println!("{}", format!("=== Studymate: {} ===", subject).bright_magenta().bold());
    println!(
        "{}",
        "Type a question, '/image <path> [question]', '/explain', '/clear', or '/quit'."
            .bright_black()
    );
    println!();
    for message in chat.visible_messages().await {
        print_message(&message);
    }

    if let Some(seed) = replay.filter(|seed| !seed.trim().is_empty()) {
        print_message(&Message::user(seed.as_str(), None));
        report(chat.send(&seed, None).await);
    }

    let mut rl: Editor<ChatHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let command = ReplCommand::parse(&line);
        if command != ReplCommand::Empty {
            let _ = rl.add_history_entry(line.trim());
        }

        match command {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Clear => {
                chat.clear().await;
                for message in chat.visible_messages().await {
                    print_message(&message);
                }
            }
            ReplCommand::Explain => report(chat.explain_further().await),
            ReplCommand::Image { path, question } => match attach(&path) {
                Ok(image_url) => report(chat.send(&question, Some(image_url)).await),
                Err(e) => eprintln!("{}", format!("{:#}", e).red()),
            },
            ReplCommand::Say(text) if translating => {
                report(chat.translate(&text, &options.from, &options.to).await)
            }
            ReplCommand::Say(text) => report(chat.send(&text, None).await),
            ReplCommand::Unknown(command) => {
                println!("{}", format!("Unknown command {}", command).bright_black());
            }
        }
    }

    match chat.leave().await {
        Ok(Some(session)) => println!("{}", format!("Saved chat {}", session.id).bright_black()),
        Ok(None) => {}
        Err(e) => eprintln!("{}", format!("Could not save chat: {}", e.user_message()).red()),
    }
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

fn attach(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Cannot read image {:?}", path))?;
    Ok(JpegDataUriCodec.encode(&bytes))
}

fn report(outcome: studymate_core::Result<Option<Message>>) {
    match outcome {
        Ok(Some(reply)) => print_message(&reply),
        Ok(None) => {}
        Err(e) => eprintln!("{}", e.user_message().red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/clear"), ReplCommand::Clear);
        assert_eq!(ReplCommand::parse(" /explain "), ReplCommand::Explain);
        assert_eq!(
            ReplCommand::parse("what is 2 + 2?"),
            ReplCommand::Say("what is 2 + 2?".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/plot x"),
            ReplCommand::Unknown("/plot".to_string())
        );
    }

    #[test]
    fn test_parse_image_command() {
        assert_eq!(
            ReplCommand::parse("/image task.jpg  solve question 3"),
            ReplCommand::Image {
                path: PathBuf::from("task.jpg"),
                question: "solve question 3".to_string(),
            }
        );
        assert_eq!(
            ReplCommand::parse("/image task.jpg"),
            ReplCommand::Image {
                path: PathBuf::from("task.jpg"),
                question: String::new(),
            }
        );
        assert_eq!(
            ReplCommand::parse("/image"),
            ReplCommand::Unknown("/image".to_string())
        );
    }

    #[test]
    fn test_subject_from_options() {
        let options = |subject: Option<&str>, translate| ChatOptions {
            subject: subject.map(str::to_string),
            translate,
            from: "auto".to_string(),
            to: "English".to_string(),
            resume: None,
        };
        assert_eq!(options(None, false).subject(), Subject::OpenTopic);
        assert_eq!(options(Some("Math"), false).subject(), Subject::topic("Math"));
        assert_eq!(options(None, true).subject(), Subject::Translate);
    }
}
