use anyhow::Result;
use clap::{Parser, Subcommand};
use studymate_core::config::AppConfig;
use studymate_infrastructure::{ConfigService, StudymatePaths};
use tracing_appender::non_blocking::WorkerGuard;

mod commands;
mod logging;
mod render;
mod repl_helper;

#[derive(Parser)]
#[command(name = "studymate")]
#[command(about = "Studymate - homework help in your terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a chat
    Chat {
        /// Topic of the chat (e.g. "Math"); omit for an open question
        #[arg(short, long, conflicts_with = "translate")]
        subject: Option<String>,
        /// Translate every line instead of chatting
        #[arg(long)]
        translate: bool,
        /// Source language for --translate
        #[arg(long, default_value = "auto")]
        from: String,
        /// Target language for --translate
        #[arg(long, default_value = "English")]
        to: String,
        /// Resume a stored session and replay its first question
        #[arg(long, conflicts_with_all = ["subject", "translate"])]
        resume: Option<String>,
    },
    /// Manage past chats
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Split text into plain and formula segments
    Scan {
        /// File to read, or "-" for stdin
        input: String,
        /// Print segments as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List stored sessions, newest first
    List,
    /// Delete a stored session
    Delete { id: String },
}

/// Loads configuration, resolves directories and starts file logging.
fn bootstrap() -> Result<(AppConfig, StudymatePaths, WorkerGuard)> {
    let config = ConfigService::default_location()?.get_config()?;
    let paths = StudymatePaths::new(config.storage.data_dir.clone());
    let guard = logging::init(&paths.logs_dir()?)?;
    Ok((config, paths, guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { input, json } => commands::scan::run(&input, json)?,
        Commands::Chat {
            subject,
            translate,
            from,
            to,
            resume,
        } => {
            let (config, paths, _log_guard) = bootstrap()?;
            let options = commands::chat::ChatOptions {
                subject,
                translate,
                from,
                to,
                resume,
            };
            commands::chat::run(&config, &paths, options).await?
        }
        Commands::History { action } => {
            let (_, paths, _log_guard) = bootstrap()?;
            match action {
                HistoryAction::List => commands::history::list(&paths).await?,
                HistoryAction::Delete { id } => commands::history::delete(&paths, &id).await?,
            }
        }
    }

    Ok(())
}
