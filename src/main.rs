use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use streamtrivia::{
    config::TriviaConfig,
    console::{self, Command},
    state::TriviaEngine,
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streamtrivia=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = TriviaConfig::from_env();
    tracing::info!(
        "Starting Streaming Trivia (default question time {:?})",
        config.default_question_time
    );

    let engine = TriviaEngine::new(config.clone());

    if let Some(path) = config.questions_file {
        match console::execute(&engine, Command::SetQuestions(path)).await {
            Ok(msg) => tracing::info!("{}", msg),
            Err(e) => tracing::warn!("{}", e),
        }
    }

    // Report timer-driven progress that no command printed
    let mut events = engine.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => println!("\n{}", console::describe_event(&event)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Console missed {} trivia events", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("{}", console::WELCOME_MESSAGE);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read console input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Exit) => break,
            Ok(Command::Clear) => print!("\x1B[2J\x1B[1;1H"),
            // Commands that emit events are reported by the event task
            Ok(command @ (Command::Start | Command::Next | Command::End | Command::Reset)) => {
                if let Err(e) = console::execute(&engine, command).await {
                    println!("{}", e);
                }
            }
            Ok(command) => match console::execute(&engine, command).await {
                Ok(msg) => println!("{}", msg),
                Err(e) => println!("{}", e),
            },
            Err(e) => println!("\n{}\n{}", e, console::HELP_MESSAGE),
        }
    }

    let winners = engine.end().await;
    tracing::info!("Shutting down with {} winner(s)", winners.len());
}
