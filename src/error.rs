use std::path::PathBuf;

/// Errors surfaced by the trivia engine and the operator console
#[derive(Debug, thiserror::Error)]
pub enum TriviaError {
    #[error("No active question (the question set is empty)")]
    NoActiveQuestion,

    #[error("The game has ended, reset it before starting again")]
    GameEnded,

    #[error("Command: {0} not found")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Failed to read questions file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
