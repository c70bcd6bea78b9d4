use crate::types::{Question, Winner};
use serde::{Deserialize, Serialize};

/// Lifecycle notifications published by the engine.
///
/// Scores are only ever sent once the game has ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum TriviaEvent {
    QuestionStarted {
        question: Question,
        /// Milliseconds until the question times out
        time_ms: u64,
    },
    GameEnded {
        winners: Vec<Winner>,
    },
    GameReset {
        question_count: usize,
    },
}
