use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type QuestionId = String;
pub type UserId = String;

/// Default time a question stays active: 10 minutes
pub const DEFAULT_QUESTION_TIME_MS: u64 = 10 * 60 * 1000;

/// Default marker prefixing the correct option in a question file
pub const DEFAULT_CORRECT_MARKER: char = '@';

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriviaPhase {
    Idle,
    Running,
    Ended,
}

/// A trivia question. Options are order-significant: answers are matched by
/// exact text, then the matched position is compared to `correct_option_index`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub points: u32,
    pub title: String,
    pub options: Vec<String>,
    /// None when the question has no correct answer
    pub correct_option_index: Option<usize>,
    /// Per-question override of the default question time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_ms: Option<u64>,
    /// Unix milliseconds, stamped when the question becomes active
    #[serde(default)]
    pub started_at: Option<i64>,
}

impl Question {
    pub fn new(
        title: impl Into<String>,
        points: u32,
        options: Vec<String>,
        correct_option_index: Option<usize>,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            points,
            title: title.into(),
            options,
            correct_option_index,
            time_ms: None,
            started_at: None,
        }
    }

    /// Whether `option` is exactly the correct choice of this question
    pub fn is_correct(&self, option: &str) -> bool {
        match self.correct_option_index {
            Some(correct) => self.options.iter().position(|o| o == option) == Some(correct),
            None => false,
        }
    }
}

/// An answer observed from a chat/comment source. Consumed immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub user_id: UserId,
    pub username: String,
    pub option: String,
    pub timestamp: i64,
}

/// Accumulated score of one user over the whole game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriviaResult {
    pub user_id: UserId,
    pub username: String,
    pub score: u32,
    pub answer_replies: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Winner {
    pub user_id: UserId,
    pub username: String,
    pub score: u32,
}

impl From<&TriviaResult> for Winner {
    fn from(result: &TriviaResult) -> Self {
        Self {
            user_id: result.user_id.clone(),
            username: result.username.clone(),
            score: result.score,
        }
    }
}

/// Outcome of advancing past the active question
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Question(Question),
    Ended(Vec<Winner>),
}
