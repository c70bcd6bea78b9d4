mod game;
mod score;
mod trivia;

pub use score::compute_winners;

use crate::broadcast::TriviaEvent;
use crate::config::TriviaConfig;
use crate::parser::{parse_questions, ParseOptions};
use crate::types::*;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

/// Pending "time is up" task for the active question
struct QuestionTimer {
    epoch: u64,
    handle: JoinHandle<()>,
}

/// Mutable game state, only ever touched under the engine's lock
struct GameState {
    questions: Vec<Question>,
    active_question_id: Option<QuestionId>,
    results: Vec<TriviaResult>,
    phase: TriviaPhase,
    timer: Option<QuestionTimer>,
    timer_epoch: u64,
}

impl GameState {
    fn new(questions: Vec<Question>) -> Self {
        Self {
            active_question_id: questions.first().map(|q| q.id.clone()),
            questions,
            results: Vec::new(),
            phase: TriviaPhase::Idle,
            timer: None,
            timer_epoch: 0,
        }
    }

    fn active_position(&self) -> Option<usize> {
        let id = self.active_question_id.as_ref()?;
        self.questions.iter().position(|q| &q.id == id)
    }

    fn current_question(&self) -> Option<&Question> {
        self.active_position().map(|i| &self.questions[i])
    }

    fn current_question_mut(&mut self) -> Option<&mut Question> {
        let position = self.active_position()?;
        self.questions.get_mut(position)
    }

    /// Abort the pending question timer, if any
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.handle.abort();
            tracing::debug!("Cancelled question timer #{}", timer.epoch);
        }
    }
}

/// The trivia progression engine.
///
/// Cheap to clone; all clones share the same game. Hand a clone to every
/// collaborator (console, comment ingestion) instead of using a global.
#[derive(Clone)]
pub struct TriviaEngine {
    state: Arc<RwLock<GameState>>,
    config: Arc<TriviaConfig>,
    events: broadcast::Sender<TriviaEvent>,
}

impl TriviaEngine {
    pub fn new(config: TriviaConfig) -> Self {
        Self::with_questions(config, Vec::new())
    }

    /// Create an idle engine whose first question is already active
    pub fn with_questions(config: TriviaConfig, questions: Vec<Question>) -> Self {
        let (tx, _rx) = broadcast::channel(config.event_capacity);
        Self {
            state: Arc::new(RwLock::new(GameState::new(questions))),
            config: Arc::new(config),
            events: tx,
        }
    }

    /// Receive lifecycle events (question started, game ended, reset)
    pub fn subscribe(&self) -> broadcast::Receiver<TriviaEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: TriviaEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Parse a question file's content with this engine's marker and default time
    pub fn parse_questions_from_content(&self, content: &str) -> Vec<Question> {
        parse_questions(
            content,
            &ParseOptions {
                correct_marker: self.config.correct_marker,
                default_question_time: self.config.default_question_time,
            },
        )
    }
}

impl Default for TriviaEngine {
    fn default() -> Self {
        Self::new(TriviaConfig::default())
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_engine_is_idle_and_empty() {
        let engine = TriviaEngine::default();

        assert_eq!(engine.phase().await, TriviaPhase::Idle);
        assert!(!engine.get_is_started().await);
        assert!(engine.get_questions().await.is_empty());
        assert!(engine.get_current_question().await.is_none());
        assert!(engine.get_results().await.is_empty());
    }

    #[tokio::test]
    async fn test_with_questions_activates_first() {
        let questions = vec![
            Question::new("Q1", 1, vec!["a".to_string()], Some(0)),
            Question::new("Q2", 2, vec!["b".to_string()], Some(0)),
        ];
        let engine = TriviaEngine::with_questions(TriviaConfig::default(), questions.clone());

        assert_eq!(engine.get_questions().await, questions);
        assert_eq!(engine.get_current_question().await, Some(questions[0].clone()));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let engine = TriviaEngine::default();
        let other = engine.clone();

        other
            .add_question(Question::new("Q", 1, vec!["a".to_string()], Some(0)))
            .await;

        assert_eq!(engine.get_questions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_parse_uses_configured_marker() {
        let config = TriviaConfig {
            correct_marker: '#',
            ..TriviaConfig::default()
        };
        let engine = TriviaEngine::new(config);

        let questions = engine.parse_questions_from_content("Q,1,0,a,#b");
        assert_eq!(questions[0].correct_option_index, Some(1));
    }
}
