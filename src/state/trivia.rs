//! Question sequence management

use super::{now_millis, TriviaEngine};
use crate::types::{Question, TriviaPhase};

impl TriviaEngine {
    /// Replace the question sequence and activate its first question.
    /// Results and phase are left alone (see `reset` for a fresh game).
    ///
    /// While running, the new first question gets its own timer. An empty
    /// set leaves the game running with no active question and no timer.
    pub async fn set_questions(&self, questions: Vec<Question>) -> Option<Question> {
        let mut state = self.state.write().await;
        state.cancel_timer();
        state.questions = questions;
        state.active_question_id = state.questions.first().map(|q| q.id.clone());

        let Some(question) = state.current_question_mut() else {
            tracing::warn!("Question set is empty, no question is active");
            return None;
        };
        question.started_at = Some(now_millis());
        let question = question.clone();

        tracing::info!(
            "Loaded {} questions, active: {}",
            state.questions.len(),
            question.id
        );
        if state.phase == TriviaPhase::Running {
            return self.start_locked(&mut state).ok();
        }
        Some(question)
    }

    /// Append a question to the end of the sequence
    pub async fn add_question(&self, question: Question) {
        let mut state = self.state.write().await;
        let activates = state.active_question_id.is_none();
        if activates {
            state.active_question_id = Some(question.id.clone());
        }
        tracing::info!("Added question: {}", question.id);
        state.questions.push(question);

        if activates && state.phase == TriviaPhase::Running {
            if let Err(e) = self.start_locked(&mut state) {
                tracing::error!("Failed to start added question: {}", e);
            }
        }
    }

    pub async fn get_questions(&self) -> Vec<Question> {
        self.state.read().await.questions.clone()
    }

    /// Get the active question (if any)
    pub async fn get_current_question(&self) -> Option<Question> {
        self.state.read().await.current_question().cloned()
    }

    pub async fn get_is_started(&self) -> bool {
        self.phase().await == TriviaPhase::Running
    }

    pub async fn phase(&self) -> TriviaPhase {
        self.state.read().await.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_questions() -> Vec<Question> {
        vec![
            Question::new(
                "What's the speed of light?",
                100,
                vec!["1235km/h".to_string(), "299792458m/s".to_string()],
                Some(1),
            ),
            Question::new(
                "What color is the sky?",
                10,
                vec!["blue".to_string(), "red".to_string()],
                Some(0),
            ),
        ]
    }

    #[tokio::test]
    async fn test_set_questions_stamps_first() {
        let engine = TriviaEngine::default();
        let questions = make_questions();

        let active = engine.set_questions(questions.clone()).await.unwrap();

        assert_eq!(active.id, questions[0].id);
        assert!(active.started_at.is_some());
        assert_eq!(engine.get_current_question().await, Some(active));
        assert_eq!(engine.get_questions().await.len(), 2);
    }

    #[tokio::test]
    async fn test_set_questions_keeps_results_and_phase() {
        let engine = TriviaEngine::default();
        engine.set_questions(make_questions()).await;
        engine.start().await.unwrap();
        engine
            .try_answer(crate::types::Answer {
                user_id: "u1".to_string(),
                username: "Ada".to_string(),
                option: "299792458m/s".to_string(),
                timestamp: 0,
            })
            .await;

        engine.set_questions(make_questions()).await;

        assert!(engine.get_is_started().await);
        assert_eq!(engine.get_results().await.len(), 1);
        engine.end().await;
    }

    #[tokio::test]
    async fn test_set_empty_questions() {
        let engine = TriviaEngine::default();
        engine.set_questions(make_questions()).await;

        assert!(engine.set_questions(Vec::new()).await.is_none());
        assert!(engine.get_current_question().await.is_none());
        assert!(engine.get_questions().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_question_appends() {
        let engine = TriviaEngine::default();
        let questions = make_questions();
        engine.set_questions(questions.clone()).await;

        let extra = Question::new("How many?", 15, vec!["1".to_string()], Some(0));
        engine.add_question(extra.clone()).await;

        let all = engine.get_questions().await;
        assert_eq!(all.len(), 3);
        assert_eq!(all[2], extra);
        assert_eq!(engine.get_current_question().await.unwrap().id, questions[0].id);
    }

    #[tokio::test]
    async fn test_add_question_to_empty_engine_activates_it() {
        let engine = TriviaEngine::default();
        let question = Question::new("Only?", 1, vec!["y".to_string()], Some(0));

        engine.add_question(question.clone()).await;

        assert_eq!(engine.get_current_question().await, Some(question));
    }

    #[tokio::test]
    async fn test_current_question_is_stable() {
        let engine = TriviaEngine::default();
        engine.set_questions(make_questions()).await;

        let first = engine.get_current_question().await;
        let second = engine.get_current_question().await;
        assert_eq!(first, second);
    }
}
