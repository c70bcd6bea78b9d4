//! Game lifecycle: Idle -> Running -> Ended, back to Idle on reset.
//!
//! Each running question owns one spawned timer task. Every transition that
//! changes the active question aborts the previous timer, and a timer only
//! acts if its epoch still matches the armed one.

use super::score::compute_winners;
use super::{now_millis, GameState, QuestionTimer, TriviaEngine};
use crate::broadcast::TriviaEvent;
use crate::error::TriviaError;
use crate::types::*;
use std::time::Duration;

impl TriviaEngine {
    /// Start (or restart the timer of) the active question.
    ///
    /// Calling this while running re-arms the timer of the current question.
    pub async fn start(&self) -> Result<Question, TriviaError> {
        let mut state = self.state.write().await;
        self.start_locked(&mut state)
    }

    /// Advance to the following question, or end the game after the last one
    pub async fn next_question(&self) -> Result<Advance, TriviaError> {
        let mut state = self.state.write().await;
        if state.phase == TriviaPhase::Ended {
            return Err(TriviaError::GameEnded);
        }
        if state.active_question_id.is_none() {
            return Err(TriviaError::NoActiveQuestion);
        }
        Ok(self.advance_locked(&mut state))
    }

    /// Stop the game and return everyone tied at the highest score
    pub async fn end(&self) -> Vec<Winner> {
        let mut state = self.state.write().await;
        self.end_locked(&mut state)
    }

    /// Start a fresh game with a new question sequence
    pub async fn reset(&self, questions: Vec<Question>) {
        let mut state = self.state.write().await;
        self.reset_locked(&mut state, questions);
    }

    /// Start a fresh game with the current question sequence
    pub async fn restart(&self) {
        let mut state = self.state.write().await;
        let questions = std::mem::take(&mut state.questions);
        self.reset_locked(&mut state, questions);
    }

    pub(super) fn start_locked(&self, state: &mut GameState) -> Result<Question, TriviaError> {
        if state.phase == TriviaPhase::Ended {
            return Err(TriviaError::GameEnded);
        }
        let default_ms = self.config.default_question_time.as_millis() as u64;

        let question = state
            .current_question_mut()
            .ok_or(TriviaError::NoActiveQuestion)?;
        question.started_at.get_or_insert_with(now_millis);
        let question = question.clone();
        let time_ms = question.time_ms.filter(|ms| *ms > 0).unwrap_or(default_ms);

        state.cancel_timer();
        state.phase = TriviaPhase::Running;
        self.arm_timer(state, Duration::from_millis(time_ms));

        tracing::info!(
            "Question {} running for {}ms: {}",
            question.id,
            time_ms,
            question.title
        );
        self.publish(TriviaEvent::QuestionStarted {
            question: question.clone(),
            time_ms,
        });
        Ok(question)
    }

    fn advance_locked(&self, state: &mut GameState) -> Advance {
        state.cancel_timer();

        let next = state
            .active_position()
            .map(|position| position + 1)
            .filter(|next| *next < state.questions.len());

        let Some(index) = next else {
            return Advance::Ended(self.end_locked(state));
        };

        let question = &mut state.questions[index];
        question.started_at = Some(now_millis());
        state.active_question_id = Some(question.id.clone());

        match self.start_locked(state) {
            Ok(question) => Advance::Question(question),
            Err(e) => {
                tracing::error!("Failed to start next question: {}", e);
                Advance::Ended(self.end_locked(state))
            }
        }
    }

    fn end_locked(&self, state: &mut GameState) -> Vec<Winner> {
        state.cancel_timer();
        state.phase = TriviaPhase::Ended;

        let winners = compute_winners(&state.results);
        tracing::info!(
            "Trivia ended with {} participants, {} winner(s)",
            state.results.len(),
            winners.len()
        );
        self.publish(TriviaEvent::GameEnded {
            winners: winners.clone(),
        });
        winners
    }

    fn reset_locked(&self, state: &mut GameState, mut questions: Vec<Question>) {
        state.cancel_timer();
        for question in &mut questions {
            question.started_at = None;
        }

        state.results.clear();
        state.phase = TriviaPhase::Idle;
        state.active_question_id = questions.first().map(|q| q.id.clone());
        state.questions = questions;

        tracing::info!("Trivia reset with {} questions", state.questions.len());
        self.publish(TriviaEvent::GameReset {
            question_count: state.questions.len(),
        });
    }

    fn arm_timer(&self, state: &mut GameState, duration: Duration) {
        state.timer_epoch += 1;
        let epoch = state.timer_epoch;

        let engine = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            engine.on_timer_fired(epoch).await;
        });

        state.timer = Some(QuestionTimer { epoch, handle });
    }

    async fn on_timer_fired(&self, epoch: u64) {
        let mut state = self.state.write().await;
        if state.timer.as_ref().map(|t| t.epoch) != Some(epoch) {
            tracing::debug!("Ignoring stale question timer #{}", epoch);
            return;
        }
        // This task is the timer; forget the handle rather than aborting ourselves
        state.timer = None;

        tracing::info!("Time is up for the active question");
        self.advance_locked(&mut state);
    }

    #[cfg(test)]
    async fn has_pending_timer(&self) -> bool {
        self.state.read().await.timer.is_some()
    }
}
