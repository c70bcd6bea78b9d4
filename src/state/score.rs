use super::TriviaEngine;
use crate::types::*;

/// Everyone tied at the highest score (0 when nobody answered).
/// Ties keep the order in which users first answered.
pub fn compute_winners(results: &[TriviaResult]) -> Vec<Winner> {
    let highest = results.iter().map(|r| r.score).max().unwrap_or(0);

    let mut winners: Vec<Winner> = results
        .iter()
        .filter(|r| r.score == highest)
        .map(Winner::from)
        .collect();
    // Stable, so equal scores stay in insertion order
    winners.sort_by(|a, b| b.score.cmp(&a.score));
    winners
}

impl TriviaEngine {
    /// Score an answer against the active question.
    ///
    /// Ignored (returns None) unless the game is running. Every accepted
    /// answer counts as a reply, including repeats for the same question.
    pub async fn try_answer(&self, answer: Answer) -> Option<TriviaResult> {
        let mut state = self.state.write().await;
        if state.phase != TriviaPhase::Running {
            tracing::debug!(
                "Ignoring answer from {}: trivia is not running",
                answer.user_id
            );
            return None;
        }

        let question = state.current_question()?;
        let correct = question.is_correct(&answer.option);
        let points = if correct { question.points } else { 0 };
        let question_id = question.id.clone();

        let index = match state
            .results
            .iter()
            .position(|r| r.user_id == answer.user_id)
        {
            Some(index) => index,
            None => {
                state.results.push(TriviaResult {
                    user_id: answer.user_id.clone(),
                    username: answer.username.clone(),
                    score: 0,
                    answer_replies: 0,
                });
                state.results.len() - 1
            }
        };

        let result = &mut state.results[index];
        result.username = answer.username;
        result.score = result.score.saturating_add(points);
        result.answer_replies += 1;

        tracing::debug!(
            "Answer from {} to {}: {:?} ({})",
            result.user_id,
            question_id,
            answer.option,
            if correct { "correct" } else { "wrong" }
        );
        Some(result.clone())
    }

    /// Results in order of first answer (not sorted by score)
    pub async fn get_results(&self) -> Vec<TriviaResult> {
        self.state.read().await.results.clone()
    }
}
