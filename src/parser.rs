//! Question file parsing
//!
//! One question per line: `title,points,timeout,option[,option...]`.
//! The option prefixed with the correct marker is the right answer.

use crate::types::Question;
use std::time::Duration;

/// Settings that shape how a question file is read
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub correct_marker: char,
    pub default_question_time: Duration,
}

/// Parse every non-blank line of `content` into a question.
///
/// Malformed lines still produce a question: an invalid point value counts as
/// zero and an invalid or zero timeout falls back to the default time.
pub fn parse_questions(content: &str, options: &ParseOptions) -> Vec<Question> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| parse_line(line, options))
        .collect()
}

/// Read the digits a field starts with, so "10pts" is 10 and "15000ms" is 15000
fn leading_number<T: std::str::FromStr>(raw: &str) -> Option<T> {
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}

fn parse_line(line: &str, opts: &ParseOptions) -> Question {
    let mut fields = line.split(',').map(str::trim);

    let title = fields.next().unwrap_or_default().to_string();

    let points = match fields.next() {
        Some(raw) => leading_number::<u32>(raw).unwrap_or_else(|| {
            tracing::warn!("Invalid points {:?} in question {:?}, using 0", raw, title);
            0
        }),
        None => {
            tracing::warn!("Question {:?} has no points, using 0", title);
            0
        }
    };

    let default_ms = opts.default_question_time.as_millis() as u64;
    let time_ms = fields
        .next()
        .and_then(leading_number::<u64>)
        .filter(|ms| *ms > 0)
        .unwrap_or(default_ms);

    let mut correct_option_index = None;
    let options = fields
        .enumerate()
        .map(|(index, option)| match option.strip_prefix(opts.correct_marker) {
            Some(stripped) => {
                correct_option_index.get_or_insert(index);
                stripped.to_string()
            }
            None => option.to_string(),
        })
        .collect();

    let mut question = Question::new(title, points, options, correct_option_index);
    question.time_ms = Some(time_ms);
    question
}
