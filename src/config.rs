use crate::types::{DEFAULT_CORRECT_MARKER, DEFAULT_QUESTION_TIME_MS};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the trivia engine and console
#[derive(Debug, Clone)]
pub struct TriviaConfig {
    /// How long a question stays active when it has no own time
    pub default_question_time: Duration,
    /// Prefix marking the correct option in question files
    pub correct_marker: char,
    /// Question file loaded at startup
    pub questions_file: Option<PathBuf>,
    /// Buffer size of the lifecycle event channel
    pub event_capacity: usize,
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            default_question_time: Duration::from_millis(DEFAULT_QUESTION_TIME_MS),
            correct_marker: DEFAULT_CORRECT_MARKER,
            questions_file: None,
            event_capacity: 100,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = non_empty_var(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}

impl TriviaConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let default_question_time = parse_var::<u64>("TRIVIA_DEFAULT_QUESTION_MS")
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.default_question_time);

        let correct_marker = non_empty_var("TRIVIA_CORRECT_MARKER")
            .and_then(|s| s.chars().next())
            .unwrap_or(defaults.correct_marker);

        let questions_file = non_empty_var("TRIVIA_QUESTIONS_FILE").map(PathBuf::from);

        let event_capacity = parse_var::<usize>("TRIVIA_EVENT_CAPACITY")
            .filter(|n| *n > 0)
            .unwrap_or(defaults.event_capacity);

        Self {
            default_question_time,
            correct_marker,
            questions_file,
            event_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 4] = [
        "TRIVIA_DEFAULT_QUESTION_MS",
        "TRIVIA_CORRECT_MARKER",
        "TRIVIA_QUESTIONS_FILE",
        "TRIVIA_EVENT_CAPACITY",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = TriviaConfig::from_env();

        assert_eq!(config.default_question_time, Duration::from_secs(600));
        assert_eq!(config.correct_marker, '@');
        assert!(config.questions_file.is_none());
        assert_eq!(config.event_capacity, 100);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("TRIVIA_DEFAULT_QUESTION_MS", "15000");
        std::env::set_var("TRIVIA_CORRECT_MARKER", "*");
        std::env::set_var("TRIVIA_QUESTIONS_FILE", " questions.txt ");

        let config = TriviaConfig::from_env();
        clear_env();

        assert_eq!(config.default_question_time, Duration::from_millis(15000));
        assert_eq!(config.correct_marker, '*');
        assert_eq!(config.questions_file, Some(PathBuf::from("questions.txt")));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_values_fall_back() {
        clear_env();
        std::env::set_var("TRIVIA_DEFAULT_QUESTION_MS", "soon");
        std::env::set_var("TRIVIA_EVENT_CAPACITY", "0");

        let config = TriviaConfig::from_env();
        clear_env();

        assert_eq!(config.default_question_time, Duration::from_secs(600));
        assert_eq!(config.event_capacity, 100);
    }
}
