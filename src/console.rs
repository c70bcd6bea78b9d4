//! Operator console
//!
//! Parses one line of operator input into a [`Command`] and runs it against
//! the engine. Rendering is left to the caller; every command yields the text
//! to show.

use crate::broadcast::TriviaEvent;
use crate::error::TriviaError;
use crate::state::TriviaEngine;
use crate::types::{Advance, Answer, Question, TriviaResult, Winner};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

pub const WELCOME_MESSAGE: &str = "Streaming Trivia\n\nWrite ? or help to see usage";

pub const HELP_MESSAGE: &str = "
Usage: [command] [...args]

Available commands:

exit                               - Exit current process
clear                              - Clear the console
start                              - Start the trivia
next                               - Skip to the next question
end                                - End the trivia and show the winners
reset                              - Reset the trivia, keeping the questions
set-questions <file>               - Load questions file
add-question <line>                - Append a question (title,points,timeout,options...)
answer <user_id> <username> <text> - Submit an answer on behalf of a user
status                             - Show the game phase and active question
results                            - Show the current results
help                               - Display this message
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Next,
    End,
    Reset,
    SetQuestions(PathBuf),
    AddQuestion(String),
    Answer {
        user_id: String,
        username: String,
        option: String,
    },
    Status,
    Results,
    Help,
    Clear,
    Exit,
}

/// Split off the first whitespace-delimited word
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

impl FromStr for Command {
    type Err = TriviaError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (name, args) = split_word(line.trim());

        let command = match name {
            "start" => Command::Start,
            "next" => Command::Next,
            "end" => Command::End,
            "reset" => Command::Reset,
            "status" => Command::Status,
            "results" => Command::Results,
            "help" | "?" => Command::Help,
            "clear" => Command::Clear,
            "exit" => Command::Exit,
            "set-questions" => {
                if args.is_empty() {
                    return Err(TriviaError::Usage("set-questions <file>"));
                }
                Command::SetQuestions(PathBuf::from(args))
            }
            "add-question" => {
                if args.is_empty() {
                    return Err(TriviaError::Usage(
                        "add-question <title,points,timeout,option[,option...]>",
                    ));
                }
                Command::AddQuestion(args.to_string())
            }
            "answer" => {
                let (user_id, rest) = split_word(args);
                let (username, option) = split_word(rest);
                if user_id.is_empty() || username.is_empty() || option.is_empty() {
                    return Err(TriviaError::Usage("answer <user_id> <username> <option>"));
                }
                Command::Answer {
                    user_id: user_id.to_string(),
                    username: username.to_string(),
                    option: option.trim_end().to_string(),
                }
            }
            other => return Err(TriviaError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }
}

/// Run a command and return the text to show the operator.
///
/// `Clear` and `Exit` are terminal concerns and produce no text.
pub async fn execute(engine: &TriviaEngine, command: Command) -> Result<String, TriviaError> {
    match command {
        Command::Start => {
            let question = engine.start().await?;
            Ok(format!("Trivia started\n{}", describe_question(&question)))
        }

        Command::Next => match engine.next_question().await? {
            Advance::Question(question) => Ok(describe_question(&question)),
            Advance::Ended(winners) => Ok(describe_winners(&winners)),
        },

        Command::End => {
            let winners = engine.end().await;
            Ok(describe_winners(&winners))
        }

        Command::Reset => {
            engine.restart().await;
            let count = engine.get_questions().await.len();
            Ok(format!("Trivia reset ({} questions)", count))
        }

        Command::SetQuestions(path) => {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| TriviaError::Io {
                    path: path.clone(),
                    source,
                })?;
            let questions = engine.parse_questions_from_content(&content);
            let count = questions.len();
            engine.set_questions(questions).await;
            Ok(format!(
                "Loaded {} questions from {}",
                count,
                path.display()
            ))
        }

        Command::AddQuestion(line) => {
            let questions = engine.parse_questions_from_content(&line);
            let count = questions.len();
            for question in questions {
                engine.add_question(question).await;
            }
            Ok(format!("Added {} question(s)", count))
        }

        Command::Answer {
            user_id,
            username,
            option,
        } => {
            let answer = Answer {
                user_id,
                username,
                option,
                timestamp: chrono::Utc::now().timestamp_millis(),
            };
            match engine.try_answer(answer).await {
                Some(result) => Ok(describe_result(&result)),
                None => Ok("Answer ignored: the trivia is not running".to_string()),
            }
        }

        Command::Status => {
            let phase = engine.phase().await;
            let questions = engine.get_questions().await.len();
            let mut out = format!("Phase: {:?} ({} questions)", phase, questions);
            if let Some(question) = engine.get_current_question().await {
                let _ = write!(out, "\n{}", describe_question(&question));
            }
            Ok(out)
        }

        Command::Results => {
            let results = engine.get_results().await;
            if results.is_empty() {
                return Ok("No results yet".to_string());
            }
            Ok(results
                .iter()
                .map(describe_result)
                .collect::<Vec<_>>()
                .join("\n"))
        }

        Command::Help => Ok(HELP_MESSAGE.to_string()),
        Command::Clear | Command::Exit => Ok(String::new()),
    }
}

pub fn describe_question(question: &Question) -> String {
    let mut out = format!("{} ({} points)", question.title, question.points);
    for (index, option) in question.options.iter().enumerate() {
        let _ = write!(out, "\n  {}. {}", index + 1, option);
    }
    out
}

fn describe_result(result: &TriviaResult) -> String {
    format!(
        "{} [{}]: {} points, {} answers",
        result.username, result.user_id, result.score, result.answer_replies
    )
}

pub fn describe_winners(winners: &[Winner]) -> String {
    if winners.is_empty() {
        return "Trivia ended without participants".to_string();
    }
    let names: Vec<String> = winners
        .iter()
        .map(|w| format!("{} [{}]", w.username, w.user_id))
        .collect();
    format!(
        "Trivia ended! Winner(s) with {} points: {}",
        winners[0].score,
        names.join(", ")
    )
}

/// Text for events the operator did not trigger directly (timer advance)
pub fn describe_event(event: &TriviaEvent) -> String {
    match event {
        TriviaEvent::QuestionStarted { question, time_ms } => format!(
            "Next question, {}s to answer\n{}",
            time_ms / 1000,
            describe_question(question)
        ),
        TriviaEvent::GameEnded { winners } => describe_winners(winners),
        TriviaEvent::GameReset { question_count } => {
            format!("Trivia reset ({} questions)", question_count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("start".parse::<Command>().unwrap(), Command::Start);
        assert_eq!("  end ".parse::<Command>().unwrap(), Command::End);
        assert_eq!("?".parse::<Command>().unwrap(), Command::Help);
        assert_eq!("help".parse::<Command>().unwrap(), Command::Help);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_set_questions() {
        assert_eq!(
            "set-questions questions.txt".parse::<Command>().unwrap(),
            Command::SetQuestions(PathBuf::from("questions.txt"))
        );
        assert!(matches!(
            "set-questions".parse::<Command>(),
            Err(TriviaError::Usage(_))
        ));
    }

    #[test]
    fn test_parse_answer_keeps_spaces_in_option() {
        let command = "answer u1 Ada 299792458 m/s ".parse::<Command>().unwrap();
        assert_eq!(
            command,
            Command::Answer {
                user_id: "u1".to_string(),
                username: "Ada".to_string(),
                option: "299792458 m/s".to_string(),
            }
        );

        assert!(matches!(
            "answer u1 Ada".parse::<Command>(),
            Err(TriviaError::Usage(_))
        ));
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = "connect twitch".parse::<Command>().unwrap_err();
        assert!(matches!(err, TriviaError::UnknownCommand(ref c) if c == "connect"));
        assert_eq!(err.to_string(), "Command: connect not found");
    }

    #[test]
    fn test_describe_winners() {
        let winners = vec![
            Winner {
                user_id: "u1".to_string(),
                username: "Ada".to_string(),
                score: 30,
            },
            Winner {
                user_id: "u2".to_string(),
                username: "Bob".to_string(),
                score: 30,
            },
        ];
        assert_eq!(
            describe_winners(&winners),
            "Trivia ended! Winner(s) with 30 points: Ada [u1], Bob [u2]"
        );
        assert_eq!(describe_winners(&[]), "Trivia ended without participants");
    }

    #[tokio::test]
    async fn test_execute_answer_when_idle() {
        let engine = TriviaEngine::default();
        let out = execute(
            &engine,
            Command::Answer {
                user_id: "u1".to_string(),
                username: "Ada".to_string(),
                option: "blue".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(out.contains("not running"));
    }
}
