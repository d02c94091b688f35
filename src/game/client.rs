//! GameClient - main interface to the year-guessing service
//!
//! Handles:
//! - Starting a game for the session's visitor
//! - Asking free-text questions about the secret year
//! - Submitting year guesses
//!
//! Every operation issues at most one request and never retries. Input that
//! fails validation is rejected before anything is sent.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::response::{
    GuessRequest, QuestionRequest, ServerResponse, StartRequest, GUESS_PATH, QUESTION_PATH,
    START_PATH,
};
use super::transport::{GameTransport, HttpTransport, TransportError};
use super::visitor::VisitorId;

/// Failure of a game operation; `Display` is the text shown to the player
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Please enter a question!")]
    EmptyQuestion,
    #[error("Please enter a valid year!")]
    InvalidGuess,
    /// Server-reported error, message passed through verbatim
    #[error("{0}")]
    Server(String),
    #[error("The game service reported an error without a message")]
    ServerUnspecified,
    #[error("Network error: {0}")]
    Network(#[from] TransportError),
    /// Success response missing the field the endpoint promises
    #[error("Network error: {0}")]
    Malformed(String),
}

impl GameError {
    /// Whether the error was raised locally, before any request was sent
    pub fn is_validation(&self) -> bool {
        matches!(self, GameError::EmptyQuestion | GameError::InvalidGuess)
    }

    /// Whether the game service itself rejected the request
    pub fn is_server(&self) -> bool {
        matches!(self, GameError::Server(_) | GameError::ServerUnspecified)
    }
}

/// Result of POST /api/game/start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStarted {
    /// Secret year as exposed by the service for debugging, if it sent one
    pub debug_year: Option<i64>,
}

impl fmt::Display for GameStarted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.debug_year {
            Some(year) => write!(f, "Game started! Debug year: {}", year),
            None => write!(f, "Game started! Debug year: unknown"),
        }
    }
}

/// Result of POST /api/game/question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "You: {}\nAI: {}", self.question, self.answer)
    }
}

/// Result of POST /api/game/guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub guess: i64,
    pub message: String,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Your guess: {}\nResult: {}", self.guess, self.message)
    }
}

/// Client for one player session
///
/// The visitor id is fixed at construction and sent with every request.
/// Methods take `&self`; concurrent calls are allowed and may settle in any
/// order.
pub struct GameClient<T = HttpTransport> {
    transport: T,
    visitor: VisitorId,
}

impl GameClient<HttpTransport> {
    /// Create a client that talks HTTP to `base_url`
    pub fn connect(base_url: &str, visitor: VisitorId) -> Result<Self, TransportError> {
        Ok(Self::new(HttpTransport::new(base_url)?, visitor))
    }
}

impl<T: GameTransport> GameClient<T> {
    pub fn new(transport: T, visitor: VisitorId) -> Self {
        Self { transport, visitor }
    }

    pub fn visitor(&self) -> &VisitorId {
        &self.visitor
    }

    /// Start (or restart) a game for this visitor
    pub async fn start_game(&self) -> Result<GameStarted, GameError> {
        let resp = self
            .post(START_PATH, &StartRequest { visitor_id: &self.visitor })
            .await?;
        Ok(GameStarted {
            debug_year: resp.debug_year,
        })
    }

    /// Ask a question about the secret year
    ///
    /// Blank input is rejected without contacting the service.
    pub async fn ask_question(&self, question: &str) -> Result<Answer, GameError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(GameError::EmptyQuestion);
        }

        let resp = self
            .post(
                QUESTION_PATH,
                &QuestionRequest {
                    visitor_id: &self.visitor,
                    question,
                },
            )
            .await?;
        let answer = resp
            .answer
            .ok_or_else(|| GameError::Malformed("response has no answer".to_string()))?;

        Ok(Answer {
            question: question.to_string(),
            answer,
        })
    }

    /// Parse raw player input as a year and submit it
    ///
    /// Input that is not a base-10 integer is rejected without contacting the
    /// service.
    pub async fn make_guess(&self, input: &str) -> Result<Verdict, GameError> {
        let year = parse_guess(input)?;
        self.submit_guess(year).await
    }

    /// Submit an already-parsed year
    pub async fn submit_guess(&self, year: i64) -> Result<Verdict, GameError> {
        let resp = self
            .post(
                GUESS_PATH,
                &GuessRequest {
                    visitor_id: &self.visitor,
                    guess: year,
                },
            )
            .await?;
        let message = resp
            .message
            .ok_or_else(|| GameError::Malformed("response has no message".to_string()))?;

        Ok(Verdict {
            guess: year,
            message,
        })
    }

    /// Send one request and split the response into success or server error
    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<ServerResponse, GameError> {
        let body = serde_json::to_value(body).map_err(TransportError::Encode)?;
        debug!(path, visitor = %self.visitor, "game request");

        let resp = match self.transport.post_json(path, body).await {
            Ok(resp) => resp,
            Err(err) => {
                warn!(path, error = %err, "game request failed");
                return Err(err.into());
            }
        };

        if resp.is_success() {
            return Ok(resp);
        }

        warn!(path, status = %resp.status, "game service returned an error");
        match resp.message {
            Some(message) if !message.trim().is_empty() => Err(GameError::Server(message)),
            _ => Err(GameError::ServerUnspecified),
        }
    }
}

fn parse_guess(input: &str) -> Result<i64, GameError> {
    input.trim().parse::<i64>().map_err(|_| GameError::InvalidGuess)
}
