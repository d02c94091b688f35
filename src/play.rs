//! Terminal front end for the game client
//!
//! Maps player input to client calls and prints the resulting text. The
//! interactive loop reads the next line only after the current call settles,
//! so requests from one prompt never overlap.

use std::io::{stdout, Write};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::game::{GameClient, GameError, GameTransport};

// ANSI color codes
const CYAN: &str = "\x1b[36m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\r\x1b[2K";

const HELP: &str = "\
  start          start a new game
  ask <text>     ask a question (alias: q)
  guess <year>   guess the year (alias: g)
  help           show this message
  quit           leave (alias: exit)
A bare number is taken as a guess, any other text as a question.";

/// A request to the game service
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    Ask(String),
    Guess(String),
}

/// One line of interactive input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Empty,
    Help,
    Quit,
    Do(Action),
}

/// Parse one line typed at the prompt
pub fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "start" if rest.is_empty() => Input::Do(Action::Start),
        "help" | "?" if rest.is_empty() => Input::Help,
        "quit" | "exit" if rest.is_empty() => Input::Quit,
        "ask" | "q" => Input::Do(Action::Ask(rest.to_string())),
        "guess" | "g" => Input::Do(Action::Guess(rest.to_string())),
        _ if line.parse::<i64>().is_ok() => Input::Do(Action::Guess(line.to_string())),
        _ => Input::Do(Action::Ask(line.to_string())),
    }
}

/// Run one action against the service, returning the text to show
pub async fn perform<T: GameTransport>(
    client: &GameClient<T>,
    action: &Action,
) -> Result<String, GameError> {
    match action {
        Action::Start => client.start_game().await.map(|started| started.to_string()),
        Action::Ask(question) => client.ask_question(question).await.map(|a| a.to_string()),
        Action::Guess(input) => client.make_guess(input).await.map(|v| v.to_string()),
    }
}

/// Text shown for a failed action
///
/// Server messages get an `Error:` label; validation and network errors
/// already read as complete sentences.
pub fn render_error(err: &GameError) -> String {
    if err.is_server() {
        format!("Error: {}", err)
    } else {
        err.to_string()
    }
}

/// Interactive prompt on stdin/stdout until EOF or `quit`
pub async fn run_interactive<T: GameTransport>(client: &GameClient<T>, base_url: &str) -> Result<()> {
    println!("{BOLD}{CYAN}YEARGUESS{RESET} {DIM}{} as {}{RESET}", base_url, client.visitor());
    println!("{DIM}Type 'start' to begin, 'help' for commands.{RESET}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = stdout();

    loop {
        write!(out, "{BOLD}>{RESET} ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let action = match parse_line(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => {
                println!("{}", HELP);
                continue;
            }
            Input::Do(action) => action,
        };

        write!(out, "{DIM}Loading...{RESET}")?;
        out.flush()?;
        let result = perform(client, &action).await;
        write!(out, "{CLEAR_LINE}")?;

        match result {
            Ok(text) => println!("{}", text),
            Err(err) if err.is_validation() => println!("{YELLOW}{}{RESET}", render_error(&err)),
            Err(err) => println!("{RED}{}{RESET}", render_error(&err)),
        }
    }

    Ok(())
}
