//! CLI argument parsing and startup utilities
//!
//! Handles command-line argument parsing and resolution of the service URL
//! and visitor id from flags, environment and config.

use std::env;

use anyhow::{bail, Context, Result};
use reqwest::Url;

use crate::config::Config;
use crate::game::VisitorId;

pub const BASE_URL_ENV: &str = "YEARGUESS_BASE_URL";
pub const VISITOR_ID_ENV: &str = "YEARGUESS_VISITOR_ID";

pub const USAGE: &str = "\
Usage: yearguess [--base-url URL] [--visitor ID] [--verbose] [COMMAND]

Commands:
  play               Interactive prompt (default)
  start              Start a game
  ask <question...>  Ask one question about the secret year
  guess <year>       Submit one guess
  help               Show this message

Environment:
  YEARGUESS_BASE_URL    Game service URL
  YEARGUESS_VISITOR_ID  Fixed visitor id (keeps one game across runs)
  YEARGUESS_LOG         Log filter, e.g. yearguess=debug";

/// Subcommand to run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Command {
    /// Interactive prompt
    #[default]
    Play,
    Start,
    Ask(String),
    /// Raw guess text; parsed by the client so bad input is reported the same
    /// way as in the prompt
    Guess(String),
    Help,
}

/// Parsed command-line arguments
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub base_url: Option<String>,
    pub visitor_id: Option<String>,
    pub verbose: bool,
    pub command: Command,
}

/// Parse command-line arguments
pub fn parse_args() -> Result<Args> {
    parse_args_from(env::args().skip(1)) // Skip the binary name
}

pub fn parse_args_from<I>(raw: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut args = Args::default();
    let mut iter = raw.into_iter();
    let mut positional = Vec::new();

    while let Some(arg) = iter.next() {
        // Options go before the command; everything after it belongs to the
        // command, including text starting with '-' (e.g. negative years)
        if !positional.is_empty() {
            positional.push(arg);
            continue;
        }

        match arg.as_str() {
            "--base-url" | "-u" => {
                let value = iter.next().context("--base-url needs a value")?;
                args.base_url = Some(value);
            }
            "--visitor" | "-V" => {
                let value = iter.next().context("--visitor needs a value")?;
                args.visitor_id = Some(value);
            }
            "--verbose" | "-v" => args.verbose = true,
            "--help" | "-h" => {
                args.command = Command::Help;
                return Ok(args);
            }
            _ if arg.starts_with('-') => bail!("Unknown option: {}", arg),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(name) = positional.next() else {
        return Ok(args);
    };
    let rest = positional.collect::<Vec<_>>().join(" ");

    args.command = match name.as_str() {
        "ask" | "q" => Command::Ask(rest),
        // Joined so that "19 90" reaches the client whole and fails to parse
        "guess" | "g" => Command::Guess(rest),
        _ if !rest.is_empty() => bail!("'{}' takes no arguments (options go before the command)", name),
        "play" => Command::Play,
        "start" => Command::Start,
        "help" => Command::Help,
        other => bail!("Unknown command: {}", other),
    };

    Ok(args)
}

/// Resolve the service URL from explicit arg, env var, config file, or default
pub fn resolve_base_url(explicit: Option<&str>, config: &Config) -> Result<String> {
    resolve_base_url_with(explicit, env::var(BASE_URL_ENV).ok(), config)
}

fn resolve_base_url_with(
    explicit: Option<&str>,
    env_value: Option<String>,
    config: &Config,
) -> Result<String> {
    let candidate = explicit
        .map(str::to_string)
        .or_else(|| env_value.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| config.base_url.clone());

    validate_base_url(&candidate)?;
    Ok(candidate)
}

/// Resolve the visitor id from explicit arg, env var, config file, or a fresh one
pub fn resolve_visitor(explicit: Option<&str>, config: &Config) -> VisitorId {
    resolve_visitor_with(explicit, env::var(VISITOR_ID_ENV).ok(), config)
}

fn resolve_visitor_with(
    explicit: Option<&str>,
    env_value: Option<String>,
    config: &Config,
) -> VisitorId {
    if let Some(id) = explicit {
        return VisitorId::from_string(id);
    }

    if let Some(id) = env_value {
        if !id.trim().is_empty() {
            return VisitorId::from_string(id.trim());
        }
    }

    if let Some(id) = &config.visitor_id {
        return VisitorId::from_string(id.clone());
    }

    VisitorId::generate()
}

fn validate_base_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("Invalid base URL: {}", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("Unsupported URL scheme '{}' in {}", other, raw),
    }
}
