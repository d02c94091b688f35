mod cli;
mod config;
mod game;
mod play;

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command, USAGE};
use crate::config::Config;
use crate::game::GameClient;
use crate::play::Action;

/// Env var holding the log filter
const LOG_ENV: &str = "YEARGUESS_LOG";

/// Logs go to stderr so stdout only carries game output
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("yearguess=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{}\n\n{}", err, USAGE);
            std::process::exit(2);
        }
    };

    if args.command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    init_logging(args.verbose);
    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let base_url = cli::resolve_base_url(args.base_url.as_deref(), &config)?;
    let visitor = cli::resolve_visitor(args.visitor_id.as_deref(), &config);
    debug!(%base_url, %visitor, "session configured");

    let client = GameClient::connect(&base_url, visitor)
        .context("Failed to create HTTP client")?;

    let action = match args.command {
        Command::Play => return play::run_interactive(&client, &base_url).await,
        Command::Help => return Ok(()),
        Command::Start => Action::Start,
        Command::Ask(question) => Action::Ask(question),
        Command::Guess(input) => Action::Guess(input),
    };

    match play::perform(&client, &action).await {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", play::render_error(&err));
            std::process::exit(1);
        }
    }
}
