//! Terminal presenter for the Nicobar paradox game.
//!
//! Usage: `paradox [config.toml]`, then type a decision number, `r` to reset, or `q` to quit.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use paradox_engine::{
    AnalyticsSink, BoardView, DecisionEngine, EngineConfig, EngineError, EventSubscriber,
    LogTransport, Rejection, Session, SubmitOutcome, TextPresenter,
};
use paradox_rules::DECISIONS;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("paradox_engine=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => EngineConfig::default(),
    };
    info!(
        max_turns = config.max_turns,
        analytics = config.analytics.is_active(),
        "Paradox starting..."
    );

    let sink: Box<dyn EventSubscriber> =
        Box::new(AnalyticsSink::new(config.analytics.clone(), LogTransport));
    let mut session = Session::with_subscribers(&config, vec![sink]);
    let presenter = TextPresenter::new();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", presenter.announce_new_game(config.max_turns));
    print_board(&presenter, &session);

    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "q" | "quit" => break,
            "r" | "reset" => {
                session.reset();
                println!("{}", presenter.announce_new_game(config.max_turns));
            }
            "" => {}
            input => match input.parse::<usize>() {
                Ok(index) => play(&presenter, &mut session, index)?,
                Err(_) => println!("Enter a decision number, 'r' to reset, or 'q' to quit."),
            },
        }
        print_board(&presenter, &session);
        stdout.flush()?;
    }

    Ok(())
}

fn play(presenter: &TextPresenter, session: &mut impl DecisionEngine, index: usize) -> Result<()> {
    match session.submit(index) {
        Ok(SubmitOutcome::Accepted { terminated, reason, .. }) => {
            println!("{}", DECISIONS[index].message);
            println!("{}", presenter.announce_turn(&session.current_state(), &DECISIONS[index]));
            if let (true, Some(reason)) = (terminated, reason) {
                println!("{}", presenter.announce_game_over(reason));
            }
        }
        Ok(SubmitOutcome::Rejected(Rejection::Unaffordable)) => {
            println!("Not enough budget for {}.", DECISIONS[index].label);
        }
        Ok(SubmitOutcome::Rejected(Rejection::Over)) => {
            println!("The game is over. Enter 'r' to play again.");
        }
        Err(EngineError::InvalidInput { len, .. }) => {
            println!("Choose a decision between 0 and {}.", len - 1);
        }
        Err(other) => return Err(other.into()),
    }
    Ok(())
}

fn print_board(presenter: &TextPresenter, session: &impl DecisionEngine) {
    let board = BoardView::project(session);
    if board.is_over() {
        println!("{}", presenter.render_final_results(&board));
        println!("Enter 'r' to play again or 'q' to quit.");
    } else {
        println!("{}", presenter.render_board(&board));
    }
}
