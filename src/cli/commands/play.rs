//! Play command - a terminal game against the trained agents

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;

use crate::{
    Error,
    session::{GameSession, TurnReport},
    tictactoe::BoardState,
};

#[derive(Parser, Debug)]
#[command(about = "Play against the trained agents in the terminal")]
pub struct PlayArgs {
    /// Directory holding policy_first.bin and policy_second.bin
    #[arg(long, default_value = ".")]
    pub policy_dir: PathBuf,

    /// Let the AI open the first game
    #[arg(long)]
    pub ai_first: bool,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let mut session = GameSession::load(&args.policy_dir)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.ai_first {
        let report = session.reset()?;
        describe(&mut out, &session, &report)?;
    }
    run(&mut session, stdin.lock(), out)
}

fn parse_cell(input: &str) -> Option<(usize, usize)> {
    let mut parts = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some((row, col))
}

fn describe<W: Write>(out: &mut W, session: &GameSession, report: &TurnReport) -> Result<()> {
    if let Some(ai_move) = report.ai_move {
        writeln!(out, "AI plays ({}, {})", ai_move.row, ai_move.col)?;
    }
    let board = BoardState::from_grid(report.board)?;
    writeln!(out, "{board}")?;

    match report.winner {
        None => writeln!(out, "You play {}.", session.human_player())?,
        Some(0) => writeln!(out, "Draw. Type `r` for a new game.")?,
        Some(symbol) if symbol == session.human_player().symbol() => {
            writeln!(out, "You win! Type `r` for a new game.")?
        }
        Some(_) => writeln!(out, "AI wins. Type `r` for a new game.")?,
    }
    Ok(())
}

/// Read commands from `input` until it ends or the player quits.
pub fn run<R: BufRead, W: Write>(session: &mut GameSession, input: R, mut out: W) -> Result<()> {
    writeln!(
        out,
        "Enter moves as `row col` (0-2), `r` for a new game, `q` to quit."
    )?;
    describe(&mut out, session, &session.report())?;

    for line in input.lines() {
        let line = line?;
        let command = line.trim();
        match command {
            "" => continue,
            "q" | "quit" => break,
            "r" | "reset" => {
                let report = session.reset()?;
                describe(&mut out, session, &report)?;
            }
            _ => match parse_cell(command) {
                Some((row, col)) => match session.play(row, col) {
                    Ok(report) => describe(&mut out, session, &report)?,
                    Err(err @ (Error::InvalidMove { .. } | Error::GameOver)) => {
                        writeln!(out, "{err}")?
                    }
                    Err(err) => return Err(err.into()),
                },
                None => writeln!(out, "Could not read `{command}`, expected `row col`")?,
            },
        }
    }
    Ok(())
}
