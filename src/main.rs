//! Command-line front end for the upitup solver.
//!
//! - `upitup` / `upitup solve` - Solve the default puzzle
//! - `upitup solve --board "2 2 2 / 2 0 2 / 2 2 2"` - Solve a given board
//! - `upitup scramble --moves 30 --seed 1` - Print a random solvable board

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};

use upitup::puzzle::Board;
use upitup::render::{write_board, write_moves, Style};
use upitup::solver::{Outcome, Solver};

/// Shortest-path solver for the rolling-cube sliding puzzle
#[derive(Parser)]
#[command(name = "upitup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print boards without colour
    #[arg(long, global = true)]
    plain: bool,

    /// Log search progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest move sequence to the upright position
    Solve {
        /// Board as nine values, rows separated by `/` or newlines
        #[arg(long, conflicts_with = "file")]
        board: Option<String>,
        /// Read the board from a file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the board after every move
        #[arg(long)]
        replay: bool,
    },
    /// Print a random board that can be solved
    Scramble {
        /// Number of random moves made from the solved position
        #[arg(long, default_value_t = 30)]
        moves: usize,
        /// Seed for a reproducible scramble
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Options shared by every subcommand.
struct Settings {
    style: Style,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let settings = Settings {
        style: if cli.plain { Style::Plain } else { Style::Colored },
    };

    match cli.command {
        Some(Commands::Solve {
            board,
            file,
            replay,
        }) => {
            let start = load_board(board, file)?;
            run_solve(&settings, &start, replay)
        }
        Some(Commands::Scramble { moves, seed }) => run_scramble(&settings, moves, seed),
        None => run_solve(&settings, &Board::upitup(), false),
    }
}

fn load_board(board: Option<String>, file: Option<PathBuf>) -> Result<Board> {
    if let Some(text) = board {
        return text.parse().context("invalid --board value");
    }
    if let Some(path) = file {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return text
            .parse()
            .with_context(|| format!("invalid board in {}", path.display()));
    }
    Ok(Board::upitup())
}

fn run_solve(settings: &Settings, start: &Board, replay: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Initial board:")?;
    write_board(&mut out, start, settings.style)?;

    let mut solver = Solver::new();
    let outcome = solver.solve(start).context("search failed")?;

    let solution = match outcome {
        Outcome::Solved(solution) => solution,
        Outcome::Unsolvable { explored } => {
            info!("gave up after {} boards", explored);
            writeln!(out, "The board is unsolvable")?;
            return Ok(());
        }
    };

    writeln!(out, "Goal board:")?;
    write_board(&mut out, &solution.goal, settings.style)?;
    writeln!(
        out,
        "Found optimal solution with {} moves ({} boards visited)",
        solution.moves.len(),
        solution.explored
    )?;

    if replay {
        let mut board = *start;
        for &item in &solution.moves {
            board = board
                .try_move(item)?
                .with_context(|| format!("move {} is not legal during replay", item))?;
            writeln!(out, "{}", item)?;
            write_board(&mut out, &board, settings.style)?;
            writeln!(out)?;
        }
    } else {
        write_moves(&mut out, &solution.moves)?;
    }
    Ok(())
}

fn run_scramble(settings: &Settings, moves: usize, seed: Option<u64>) -> Result<()> {
    let board = match seed {
        Some(seed) => Board::solved().scramble(&mut StdRng::seed_from_u64(seed), moves)?,
        None => Board::solved().scramble(&mut thread_rng(), moves)?,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_board(&mut out, &board, settings.style)?;
    writeln!(out, "{}", board_arg(&board))?;
    Ok(())
}

/// Formats a board the way `solve --board` reads it.
fn board_arg(board: &Board) -> String {
    board
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" / ")
}
