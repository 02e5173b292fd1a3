//! Tengen: a small Go engine.
//!
//! ## Usage
//!
//! - `tengen` - Show a demo
//! - `tengen gtp` - Start GTP server for GUI integration
//! - `tengen demo` - Play a few searched moves and score the result
//! - `tengen selfplay` - Let the engine play itself and print the record
//! - `tengen replay <file>` - Load a `.sgf` or `.json` record and score it

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use tengen::board::Move;
use tengen::config::EngineConfig;
use tengen::coord::str_coord;
use tengen::gtp::GtpEngine;
use tengen::logging::setup_logging;
use tengen::record::GameRecord;
use tengen::scoring::score;
use tengen::search::{SearchOutcome, Searcher};
use tengen::session::Session;
use tengen::sgf::{parse_sgf, to_sgf};

/// Tengen: a flat Monte Carlo Go engine
#[derive(Parser)]
#[command(name = "tengen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board size
    #[arg(long, global = true)]
    size: Option<usize>,

    /// Playouts per candidate move
    #[arg(long, global = true)]
    sims: Option<usize>,

    /// Search seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Run a simple demo of the engine
    Demo,
    /// Play the engine against itself
    Selfplay {
        /// Stop after this many plies even if nobody passed
        #[arg(long, default_value_t = 400)]
        max_moves: usize,
        /// Output format for the finished game
        #[arg(long, value_enum, default_value_t = Format::Sgf)]
        format: Format,
    },
    /// Load a game record and print the final position
    Replay { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Sgf,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let _logger = setup_logging(&config.log_spec).context("starting logger")?;
    info!(
        "size {} sims {} seed {:#x}",
        config.board_size, config.simulations, config.seed
    );

    match cli.command {
        Some(Commands::Gtp) => {
            let session = Session::new(config.board_size)?;
            let mut engine = GtpEngine::with_config(session, config.search());
            engine.run().context("GTP loop")?;
        }
        Some(Commands::Selfplay { max_moves, format }) => run_selfplay(&config, max_moves, format)?,
        Some(Commands::Replay { path }) => run_replay(&path)?,
        Some(Commands::Demo) | None => run_demo(&config)?,
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(size) = cli.size {
        config.board_size = size;
    }
    if let Some(sims) = cli.sims {
        config.simulations = sims;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn run_demo(config: &EngineConfig) -> Result<()> {
    println!("Tengen: flat Monte Carlo Go\n");

    let mut session = Session::new(config.board_size)?;
    let searcher = Searcher::new(config.search());

    println!("=== Search Demo ===");
    for _ in 0..6 {
        let color = session.position().turn();
        match searcher.select_move(session.position()) {
            SearchOutcome::Move(pt) => {
                session.play_move(pt)?;
                println!("{color}: {}", str_coord(Move::Play(pt), session.size())?);
            }
            SearchOutcome::Pass => {
                session.pass()?;
                println!("{color}: pass");
            }
            SearchOutcome::Cancelled => break,
        }
    }
    println!("{}", session.position());

    let result = score(session.position());
    println!(
        "Black {} / White {}: {}",
        result.black.total,
        result.white.total,
        result.result_string()
    );
    Ok(())
}

fn run_selfplay(config: &EngineConfig, max_moves: usize, format: Format) -> Result<()> {
    let mut session = Session::new(config.board_size)?;
    let searcher = Searcher::new(config.search());

    while !session.is_over() && session.position().move_number() < max_moves {
        match searcher.select_move(session.position()) {
            SearchOutcome::Move(pt) => session.play_move(pt)?,
            SearchOutcome::Pass => session.pass()?,
            SearchOutcome::Cancelled => break,
        }
    }

    let result = score(session.position());
    info!(
        "selfplay finished after {} moves: {}",
        session.position().move_number(),
        result.result_string()
    );

    let record = session.to_record();
    match format {
        Format::Sgf => println!("{}", to_sgf(&record)?),
        Format::Json => println!("{}", record.to_json()?),
    }
    Ok(())
}

fn run_replay(path: &Path) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let is_json = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let record = if is_json {
        GameRecord::from_json(&text)?
    } else {
        parse_sgf(&text)?
    };

    let mut session = Session::default();
    session
        .load_record(&record)
        .with_context(|| format!("replaying {}", path.display()))?;

    println!("{}", session.position());
    let result = match session.result() {
        Some(r) => r.result_string(),
        None => score(session.position()).result_string(),
    };
    println!("{} moves, result {result}", session.position().move_number());
    Ok(())
}
