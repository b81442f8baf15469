use std::io;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use slider_puzzle::render::Report;
use slider_puzzle::{solve_with, Board, SolverConfig};

/// Boards shown when no puzzle is given: an unsolvable and a solvable one
/// per width.
const DEMO_BOARDS: &[&str] = &[
    "1 2 3 4 5 6 8 7 0",
    "2 3 8 1 6 4 7 0 5",
    "1 2 3 4 5 6 7 8 9 10 11 12 13 15 14 0",
    "5 1 2 3 6 0 7 4 9 10 11 8 13 14 15 12",
];

#[derive(Parser, Debug)]
#[command(name = "slider-puzzle", version, about = "Optimal A* solver for sliding-tile puzzles")]
struct Cli {
    /// Tiles in reading order, 0 for the blank (e.g. 2 3 8 1 6 4 7 0 5)
    #[arg(value_name = "TILE", value_delimiter = ',')]
    tiles: Vec<String>,
    /// Solve a uniformly shuffled solvable board
    #[arg(long, conflicts_with_all = ["tiles", "walk"])]
    random: bool,
    /// Solve a board scrambled by this many random slides from the goal
    #[arg(long, value_name = "STEPS", conflicts_with = "tiles")]
    walk: Option<usize>,
    /// Board width for --random and --walk
    #[arg(long, default_value_t = 3)]
    size: usize,
    /// Seed for --random and --walk
    #[arg(long)]
    seed: Option<u64>,
    /// Give up after this many expansions
    #[arg(long, value_name = "N")]
    max_expansions: Option<usize>,
    /// No colours
    #[arg(long)]
    plain: bool,
    /// Print the move count without the intermediate boards
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    fn boards(&self) -> anyhow::Result<Vec<Board>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        if self.random {
            let board = Board::random_solvable(self.size, &mut rng)
                .with_context(|| format!("cannot shuffle a {0}x{0} board", self.size))?;
            return Ok(vec![board]);
        }
        if let Some(steps) = self.walk {
            let board = Board::scrambled(self.size, steps, &mut rng)
                .with_context(|| format!("cannot scramble a {0}x{0} board", self.size))?;
            return Ok(vec![board]);
        }
        if self.tiles.is_empty() {
            info!("no board given, running demo boards");
            return DEMO_BOARDS
                .iter()
                .map(|s| s.parse::<Board>().context("bad demo board"))
                .collect();
        }

        let input = self.tiles.join(" ");
        let board = input
            .parse::<Board>()
            .with_context(|| format!("invalid board {:?}", input))?;
        Ok(vec![board])
    }

    fn config(&self) -> SolverConfig {
        let mut config = SolverConfig::default();
        if let Some(limit) = self.max_expansions {
            config = config.with_max_expansions(limit);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    let boards = cli.boards()?;
    let config = cli.config();

    if boards.iter().any(|b| b.size() >= 5) && config.max_expansions.is_none() {
        warn!("boards of width 5 or more may exhaust memory; consider --max-expansions");
    }

    let stdout = io::stdout();
    let mut report = Report::new(stdout.lock()).plain(cli.plain).quiet(cli.quiet);
    for board in &boards {
        report.summary(board)?;
        let outcome = solve_with(board, &config)
            .with_context(|| format!("solver failed on {:?}", board))?;
        report.outcome(&outcome)?;
    }
    Ok(())
}
