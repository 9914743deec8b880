use clap::Parser;
use log::info;
use match3_engine::cli::BoardArgs;
use match3_engine::collaborators::Headless;
use match3_engine::engine::{CascadeReport, Engine, Progress};
use match3_engine::error::EngineWarning;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play seeded match-3 games automatically and report cascade statistics", long_about = None)]
struct Args {
    #[clap(flatten)]
    board: BoardArgs,

    /// Number of games to simulate (seeds start at --seed)
    #[clap(short, long, default_value_t = 20)]
    games: u64,

    /// Swaps to play per game
    #[clap(short, long, default_value_t = 50)]
    moves: usize,
}

#[derive(Debug, Default)]
struct Totals {
    swaps: usize,
    removed: usize,
    rounds: usize,
    longest_cascade: usize,
    shuffles: usize,
    stuck_games: usize,
    ceiling_hits: usize,
    shuffle_failures: usize,
    generation_warnings: usize,
}

impl Totals {
    fn record(&mut self, report: &CascadeReport) {
        self.swaps += 1;
        self.removed += report.removed;
        self.rounds += report.iterations;
        self.longest_cascade = self.longest_cascade.max(report.iterations);
        self.shuffles += report.shuffles;
        for warning in &report.warnings {
            match warning {
                EngineWarning::CascadeCeilingReached { .. } => self.ceiling_hits += 1,
                EngineWarning::ShuffleAttemptsExhausted { .. } => self.shuffle_failures += 1,
                _ => {}
            }
        }
    }
}

/// Seed for the `game_idx`-th game; wraps past `u64::MAX`.
fn game_seed(base: u64, game_idx: u64) -> u64 {
    base.wrapping_add(game_idx)
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let config = args.board.to_config();
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(2);
    }

    println!(
        "Simulating {} game(s) of {} swap(s) on a {}x{} board with {} piece types...",
        args.games, args.moves, config.width, config.height, config.piece_types
    );

    let mut totals = Totals::default();
    for game_idx in 0..args.games {
        let seed = game_seed(args.board.seed, game_idx);
        let mut engine = match Engine::new(config.clone(), seed) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Failed to build game {}: {}", game_idx, e);
                std::process::exit(2);
            }
        };
        totals.generation_warnings += engine.generation_warnings().len();
        let mut headless = Headless::default();

        for _ in 0..args.moves {
            let Some((a, b)) = engine.hint() else {
                info!("game {} (seed {}) ran out of moves", game_idx, seed);
                totals.stuck_games += 1;
                break;
            };
            if !engine.request_swap(a, b, &mut headless.services()) {
                eprintln!("Warning: hinted swap {} <-> {} was rejected in game {}", a, b, game_idx);
                break;
            }
            match engine.settle(&mut headless.services()) {
                Progress::Settled(report) => totals.record(&report),
                other => {
                    eprintln!(
                        "Warning: hinted swap {} <-> {} did not cascade in game {}: {:?}",
                        a, b, game_idx, other
                    );
                    break;
                }
            }
        }
        info!(
            "game {} (seed {}): {} removed",
            game_idx, seed, headless.tally.removed
        );
    }

    println!("\n--- Simulation Complete ---");
    println!("Swaps played:            {}", totals.swaps);
    println!("Pieces removed:          {}", totals.removed);
    if totals.swaps > 0 {
        let swaps = totals.swaps as f64;
        println!("Avg removed per swap:    {:.2}", totals.removed as f64 / swaps);
        println!("Avg rounds per swap:     {:.2}", totals.rounds as f64 / swaps);
    }
    println!("Longest cascade:         {}", totals.longest_cascade);
    println!("Shuffles:                {}", totals.shuffles);
    println!("Games out of moves:      {}", totals.stuck_games);
    println!("Cascade ceiling hits:    {}", totals.ceiling_hits);
    println!("Shuffle budget misses:   {}", totals.shuffle_failures);
    println!("Generation warnings:     {}", totals.generation_warnings);
}
