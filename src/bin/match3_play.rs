use clap::Parser;
use match3_engine::cli::BoardArgs;
use match3_engine::collaborators::Headless;
use match3_engine::engine::{Engine, Progress};
use match3_engine::piece::Position;
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play match-3 in the terminal", long_about = None)]
struct Args {
    #[clap(flatten)]
    board: BoardArgs,
}

fn parse_swap(input: &str) -> Option<(Position, Position)> {
    let numbers: Vec<usize> = input
        .split_whitespace()
        .map(str::parse::<usize>)
        .collect::<Result<_, _>>()
        .ok()?;
    match numbers[..] {
        [r1, c1, r2, c2] => Some((Position::new(r1, c1), Position::new(r2, c2))),
        _ => None,
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut engine = match Engine::new(args.board.to_config(), args.board.seed) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    let mut headless = Headless::default();
    let mut swaps = 0;
    let mut cascades = 0;
    let mut shuffles = 0;
    let mut highlight = Vec::new();

    println!("Welcome to Match-3!");

    loop {
        println!("---------------------");
        println!(
            "Swaps: {}, Removed: {}, Cascade rounds: {}, Shuffles: {}",
            swaps, headless.tally.removed, cascades, shuffles
        );
        println!("{}", engine.grid().to_string_with_highlight(&highlight));
        highlight.clear();

        print!("Enter a swap (row col row col), 'h' for a hint, 'q' to quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        let trimmed_input = input.trim();

        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        if trimmed_input == "h" {
            match engine.hint() {
                Some((a, b)) => {
                    println!("Try swapping {} with {}.", a, b);
                    highlight = vec![a, b];
                }
                None => println!("No moves available."),
            }
            continue;
        }

        let Some((a, b)) = parse_swap(trimmed_input) else {
            println!(
                "Invalid input format. Use 'row col row col' (row 0 is the bottom), 'h', or 'q'."
            );
            continue;
        };

        if let Err(rejection) = engine.try_swap(a, b, &mut headless.services()) {
            println!("Invalid swap: {}.", rejection);
            continue;
        }

        match engine.settle(&mut headless.services()) {
            Progress::Settled(report) => {
                swaps += 1;
                cascades += report.iterations;
                shuffles += report.shuffles;
                println!(
                    "Removed {} piece(s) over {} round(s).",
                    report.removed, report.iterations
                );
                if report.shuffles > 0 {
                    println!("No moves were left, so the board was shuffled.");
                }
                for warning in &report.warnings {
                    println!("Warning: {}", warning);
                }
            }
            Progress::Reverted => println!("No match there; swap undone."),
            Progress::Idle | Progress::Waiting => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_swap() {
        assert_eq!(
            parse_swap("1 2 1 3"),
            Some((Position::new(1, 2), Position::new(1, 3)))
        );
        assert_eq!(parse_swap("1 2 1"), None);
        assert_eq!(parse_swap("a b c d"), None);
        assert_eq!(parse_swap(""), None);
    }
}
