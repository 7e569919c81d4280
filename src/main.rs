//! Snapgrid CLI
//!
//! Usage:
//!   snapgrid                                 # Interactive terminal challenge
//!   snapgrid --demo                          # Scripted bot vs human run
//!   snapgrid --serve                         # HTTP API server
//!   snapgrid --demo --json                   # JSON output

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use clap::Parser;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use snapgrid::core::{run_server, ChallengeSession, Clock, ManualClock, MonotonicClock};
use snapgrid::types::{CapturedFrame, CellIndex, ChallengeState, Color, PuzzleData, ValidationResult};
use snapgrid::{SnapgridConfig, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "snapgrid",
    version = VERSION,
    about = "Snapgrid - camera-grid human verification engine",
    long_about = "Snapgrid overlays a grid of shape/color watermarks on a captured frame\n\
                  and asks the user to select every cell matching a target.\n\n\
                  Submissions are gated by timing heuristics, then scored against a\n\
                  tolerance tier that tightens with each failed attempt.\n\n\
                  Modes:\n  \
                  --interactive  Terminal challenge (default)\n  \
                  --demo         Scripted bot and human submissions\n  \
                  --serve        HTTP API server mode\n\n\
                  States:\n  \
                  CAMERA   - Waiting for a frame\n  \
                  PUZZLE   - Selecting cells\n  \
                  SUCCESS  - Verified\n  \
                  FAILURE  - Rejected, retry allowed\n  \
                  BLOCKED  - Too many failures, new challenge required"
)]
struct Args {
    /// Interactive terminal challenge
    #[arg(short, long)]
    interactive: bool,

    /// Scripted run: a bot submission and a human-paced submission
    #[arg(short, long)]
    demo: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// JSON config file (grid size, attempts, timing thresholds)
    #[arg(long)]
    config: Option<String>,

    /// Grid rows (overrides config)
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns (overrides config)
    #[arg(long)]
    cols: Option<usize>,

    /// Seed for reproducible puzzles
    #[arg(long)]
    seed: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.serve { "snapgrid=info" } else { "snapgrid=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with_writer(io::stderr)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if args.serve {
        run_serve(&args, config).await;
    } else if args.interactive {
        run_interactive(&args, config);
    } else if args.demo {
        run_demo(&args, config);
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args, config);
    }
}

fn load_config(args: &Args) -> snapgrid::Result<SnapgridConfig> {
    let mut config = match &args.config {
        Some(path) => SnapgridConfig::load(path)?,
        None => SnapgridConfig::default(),
    };
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    config.validate()?;
    Ok(config)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run interactive terminal challenge
fn run_interactive(args: &Args, config: SnapgridConfig) {
    let clock = MonotonicClock::new();
    let mut session = ChallengeSession::new(config, make_rng(args.seed));

    print_header("Interactive");
    println!("Commands: Enter = capture | cell numbers = toggle | v = validate");
    println!("          r = retry | n = new challenge | quit = exit");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", format_prompt(session.state(), args.no_color));
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Attempts: {}", session.attempts().attempt_number);
            break;
        }

        match (session.state(), line) {
            (ChallengeState::Camera, "") | (ChallengeState::Camera, "c") => {
                let captured = session
                    .capture(CapturedFrame::placeholder(640, 480), clock.now_ms())
                    .map(|_| ());
                match captured {
                    Ok(()) => print_puzzle(&session),
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            (_, "v") => match session.validate(clock.now_ms()) {
                Ok(result) => print_result(result, args),
                Err(e) => println!("{}", e.to_string().red()),
            },
            (_, "r") => match session.retry() {
                Ok(()) => println!("Retrying. {}", session.current_tier().describe()),
                Err(e) => println!("{}", e.to_string().red()),
            },
            (_, "n") => {
                session.new_challenge();
                println!("New challenge. Press Enter to capture.");
            }
            (ChallengeState::Puzzle, cells) => {
                for token in cells.split_whitespace() {
                    let cell: CellIndex = match token.parse() {
                        Ok(cell) => cell,
                        Err(_) => {
                            println!("{}", format!("⚠ not a cell number: {}", token).yellow());
                            continue;
                        }
                    };
                    if let Err(e) = session.toggle_cell(cell, clock.now_ms()) {
                        println!("{}", e.to_string().red());
                    }
                }
                print_puzzle(&session);
            }
            _ => println!("{}", "⚠ unknown command".yellow()),
        }
    }
}

/// Run scripted demo: bot-paced then human-paced submission
fn run_demo(args: &Args, config: SnapgridConfig) {
    let clock = ManualClock::new(0.0);
    let mut session = ChallengeSession::new(config, make_rng(args.seed.or(Some(2024))));

    if !args.json {
        print_header("Demo");
        println!("{}", "── Scripted bot: instant, evenly spaced clicks ──".bold());
    }
    let correct = match capture_and_solve(&mut session, &clock) {
        Some(correct) => correct,
        None => return,
    };
    for (i, &cell) in correct.iter().enumerate() {
        clock.set(100.0 + 50.0 * i as f64);
        if let Err(e) = session.toggle_cell(cell, clock.now_ms()) {
            eprintln!("{}", e);
            return;
        }
    }
    clock.advance(150.0);
    report(session.validate(clock.now_ms()), args);

    if session.retry().is_err() {
        session.new_challenge();
    }

    if !args.json {
        println!();
        println!("{}", "── Human-paced: irregular clicks, time to think ──".bold());
    }
    clock.advance(5000.0);
    let correct = match capture_and_solve(&mut session, &clock) {
        Some(correct) => correct,
        None => return,
    };
    let pauses = [1200.0, 430.0, 610.0, 380.0, 920.0, 540.0, 700.0, 460.0];
    for (i, &cell) in correct.iter().enumerate() {
        clock.advance(pauses[i % pauses.len()]);
        if let Err(e) = session.toggle_cell(cell, clock.now_ms()) {
            eprintln!("{}", e);
            return;
        }
    }
    clock.advance(1800.0);
    report(session.validate(clock.now_ms()), args);
}

fn capture_and_solve(session: &mut ChallengeSession<StdRng>, clock: &ManualClock) -> Option<BTreeSet<CellIndex>> {
    match session.capture(CapturedFrame::placeholder(640, 480), clock.now_ms()) {
        Ok(puzzle) => Some(puzzle.correct_set()),
        Err(e) => {
            eprintln!("{}", e);
            None
        }
    }
}

fn report(result: snapgrid::Result<&ValidationResult>, args: &Args) {
    match result {
        Ok(result) => print_result(result, args),
        Err(e) => eprintln!("{}", e),
    }
}

/// Print header
fn print_header(mode: &str) {
    println!("{}", "========================================".bold());
    println!("{}", format!("  Snapgrid v{} - {}", VERSION, mode).bold());
    println!("{}", "========================================".bold());
    println!();
}

/// Format prompt for the current state
fn format_prompt(state: ChallengeState, no_color: bool) -> String {
    if no_color {
        format!("[{}] > ", state)
    } else {
        format!(
            "{}{} [{}]{} > ",
            state.color_code(),
            state.emoji(),
            state,
            ChallengeState::color_reset()
        )
    }
}

/// Print the grid, target and active rule
fn print_puzzle(session: &ChallengeSession<StdRng>) {
    let puzzle = match session.puzzle() {
        Some(puzzle) => puzzle,
        None => return,
    };
    let empty = BTreeSet::new();
    let selection = session.selection().unwrap_or(&empty);

    println!();
    println!(
        "Select every {} {}",
        paint(&puzzle.target.to_string(), puzzle.target.color).bold(),
        puzzle.target.shape.glyph()
    );
    println!("{}", session.current_tier().describe().dimmed());
    print!("{}", render_grid(puzzle, selection));
    println!();
}

/// Render the grid, one line per row, selected cells starred
fn render_grid(puzzle: &PuzzleData, selection: &BTreeSet<CellIndex>) -> String {
    let mut out = String::new();
    for row in 0..puzzle.rows {
        for col in 0..puzzle.cols {
            let idx = row * puzzle.cols + col;
            let mark = match puzzle.watermark_at(idx) {
                Some(w) => paint(w.shape.glyph(), w.color).to_string(),
                None => "·".dimmed().to_string(),
            };
            let sel = if selection.contains(&idx) { "*" } else { " " };
            out.push_str(&format!("{}[{:>2} {}]", sel, idx, mark));
        }
        out.push('\n');
    }
    out
}

fn paint(text: &str, color: Color) -> colored::ColoredString {
    match color {
        Color::Red => text.red(),
        Color::Green => text.green(),
        Color::Blue => text.blue(),
    }
}

/// Print a validation result
fn print_result(result: &ValidationResult, args: &Args) {
    if args.json {
        match serde_json::to_string(result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}", e),
        }
        return;
    }

    if args.no_color {
        println!("{}", result.to_parseable_string());
    } else {
        println!("{}", result.to_terminal_string());
    }
    for reason in &result.reasons {
        println!("{}", format!("  └─ {}", reason).dimmed());
    }
    match result.outcome.state() {
        ChallengeState::Success => println!("{}", "  ✓ VERIFIED".green()),
        ChallengeState::Failure => println!("{}", "  ⚠ Not verified - type r to retry".yellow()),
        ChallengeState::Blocked => println!("{}", "  ⛔ Blocked - type n for a new challenge".red()),
        _ => {}
    }
}

/// Run HTTP API server
async fn run_serve(args: &Args, config: SnapgridConfig) {
    println!("Snapgrid API Server v{}", VERSION);
    println!("  POST /challenge/new           - Create challenge");
    println!("  GET  /challenge/:id           - Get status");
    println!("  DELETE /challenge/:id         - Drop challenge");
    println!("  POST /challenge/:id/capture   - Deliver frame, get puzzle");
    println!("  POST /challenge/:id/click     - Toggle cell");
    println!("  POST /challenge/:id/validate  - Submit selection");
    println!("  POST /challenge/:id/retry     - Retry (keeps attempt count)");
    println!("  POST /challenge/:id/reset     - New challenge");
    println!("  GET  /health                  - Health check");

    if let Err(e) = run_server(&args.addr, config).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
