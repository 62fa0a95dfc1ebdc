use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use spinboard_core::{
    compute_reel_window, is_winning_window, Cue, CueRequest, GameConfig, Payout, Presenter,
    ProvablyFairRng, ReelSpinner, ReelsConfig, RoundReport, ScoreboardView, SeededCategoryPicker,
    Session, SpinOutcome, Spinner, StartOutcome, Symbol,
};

#[derive(Parser)]
#[command(name = "spinboard", about = "Terminal slot machine with a provably-fair reel spinner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// JSON game config; defaults apply to missing fields
    #[arg(long, global = true, env = "SPINBOARD_CONFIG")]
    config: Option<PathBuf>,
    /// Secret server seed; its SHA-256 is printed before play
    #[arg(long, global = true, env = "SPINBOARD_SERVER_SEED", default_value = "dev-server-seed")]
    server_seed: String,
    #[arg(long, global = true, default_value = "player")]
    client_seed: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively: + - max min spin quit
    Play,
    /// Spin repeatedly until the count is reached or the session locks
    Auto {
        #[arg(long, default_value_t = 20)]
        spins: u32,
        /// Bet to dial in before the first spin
        #[arg(long)]
        bet: Option<u64>,
        /// Write one CSV row per round
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Recompute the reel window for a nonce
    Verify {
        #[arg(long)]
        nonce: u64,
    },
}

/// Prints what a player would see; cues are only traced.
struct Terminal {
    verbose: bool,
}

impl Presenter for Terminal {
    fn show_victory(&mut self, payout: &Payout) {
        if self.verbose {
            println!(
                "*** {} *** +${} (bonus ${})",
                payout.category,
                payout.total(),
                payout.bonus
            );
        }
    }

    fn play_cue(&mut self, request: CueRequest) {
        debug!(
            cue = ?request.cue,
            asset = request.cue.asset(),
            volume = request.cue.volume(),
            delay_ms = request.delay.as_millis() as u64,
            cut_off_ms = ?request.cue.max_duration().map(|d| d.as_millis() as u64),
            looping = request.looping,
            "cue"
        );
    }

    fn stop_cue(&mut self, cue: Cue) {
        debug!(?cue, "cue stopped");
    }

    fn notice(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Holds the reels for the configured spin time before stopping them.
struct PacedSpinner {
    reels: ReelSpinner,
    duration: Duration,
}

impl Spinner for PacedSpinner {
    async fn spin(&mut self) -> SpinOutcome {
        tokio::time::sleep(self.duration).await;
        self.reels.spin_now()
    }
}

#[derive(Serialize)]
struct RoundRecord {
    ts: String,
    nonce: u64,
    bet: u64,
    won: bool,
    category: Option<String>,
    payout: u64,
    money: u64,
    streak: u32,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GameConfig> {
    match path {
        Some(path) => GameConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

/// Signed step from the panel's bet to `target`, saturating at the i64 range.
fn bet_delta(target: u64, current: u64) -> i64 {
    let target = i64::try_from(target).unwrap_or(i64::MAX);
    let current = i64::try_from(current).unwrap_or(i64::MAX);
    target.saturating_sub(current)
}

fn render_window(window: &[Vec<Symbol>]) -> String {
    window
        .iter()
        .map(|row| row.iter().map(|s| format!("[{}]", s.glyph())).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_board(view: &ScoreboardView, bet: u64) {
    println!("Bet: ${bet}\n{view}");
}

async fn play(cli: &Cli, config: GameConfig) -> anyhow::Result<()> {
    let mut spinner = PacedSpinner {
        reels: ReelSpinner::new(&cli.server_seed, &cli.client_seed, 0, ReelsConfig::default_3x3()),
        duration: config.spin_duration(),
    };
    let mut picker = SeededCategoryPicker::new(&cli.server_seed, &cli.client_seed, config.category_weights);
    let mut session = Session::new(&config, Terminal { verbose: true });

    println!("server seed hash: {}", spinner.reels.server_seed_hash_hex());
    print_board(&session.scoreboard().snapshot(), session.current_bet());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "+" => println!("Bet: ${}", session.increase_bet()),
            "-" => println!("Bet: ${}", session.decrease_bet()),
            "max" => println!("Bet: ${}", session.max_bet()),
            "min" => println!("Bet: ${}", session.min_bet()),
            "" | "spin" => {
                println!("spinning...");
                if let RoundReport::Played { outcome, .. } =
                    session.play_round(&mut spinner, &mut picker).await
                {
                    println!("{}", render_window(&outcome.reel_window));
                    print_board(&session.scoreboard().snapshot(), session.current_bet());
                }
                if session.scoreboard().is_out_of_money() {
                    println!("Out of money. Thanks for playing.");
                    break;
                }
            }
            "quit" | "q" => break,
            other => println!("unknown command {other:?}; use + - max min spin quit"),
        }
    }
    info!(rounds = session.rounds_played(), money = session.scoreboard().money(), "session over");
    Ok(())
}

async fn auto(
    cli: &Cli,
    config: GameConfig,
    spins: u32,
    bet: Option<u64>,
    export: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let mut spinner = ReelSpinner::new(&cli.server_seed, &cli.client_seed, 0, ReelsConfig::default_3x3());
    let mut picker = SeededCategoryPicker::new(&cli.server_seed, &cli.client_seed, config.category_weights);
    let mut session = Session::new(&config, Terminal { verbose: false });
    if let Some(bet) = bet {
        session.adjust_bet(bet_delta(bet, session.current_bet()));
    }

    let mut records = Vec::new();
    for _ in 0..spins {
        match session.play_round(&mut spinner, &mut picker).await {
            RoundReport::Played { bet, outcome, round } => {
                let view = session.scoreboard().snapshot();
                records.push(RoundRecord {
                    ts: Utc::now().to_rfc3339(),
                    nonce: spinner.nonce(),
                    bet,
                    won: outcome.won,
                    category: round.payout.map(|p| p.category.to_string()),
                    payout: round.payout.map_or(0, |p| p.total()),
                    money: view.money,
                    streak: view.streak,
                });
                if round.locked {
                    break;
                }
            }
            RoundReport::Skipped(StartOutcome::InsufficientFunds { money, bet }) => {
                println!("stopping: ${money} left, bet is ${bet}");
                break;
            }
            RoundReport::Skipped(other) => {
                println!("stopping: {other:?}");
                break;
            }
        }
    }

    let wins = records.iter().filter(|r| r.won).count();
    println!("server seed hash: {}", spinner.server_seed_hash_hex());
    println!("rounds: {} wins: {}", records.len(), wins);
    print_board(&session.scoreboard().snapshot(), session.current_bet());

    if let Some(path) = export {
        let mut wtr = csv::Writer::from_path(path)?;
        for record in &records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        println!("Exported {} rows to {}", records.len(), path.display());
    }
    Ok(())
}

fn verify(cli: &Cli, nonce: u64) {
    let rng = ProvablyFairRng::new(&cli.server_seed, &cli.client_seed, nonce);
    let window = compute_reel_window(&rng, &ReelsConfig::default_3x3());
    println!("server seed hash: {}", rng.server_seed_hash_hex());
    println!("{}", render_window(&window));
    println!("win: {}", is_winning_window(&window));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Commands::Play => play(&cli, config).await?,
        Commands::Auto { spins, bet, export } => {
            auto(&cli, config, *spins, *bet, export.as_ref()).await?
        }
        Commands::Verify { nonce } => verify(&cli, *nonce),
    }

    Ok(())
}
