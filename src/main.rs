use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use connect_four_arena::arena::{play_series, Contender, GameLoop, NullObserver, TextObserver};
use connect_four_arena::config::{AppConfig, Difficulty, PlayerKind};
use connect_four_arena::error::GameError;

/// Watch two computer players play Connect Four.
#[derive(Parser)]
#[command(name = "connect-four", about = "Computer-vs-computer Connect Four")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect-four.toml")]
    config: PathBuf,

    /// Seed for reproducible tie-breaks and random moves
    #[arg(long)]
    seed: Option<u64>,

    /// Policy for player 1
    #[arg(long, value_enum)]
    p1: Option<PlayerKind>,

    /// Policy for player 2
    #[arg(long, value_enum)]
    p2: Option<PlayerKind>,

    /// Search depth for player 1 (1-10)
    #[arg(long)]
    depth1: Option<u8>,

    /// Search depth for player 2 (1-10)
    #[arg(long)]
    depth2: Option<u8>,

    /// Depth preset applied to both players
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Number of games; more than one prints a tally instead of boards
    #[arg(long)]
    games: Option<usize>,

    /// Print the game record as JSON instead of text boards
    #[arg(long)]
    json: bool,

    /// Only print the verdict
    #[arg(long)]
    quiet: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    apply_overrides(&mut config, &cli);
    config.validate().context("validating configuration")?;

    if config.games > 1 {
        run_series(&config)
    } else {
        run_single(&config, &cli)
    }
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(games) = cli.games {
        config.games = games;
    }
    if let Some(kind) = cli.p1 {
        config.player_one.kind = kind;
    }
    if let Some(kind) = cli.p2 {
        config.player_two.kind = kind;
    }
    if let Some(difficulty) = cli.difficulty {
        config.player_one.difficulty = Some(difficulty);
        config.player_two.difficulty = Some(difficulty);
    }
    // An explicit depth wins over any preset
    if let Some(depth) = cli.depth1 {
        config.player_one.depth = depth;
        config.player_one.difficulty = None;
    }
    if let Some(depth) = cli.depth2 {
        config.player_two.depth = depth;
        config.player_two.difficulty = None;
    }
}

fn run_single(config: &AppConfig, cli: &Cli) -> Result<()> {
    let one = config.player_one.build_agent(config.seed_for(0, 0))?;
    let two = config.player_two.build_agent(config.seed_for(0, 1))?;
    if !cli.json {
        println!("{} (X) vs {} (O)", one.name(), two.name());
    }

    let game = GameLoop::new(one, two);
    let result = if cli.json || cli.quiet {
        game.run(&mut NullObserver)
    } else {
        game.run(&mut TextObserver::new(io::stdout().lock()))
    };
    let record = result.context("playing game")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else if cli.quiet {
        println!("{:?} after {} plies", record.verdict, record.moves.len());
    }
    Ok(())
}

fn run_series(config: &AppConfig) -> Result<()> {
    let stats = play_series(
        config.games,
        config.alternate_first,
        |game| Ok::<_, GameError>(config.player_one.build_agent(config.seed_for(game, 0))?),
        |game| Ok::<_, GameError>(config.player_two.build_agent(config.seed_for(game, 1))?),
    )
    .context("playing series")?;

    println!("Games: {}", stats.games);
    println!(
        "First  ({:?}): {} wins ({:.1}%)",
        config.player_one.kind,
        stats.wins(Contender::First),
        stats.win_rate(Contender::First) * 100.0
    );
    println!(
        "Second ({:?}): {} wins ({:.1}%)",
        config.player_two.kind,
        stats.wins(Contender::Second),
        stats.win_rate(Contender::Second) * 100.0
    );
    println!("Draws: {} ({:.1}%)", stats.draws, stats.draw_rate() * 100.0);
    println!("Opening side won: {}", stats.opener_wins);
    println!("Average length: {:.1} plies", stats.average_length());
    Ok(())
}
