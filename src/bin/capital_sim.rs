//! Headless runner: plays a session with an automatic decision policy and
//! prints the state of the realm as turns pass.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use capital_ccg::cards::{CatalogLoader, JsonCatalogLoader, JsonDirLoader};
use capital_ccg::core::{GameConfig, GameError, GameRng, Result, WorldSnapshot};
use capital_ccg::events::GameEvent;
use capital_ccg::game::Game;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    /// Always take the first available choice
    First,
    /// Take a random available choice
    Random,
}

#[derive(Parser)]
#[command(name = "capital-sim")]
#[command(about = "Run the capital card game without a front end")]
struct Cli {
    /// Stop after this many turns
    #[arg(short, long, default_value = "12")]
    turns: u32,

    /// Milliseconds between turns (overrides the config file)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Draw a card every N turns (overrides the config file)
    #[arg(long)]
    turns_per_card: Option<u32>,

    /// Draw seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory of card JSON files (default: builtin cards)
    #[arg(long)]
    cards: Option<PathBuf>,

    /// Game configuration as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How choices are picked
    #[arg(long, value_enum, default_value = "first")]
    policy: Policy,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => serde_json::from_str::<GameConfig>(&std::fs::read_to_string(path)?)?,
        None => GameConfig::new(),
    };
    if let Some(ms) = cli.tick_ms {
        config = config.with_tick_interval(Duration::from_millis(ms));
    }
    if let Some(turns) = cli.turns_per_card {
        config = config.with_turns_per_card(turns);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn print_snapshot(turn: u32, snapshot: &WorldSnapshot) {
    let resources: Vec<String> = snapshot
        .resources
        .iter()
        .map(|r| format!("{} {}", r.kind(), r.amount()))
        .collect();
    let capitals: Vec<String> = snapshot
        .capitals
        .iter()
        .map(|c| format!("{} {:.0}%", c.name(), c.health()))
        .collect();
    println!("[turn {turn:>3}] {} | {}", resources.join(", "), capitals.join(", "));
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = load_config(&cli)?;
    let loader: Box<dyn CatalogLoader> = match &cli.cards {
        Some(dir) => Box::new(JsonDirLoader::new(dir.clone())),
        None => Box::new(JsonCatalogLoader::builtin()),
    };

    let mut game = Game::from_loader(config, &*loader);
    let events = game.events();
    let mut picker = GameRng::from_seed_or_entropy(cli.seed);
    game.start()?;

    for event in events.iter() {
        match event {
            GameEvent::TurnEnded { turn } => {
                print_snapshot(turn, &game.snapshot());
                if turn >= cli.turns {
                    break;
                }
            }
            GameEvent::CardDrawn(draw) => {
                println!("  card: {} ({})", draw.card.title, draw.deck);
                if draw.has_choices() {
                    let index = match cli.policy {
                        Policy::First => 0,
                        Policy::Random => picker.gen_range_usize(0..draw.available.len()),
                    };
                    match game.submit_choice_index(index) {
                        Err(GameError::ChoiceLocked { label }) => println!("  locked: {label}"),
                        result => {
                            result?;
                        }
                    }
                } else {
                    println!("  no choice available");
                }
            }
            GameEvent::ChoiceApplied { choice, .. } => println!("  chose: {}", choice.label),
            GameEvent::TurnStarted { .. } => {}
        }
    }

    let last = game.stop()?;
    log::info!("Stopped after turn {last}");
    print_snapshot(last, &game.snapshot());
    Ok(())
}
