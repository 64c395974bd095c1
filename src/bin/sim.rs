//! Plays seeded sessions end to end and prints a JSON summary.
//!
//! The human side is driven by one of the computer tiers (`--shooter`).

use anyhow::{bail, Context};
use battleship_core::{
    init_logging, Difficulty, DifficultyConfig, GameConfig, GameSession, Opponent, Side,
    Strategy, DEFAULT_BOARD_SIZE,
};
use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Tier {
    Rookie,
    Veteran,
    Admiral,
    Legendary,
}

impl From<Tier> for Difficulty {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Rookie => Difficulty::Rookie,
            Tier::Veteran => Difficulty::Veteran,
            Tier::Admiral => Difficulty::Admiral,
            Tier::Legendary => Difficulty::Legendary,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tier of the computer opponent.
    #[arg(long, value_enum, default_value_t = Tier::Veteran)]
    difficulty: Tier,
    /// Tier that fires the player's shots.
    #[arg(long, value_enum, default_value_t = Tier::Rookie)]
    shooter: Tier,
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    board_size: usize,
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1)]
    games: u64,
}

fn play(cli: &Cli, game: u64) -> anyhow::Result<serde_json::Value> {
    let seed = cli.seed.map(|s| s.wrapping_add(game));
    let mut config = GameConfig::new(cli.difficulty.into()).with_board_size(cli.board_size);
    config.rng_seed = seed;
    let mut session = GameSession::new(config).context("creating session")?;

    let shooter_tier: Difficulty = cli.shooter.into();
    let shooter_config = DifficultyConfig::for_difficulty(shooter_tier);
    let mut shooter = Opponent::new(shooter_tier);
    let mut rng = match seed {
        Some(s) => SmallRng::seed_from_u64(s ^ 0x5eed),
        None => SmallRng::from_rng(&mut rand::rng()),
    };

    let max_turns = 2 * cli.board_size * cli.board_size;
    let mut turns = 0;
    while !session.is_terminal() {
        turns += 1;
        if turns > max_turns {
            bail!("game {} did not finish within {} turns", game, max_turns);
        }
        match session.turn() {
            Side::Player => {
                let view = session.player_view();
                let target = shooter
                    .choose_target(&view, session.ai_board().shots(), &shooter_config, &mut rng)
                    .context("shooter found no target")?;
                session.submit_player_shot(target)?;
            }
            Side::Ai => {
                session.advance_ai_turn()?;
            }
        }
    }

    let ai_stats = session.player_board().stats();
    Ok(json!({
        "game": game,
        "seed": seed,
        "winner": session.winner().map(|w| w.to_string()),
        "player_moves": session.player_moves(),
        "ai_moves": session.ai_moves(),
        "ai_accuracy": ai_stats.accuracy,
    }))
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut results = Vec::new();
    for game in 0..cli.games {
        results.push(play(&cli, game)?);
    }
    let ai_wins = results.iter().filter(|r| r["winner"] == "ai").count();

    let summary = json!({
        "difficulty": Difficulty::from(cli.difficulty).as_str(),
        "shooter": Difficulty::from(cli.shooter).as_str(),
        "board_size": cli.board_size,
        "games": results,
        "ai_wins": ai_wins,
        "player_wins": cli.games as usize - ai_wins,
    });
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
