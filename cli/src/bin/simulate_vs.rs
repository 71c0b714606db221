use anyhow::Context;
use arena_cli::{init_tracing, load_roster};
use arena_engine::battle::{simulate_many, BattleStats};
use arena_engine::Faction;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simulate-vs")]
#[command(about = "Monte Carlo sim: many headless battles between two combatants")]
struct Args {
    /// Autobot id
    #[arg(long)]
    autobot: String,

    /// Decepticon id
    #[arg(long)]
    decepticon: String,

    /// Number of battles
    #[arg(long, default_value_t = 1000)]
    samples: u32,

    /// Safety cap on rounds per battle
    #[arg(long, default_value_t = 1000)]
    max_rounds: u32,

    /// RNG base seed (battle i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Optional Autobot roster JSON (built-in roster otherwise)
    #[arg(long)]
    autobots: Option<PathBuf>,

    /// Optional Decepticon roster JSON (built-in roster otherwise)
    #[arg(long)]
    decepticons: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    autobot: &'a str,
    decepticon: &'a str,
    #[serde(flatten)]
    stats: &'a BattleStats,
}

fn pct(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(0);

    let roster = load_roster(args.autobots.as_deref(), args.decepticons.as_deref());
    let autobot = roster
        .find(Faction::Autobot, &args.autobot)
        .with_context(|| format!("Autobot '{}' not found", args.autobot))?;
    let decepticon = roster
        .find(Faction::Decepticon, &args.decepticon)
        .with_context(|| format!("Decepticon '{}' not found", args.decepticon))?;

    let stats = simulate_many(
        autobot,
        decepticon,
        args.seed,
        args.samples,
        Some(args.max_rounds),
    );

    if args.json {
        let summary = Summary {
            autobot: &autobot.name,
            decepticon: &decepticon.name,
            stats: &stats,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("simulate-vs results");
    println!("-------------------");
    println!("samples:            {}", stats.samples);
    println!(
        "autobot:            {} (HP {}) [{}]",
        autobot.name,
        autobot.health,
        autobot.ability_names()
    );
    println!(
        "decepticon:         {} (HP {}) [{}]",
        decepticon.name,
        decepticon.health,
        decepticon.ability_names()
    );
    println!();
    println!("autobot wins:       {:.1}%", pct(stats.autobot_wins, stats.samples));
    println!("decepticon wins:    {:.1}%", pct(stats.decepticon_wins, stats.samples));
    println!("draws:              {:.1}%", pct(stats.draws, stats.samples));
    println!("stalled:            {:.1}%", pct(stats.stalls, stats.samples));
    println!("avg rounds:         {:.2}", stats.mean_rounds);

    Ok(())
}
