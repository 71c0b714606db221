use std::path::PathBuf;

use arena_cli::{init_tracing, load_recruit, load_roster};
use arena_engine::config::load_config;
use arena_engine::creation::CombatantDraft;
use arena_engine::{
    content, Arena, ArenaConfig, BattleConfig, BattleError, BattleObserver, BattleSnapshot,
    CancelToken, Dice, Faction, RosterStore,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, ValueEnum)]
enum Side {
    Autobot,
    Decepticon,
}

#[derive(Subcommand)]
enum Cmd {
    /// List the abilities new combatants can pick from
    Abilities,
    /// List both rosters with their win/loss records
    Roster {
        /// Autobot roster JSON (defaults to the built-in roster)
        #[arg(long)]
        autobots: Option<PathBuf>,
        /// Decepticon roster JSON (defaults to the built-in roster)
        #[arg(long)]
        decepticons: Option<PathBuf>,
    },
    /// Validate a new combatant and print it as JSON
    Create {
        #[arg(long, value_enum)]
        faction: Side,
        #[arg(long)]
        name: String,
        /// Icon URL; a faction default is used when omitted
        #[arg(long)]
        icon: Option<String>,
        /// Starting health (at least 100, in steps of 10)
        #[arg(long, default_value_t = 100)]
        health: i32,
        /// Ability id from the catalog; pass 3 to 5 times
        #[arg(long = "ability")]
        abilities: Vec<String>,
        /// Pretty-print JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Fight one or more battles in a single session
    Battle {
        /// Autobot id
        #[arg(long)]
        autobot: Option<String>,
        /// Decepticon id
        #[arg(long)]
        decepticon: Option<String>,
        /// RNG seed for determinism (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Pause between rounds in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Give up on a battle after this many rounds
        #[arg(long)]
        max_rounds: Option<u32>,
        /// Number of battles to fight back to back
        #[arg(long, default_value_t = 1)]
        battles: u32,
        /// YAML or JSON arena config; flags win over file values
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        autobots: Option<PathBuf>,
        #[arg(long)]
        decepticons: Option<PathBuf>,
        /// Combatant JSON from `create` to add to the roster; repeatable
        #[arg(long = "recruit")]
        recruits: Vec<PathBuf>,
    },
}

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Autobot vs Decepticon battle simulator")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn to_faction(s: Side) -> Faction {
    match s {
        Side::Autobot => Faction::Autobot,
        Side::Decepticon => Faction::Decepticon,
    }
}

/// Prints each log line once, as soon as a round publishes it.
#[derive(Default)]
struct LogPrinter {
    printed: usize,
}

impl LogPrinter {
    fn begin(&mut self) {
        self.printed = 0;
    }
}

impl BattleObserver for LogPrinter {
    fn on_update(&mut self, snapshot: &BattleSnapshot) {
        for line in snapshot.log.iter().skip(self.printed) {
            println!("{}", line);
        }
        self.printed = snapshot.log.len();
    }

    fn on_message(&mut self, line: &str) {
        println!("{}", line);
    }
}

fn print_roster(roster: &RosterStore) {
    for faction in [Faction::Autobot, Faction::Decepticon] {
        println!("{}s", faction);
        let list = roster.faction(faction);
        if list.is_empty() {
            println!("  No {} combatants found.", faction);
        }
        for c in list {
            println!(
                "  {:<16} {:<20} hp={:<4} W/L {}/{}  [{}]",
                c.id,
                c.name,
                c.health,
                c.wins,
                c.losses,
                c.ability_names()
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Cmd::Abilities => {
            for a in content::ability_catalog()?.values() {
                println!(
                    "{:<12} {:<16} damage={:<3} cooldown={}s  {}",
                    a.id, a.name, a.damage, a.cooldown, a.description
                );
            }
        }
        Cmd::Roster {
            autobots,
            decepticons,
        } => {
            let roster = load_roster(autobots.as_deref(), decepticons.as_deref());
            print_roster(&roster);
        }
        Cmd::Create {
            faction,
            name,
            icon,
            health,
            abilities,
            pretty,
        } => {
            let draft = CombatantDraft {
                name,
                faction: to_faction(faction),
                icon,
                health,
                ability_ids: abilities,
            };
            let combatant = draft.build(&content::ability_catalog()?)?;
            if pretty {
                println!("{}", serde_json::to_string_pretty(&combatant)?);
            } else {
                println!("{}", serde_json::to_string(&combatant)?);
            }
        }
        Cmd::Battle {
            autobot,
            decepticon,
            seed,
            delay_ms,
            max_rounds,
            battles,
            config,
            autobots,
            decepticons,
            recruits,
        } => {
            let file_cfg = match config.as_deref() {
                Some(path) => load_config(path)?,
                None => ArenaConfig::default(),
            };
            let battle_cfg = BattleConfig {
                round_delay_ms: delay_ms.unwrap_or(file_cfg.battle.round_delay_ms),
                max_rounds: max_rounds.or(file_cfg.battle.max_rounds),
            };
            let roster = load_roster(
                autobots.as_deref().or(file_cfg.autobots.as_deref()),
                decepticons.as_deref().or(file_cfg.decepticons.as_deref()),
            );
            let mut dice = match seed.or(file_cfg.seed) {
                Some(seed) => Dice::from_seed(seed),
                None => Dice::from_entropy(),
            };

            let cancel = CancelToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let mut arena = Arena::new(roster, battle_cfg);
            for path in &recruits {
                arena.add_combatant(load_recruit(path)?);
            }
            let mut printer = LogPrinter::default();
            for _ in 0..battles {
                printer.begin();
                let outcome = arena
                    .battle_then(
                        autobot.as_deref(),
                        decepticon.as_deref(),
                        &mut dice,
                        &mut printer,
                        &cancel,
                        |result| println!("-- recorded: {}", result),
                    )
                    .await;
                match outcome {
                    Ok(_) => println!(),
                    Err(BattleError::MissingCombatant(_)) => break,
                    Err(e) => {
                        eprintln!("{}", e);
                        break;
                    }
                }
            }

            println!("Results");
            if arena.results().is_empty() {
                println!("  No battles completed yet.");
            }
            for entry in arena.results().entries() {
                println!("  {}", entry.display_line());
            }
            print_roster(arena.roster());
        }
    }
    Ok(())
}
