use std::{fs, path::Path};

use arena_engine::roster::{faction_or_fallback, parse_faction};
use anyhow::Context;
use arena_engine::{content, Combatant, Faction, RosterStore};
use encoding_rs::Encoding;
use tracing::Level;

pub fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

/// A roster file when given, otherwise the built-in roster. Any failure
/// falls back to the faction's single placeholder combatant.
pub fn load_faction(path: Option<&Path>, faction: Faction) -> Vec<Combatant> {
    let loaded = match path {
        Some(p) => read_text_auto(p)
            .and_then(|text| parse_faction(&text, faction))
            .map_err(|e| e.context(format!("roster file {}", p.display()))),
        None => content::builtin_roster(faction),
    };
    faction_or_fallback(loaded, faction)
}

/// One combatant as `arena create` prints it.
pub fn load_recruit(path: &Path) -> anyhow::Result<Combatant> {
    let text = read_text_auto(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("combatant file {}", path.display()))
}

pub fn load_roster(autobots: Option<&Path>, decepticons: Option<&Path>) -> RosterStore {
    RosterStore::new(
        load_faction(autobots, Faction::Autobot),
        load_faction(decepticons, Faction::Decepticon),
    )
}

/// Logs go to stderr so they never interleave with the battle log on stdout.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
