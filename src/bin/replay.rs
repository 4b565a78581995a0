//! Replay a client log and print the reconstructed match and next turn plan.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hearth_tracker::cards::Catalog;
use hearth_tracker::core::{MatchState, Side, TrackerConfig};
use hearth_tracker::log::{AuditSink, LogTail, NullSink, WriterSink};
use hearth_tracker::session::LogSession;

#[derive(Parser)]
#[command(name = "hearth-replay", about = "Rebuild match state from a client log")]
struct Cli {
    /// Card database (JSON)
    #[arg(short, long)]
    catalog: PathBuf,

    /// Client log to read
    #[arg(short, long)]
    log: PathBuf,

    /// Account name as it appears in the log
    #[arg(short, long)]
    player: Option<String>,

    /// Tracker configuration (JSON); flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Archive every in-game line to this file
    #[arg(short, long)]
    audit: Option<PathBuf>,

    /// Keep polling the log after reaching its end
    #[arg(short, long)]
    follow: bool,

    /// Poll interval when following, in milliseconds
    #[arg(long, default_value_t = 500)]
    poll_ms: u64,

    /// Debug-level output (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<TrackerConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => TrackerConfig::default(),
    };
    if let Some(player) = cli.player {
        config.player_name = player;
    }

    let catalog = Catalog::load(&cli.catalog).context("loading card catalog")?;
    for warning in catalog.skipped() {
        tracing::warn!(?warning, "catalog entry skipped");
    }

    let audit: Box<dyn AuditSink> = match &cli.audit {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            Box::new(WriterSink::new(BufWriter::new(file)))
        }
        None => Box::new(NullSink),
    };

    let mut session = LogSession::new(config, Arc::new(catalog), LogTail::new(&cli.log), audit)?;

    loop {
        let summary = session.pump().context("reading log")?;
        tracing::debug!(?summary, "pumped");
        if !cli.follow {
            break;
        }
        if summary.lines == 0 {
            std::thread::sleep(Duration::from_millis(cli.poll_ms));
        }
    }

    let mut out = std::io::stdout().lock();
    print_state(&mut out, session.state())?;

    match session.plan() {
        Ok(plan) => {
            writeln!(out, "\nPlan:")?;
            for intent in plan.intents() {
                writeln!(out, "  {intent}")?;
            }
        }
        Err(err) => writeln!(out, "\nNo plan: {err}")?,
    }
    Ok(())
}

fn print_state(out: &mut impl Write, state: &MatchState) -> std::io::Result<()> {
    writeln!(
        out,
        "Turn {} ({}), started={}, ended={}, outcome={:?}, desynced={}",
        state.turn_number,
        state.turn().map_or_else(|| "unknown".to_string(), |s| s.to_string()),
        state.is_started(),
        state.is_ended(),
        state.outcome(),
        state.is_desynced(),
    )?;

    for side in Side::ALL {
        let player = state.player(side);
        writeln!(
            out,
            "\n{side}: mana {}/{}",
            player.mana_available(),
            player.mana_pool
        )?;
        write!(out, "  hand:")?;
        for entity in state.hand_entities(side) {
            write!(out, " [{} ({})]", entity.name, entity.cost)?;
        }
        write!(out, "\n  board:")?;
        for entity in state.board_entities(side) {
            write!(
                out,
                " [{} {}/{}{}]",
                entity.name,
                entity.attack(),
                entity.remaining_health(),
                if entity.active { " *" } else { "" }
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "\nGraveyard: {} entities", state.graveyard().len())?;
    if !state.diagnostics().is_empty() {
        writeln!(out, "Diagnostics:")?;
        for warning in state.diagnostics() {
            writeln!(out, "  {warning:?}")?;
        }
    }
    Ok(())
}
