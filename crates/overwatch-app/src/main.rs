use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use overwatch_app::config::AppConfig;
use overwatch_app::control;
use overwatch_app::game_loop::{self, Driver};
use overwatch_app::state::{AppState, FrameSummary};
use overwatch_app::telemetry;
use overwatch_core::commands::ControlCommand;
use overwatch_core::enums::{MotionModelKind, ScenarioId};
use overwatch_core::state::SimSnapshot;
use overwatch_feed::{demo, load_replay, MessageCategory, MessageLog};

#[derive(Parser)]
#[command(author, version, about = "Simulated air-track picture with heat and marker overlays", long_about = None)]
struct Cli {
    /// Scenario to load (ignored when --replay is given)
    #[arg(long, value_enum, default_value_t = ScenarioArg::TaiwanStrait)]
    scenario: ScenarioArg,

    /// Number of ticks to run
    #[arg(long, default_value_t = 100)]
    ticks: u64,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay file to play instead of a generated scenario
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Newline-delimited JSON message feed; the demo transcript is used otherwise
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Write the final snapshot as JSON to this path
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Force a motion model for generated tracks
    #[arg(long, value_enum)]
    motion: Option<MotionArg>,

    /// Pace ticks on the loop thread at the configured interval
    #[arg(long)]
    realtime: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScenarioArg {
    TaiwanStrait,
    SouthChinaSea,
    EastChinaSea,
    KoreanPeninsula,
}

impl From<ScenarioArg> for ScenarioId {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::TaiwanStrait => ScenarioId::TaiwanStrait,
            ScenarioArg::SouthChinaSea => ScenarioId::SouthChinaSea,
            ScenarioArg::EastChinaSea => ScenarioId::EastChinaSea,
            ScenarioArg::KoreanPeninsula => ScenarioId::KoreanPeninsula,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MotionArg {
    Orbit,
    Transit,
}

impl From<MotionArg> for MotionModelKind {
    fn from(arg: MotionArg) -> Self {
        match arg {
            MotionArg::Orbit => MotionModelKind::EllipticalOrbit,
            MotionArg::Transit => MotionModelKind::CappedTransit,
        }
    }
}

fn main() -> Result<()> {
    telemetry::init_telemetry();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(motion) = cli.motion {
        config.motion_override = Some(motion.into());
    }

    let log = read_feed(cli.feed.as_ref());
    info!(
        messages = log.len(),
        dropped = log.dropped(),
        positive = log.count(MessageCategory::Positive),
        negative = log.count(MessageCategory::Negative),
        status = ?log.status(),
        "transmission log ready"
    );

    let initial = match &cli.replay {
        Some(path) => {
            let script = load_replay(path)
                .with_context(|| format!("loading replay {}", path.display()))?;
            vec![ControlCommand::StartReplay { script }]
        }
        None => vec![ControlCommand::SelectScenario {
            scenario: cli.scenario.into(),
        }],
    };

    let (snapshot, summary) = if cli.realtime {
        run_realtime(config, initial, cli.ticks)?
    } else {
        run_headless(&config, initial, cli.ticks)
    };

    if let Some(path) = &cli.dump {
        let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }

    println!("{}", serde_json::to_string(&summary).context("serializing summary")?);
    Ok(())
}

/// Feed problems are never fatal; a missing or broken feed leaves an
/// errored log behind.
fn read_feed(path: Option<&PathBuf>) -> MessageLog {
    let mut log = MessageLog::new();
    let result = match path {
        Some(path) => match File::open(path) {
            Ok(file) => log.pump(BufReader::new(file)),
            Err(err) => {
                warn!(path = %path.display(), %err, "feed unavailable");
                log.set_status(overwatch_feed::ConnectionStatus::Error);
                return log;
            }
        },
        None => demo::play_demo(&mut log),
    };
    if let Err(err) = result {
        warn!(%err, "feed ended with an error");
    }
    log
}

fn run_headless(
    config: &AppConfig,
    initial: Vec<ControlCommand>,
    ticks: u64,
) -> (SimSnapshot, FrameSummary) {
    let mut driver = Driver::new(config);
    let frame = game_loop::run_headless(&mut driver, initial, ticks);
    let result = match frame {
        Some(frame) => ((*frame.snapshot).clone(), frame.summary),
        None => (SimSnapshot::default(), FrameSummary::default()),
    };
    driver.shutdown();
    result
}

fn run_realtime(
    config: AppConfig,
    initial: Vec<ControlCommand>,
    ticks: u64,
) -> Result<(SimSnapshot, FrameSummary)> {
    let state = AppState::new();
    control::start_simulation(&state, config, initial, Some(ticks))?;
    let report = control::wait_for_loop(&state)?;
    info!(ticks = report.ticks, reason = ?report.reason, "realtime run finished");

    let snapshot = control::get_snapshot(&state)?
        .map(|s| (*s).clone())
        .unwrap_or_default();
    Ok((snapshot, report.last.unwrap_or_default()))
}
