use clap::Parser;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use torchlit::constants::COMMAND_QUEUE_CAPACITY;
use torchlit::level::LevelData;
use torchlit::logging::init_tracing;
use torchlit::render::NullRenderer;
use torchlit::rng::Rng;
use torchlit::scheduler::share;
use torchlit::session::{run_session, SessionOptions};
use torchlit::types::{Outcome, WorldSnapshot};
use torchlit::world::World;
use tracing::{error, info, warn};

const PLAYER_KEYS: [char; 6] = ['w', 'a', 's', 'd', '+', '-'];

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    level: PathBuf,
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long, default_value_t = 600)]
    frames: u64,
    #[arg(long, default_value_t = 10)]
    frame_ms: u64,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct SimulationSummary {
    level: String,
    seed: u32,
    outcome: Outcome,
    frames: u64,
    #[serde(rename = "keysSent")]
    keys_sent: u64,
    snapshot: WorldSnapshot,
    anomalies: Vec<String>,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);

    let level = match LevelData::load(&cli.level) {
        Ok(level) => level,
        Err(err) => {
            error!(error = %err, "level_load_failed");
            std::process::exit(1);
        }
    };

    let world = share(World::from_level(&level));
    let (tx, mut rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    let frame_interval = Duration::from_millis(cli.frame_ms.max(1));
    let player = spawn_random_player(tx, seed, frame_interval);

    let options = SessionOptions {
        frame_interval,
        max_frames: Some(cli.frames),
        seed,
    };
    let mut renderer = NullRenderer::default();
    let report = run_session(world.clone(), &mut rx, &mut renderer, &options).await;
    drop(rx);
    let keys_sent = player.await.unwrap_or_default();

    let anomalies = world.lock().await.occupancy_errors();
    for anomaly in &anomalies {
        warn!(message = %anomaly, "anomaly_detected");
    }

    let summary = SimulationSummary {
        level: cli.level.to_string_lossy().to_string(),
        seed,
        outcome: report.outcome,
        frames: report.frames,
        keys_sent,
        snapshot: report.snapshot,
        anomalies,
    };
    match serde_json::to_string(&summary) {
        Ok(line) => println!("{line}"),
        Err(err) => error!(error = %err, "summary_serialize_failed"),
    }

    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(err) = write_summary(path, &summary) {
            error!(path = %path.display(), error = %err, "summary_write_failed");
            std::process::exit(2);
        }
        info!(path = %path.display(), "summary_written");
    }

    if !summary.anomalies.is_empty() {
        std::process::exit(1);
    }
    std::process::exit(0);
}

fn spawn_random_player(
    tx: mpsc::Sender<char>,
    seed: u32,
    interval: Duration,
) -> tokio::task::JoinHandle<u64> {
    tokio::spawn(async move {
        let mut rng = Rng::new(seed.rotate_left(16));
        let mut sent = 0u64;
        loop {
            let key = random_key(&mut rng);
            if tx.send(key).await.is_err() {
                break;
            }
            sent += 1;
            tokio::time::sleep(interval).await;
        }
        sent
    })
}

fn random_key(rng: &mut Rng) -> char {
    PLAYER_KEYS[rng.int(0, PLAYER_KEYS.len() as i32 - 1) as usize]
}

fn write_summary(path: &Path, summary: &SimulationSummary) -> io::Result<()> {
    let text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, text)
}
