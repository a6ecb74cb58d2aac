use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use torchlit::constants::{frame_ms_from_env, COMMAND_QUEUE_CAPACITY};
use torchlit::level::LevelData;
use torchlit::logging::init_tracing;
use torchlit::render::AsciiRenderer;
use torchlit::scheduler::share;
use torchlit::session::{run_session, SessionOptions};
use torchlit::world::World;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    level: PathBuf,
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long)]
    frame_ms: Option<u64>,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let level = match LevelData::load(&cli.level) {
        Ok(level) => level,
        Err(err) => {
            error!(error = %err, "level_load_failed");
            std::process::exit(1);
        }
    };

    let options = SessionOptions {
        frame_interval: Duration::from_millis(cli.frame_ms.unwrap_or_else(frame_ms_from_env)),
        max_frames: None,
        seed: cli.seed.unwrap_or_else(rand::random),
    };

    let world = share(World::from_level(&level));
    let (tx, mut rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    spawn_stdin_reader(tx);

    let mut renderer = AsciiRenderer::new(io::stdout()).with_clear_screen(true);
    let report = run_session(world, &mut rx, &mut renderer, &options).await;
    info!(frames = report.frames, "game_over");
    println!("{}", report.outcome.message());
    // Monster tasks and the blocking stdin reader are abandoned here.
    std::process::exit(0);
}

fn spawn_stdin_reader(tx: mpsc::Sender<char>) {
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        for byte in stdin.lock().bytes() {
            let Ok(byte) = byte else {
                break;
            };
            if tx.blocking_send(char::from(byte)).is_err() {
                break;
            }
        }
    });
}
