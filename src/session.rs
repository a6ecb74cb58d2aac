use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use crate::constants::FRAME_MS;
use crate::render::Renderer;
use crate::scheduler::{spawn_monster_tasks, SharedWorld};
use crate::types::{Outcome, WorldSnapshot};

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub frame_interval: Duration,
    pub max_frames: Option<u64>,
    pub seed: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(FRAME_MS),
            max_frames: None,
            seed: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionReport {
    pub outcome: Outcome,
    pub frames: u64,
    pub snapshot: WorldSnapshot,
}

// Input, reaping and rendering for a frame all happen under one lock.
// Monster tasks are left detached when the session ends.
pub async fn run_session<R: Renderer>(
    world: SharedWorld,
    commands: &mut mpsc::Receiver<char>,
    renderer: &mut R,
    options: &SessionOptions,
) -> SessionReport {
    let tasks = spawn_monster_tasks(&world, options.seed).await;
    info!(
        monsters = tasks.len(),
        seed = options.seed,
        frame_ms = options.frame_interval.as_millis() as u64,
        "session_start"
    );
    drop(tasks);

    let mut frames = 0u64;
    let outcome = loop {
        let (alive, remaining) = {
            let mut guard = world.lock().await;
            while let Ok(key) = commands.try_recv() {
                guard.handle_key(key);
            }
            guard.reap_dead();
            guard.render(renderer);
            (guard.avatar_alive(), guard.monster_count())
        };
        frames += 1;

        if remaining == 0 {
            break Outcome::Victory;
        }
        if !alive {
            break Outcome::Defeat;
        }
        if options.max_frames.is_some_and(|max| frames >= max) {
            break Outcome::Stalled;
        }
        tokio::time::sleep(options.frame_interval).await;
    };

    let snapshot = world.lock().await.snapshot();
    info!(
        outcome = ?outcome,
        frames,
        hp = snapshot.avatar.hp,
        monsters = snapshot.monsters.len(),
        "session_end"
    );
    SessionReport {
        outcome,
        frames,
        snapshot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::COMMAND_QUEUE_CAPACITY;
    use crate::level::LevelData;
    use crate::render::{AsciiRenderer, NullRenderer};
    use crate::scheduler::share;
    use crate::world::World;

    fn shared_from(text: &str) -> SharedWorld {
        share(World::from_level(
            &LevelData::parse(text).expect("test level should parse"),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn killing_the_last_monster_wins() {
        let world = shared_from("3 1\n0 0 10 5 2.0\nB B B\nSK 1 0 5 1 1000000\n");
        let (tx, mut rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        tx.send('d').await.expect("queue open");

        let mut renderer = NullRenderer::default();
        let report = run_session(world, &mut rx, &mut renderer, &SessionOptions::default()).await;

        assert_eq!(report.outcome, Outcome::Victory);
        assert_eq!(report.frames, 1);
        assert_eq!(renderer.frames, 1);
        assert!(report.snapshot.monsters.is_empty());
        assert_eq!(report.snapshot.avatar.x, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dying_to_a_monster_loses() {
        let world = shared_from("3 1\n0 0 3 1 2.0\nB B S\nOR 1 0 50 1 20\n");
        let (_tx, mut rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);

        let mut renderer = NullRenderer::default();
        let report = run_session(world, &mut rx, &mut renderer, &SessionOptions::default()).await;

        assert_eq!(report.outcome, Outcome::Defeat);
        assert!(report.snapshot.avatar.hp <= 0);
        assert_eq!(report.snapshot.monsters.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn frame_cap_stalls_the_session() {
        let world = shared_from("3 1\n0 0 10 1 2.0\nB B B\nSK 2 0 5 1 1000000\n");
        let (tx, mut rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        tx.send('+').await.expect("queue open");
        tx.send('?').await.expect("queue open");

        let mut renderer = AsciiRenderer::new(Vec::new());
        let options = SessionOptions {
            max_frames: Some(3),
            ..SessionOptions::default()
        };
        let report = run_session(world, &mut rx, &mut renderer, &options).await;

        assert_eq!(report.outcome, Outcome::Stalled);
        assert_eq!(report.frames, 3);
        assert_eq!(report.snapshot.avatar.torch_radius, 2.5);
        assert_eq!(renderer.last_frame(), "@.k\nHealth: 10\n");
    }

    #[tokio::test(start_paused = true)]
    async fn closed_command_queue_does_not_end_the_session() {
        let world = shared_from("2 1\n0 0 10 5 2.0\nB B\nSK 1 0 5 1 1000000\n");
        let (tx, mut rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        drop(tx);

        let mut renderer = NullRenderer::default();
        let options = SessionOptions {
            max_frames: Some(5),
            ..SessionOptions::default()
        };
        let report = run_session(world, &mut rx, &mut renderer, &options).await;
        assert_eq!(report.outcome, Outcome::Stalled);
        assert_eq!(renderer.frames, 5);
    }
}
