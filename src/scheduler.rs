use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::agent::Agent;
use crate::rng::Rng;
use crate::types::MonsterId;
use crate::world::World;

pub type SharedWorld = Arc<Mutex<World>>;

pub fn share(world: World) -> SharedWorld {
    Arc::new(Mutex::new(world))
}

// Tasks are never cancelled; each one ends once its monster is dead or reaped.
pub async fn spawn_monster_tasks(world: &SharedWorld, seed: u32) -> Vec<JoinHandle<()>> {
    let ids = world.lock().await.monster_ids();
    ids.into_iter()
        .map(|id| spawn_monster_task(world.clone(), id, Rng::for_monster(seed, id)))
        .collect()
}

pub fn spawn_monster_task(world: SharedWorld, id: MonsterId, mut rng: Rng) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut moves = 0u64;
        loop {
            let interval = {
                let guard = world.lock().await;
                match guard.monster(id) {
                    Some(monster) if monster.is_alive() => monster.move_interval,
                    _ => break,
                }
            };
            tokio::time::sleep(interval).await;

            let mut guard = world.lock().await;
            if guard.monster_step(id, &mut rng).is_none() {
                break;
            }
            moves += 1;
        }
        debug!(monster = id.0, moves, "monster_task_exit");
    })
}
