use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, info};

use crate::agent::{Agent, Avatar, Monster};
use crate::level::LevelData;
use crate::render::{FrameStatus, Renderer};
use crate::rng::Rng;
use crate::tile::Tile;
use crate::types::{Command, MonsterId, Vec2, WorldSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Blocked,
    Attacked,
    Moved,
}

// y = 0 is the bottom row. Only monsters are recorded in `Tile::occupant`;
// the avatar is found by comparing positions.
#[derive(Clone, Debug)]
pub struct World {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    avatar: Avatar,
    monsters: BTreeMap<MonsterId, Monster>,
}

impl World {
    pub fn from_level(level: &LevelData) -> Self {
        let width = level.width();
        let height = level.height();
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(level.terrain_at(x, y)));
            }
        }

        let start = level.avatar();
        let avatar = Avatar::new(start.x, start.y, start.hp, start.damage, start.torch_radius);

        let mut world = Self {
            width,
            height,
            tiles,
            avatar,
            monsters: BTreeMap::new(),
        };
        for (index, start) in level.monsters().iter().enumerate() {
            let id = MonsterId(index);
            let monster = Monster::new(
                id,
                start.kind,
                Vec2::new(start.x, start.y),
                start.hp,
                start.damage,
                Duration::from_millis(start.move_interval_ms),
            );
            if let Some(tile) = world.tile_mut(start.x, start.y) {
                tile.occupant = Some(id);
            }
            world.monsters.insert(id, monster);
        }
        world.light();
        world
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    pub fn monster_ids(&self) -> Vec<MonsterId> {
        self.monsters.keys().copied().collect()
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|idx| &self.tiles[idx])
    }

    fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(|idx| &mut self.tiles[idx])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    pub fn handle_key(&mut self, ch: char) {
        self.handle_command(Command::from_key(ch));
    }

    // Lighting is recomputed even for unknown keys and refused moves.
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::Move(dir) => {
                let (dx, dy) = dir.delta();
                if dx != 0 || dy != 0 {
                    self.avatar_move(dx, dy);
                }
            }
            Command::TorchUp => self.avatar.increase_torch(),
            Command::TorchDown => self.avatar.decrease_torch(),
            Command::Unknown => {}
        }
        self.light();
    }

    pub fn avatar_move(&mut self, dx: i32, dy: i32) -> MoveOutcome {
        let to = Vec2::new(self.avatar.x + dx, self.avatar.y + dy);
        let Some(idx) = self.index(to.x, to.y) else {
            return MoveOutcome::Blocked;
        };
        let tile = &self.tiles[idx];
        if !tile.is_passable() {
            return MoveOutcome::Blocked;
        }
        if let Some(target) = tile.occupant {
            // Not-yet-reaped dead monsters still soak up hits.
            let hit = self.avatar.damage();
            if let Some(monster) = self.monsters.get_mut(&target) {
                monster.incur_damage(hit);
            }
            return MoveOutcome::Attacked;
        }
        enter(&mut self.avatar, tile, to);
        MoveOutcome::Moved
    }

    pub fn monster_move(&mut self, id: MonsterId, x: i32, y: i32) -> MoveOutcome {
        let Some(idx) = self.index(x, y) else {
            return MoveOutcome::Blocked;
        };
        // Any occupant blocks, including the mover itself when it stays put.
        if !self.tiles[idx].is_passable() || self.tiles[idx].is_occupied() {
            return MoveOutcome::Blocked;
        }
        let Some(monster) = self.monsters.get_mut(&id) else {
            return MoveOutcome::Blocked;
        };

        if self.avatar.x == x && self.avatar.y == y {
            self.avatar.incur_damage(monster.damage());
            return MoveOutcome::Attacked;
        }

        let from = monster.position();
        enter(monster, &self.tiles[idx], Vec2::new(x, y));
        if let Some(old) = self.index(from.x, from.y) {
            self.tiles[old].occupant = None;
        }
        self.tiles[idx].occupant = Some(id);
        MoveOutcome::Moved
    }

    // `None` once the monster is dead or gone; its task stops on that.
    pub fn monster_step(&mut self, id: MonsterId, rng: &mut Rng) -> Option<MoveOutcome> {
        let monster = self.monsters.get_mut(&id)?;
        if !monster.is_alive() {
            return None;
        }
        monster.tick_damage_counter();
        let to = monster.position().offset(rng.step());
        Some(self.monster_move(id, to.x, to.y))
    }

    pub fn light(&mut self) -> usize {
        self.set_lit(false);
        let origin = self.avatar.position();
        let radius = self.avatar.torch_radius();
        let lit = self.flood_light(origin, radius);
        debug!(
            x = origin.x,
            y = origin.y,
            radius,
            lit,
            "light_pass"
        );
        lit
    }

    pub fn set_lit(&mut self, value: bool) {
        for tile in &mut self.tiles {
            tile.lit = value;
        }
    }

    // Depth-first fill with an explicit stack. A tile is lit when it lies
    // strictly inside the radius measured from `origin`; only non-opaque lit
    // tiles spread to their neighbours. Neighbours are pushed in reverse so
    // they are visited west, east, south, north.
    fn flood_light(&mut self, origin: Vec2, radius: f64) -> usize {
        let mut count = 0;
        let mut stack = vec![origin];
        while let Some(cur) = stack.pop() {
            let Some(idx) = self.index(cur.x, cur.y) else {
                continue;
            };
            if self.tiles[idx].lit {
                continue;
            }
            let dx = f64::from(origin.x - cur.x);
            let dy = f64::from(origin.y - cur.y);
            if (dx * dx + dy * dy).sqrt() >= radius {
                continue;
            }
            self.tiles[idx].lit = true;
            count += 1;
            if self.tiles[idx].is_opaque() {
                continue;
            }
            stack.push(Vec2::new(cur.x, cur.y + 1));
            stack.push(Vec2::new(cur.x, cur.y - 1));
            stack.push(Vec2::new(cur.x + 1, cur.y));
            stack.push(Vec2::new(cur.x - 1, cur.y));
        }
        count
    }

    pub fn lit_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.lit).count()
    }

    pub fn reap_dead(&mut self) -> Vec<MonsterId> {
        let dead: Vec<MonsterId> = self
            .monsters
            .values()
            .filter(|monster| !monster.is_alive())
            .map(|monster| monster.id)
            .collect();
        for id in &dead {
            let Some(monster) = self.monsters.remove(id) else {
                continue;
            };
            if let Some(tile) = self.tile_mut(monster.x, monster.y) {
                if tile.occupant == Some(*id) {
                    tile.occupant = None;
                }
            }
            info!(
                monster = id.0,
                kind = ?monster.kind,
                x = monster.x,
                y = monster.y,
                remaining = self.monsters.len(),
                "monster_reaped"
            );
        }
        dead
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.begin_frame(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(tile) = self.tile(x, y) {
                    renderer.draw_tile(x, y, tile);
                }
            }
        }
        for monster in self.monsters.values() {
            let lit = self.tile(monster.x, monster.y).is_some_and(|tile| tile.lit);
            if lit && monster.is_alive() {
                renderer.draw_monster(monster);
            }
        }
        renderer.draw_avatar(&self.avatar);
        renderer.end_frame(&FrameStatus {
            health: self.avatar.hit_points(),
        });
    }

    pub fn avatar_alive(&self) -> bool {
        self.avatar.is_alive()
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    // Empty when monster positions and tile occupants agree.
    pub fn occupancy_errors(&self) -> Vec<String> {
        let mut out = Vec::new();
        for monster in self.monsters.values() {
            match self.tile(monster.x, monster.y) {
                Some(tile) if tile.occupant == Some(monster.id) => {}
                Some(tile) => out.push(format!(
                    "monster {} at ({}, {}) but tile occupant is {:?}",
                    monster.id.0, monster.x, monster.y, tile.occupant
                )),
                None => out.push(format!(
                    "monster {} out of bounds at ({}, {})",
                    monster.id.0, monster.x, monster.y
                )),
            }
        }
        for y in 0..self.height {
            for x in 0..self.width {
                let Some(id) = self.tile(x, y).and_then(|tile| tile.occupant) else {
                    continue;
                };
                let matches = self
                    .monsters
                    .get(&id)
                    .is_some_and(|monster| monster.x == x && monster.y == y);
                if !matches {
                    out.push(format!("tile ({x}, {y}) names stale occupant {}", id.0));
                }
            }
        }
        out
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            width: self.width,
            height: self.height,
            avatar: self.avatar.view(),
            monsters: self.monsters.values().map(Monster::view).collect(),
            lit_tiles: self.lit_count(),
        }
    }
}

fn enter<A: Agent>(agent: &mut A, tile: &Tile, to: Vec2) {
    agent.incur_damage(tile.damage_on_entry());
    agent.set_position(to);
}
