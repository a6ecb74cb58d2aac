use std::io::Write;

use tracing::warn;

use crate::agent::{Avatar, Monster};
use crate::tile::Tile;
use crate::types::{MonsterKind, TerrainType};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStatus {
    pub health: i32,
}

// Call order per frame: begin_frame, every tile, lit monsters, avatar, end_frame.
pub trait Renderer {
    fn begin_frame(&mut self, width: i32, height: i32);
    fn draw_tile(&mut self, x: i32, y: i32, tile: &Tile);
    fn draw_monster(&mut self, monster: &Monster);
    fn draw_avatar(&mut self, avatar: &Avatar);
    fn end_frame(&mut self, status: &FrameStatus);
}

#[derive(Clone, Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
}

impl Renderer for NullRenderer {
    fn begin_frame(&mut self, _width: i32, _height: i32) {}
    fn draw_tile(&mut self, _x: i32, _y: i32, _tile: &Tile) {}
    fn draw_monster(&mut self, _monster: &Monster) {}
    fn draw_avatar(&mut self, _avatar: &Avatar) {}

    fn end_frame(&mut self, _status: &FrameStatus) {
        self.frames += 1;
    }
}

pub fn terrain_glyph(terrain: TerrainType) -> char {
    match terrain {
        TerrainType::Floor => '.',
        TerrainType::Lava => '~',
        TerrainType::Water => '=',
        TerrainType::Forest => 'T',
        TerrainType::Grass => '"',
        TerrainType::Mountain => '^',
        TerrainType::Wall => '#',
        TerrainType::Invalid => '?',
    }
}

pub fn monster_glyph(kind: MonsterKind) -> Option<char> {
    match kind {
        MonsterKind::Skeleton => Some('k'),
        MonsterKind::Orc => Some('o'),
        MonsterKind::Bat => Some('b'),
        MonsterKind::Slime => Some('j'),
        MonsterKind::Invalid => None,
    }
}

pub struct AsciiRenderer<W: Write> {
    out: W,
    clear_screen: bool,
    height: i32,
    cells: Vec<Vec<char>>,
    last_frame: String,
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: false,
            height: 0,
            cells: Vec::new(),
            last_frame: String::new(),
        }
    }

    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn put(&mut self, x: i32, y: i32, glyph: char) {
        let row = self.height - 1 - y;
        if row < 0 || x < 0 {
            return;
        }
        if let Some(cell) = self
            .cells
            .get_mut(row as usize)
            .and_then(|line| line.get_mut(x as usize))
        {
            *cell = glyph;
        }
    }
}

impl<W: Write> Renderer for AsciiRenderer<W> {
    fn begin_frame(&mut self, width: i32, height: i32) {
        self.height = height;
        self.cells = vec![vec![' '; width.max(0) as usize]; height.max(0) as usize];
    }

    fn draw_tile(&mut self, x: i32, y: i32, tile: &Tile) {
        let glyph = if tile.lit {
            terrain_glyph(tile.terrain())
        } else {
            ' '
        };
        self.put(x, y, glyph);
    }

    fn draw_monster(&mut self, monster: &Monster) {
        if let Some(glyph) = monster_glyph(monster.kind) {
            self.put(monster.x, monster.y, glyph);
        }
    }

    fn draw_avatar(&mut self, avatar: &Avatar) {
        self.put(avatar.x, avatar.y, '@');
    }

    fn end_frame(&mut self, status: &FrameStatus) {
        let mut frame = String::new();
        for line in &self.cells {
            frame.extend(line.iter());
            frame.push('\n');
        }
        frame.push_str(&format!("Health: {}\n", status.health));
        self.last_frame = frame;

        let prefix = if self.clear_screen { CLEAR_SCREEN } else { "" };
        let written = write!(self.out, "{prefix}{}", self.last_frame).and_then(|_| self.out.flush());
        if let Err(error) = written {
            warn!(error = %error, "render_failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::types::{MonsterId, Vec2};

    #[test]
    fn frame_is_drawn_top_row_first() {
        let mut renderer = AsciiRenderer::new(Vec::new());
        renderer.begin_frame(3, 2);
        let mut wall = Tile::new(TerrainType::Wall);
        wall.lit = true;
        let mut lava = Tile::new(TerrainType::Lava);
        lava.lit = true;
        let dark = Tile::new(TerrainType::Floor);
        renderer.draw_tile(0, 1, &wall);
        renderer.draw_tile(1, 1, &wall);
        renderer.draw_tile(2, 1, &dark);
        renderer.draw_tile(0, 0, &lava);
        renderer.draw_tile(1, 0, &lava);
        renderer.draw_tile(2, 0, &lava);
        renderer.draw_monster(&Monster::new(
            MonsterId(0),
            MonsterKind::Bat,
            Vec2::new(2, 0),
            1,
            1,
            Duration::from_millis(100),
        ));
        renderer.draw_avatar(&Avatar::new(0, 0, 7, 1, 2.0));
        renderer.end_frame(&FrameStatus { health: 7 });

        assert_eq!(renderer.last_frame(), "## \n@~b\nHealth: 7\n");
        let written = String::from_utf8(renderer.into_inner()).expect("utf8 frame");
        assert_eq!(written, "## \n@~b\nHealth: 7\n");
    }

    #[test]
    fn invalid_monsters_are_not_drawn() {
        let mut renderer = AsciiRenderer::new(Vec::new());
        renderer.begin_frame(1, 1);
        let mut floor = Tile::new(TerrainType::Floor);
        floor.lit = true;
        renderer.draw_tile(0, 0, &floor);
        renderer.draw_monster(&Monster::new(
            MonsterId(0),
            MonsterKind::Invalid,
            Vec2::new(0, 0),
            1,
            1,
            Duration::from_millis(100),
        ));
        renderer.end_frame(&FrameStatus { health: 1 });
        assert_eq!(renderer.last_frame(), ".\nHealth: 1\n");
    }

    #[test]
    fn clear_screen_prefix_is_written() {
        let mut renderer = AsciiRenderer::new(Vec::new()).with_clear_screen(true);
        renderer.begin_frame(1, 1);
        renderer.end_frame(&FrameStatus { health: 3 });
        let written = String::from_utf8(renderer.into_inner()).expect("utf8 frame");
        assert!(written.starts_with(CLEAR_SCREEN));
        assert!(written.ends_with("Health: 3\n"));
    }
}
