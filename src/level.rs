use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

use crate::types::{MonsterKind, TerrainType};

const MONSTER_RECORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("level is truncated in {section}: expected {expected} values, found {found}")]
    Truncated {
        section: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid value for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{what} placed outside the grid at ({x}, {y})")]
    OutOfBounds { what: &'static str, x: i32, y: i32 },
    #[error("more than one actor placed on ({x}, {y})")]
    Overlap { x: i32, y: i32 },
    #[error("grid extents must be positive")]
    EmptyGrid,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AvatarStart {
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub damage: i32,
    pub torch_radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonsterStart {
    pub kind: MonsterKind,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub damage: i32,
    pub move_interval_ms: u64,
}

// `rows` keeps file order, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelData {
    width: i32,
    height: i32,
    avatar: AvatarStart,
    rows: Vec<Vec<TerrainType>>,
    monsters: Vec<MonsterStart>,
}

impl LevelData {
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::parse(&text)?;
        info!(
            path = %path.display(),
            width = level.width,
            height = level.height,
            monsters = level.monsters.len(),
            "level_loaded"
        );
        Ok(level)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn avatar(&self) -> &AvatarStart {
        &self.avatar
    }

    pub fn monsters(&self) -> &[MonsterStart] {
        &self.monsters
    }

    // World coordinates, y = 0 at the bottom. Anything the rows do not cover
    // reads as Invalid.
    pub fn terrain_at(&self, x: i32, y: i32) -> TerrainType {
        if !in_bounds(self.width, self.height, x, y) {
            return TerrainType::Invalid;
        }
        self.rows
            .get((self.height - 1 - y) as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(TerrainType::Invalid)
    }

    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut lines = text.lines();

        let header: Vec<&str> = lines.next().unwrap_or("").split_whitespace().collect();
        require(&header, 2, "grid size")?;
        let width: i32 = parse_field(header[0], "width")?;
        let height: i32 = parse_field(header[1], "height")?;
        if width <= 0 || height <= 0 {
            return Err(LevelError::EmptyGrid);
        }

        let start: Vec<&str> = lines.next().unwrap_or("").split_whitespace().collect();
        require(&start, 5, "avatar")?;
        let avatar = AvatarStart {
            x: parse_field(start[0], "avatar x")?,
            y: parse_field(start[1], "avatar y")?,
            hp: parse_field(start[2], "avatar hp")?,
            damage: parse_field(start[3], "avatar damage")?,
            torch_radius: parse_field(start[4], "avatar torch radius")?,
        };
        if !in_bounds(width, height, avatar.x, avatar.y) {
            return Err(LevelError::OutOfBounds {
                what: "avatar",
                x: avatar.x,
                y: avatar.y,
            });
        }

        let rest: Vec<&str> = lines.flat_map(str::split_whitespace).collect();
        let cell_count = (width as usize) * (height as usize);
        require(&rest, cell_count, "tile grid")?;
        let rows: Vec<Vec<TerrainType>> = rest[..cell_count]
            .chunks(width as usize)
            .map(|row| row.iter().map(|code| TerrainType::from_code(code)).collect())
            .collect();

        let records = &rest[cell_count..];
        if records.len() % MONSTER_RECORD_LEN != 0 {
            let whole = records.len() / MONSTER_RECORD_LEN;
            return Err(LevelError::Truncated {
                section: "monster list",
                expected: (whole + 1) * MONSTER_RECORD_LEN,
                found: records.len(),
            });
        }

        let mut occupied = HashSet::new();
        occupied.insert((avatar.x, avatar.y));
        let mut monsters = Vec::with_capacity(records.len() / MONSTER_RECORD_LEN);
        for record in records.chunks(MONSTER_RECORD_LEN) {
            let monster = MonsterStart {
                kind: MonsterKind::from_code(record[0]),
                x: parse_field(record[1], "monster x")?,
                y: parse_field(record[2], "monster y")?,
                hp: parse_field(record[3], "monster hp")?,
                damage: parse_field(record[4], "monster damage")?,
                move_interval_ms: parse_field(record[5], "monster move interval")?,
            };
            if !in_bounds(width, height, monster.x, monster.y) {
                return Err(LevelError::OutOfBounds {
                    what: "monster",
                    x: monster.x,
                    y: monster.y,
                });
            }
            if !occupied.insert((monster.x, monster.y)) {
                return Err(LevelError::Overlap {
                    x: monster.x,
                    y: monster.y,
                });
            }
            monsters.push(monster);
        }

        Ok(Self {
            width,
            height,
            avatar,
            rows,
            monsters,
        })
    }
}

fn require(tokens: &[&str], expected: usize, section: &'static str) -> Result<(), LevelError> {
    if tokens.len() < expected {
        return Err(LevelError::Truncated {
            section,
            expected,
            found: tokens.len(),
        });
    }
    Ok(())
}

fn parse_field<T: FromStr>(raw: &str, field: &'static str) -> Result<T, LevelError> {
    raw.parse::<T>().map_err(|_| LevelError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn in_bounds(width: i32, height: i32, x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && x < width && y < height
}
