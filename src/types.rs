use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

// North is +y: the grid origin is the bottom-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    West,
    East,
    None,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
            Self::None => (0, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    TorchUp,
    TorchDown,
    Unknown,
}

impl Command {
    pub fn from_key(ch: char) -> Self {
        match ch {
            'w' => Self::Move(Direction::North),
            's' => Self::Move(Direction::South),
            'a' => Self::Move(Direction::West),
            'd' => Self::Move(Direction::East),
            '+' => Self::TorchUp,
            '-' => Self::TorchDown,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerrainType {
    Floor,
    Lava,
    Water,
    Forest,
    Grass,
    Mountain,
    Wall,
    Invalid,
}

impl TerrainType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "B" => Self::Floor,
            "L" => Self::Lava,
            "W" => Self::Water,
            "F" => Self::Forest,
            "G" => Self::Grass,
            "M" => Self::Mountain,
            "S" => Self::Wall,
            _ => Self::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    Skeleton,
    Orc,
    Bat,
    Slime,
    Invalid,
}

impl MonsterKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "SK" => Self::Skeleton,
            "OR" => Self::Orc,
            "BA" => Self::Bat,
            "SL" => Self::Slime,
            _ => Self::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonsterId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Defeat,
    Stalled,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Victory => "You win!!!",
            Self::Defeat => "You lose...",
            Self::Stalled => "Out of time.",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AvatarView {
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub damage: i32,
    #[serde(rename = "torchRadius")]
    pub torch_radius: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct MonsterView {
    pub id: MonsterId,
    pub kind: MonsterKind,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub damage: i32,
    #[serde(rename = "damageCounter")]
    pub damage_counter: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct WorldSnapshot {
    pub width: i32,
    pub height: i32,
    pub avatar: AvatarView,
    pub monsters: Vec<MonsterView>,
    #[serde(rename = "litTiles")]
    pub lit_tiles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Command::from_key('w'), Command::Move(Direction::North));
        assert_eq!(Command::from_key('s'), Command::Move(Direction::South));
        assert_eq!(Command::from_key('a'), Command::Move(Direction::West));
        assert_eq!(Command::from_key('d'), Command::Move(Direction::East));
        assert_eq!(Command::from_key('+'), Command::TorchUp);
        assert_eq!(Command::from_key('-'), Command::TorchDown);
        assert_eq!(Command::from_key('q'), Command::Unknown);
        assert_eq!(Command::from_key('W'), Command::Unknown);
    }

    #[test]
    fn north_increases_y() {
        let origin = Vec2::new(3, 3);
        assert_eq!(origin.offset(Direction::North), Vec2::new(3, 4));
        assert_eq!(origin.offset(Direction::South), Vec2::new(3, 2));
        assert_eq!(origin.offset(Direction::West), Vec2::new(2, 3));
        assert_eq!(origin.offset(Direction::East), Vec2::new(4, 3));
        assert_eq!(origin.offset(Direction::None), origin);
    }

    #[test]
    fn unknown_codes_fall_back_to_invalid() {
        assert_eq!(TerrainType::from_code("B"), TerrainType::Floor);
        assert_eq!(TerrainType::from_code("S"), TerrainType::Wall);
        assert_eq!(TerrainType::from_code("X"), TerrainType::Invalid);
        assert_eq!(TerrainType::from_code("b"), TerrainType::Invalid);
        assert_eq!(MonsterKind::from_code("OR"), MonsterKind::Orc);
        assert_eq!(MonsterKind::from_code("DR"), MonsterKind::Invalid);
    }
}
