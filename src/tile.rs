use crate::constants::LAVA_DAMAGE;
use crate::types::{MonsterId, TerrainType};

#[derive(Clone, Debug)]
pub struct Tile {
    terrain: TerrainType,
    pub lit: bool,
    pub occupant: Option<MonsterId>,
}

impl Tile {
    pub fn new(terrain: TerrainType) -> Self {
        Self {
            terrain,
            lit: false,
            occupant: None,
        }
    }

    pub fn terrain(&self) -> TerrainType {
        self.terrain
    }

    // Forest stops light but can still be walked through.
    pub fn is_opaque(&self) -> bool {
        matches!(
            self.terrain,
            TerrainType::Forest | TerrainType::Mountain | TerrainType::Wall
        )
    }

    pub fn is_passable(&self) -> bool {
        !matches!(
            self.terrain,
            TerrainType::Water | TerrainType::Mountain | TerrainType::Wall
        )
    }

    pub fn damage_on_entry(&self) -> i32 {
        match self.terrain {
            TerrainType::Lava => LAVA_DAMAGE,
            _ => 0,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}
