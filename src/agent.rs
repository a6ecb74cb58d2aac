use std::time::Duration;

use crate::constants::{DAMAGE_COUNTER_BUMP, MIN_TORCH_RADIUS, TORCH_DELTA};
use crate::types::{AvatarView, MonsterId, MonsterKind, MonsterView, Vec2};

pub trait Agent {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);
    fn hit_points(&self) -> i32;
    fn damage(&self) -> i32;
    fn incur_damage(&mut self, points: i32);

    fn is_alive(&self) -> bool {
        self.hit_points() > 0
    }
}

#[derive(Clone, Debug)]
pub struct Avatar {
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub damage: i32,
    torch_radius: f64,
}

impl Avatar {
    pub fn new(x: i32, y: i32, hp: i32, damage: i32, torch_radius: f64) -> Self {
        Self {
            x,
            y,
            hp,
            damage,
            torch_radius: torch_radius.max(MIN_TORCH_RADIUS),
        }
    }

    pub fn torch_radius(&self) -> f64 {
        self.torch_radius
    }

    pub fn increase_torch(&mut self) {
        self.torch_radius += TORCH_DELTA;
    }

    pub fn decrease_torch(&mut self) {
        self.torch_radius = (self.torch_radius - TORCH_DELTA).max(MIN_TORCH_RADIUS);
    }

    pub fn view(&self) -> AvatarView {
        AvatarView {
            x: self.x,
            y: self.y,
            hp: self.hp,
            damage: self.damage,
            torch_radius: self.torch_radius,
        }
    }
}

impl Agent for Avatar {
    fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn set_position(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    fn hit_points(&self) -> i32 {
        self.hp
    }

    fn damage(&self) -> i32 {
        self.damage
    }

    fn incur_damage(&mut self, points: i32) {
        self.hp = self.hp.saturating_sub(points);
    }
}

#[derive(Clone, Debug)]
pub struct Monster {
    pub id: MonsterId,
    pub kind: MonsterKind,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub damage: i32,
    pub move_interval: Duration,
    // Bumped on every hit and wound down per move tick. Nothing gates on it yet.
    damage_counter: u32,
}

impl Monster {
    pub fn new(
        id: MonsterId,
        kind: MonsterKind,
        pos: Vec2,
        hp: i32,
        damage: i32,
        move_interval: Duration,
    ) -> Self {
        Self {
            id,
            kind,
            x: pos.x,
            y: pos.y,
            hp,
            damage,
            move_interval,
            damage_counter: 0,
        }
    }

    pub fn damage_counter(&self) -> u32 {
        self.damage_counter
    }

    pub fn tick_damage_counter(&mut self) {
        self.damage_counter = self.damage_counter.saturating_sub(1);
    }

    pub fn view(&self) -> MonsterView {
        MonsterView {
            id: self.id,
            kind: self.kind,
            x: self.x,
            y: self.y,
            hp: self.hp,
            damage: self.damage,
            damage_counter: self.damage_counter,
        }
    }
}

impl Agent for Monster {
    fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn set_position(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    fn hit_points(&self) -> i32 {
        self.hp
    }

    fn damage(&self) -> i32 {
        self.damage
    }

    fn incur_damage(&mut self, points: i32) {
        self.damage_counter = self.damage_counter.saturating_add(DAMAGE_COUNTER_BUMP);
        self.hp = self.hp.saturating_sub(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_monster(hp: i32) -> Monster {
        Monster::new(
            MonsterId(0),
            MonsterKind::Skeleton,
            Vec2::new(0, 0),
            hp,
            1,
            Duration::from_millis(500),
        )
    }

    #[test]
    fn torch_never_drops_below_floor() {
        for steps in 1..=20i32 {
            let mut avatar = Avatar::new(0, 0, 10, 1, 2.0 + 0.5 * f64::from(steps));
            assert!(avatar.torch_radius() >= 2.5);
            for _ in 0..(steps + 5) {
                avatar.decrease_torch();
                assert!(avatar.torch_radius() >= MIN_TORCH_RADIUS);
            }
            assert_eq!(avatar.torch_radius(), 2.0);
        }
    }

    #[test]
    fn torch_grows_without_bound() {
        let mut avatar = Avatar::new(0, 0, 10, 1, 2.0);
        for _ in 0..100 {
            avatar.increase_torch();
        }
        assert_eq!(avatar.torch_radius(), 52.0);
        avatar.decrease_torch();
        assert_eq!(avatar.torch_radius(), 51.5);
    }

    #[test]
    fn starting_torch_is_raised_to_floor() {
        let avatar = Avatar::new(0, 0, 10, 1, 0.5);
        assert_eq!(avatar.torch_radius(), 2.0);
    }

    #[test]
    fn avatar_damage_is_not_clamped() {
        let mut avatar = Avatar::new(0, 0, 3, 1, 2.0);
        avatar.incur_damage(5);
        assert_eq!(avatar.hit_points(), -2);
        assert!(!avatar.is_alive());
    }

    #[test]
    fn hit_points_saturate_instead_of_wrapping() {
        let mut avatar = Avatar::new(0, 0, -10, 1, 2.0);
        avatar.incur_damage(i32::MAX);
        assert_eq!(avatar.hit_points(), i32::MIN);
        assert!(!avatar.is_alive());

        let mut monster = make_monster(5);
        monster.incur_damage(i32::MAX);
        monster.incur_damage(i32::MAX);
        assert_eq!(monster.hit_points(), i32::MIN);
        assert!(!monster.is_alive());
    }

    #[test]
    fn monster_damage_bumps_counter() {
        let mut monster = make_monster(5);
        monster.incur_damage(2);
        assert_eq!(monster.hit_points(), 3);
        assert_eq!(monster.damage_counter(), 3);
        monster.incur_damage(0);
        assert_eq!(monster.damage_counter(), 6);
    }

    #[test]
    fn damage_counter_winds_down_to_zero() {
        let mut monster = make_monster(5);
        monster.incur_damage(1);
        for _ in 0..5 {
            monster.tick_damage_counter();
        }
        assert_eq!(monster.damage_counter(), 0);
    }
}
