//! Enemies
//!
//! Regular monsters: walk at the player once they notice them, swing
//! when in reach. Stats scale with level.

use super::body::{AnimToggle, Body, Category, Entity, Position};
use crate::combat::{attack_damage, AttackKind, CombatState};
use crate::progression::enemy_xp_value;

/// Seconds between animation frames for regular enemies
const ENEMY_ANIM_INTERVAL: f32 = 0.4;

/// Enemies stop this fraction of their reach away from the player
const APPROACH_FRACTION: f32 = 0.8;

/// Static definition of an enemy type
#[derive(Debug, Clone, Copy)]
pub struct EnemyDef {
    pub name: &'static str,
    pub glyph: char,
    pub base_health: f32,
    pub health_per_level: f32,
    pub base_damage: f32,
    pub damage_per_level: f32,
    pub range: f32,
    pub cooldown: f32,
    pub speed: f32,
    pub detection_radius: f32,
    pub size: f32,
}

pub const WOLF: EnemyDef = EnemyDef {
    name: "Grey Wolf",
    glyph: 'w',
    base_health: 25.0,
    health_per_level: 12.0,
    base_damage: 4.0,
    damage_per_level: 2.0,
    range: 1.5,
    cooldown: 1.0,
    speed: 3.2,
    detection_radius: 9.0,
    size: 0.5,
};

pub const SKELETON: EnemyDef = EnemyDef {
    name: "Skeleton",
    glyph: 's',
    base_health: 35.0,
    health_per_level: 15.0,
    base_damage: 5.0,
    damage_per_level: 2.0,
    range: 1.6,
    cooldown: 1.2,
    speed: 2.5,
    detection_radius: 8.0,
    size: 0.6,
};

pub const WRAITH: EnemyDef = EnemyDef {
    name: "Wraith",
    glyph: 'W',
    base_health: 30.0,
    health_per_level: 14.0,
    base_damage: 7.0,
    damage_per_level: 3.0,
    range: 1.8,
    cooldown: 1.4,
    speed: 2.8,
    detection_radius: 10.0,
    size: 0.6,
};

/// Which kind of enemy, each backed by an [`EnemyDef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Wolf,
    Skeleton,
    Wraith,
}

impl EnemyKind {
    pub fn def(&self) -> &'static EnemyDef {
        match self {
            EnemyKind::Wolf => &WOLF,
            EnemyKind::Skeleton => &SKELETON,
            EnemyKind::Wraith => &WRAITH,
        }
    }
}

/// What a hostile decided to do this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AiOutcome {
    /// The player is inside the detection radius
    pub in_combat: bool,
    /// An attack that landed: raw damage and kind
    pub attack: Option<(f32, AttackKind)>,
}

impl AiOutcome {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// A regular enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub combat: CombatState,
    pub kind: EnemyKind,
    pub level: u32,
    pub move_speed: f32,
    pub detection_radius: f32,
    pub anim: AnimToggle,
}

impl Enemy {
    pub fn new(kind: EnemyKind, level: u32, position: Position) -> Self {
        let def = kind.def();
        let level = level.max(1);
        let scale = (level - 1) as f32;
        Self {
            body: Body::new(Category::Enemy, position, def.size),
            combat: CombatState::new(
                def.base_health + def.health_per_level * scale,
                def.base_damage + def.damage_per_level * scale,
                def.range,
                def.cooldown,
            ),
            kind,
            level,
            move_speed: def.speed,
            detection_radius: def.detection_radius,
            anim: AnimToggle::new(ENEMY_ANIM_INTERVAL),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.def().name
    }

    /// XP the player earns for the kill
    pub fn experience_value(&self) -> u32 {
        enemy_xp_value(self.level)
    }

    /// Take raw damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, amount: f32, kind: AttackKind) -> bool {
        let killed = self.combat.apply_damage(amount);
        if killed {
            self.body.active = false;
            log::debug!("{} (lv {}) slain by a {}", self.name(), self.level, kind.name());
        }
        killed
    }

    /// Chase and attack the player at `target`.
    pub fn think(&mut self, target: Position, dt: f32) -> AiOutcome {
        if !self.body.active {
            return AiOutcome::idle();
        }

        let distance = self.body.position.distance_xz(&target);
        if distance > self.detection_radius {
            return AiOutcome::idle();
        }

        let keep_away = self.combat.range * APPROACH_FRACTION;
        self.body.position.step_toward(&target, self.move_speed * dt, keep_away);

        let distance = self.body.position.distance_xz(&target);
        let attack = if self.combat.can_attack(distance) {
            self.combat.arm();
            Some((attack_damage(self.combat.damage, AttackKind::Melee), AttackKind::Melee))
        } else {
            None
        };

        AiOutcome { in_combat: true, attack }
    }
}

impl Entity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, dt: f32) {
        self.combat.tick(dt);
        self.anim.tick(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_at(x: f32, z: f32) -> Enemy {
        Enemy::new(EnemyKind::Skeleton, 2, Position::new(x, 0.0, z))
    }

    #[test]
    fn test_level_two_worth_forty() {
        let e = enemy_at(0.0, 0.0);
        assert_eq!(e.experience_value(), 40);
    }

    #[test]
    fn test_lethal_damage_deactivates() {
        let mut e = enemy_at(0.0, 0.0);
        let max = e.combat.max_health;
        assert!(!e.take_damage(max - 1.0, AttackKind::Melee));
        assert!(e.body.active);
        assert!(e.take_damage(50.0, AttackKind::Melee));
        assert_eq!(e.combat.health, 0.0);
        assert!(!e.body.active);
        // Further hits change nothing
        assert!(!e.take_damage(50.0, AttackKind::Ranged));
        assert!(!e.body.active);
    }

    #[test]
    fn test_active_iff_alive() {
        let mut e = enemy_at(0.0, 0.0);
        for amount in [3.0, 10.0, 0.5, 20.0, 40.0, 100.0] {
            e.take_damage(amount, AttackKind::Melee);
            assert!(e.combat.health >= 0.0 && e.combat.health <= e.combat.max_health);
            assert_eq!(e.body.active, e.combat.health > 0.0);
        }
    }

    #[test]
    fn test_ignores_distant_player() {
        let mut e = enemy_at(0.0, 0.0);
        let outcome = e.think(Position::new(50.0, 0.0, 0.0), 0.1);
        assert!(!outcome.in_combat);
        assert_eq!(e.body.position.x, 0.0);
    }

    #[test]
    fn test_chases_detected_player() {
        let mut e = enemy_at(0.0, 0.0);
        let outcome = e.think(Position::new(6.0, 0.0, 0.0), 0.5);
        assert!(outcome.in_combat);
        assert!(outcome.attack.is_none());
        assert!(e.body.position.x > 0.0);
    }

    #[test]
    fn test_attacks_in_reach_then_cools_down() {
        let mut e = enemy_at(0.0, 0.0);
        let target = Position::new(1.0, 0.0, 0.0);

        let first = e.think(target, 0.016);
        assert_eq!(first.attack, Some((e.combat.damage, AttackKind::Melee)));
        assert_eq!(e.combat.attack_timer, e.combat.cooldown);

        let second = e.think(target, 0.016);
        assert!(second.attack.is_none());
    }

    #[test]
    fn test_dead_enemy_does_nothing() {
        let mut e = enemy_at(0.0, 0.0);
        e.take_damage(1_000.0, AttackKind::Melee);
        let outcome = e.think(Position::new(1.0, 0.0, 0.0), 0.016);
        assert_eq!(outcome, AiOutcome::idle());
    }
}
