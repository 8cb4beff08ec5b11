//! The player
//!
//! Owns level, experience and the skill tree on top of the usual combat
//! state. Movement comes in as intent flags set by input handling and is
//! applied once per frame by the game loop.

use super::body::{Body, Category, Entity, Position};
use crate::combat::{attack_damage, mitigate, AttackKind, CombatState};
use crate::progression::{xp_to_next_level, SkillCategory, SkillTree, HEALTH_PER_LEVEL};
use crate::progression::xp::SKILL_POINTS_PER_LEVEL;

pub const PLAYER_RADIUS: f32 = 0.5;
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
pub const PLAYER_DAMAGE: f32 = 10.0;
pub const PLAYER_RANGE: f32 = 2.0;
pub const PLAYER_COOLDOWN: f32 = 0.5;
pub const PLAYER_SPEED: f32 = 5.0;

/// Ranged special attack reach and cooldown
pub const SPECIAL_RANGE: f32 = 8.0;
pub const SPECIAL_COOLDOWN: f32 = 3.0;

/// Movement speed gained per point of Speed aggregate, as a fraction
const SPEED_PER_POINT: f32 = 0.1;

/// What the player wants to do with their feet this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Analog stick, each axis in -1.0..=1.0
    pub axis_x: f32,
    pub axis_z: f32,
}

impl MovementIntent {
    /// Direction on the ground plane, length at most 1
    pub fn direction(&self) -> (f32, f32) {
        let mut dx = self.axis_x;
        let mut dz = self.axis_z;
        if self.forward {
            dz -= 1.0;
        }
        if self.back {
            dz += 1.0;
        }
        if self.left {
            dx -= 1.0;
        }
        if self.right {
            dx += 1.0;
        }

        let len = (dx * dx + dz * dz).sqrt();
        if len > 1.0 {
            (dx / len, dz / len)
        } else {
            (dx, dz)
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub combat: CombatState,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub skills: SkillTree,
    pub intent: MovementIntent,
    /// Seconds until the special attack is ready
    pub special_timer: f32,
}

impl Player {
    pub fn new(position: Position) -> Self {
        Self {
            body: Body::new(Category::Player, position, PLAYER_RADIUS),
            combat: CombatState::new(PLAYER_MAX_HEALTH, PLAYER_DAMAGE, PLAYER_RANGE, PLAYER_COOLDOWN),
            level: 1,
            experience: 0,
            experience_to_next_level: xp_to_next_level(1),
            skills: SkillTree::new(),
            intent: MovementIntent::default(),
            special_timer: 0.0,
        }
    }

    pub fn health(&self) -> f32 {
        self.combat.health
    }

    pub fn is_dead(&self) -> bool {
        self.combat.is_dead()
    }

    /// Add XP and level up as many times as the total allows.
    /// Returns the number of level-ups.
    pub fn add_experience(&mut self, amount: u32) -> u32 {
        self.experience += amount;
        let mut levels = 0;
        while self.experience >= self.experience_to_next_level {
            self.experience -= self.experience_to_next_level;
            self.level_up();
            levels += 1;
        }
        levels
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.combat.max_health += HEALTH_PER_LEVEL;
        self.combat.health = self.combat.max_health;
        self.experience_to_next_level = xp_to_next_level(self.level);
        self.skills.add_points(SKILL_POINTS_PER_LEVEL);
        log::info!("Player reached level {}", self.level);
    }

    /// Effective defense from skills
    pub fn defense(&self) -> f32 {
        self.skills.aggregate(SkillCategory::Defense)
    }

    pub fn move_speed(&self) -> f32 {
        PLAYER_SPEED * (1.0 + self.skills.aggregate(SkillCategory::Speed) * SPEED_PER_POINT)
    }

    /// Outgoing damage for an attack of `kind`
    pub fn attack_power(&self, kind: AttackKind) -> f32 {
        let base = match kind {
            AttackKind::Ranged => self.combat.damage + self.skills.aggregate(SkillCategory::Magic),
            _ => self.combat.damage + self.skills.aggregate(SkillCategory::Attack),
        };
        attack_damage(base, kind)
    }

    /// Whether the special attack can hit a target `distance` away.
    /// It shares the attack timer with melee on top of its own cooldown.
    pub fn can_special(&self, distance: f32) -> bool {
        distance <= SPECIAL_RANGE && self.special_timer <= 0.0 && self.combat.attack_timer <= 0.0
    }

    pub fn arm_special(&mut self) {
        self.special_timer = SPECIAL_COOLDOWN;
        self.combat.arm();
    }

    /// Take a hit, reduced by defense. Returns the damage actually applied.
    pub fn take_damage(&mut self, amount: f32, kind: AttackKind) -> f32 {
        let before = self.combat.health;
        let reduced = mitigate(amount, self.defense());
        if self.combat.apply_damage(reduced) {
            self.body.active = false;
            log::info!("Player fell to a {}", kind.name());
        }
        before - self.combat.health
    }

    pub fn heal(&mut self, amount: f32) {
        self.combat.heal(amount);
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, dt: f32) {
        self.combat.tick(dt);
        self.special_timer = (self.special_timer - dt).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Position::default())
    }

    #[test]
    fn test_single_level_up() {
        let mut p = player();
        p.experience = 90;
        let max_before = p.combat.max_health;
        p.combat.health = 10.0;

        let levels = p.add_experience(15);

        assert_eq!(levels, 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.experience, 5);
        assert_eq!(p.experience_to_next_level, 200);
        assert_eq!(p.skills.points(), 1);
        assert_eq!(p.combat.max_health, max_before + HEALTH_PER_LEVEL);
        assert_eq!(p.combat.health, p.combat.max_health);
    }

    #[test]
    fn test_multiple_level_ups_in_one_call() {
        let mut p = player();
        // 100 (1->2) + 200 (2->3) + 300 (3->4) = 600, 50 left over
        let levels = p.add_experience(650);
        assert_eq!(levels, 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.experience, 50);
        assert_eq!(p.experience_to_next_level, 400);
        assert_eq!(p.skills.points(), 3);
    }

    #[test]
    fn test_below_threshold_no_level() {
        let mut p = player();
        assert_eq!(p.add_experience(99), 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.experience, 99);
    }

    #[test]
    fn test_exact_threshold_levels() {
        let mut p = player();
        assert_eq!(p.add_experience(100), 1);
        assert_eq!(p.experience, 0);
    }

    #[test]
    fn test_defense_mitigates_damage() {
        let mut p = player();
        let dealt = p.take_damage(20.0, AttackKind::Melee);
        assert_eq!(dealt, 20.0);

        let mut tough = player();
        tough.skills.add_points(1);
        assert!(tough.skills.use_skill_point("Iron Skin"));
        let dealt = tough.take_damage(20.0, AttackKind::Melee);
        assert!(dealt < 20.0);
        assert!(dealt > 0.0);
    }

    #[test]
    fn test_death_deactivates() {
        let mut p = player();
        p.take_damage(1_000.0, AttackKind::Charged);
        assert_eq!(p.health(), 0.0);
        assert!(p.is_dead());
        assert!(!p.body.active);
    }

    #[test]
    fn test_health_stays_in_bounds() {
        let mut p = player();
        for amount in [5.0, 0.0, 33.3, 80.0, 12.0] {
            p.take_damage(amount, AttackKind::Melee);
            assert!(p.health() >= 0.0 && p.health() <= p.combat.max_health);
        }
        p.heal(1_000.0);
        assert!(p.health() <= p.combat.max_health);
    }

    #[test]
    fn test_attack_power_uses_skills() {
        let mut p = player();
        assert_eq!(p.attack_power(AttackKind::Melee), PLAYER_DAMAGE);
        assert_eq!(p.attack_power(AttackKind::Ranged), PLAYER_DAMAGE * 2.0);

        p.skills.add_points(1);
        p.skills.use_skill_point("Power Strike");
        assert!(p.attack_power(AttackKind::Melee) > PLAYER_DAMAGE);
    }

    #[test]
    fn test_intent_direction_is_normalized() {
        let intent = MovementIntent {
            forward: true,
            right: true,
            ..Default::default()
        };
        let (dx, dz) = intent.direction();
        assert!(((dx * dx + dz * dz).sqrt() - 1.0).abs() < 1e-5);
        assert!(dx > 0.0 && dz < 0.0);
    }

    #[test]
    fn test_special_and_melee_share_attack_timer() {
        let mut p = player();
        p.combat.arm();
        assert!(!p.can_special(1.0));

        p.update(PLAYER_COOLDOWN);
        assert!(p.can_special(1.0));
        p.arm_special();
        assert!(!p.combat.can_attack(1.0));

        // Melee comes back before the special does
        p.update(PLAYER_COOLDOWN);
        assert!(p.combat.can_attack(1.0));
        assert!(!p.can_special(1.0));
    }

    #[test]
    fn test_timers_tick_down() {
        let mut p = player();
        p.combat.arm();
        p.arm_special();
        p.update(10.0);
        assert_eq!(p.combat.attack_timer, 0.0);
        assert_eq!(p.special_timer, 0.0);
    }
}
