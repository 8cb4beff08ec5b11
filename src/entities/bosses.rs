//! The arena boss
//!
//! A heavier enemy with a scripted attack rhythm: a run of plain swings,
//! then a charged strike followed by a breather, plus a ranged bolt when
//! the player keeps their distance. Below 30% health it enrages once and
//! stays enraged for the rest of the fight.

use serde::{Deserialize, Serialize};

use super::body::{AnimToggle, Body, Category, Entity, Position};
use super::enemies::AiOutcome;
use crate::combat::{attack_damage, AttackKind, CombatState};

pub const BOSS_NAME: &str = "The Cinder Warden";
pub const BOSS_MAX_HEALTH: f32 = 500.0;
pub const BOSS_DAMAGE: f32 = 18.0;
pub const BOSS_RANGE: f32 = 2.5;
pub const BOSS_COOLDOWN: f32 = 1.6;
pub const BOSS_SPEED: f32 = 2.6;
pub const BOSS_DETECTION: f32 = 16.0;
pub const BOSS_SIZE: f32 = 1.2;
pub const BOSS_XP: u32 = 500;

/// Health fraction at or below which the boss enrages
pub const ENRAGE_THRESHOLD: f32 = 0.3;
pub const ENRAGE_SPEED_MULTIPLIER: f32 = 1.5;
pub const ENRAGE_DAMAGE_MULTIPLIER: f32 = 1.2;

/// Timing of the boss's attack pattern.
///
/// These values set the fight's rhythm and are tuned by feel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossRhythm {
    /// Plain swings before a charged strike
    pub strikes_per_charge: u32,
    /// Seconds the boss stands still after a charged strike
    pub pause_after_charge: f32,
    /// Seconds between ranged bolts
    pub special_cooldown: f32,
    /// Reach of the ranged bolt
    pub special_range: f32,
    /// Seconds per animation frame
    pub anim_interval: f32,
    /// Seconds per animation frame once enraged
    pub enraged_anim_interval: f32,
}

impl Default for BossRhythm {
    fn default() -> Self {
        Self {
            strikes_per_charge: 3,
            pause_after_charge: 1.5,
            special_cooldown: 5.0,
            special_range: 9.0,
            anim_interval: 0.3,
            enraged_anim_interval: 0.15,
        }
    }
}

/// The boss
#[derive(Debug, Clone)]
pub struct Boss {
    pub body: Body,
    pub combat: CombatState,
    pub move_speed: f32,
    pub detection_radius: f32,
    pub rhythm: BossRhythm,
    enraged: bool,
    /// Plain swings since the last charged strike
    strikes: u32,
    pause_timer: f32,
    special_timer: f32,
    pub anim: AnimToggle,
}

impl Boss {
    pub fn new(position: Position, rhythm: BossRhythm) -> Self {
        Self {
            body: Body::new(Category::Boss, position, BOSS_SIZE),
            combat: CombatState::new(BOSS_MAX_HEALTH, BOSS_DAMAGE, BOSS_RANGE, BOSS_COOLDOWN),
            move_speed: BOSS_SPEED,
            detection_radius: BOSS_DETECTION,
            rhythm,
            enraged: false,
            strikes: 0,
            pause_timer: 0.0,
            special_timer: rhythm.special_cooldown,
            anim: AnimToggle::new(rhythm.anim_interval),
        }
    }

    pub fn name(&self) -> &'static str {
        BOSS_NAME
    }

    pub fn is_enraged(&self) -> bool {
        self.enraged
    }

    pub fn is_pausing(&self) -> bool {
        self.pause_timer > 0.0
    }

    pub fn experience_value(&self) -> u32 {
        BOSS_XP
    }

    /// Take raw damage. Returns true if this hit killed the boss.
    pub fn take_damage(&mut self, amount: f32, kind: AttackKind) -> bool {
        let killed = self.combat.apply_damage(amount);
        if killed {
            self.body.active = false;
            log::info!("{} falls to a {}", BOSS_NAME, kind.name());
        } else if self.combat.health_fraction() <= ENRAGE_THRESHOLD {
            self.enrage();
        }
        killed
    }

    /// One-way switch into the enraged phase
    fn enrage(&mut self) {
        if self.enraged {
            return;
        }
        self.enraged = true;
        self.move_speed *= ENRAGE_SPEED_MULTIPLIER;
        self.combat.damage *= ENRAGE_DAMAGE_MULTIPLIER;
        self.anim.set_interval(self.rhythm.enraged_anim_interval);
        log::info!("{} is enraged!", BOSS_NAME);
    }

    /// Run the attack pattern against the player at `target`.
    pub fn think(&mut self, target: Position, dt: f32) -> AiOutcome {
        if !self.body.active {
            return AiOutcome::idle();
        }

        let distance = self.body.position.distance_xz(&target);
        if distance > self.detection_radius {
            return AiOutcome::idle();
        }
        if self.is_pausing() {
            return AiOutcome { in_combat: true, attack: None };
        }

        if distance > self.combat.range {
            // Out of reach: try a bolt, otherwise close in
            if distance <= self.rhythm.special_range
                && self.special_timer <= 0.0
                && self.combat.attack_timer <= 0.0
            {
                self.special_timer = self.rhythm.special_cooldown;
                self.combat.arm();
                let damage = attack_damage(self.combat.damage, AttackKind::Ranged);
                return AiOutcome { in_combat: true, attack: Some((damage, AttackKind::Ranged)) };
            }
            self.body.position.step_toward(&target, self.move_speed * dt, self.combat.range * 0.8);
        }

        let distance = self.body.position.distance_xz(&target);
        if !self.combat.can_attack(distance) {
            return AiOutcome { in_combat: true, attack: None };
        }

        self.combat.arm();
        let kind = if self.strikes >= self.rhythm.strikes_per_charge {
            self.strikes = 0;
            self.pause_timer = self.rhythm.pause_after_charge;
            AttackKind::Charged
        } else {
            self.strikes += 1;
            AttackKind::Melee
        };

        AiOutcome {
            in_combat: true,
            attack: Some((attack_damage(self.combat.damage, kind), kind)),
        }
    }
}

impl Entity for Boss {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, dt: f32) {
        self.combat.tick(dt);
        self.pause_timer = (self.pause_timer - dt).max(0.0);
        self.special_timer = (self.special_timer - dt).max(0.0);
        self.anim.tick(dt);
    }
}
