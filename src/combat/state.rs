//! Shared combat state
//!
//! Health, attack timing and the one-shot XP flag. Player, enemies and
//! the boss all embed one of these instead of inheriting it.

/// Health pool plus attack timing for one combatant
#[derive(Debug, Clone, PartialEq)]
pub struct CombatState {
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub range: f32,
    /// Seconds between attacks
    pub cooldown: f32,
    /// Seconds until the next attack is allowed
    pub attack_timer: f32,
    /// Set once the player has been paid for this combatant's death
    pub experience_given: bool,
}

impl CombatState {
    pub fn new(max_health: f32, damage: f32, range: f32, cooldown: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            damage,
            range,
            cooldown,
            attack_timer: 0.0,
            experience_given: false,
        }
    }

    /// Count the attack timer down toward zero
    pub fn tick(&mut self, dt: f32) {
        self.attack_timer = (self.attack_timer - dt).max(0.0);
    }

    /// Whether a target `distance` away can be attacked right now
    pub fn can_attack(&self, distance: f32) -> bool {
        distance <= self.range && self.attack_timer <= 0.0
    }

    /// Re-arm the timer to the full cooldown
    pub fn arm(&mut self) {
        self.attack_timer = self.cooldown;
    }

    /// Apply `amount` of damage, clamped at zero. Returns true if this
    /// call took health from above zero to zero.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.health <= 0.0 {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.health == 0.0
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }

    /// Mark the XP reward as paid. Returns false if it already was.
    pub fn claim_experience(&mut self) -> bool {
        if self.experience_given {
            return false;
        }
        self.experience_given = true;
        true
    }
}
