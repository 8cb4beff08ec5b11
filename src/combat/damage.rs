//! Damage calculation
//!
//! Attack kinds, their multipliers, and defense mitigation.

/// Scale constant for defense mitigation.
/// At 100 defense half the damage gets through; it never reaches zero.
const DEFENSE_SCALE: f32 = 100.0;

/// The flavor of an attack, which decides its damage multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    /// Plain swing
    Melee,
    /// Wound-up heavy strike (boss rhythm, enraged swings)
    Charged,
    /// Ranged special attack
    Ranged,
}

impl AttackKind {
    pub fn multiplier(&self) -> f32 {
        match self {
            AttackKind::Melee => 1.0,
            AttackKind::Charged => 1.75,
            AttackKind::Ranged => 2.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttackKind::Melee => "strike",
            AttackKind::Charged => "charged strike",
            AttackKind::Ranged => "bolt",
        }
    }
}

/// Damage dealt by an attack of `kind` with the given base damage
pub fn attack_damage(base: f32, kind: AttackKind) -> f32 {
    base * kind.multiplier()
}

/// Fraction of incoming damage absorbed by `defense`.
/// Uses diminishing returns: reduction = defense / (defense + 100)
pub fn damage_reduction(defense: f32) -> f32 {
    let defense = defense.max(0.0);
    defense / (defense + DEFENSE_SCALE)
}

/// Incoming damage after defense mitigation
pub fn mitigate(amount: f32, defense: f32) -> f32 {
    amount * (1.0 - damage_reduction(defense))
}
