//! Combat system

pub mod damage;
pub mod state;

pub use damage::{attack_damage, damage_reduction, mitigate, AttackKind};
pub use state::CombatState;
