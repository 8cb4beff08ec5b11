//! Entities placed in the world
//!
//! The player lives outside the world list; everything else is one
//! variant of [`WorldEntity`].

pub mod body;
pub mod player;
pub mod enemies;
pub mod bosses;
pub mod statics;

pub use body::{AnimToggle, Body, Category, Entity, Position};
pub use player::{MovementIntent, Player};
pub use enemies::{AiOutcome, Enemy, EnemyKind};
pub use bosses::{Boss, BossRhythm};
pub use statics::{Pickup, Portal, Scenery};

use crate::combat::{AttackKind, CombatState};

/// Storage for every non-player entity on a map
#[derive(Debug, Clone)]
pub enum WorldEntity {
    Scenery(Scenery),
    Portal(Portal),
    Pickup(Pickup),
    Enemy(Enemy),
    Boss(Boss),
}

impl WorldEntity {
    fn inner(&self) -> &dyn Entity {
        match self {
            WorldEntity::Scenery(e) => e,
            WorldEntity::Portal(e) => e,
            WorldEntity::Pickup(e) => e,
            WorldEntity::Enemy(e) => e,
            WorldEntity::Boss(e) => e,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Entity {
        match self {
            WorldEntity::Scenery(e) => e,
            WorldEntity::Portal(e) => e,
            WorldEntity::Pickup(e) => e,
            WorldEntity::Enemy(e) => e,
            WorldEntity::Boss(e) => e,
        }
    }

    /// Combat data for enemies and the boss
    pub fn combat(&self) -> Option<&CombatState> {
        match self {
            WorldEntity::Enemy(e) => Some(&e.combat),
            WorldEntity::Boss(b) => Some(&b.combat),
            _ => None,
        }
    }

    pub fn combat_mut(&mut self) -> Option<&mut CombatState> {
        match self {
            WorldEntity::Enemy(e) => Some(&mut e.combat),
            WorldEntity::Boss(b) => Some(&mut b.combat),
            _ => None,
        }
    }

    pub fn is_hostile(&self) -> bool {
        matches!(self, WorldEntity::Enemy(_) | WorldEntity::Boss(_))
    }

    /// XP granted for defeating this entity, if it can be defeated
    pub fn experience_value(&self) -> Option<u32> {
        match self {
            WorldEntity::Enemy(e) => Some(e.experience_value()),
            WorldEntity::Boss(b) => Some(b.experience_value()),
            _ => None,
        }
    }

    /// Hit a hostile. Returns true if the hit was lethal; other variants
    /// ignore damage.
    pub fn take_damage(&mut self, amount: f32, kind: AttackKind) -> bool {
        match self {
            WorldEntity::Enemy(e) => e.take_damage(amount, kind),
            WorldEntity::Boss(b) => b.take_damage(amount, kind),
            _ => false,
        }
    }

    /// Let a hostile react to the player standing at `target`
    pub fn think(&mut self, target: Position, dt: f32) -> AiOutcome {
        match self {
            WorldEntity::Enemy(e) => e.think(target, dt),
            WorldEntity::Boss(b) => b.think(target, dt),
            _ => AiOutcome::idle(),
        }
    }

    pub fn as_portal(&self) -> Option<&Portal> {
        match self {
            WorldEntity::Portal(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_boss(&self) -> Option<&Boss> {
        match self {
            WorldEntity::Boss(b) => Some(b),
            _ => None,
        }
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> EntityView {
        let body = self.body();
        let (health_fraction, enraged, anim_toggle) = match self {
            WorldEntity::Enemy(e) => (Some(e.combat.health_fraction()), false, e.anim.is_on()),
            WorldEntity::Boss(b) => (Some(b.combat.health_fraction()), b.is_enraged(), b.anim.is_on()),
            _ => (None, false, false),
        };
        EntityView {
            position: body.position,
            category: body.category,
            size: body.size,
            health_fraction,
            enraged,
            anim_toggle,
        }
    }
}

impl Entity for WorldEntity {
    fn body(&self) -> &Body {
        self.inner().body()
    }

    fn body_mut(&mut self) -> &mut Body {
        self.inner_mut().body_mut()
    }

    fn update(&mut self, dt: f32) {
        self.inner_mut().update(dt);
    }
}

impl From<Scenery> for WorldEntity {
    fn from(e: Scenery) -> Self {
        WorldEntity::Scenery(e)
    }
}

impl From<Portal> for WorldEntity {
    fn from(e: Portal) -> Self {
        WorldEntity::Portal(e)
    }
}

impl From<Pickup> for WorldEntity {
    fn from(e: Pickup) -> Self {
        WorldEntity::Pickup(e)
    }
}

impl From<Enemy> for WorldEntity {
    fn from(e: Enemy) -> Self {
        WorldEntity::Enemy(e)
    }
}

impl From<Boss> for WorldEntity {
    fn from(e: Boss) -> Self {
        WorldEntity::Boss(e)
    }
}

/// What the renderer needs to draw one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub position: Position,
    pub category: Category,
    pub size: f32,
    /// Present for combat entities
    pub health_fraction: Option<f32>,
    pub enraged: bool,
    pub anim_toggle: bool,
}
