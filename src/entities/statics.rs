//! Passive entities
//!
//! Scenery, portals and pickups. None of these think; portals and
//! pickups only matter when the player gets close.

use super::body::{Body, Category, Entity, Position};
use crate::world::MapId;

/// Portals trigger when the player is closer than this on the ground plane
pub const PORTAL_RADIUS: f32 = 1.5;

/// Default pickup rewards
pub const PICKUP_HEAL: f32 = 30.0;
pub const PICKUP_XP: u32 = 50;

/// Trees, rocks, walls, grass, NPCs and the like
#[derive(Debug, Clone)]
pub struct Scenery {
    pub body: Body,
}

impl Scenery {
    /// A solid piece of scenery
    pub fn solid(category: Category, position: Position, size: f32) -> Self {
        Self { body: Body::new(category, position, size) }
    }

    /// Scenery the player walks through
    pub fn decor(category: Category, position: Position, size: f32) -> Self {
        Self { body: Body::new(category, position, size).passable() }
    }
}

impl Entity for Scenery {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// A doorway to another map, or to another spot on this one
#[derive(Debug, Clone)]
pub struct Portal {
    pub body: Body,
    pub destination: MapId,
    /// Only used when `destination` is the map the portal stands on
    pub destination_position: Position,
}

impl Portal {
    pub fn new(position: Position, destination: MapId) -> Self {
        Self {
            body: Body::new(Category::Portal, position, 0.8).passable(),
            destination,
            destination_position: destination.spawn_point(),
        }
    }

    /// A portal that moves the player within the current map
    pub fn waystone(position: Position, map: MapId, target: Position) -> Self {
        Self {
            destination_position: target,
            ..Self::new(position, map)
        }
    }

    /// Whether `player` stands close enough to use the portal
    pub fn in_reach(&self, player: &Position) -> bool {
        self.body.position.distance_xz(player) < PORTAL_RADIUS
    }
}

impl Entity for Portal {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// A consumable lying on the ground; used up on touch
#[derive(Debug, Clone)]
pub struct Pickup {
    pub body: Body,
    pub heal: f32,
    pub experience: u32,
}

impl Pickup {
    pub fn new(position: Position) -> Self {
        Self {
            body: Body::new(Category::Item, position, 0.4),
            heal: PICKUP_HEAL,
            experience: PICKUP_XP,
        }
    }

    /// Use the pickup up. Returns its rewards the first time only.
    pub fn consume(&mut self) -> Option<(f32, u32)> {
        if !self.body.active {
            return None;
        }
        self.body.active = false;
        Some((self.heal, self.experience))
    }
}

impl Entity for Pickup {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
