//! Player collision
//!
//! Radius overlap on the ground plane only. Solid entities push the
//! player out; pickups are consumed instead.

use std::f32::consts::TAU;

use rand::Rng;

use crate::entities::{Entity, Player, WorldEntity};

/// Push out slightly further than the overlap so contact clears
const PUSH_FACTOR: f32 = 1.05;

/// Centers closer than this count as coincident
const DEGENERATE_DISTANCE: f32 = 1e-4;

/// Nudge length for coincident centers
const NUDGE: f32 = 0.05;

/// Separate the player from everything solid they overlap.
///
/// Returns the rewards `(heal, experience)` of pickups consumed this call.
pub fn resolve_collisions(
    player: &mut Player,
    entities: &mut [WorldEntity],
    rng: &mut impl Rng,
) -> Vec<(f32, u32)> {
    let mut rewards = Vec::new();

    for entity in entities.iter_mut() {
        if !entity.is_active() || !entity.is_collidable() {
            continue;
        }

        let pos = player.position();
        let other = entity.position();
        let distance = pos.distance_xz(&other);
        let min_distance = player.size() + entity.size();
        if distance >= min_distance {
            continue;
        }

        if let WorldEntity::Pickup(pickup) = entity {
            if let Some(reward) = pickup.consume() {
                rewards.push(reward);
            }
            continue;
        }

        let body = &mut player.body.position;
        if distance < DEGENERATE_DISTANCE {
            let angle = rng.gen_range(0.0..TAU);
            body.x += angle.cos() * NUDGE;
            body.z += angle.sin() * NUDGE;
            continue;
        }

        let push = (min_distance - distance) * PUSH_FACTOR;
        body.x += (pos.x - other.x) / distance * push;
        body.z += (pos.z - other.z) / distance * push;
    }

    rewards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Category, Pickup, Position, Scenery};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rock(x: f32, z: f32) -> WorldEntity {
        Scenery::solid(Category::Rock, Position::new(x, 0.0, z), 0.6).into()
    }

    #[test]
    fn test_overlap_is_pushed_clear() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut player = Player::new(Position::new(0.5, 0.0, 0.2));
        let mut entities = vec![rock(0.0, 0.0)];

        resolve_collisions(&mut player, &mut entities, &mut rng);

        let distance = player.position().distance_xz(&entities[0].position());
        assert!(distance >= player.size() + entities[0].size());
    }

    #[test]
    fn test_coincident_centers_nudge_apart() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut player = Player::new(Position::new(1.0, 0.0, 1.0));
        let mut entities = vec![rock(1.0, 1.0)];

        resolve_collisions(&mut player, &mut entities, &mut rng);

        let distance = player.position().distance_xz(&entities[0].position());
        assert!(distance > DEGENERATE_DISTANCE);
        assert!((distance - NUDGE).abs() < 1e-4);
    }

    #[test]
    fn test_passable_and_inactive_ignored() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut player = Player::new(Position::default());
        let mut gone = rock(0.1, 0.0);
        gone.body_mut().active = false;
        let grass: WorldEntity = Scenery::decor(Category::Grass, Position::new(0.1, 0.0, 0.0), 0.3).into();
        let mut entities = vec![gone, grass];

        resolve_collisions(&mut player, &mut entities, &mut rng);

        assert_eq!(player.position(), Position::default());
    }

    #[test]
    fn test_pickup_consumed_without_push() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut player = Player::new(Position::default());
        let mut entities: Vec<WorldEntity> = vec![Pickup::new(Position::new(0.3, 0.0, 0.0)).into()];

        let rewards = resolve_collisions(&mut player, &mut entities, &mut rng);
        assert_eq!(rewards.len(), 1);
        assert_eq!(player.position(), Position::default());
        assert!(!entities[0].is_active());

        // Touching it again yields nothing
        assert!(resolve_collisions(&mut player, &mut entities, &mut rng).is_empty());
    }
}
