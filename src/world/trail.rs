//! Trail generator
//!
//! Winds a path across the overworld from the west edge to the east edge,
//! with side branches hanging off it. There is no pathfinding graph behind
//! this: a trail is just an ordered list of points, and points that would
//! fall into a lake are dropped, leaving gaps.

use rand::Rng;

use super::terrain::is_underwater;

/// Distance walked along X between trail points
const TRAIL_STEP: f32 = 2.0;

/// Amplitude of the lateral sine wobble
const TRAIL_WOBBLE: f32 = 4.0;

/// Every Nth step along the main trail is a clearing
const CLEARING_EVERY: usize = 6;

/// Length of one branch segment
const BRANCH_STEP: f32 = 2.0;

/// Branches stop this far inside the world edge
const BRANCH_MARGIN: f32 = 3.0;

/// Every Nth branch point is a clearing
const BRANCH_CLEARING_EVERY: usize = 4;

/// A point on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub x: f32,
    pub z: f32,
}

impl TrailPoint {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn distance(&self, x: f32, z: f32) -> f32 {
        ((self.x - x).powi(2) + (self.z - z).powi(2)).sqrt()
    }
}

/// Generated trail network for one overworld
#[derive(Debug, Clone, Default)]
pub struct Trail {
    /// Path points, main trail first, then branches
    pub points: Vec<TrailPoint>,
    /// Wider points of interest along the trail
    pub clearings: Vec<TrailPoint>,
}

impl Trail {
    /// Distance from `(x, z)` to the closest trail point
    pub fn distance_to(&self, x: f32, z: f32) -> f32 {
        self.points
            .iter()
            .map(|p| p.distance(x, z))
            .fold(f32::INFINITY, f32::min)
    }

    /// Last point of the main trail, i.e. the east end
    pub fn end(&self) -> Option<TrailPoint> {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.x.total_cmp(&b.x))
    }
}

/// Generate the main trail across a world spanning `[-world_size, world_size]`.
pub fn generate_trail(world_size: f32, rng: &mut impl Rng) -> Trail {
    let half = world_size * 0.5;
    let start_z = rng.gen_range(-half..=half);
    let end_z = rng.gen_range(-half..=half);

    let mut trail = Trail::default();
    let steps = ((2.0 * world_size) / TRAIL_STEP).floor() as usize;

    for step in 0..=steps {
        let x = -world_size + step as f32 * TRAIL_STEP;
        let t = (x + world_size) / (2.0 * world_size);
        let z = start_z + (end_z - start_z) * t + (t * std::f32::consts::PI * 3.0).sin() * TRAIL_WOBBLE;

        if is_underwater(x, z) {
            continue;
        }

        let point = TrailPoint::new(x, z);
        trail.points.push(point);
        if step % CLEARING_EVERY == 0 {
            trail.clearings.push(point);
        }
    }

    log::debug!(
        "Trail generated: {} points, {} clearings (z {:.1} -> {:.1})",
        trail.points.len(),
        trail.clearings.len(),
        start_z,
        end_z
    );
    trail
}

/// Grow a side path from `origin`, heading off ±60° from `base_angle`.
///
/// Points are appended to `trail`. Returns how many points were added.
pub fn generate_branch(
    trail: &mut Trail,
    origin: TrailPoint,
    base_angle: f32,
    world_size: f32,
    rng: &mut impl Rng,
) -> usize {
    let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let mut angle = base_angle + side * 60f32.to_radians();
    let segments = rng.gen_range(8..=12);
    let limit = world_size - BRANCH_MARGIN;

    let (mut x, mut z) = (origin.x, origin.z);
    let mut added = 0;

    for i in 1..=segments {
        angle += rng.gen_range(-0.35..=0.35);
        x += angle.cos() * BRANCH_STEP;
        z += angle.sin() * BRANCH_STEP;

        if x.abs() > limit || z.abs() > limit {
            break;
        }
        if is_underwater(x, z) {
            continue;
        }

        let point = TrailPoint::new(x, z);
        trail.points.push(point);
        added += 1;
        if i % BRANCH_CLEARING_EVERY == 0 {
            trail.clearings.push(point);
        }
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_trail_spans_world() {
        let mut rng = StdRng::seed_from_u64(7);
        let trail = generate_trail(40.0, &mut rng);

        assert!(!trail.points.is_empty());
        // 41 steps at most, fewer if some landed in a lake
        assert!(trail.points.len() <= 41);
        for p in &trail.points {
            assert!(p.x >= -40.0 && p.x <= 40.0);
            assert!(!is_underwater(p.x, p.z));
        }
    }

    #[test]
    fn test_clearings_are_trail_points() {
        let mut rng = StdRng::seed_from_u64(11);
        let trail = generate_trail(40.0, &mut rng);

        assert!(!trail.clearings.is_empty());
        for c in &trail.clearings {
            assert!(trail.points.contains(c));
        }
    }

    #[test]
    fn test_branch_stays_inside_margin() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut trail = Trail::default();
        let added = generate_branch(&mut trail, TrailPoint::new(0.0, 0.0), 0.0, 40.0, &mut rng);

        assert!(added <= 12);
        assert_eq!(trail.points.len(), added);
        for p in &trail.points {
            assert!(p.x.abs() <= 37.0 && p.z.abs() <= 37.0);
        }
    }

    #[test]
    fn test_branch_near_edge_stops_early() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut trail = Trail::default();
        // Both ±60° headings leave the margin on the first segment
        let origin = TrailPoint::new(36.5, 36.0);
        let added = generate_branch(&mut trail, origin, std::f32::consts::FRAC_PI_4, 40.0, &mut rng);
        assert_eq!(added, 0);
    }
}
