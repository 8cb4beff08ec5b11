//! Terrain height field
//!
//! A closed-form heightmap with a handful of lake depressions. Everything
//! that places, moves or tests things against the ground goes through
//! [`height`], so the constants here are load-bearing.

/// Lake centers on the overworld (x, z)
pub const LAKE_CENTERS: [(f32, f32); 3] = [(-18.0, 12.0), (14.0, -16.0), (22.0, 20.0)];

/// Radius of every lake depression
pub const LAKE_RADIUS: f32 = 3.5;

/// Depth factor of the depression per unit inside the radius
const LAKE_DEPTH: f32 = 0.4;

/// Samples taken around a lake rim to find its water surface
const RIM_SAMPLES: usize = 36;

/// Water sits this far below the highest rim sample
const WATER_EPSILON: f32 = 0.05;

/// Ground height at `(x, z)`.
pub fn height(x: f32, z: f32) -> f32 {
    let mut h = (x * 0.15).sin() * 1.2 + (z * 0.12).cos() * 1.0 + ((x + z) * 0.07).sin() * 0.6;

    for &(lx, lz) in LAKE_CENTERS.iter() {
        let dist = ((x - lx).powi(2) + (z - lz).powi(2)).sqrt();
        if dist < LAKE_RADIUS {
            h -= (LAKE_RADIUS - dist) * LAKE_DEPTH;
        }
    }

    h
}

/// Water surface of the lake centered at `(lx, lz)`.
///
/// The highest point of the rim, minus a small epsilon. Recomputed on
/// every call; terrain is static and 36 samples are cheap.
pub fn water_level(lx: f32, lz: f32) -> f32 {
    let mut max_rim = f32::MIN;
    for i in 0..RIM_SAMPLES {
        let angle = (i as f32 * 10.0).to_radians();
        let rim_x = lx + angle.cos() * LAKE_RADIUS;
        let rim_z = lz + angle.sin() * LAKE_RADIUS;
        max_rim = max_rim.max(height(rim_x, rim_z));
    }
    max_rim - WATER_EPSILON
}

/// Whether the ground at `(x, z)` lies below a lake's water surface.
pub fn is_underwater(x: f32, z: f32) -> bool {
    for &(lx, lz) in LAKE_CENTERS.iter() {
        let dist = ((x - lx).powi(2) + (z - lz).powi(2)).sqrt();
        if dist < LAKE_RADIUS && height(x, z) < water_level(lx, lz) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_is_deterministic() {
        for &(x, z) in &[(0.0, 0.0), (-18.0, 12.0), (3.25, -7.5), (39.9, -39.9)] {
            assert_eq!(height(x, z).to_bits(), height(x, z).to_bits());
        }
    }

    #[test]
    fn test_lake_center_is_depressed() {
        let (lx, lz) = LAKE_CENTERS[0];
        // Same point with the depression removed
        let base = (lx * 0.15).sin() * 1.2 + (lz * 0.12).cos() * 1.0 + ((lx + lz) * 0.07).sin() * 0.6;
        let expected = base - LAKE_RADIUS * LAKE_DEPTH;
        assert!((height(lx, lz) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_lake_centers_are_underwater() {
        for &(lx, lz) in LAKE_CENTERS.iter() {
            assert!(is_underwater(lx, lz));
        }
    }

    #[test]
    fn test_far_from_lakes_is_dry() {
        assert!(!is_underwater(0.0, 0.0));
        assert!(!is_underwater(-35.0, -35.0));
    }

    #[test]
    fn test_underwater_uses_height() {
        // Any underwater point must sit below its lake's surface as computed from `height`
        let (lx, lz) = LAKE_CENTERS[1];
        let (x, z) = (lx + 1.0, lz - 0.5);
        if is_underwater(x, z) {
            assert!(height(x, z) < water_level(lx, lz));
        }
    }
}
