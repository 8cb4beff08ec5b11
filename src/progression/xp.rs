//! Experience and leveling
//!
//! XP thresholds and the fixed amounts handed out per level.

/// Max health gained on every level-up
pub const HEALTH_PER_LEVEL: f32 = 20.0;

/// Skill points granted per level-up
pub const SKILL_POINTS_PER_LEVEL: u32 = 1;

/// XP needed to go from `level` to `level + 1`
pub fn xp_to_next_level(level: u32) -> u32 {
    level.max(1) * 100
}

/// XP an enemy of the given level is worth
pub fn enemy_xp_value(level: u32) -> u32 {
    level * 20
}

/// Get a title/rank based on level
pub fn level_title(level: u32) -> &'static str {
    match level {
        1..=2 => "Wanderer",
        3..=4 => "Pathfinder",
        5..=7 => "Warden",
        8..=10 => "Emberknight",
        _ => "Legend",
    }
}
