//! Progression systems

pub mod xp;
pub mod skills;

pub use skills::{Skill, SkillCategory, SkillTree, SKILL_GROWTH};
pub use xp::{xp_to_next_level, enemy_xp_value, level_title, HEALTH_PER_LEVEL};
