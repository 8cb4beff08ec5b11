//! Skill tree
//!
//! Eight upgradeable skills in four categories. Each category has a root
//! skill and one tier-2 skill that stays locked until its root has at
//! least one level. Skills refer to their prerequisites by name; the tree
//! owns every skill.

/// Value multiplier applied on every successful upgrade
pub const SKILL_GROWTH: f32 = 1.2;

/// Default cap for every skill
pub const DEFAULT_MAX_LEVEL: u32 = 5;

/// Which player stat a skill feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillCategory {
    Attack,
    Defense,
    Magic,
    Speed,
}

impl SkillCategory {
    pub fn name(&self) -> &'static str {
        match self {
            SkillCategory::Attack => "Attack",
            SkillCategory::Defense => "Defense",
            SkillCategory::Magic => "Magic",
            SkillCategory::Speed => "Speed",
        }
    }
}

/// A single upgradeable skill
#[derive(Debug, Clone)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub category: SkillCategory,
    pub level: u32,
    pub max_level: u32,
    /// Current effect value; grows by [`SKILL_GROWTH`] per level
    pub value: f32,
    /// Names of skills that need at least one level first
    pub prerequisites: Vec<String>,
}

impl Skill {
    pub fn new(name: &str, description: &str, category: SkillCategory, base_value: f32) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            category,
            level: 0,
            max_level: DEFAULT_MAX_LEVEL,
            value: base_value,
            prerequisites: Vec::new(),
        }
    }

    pub fn requires(mut self, prerequisite: &str) -> Self {
        self.prerequisites.push(prerequisite.to_string());
        self
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }

    /// What this skill currently adds to its category
    pub fn contribution(&self) -> f32 {
        self.value * self.level as f32
    }
}

/// All skills of one player plus the unspent points
#[derive(Debug, Clone)]
pub struct SkillTree {
    skills: Vec<Skill>,
    points: u32,
}

impl SkillTree {
    /// The default eight-skill tree with no points
    pub fn new() -> Self {
        Self {
            skills: default_skills(),
            points: 0,
        }
    }

    pub fn with_skills(skills: Vec<Skill>) -> Self {
        Self { skills, points: 0 }
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn add_points(&mut self, points: u32) {
        self.points += points;
    }

    /// Whether `name` has room to grow and all its prerequisites are learned
    pub fn can_learn(&self, name: &str) -> bool {
        let Some(skill) = self.get(name) else {
            return false;
        };
        if skill.is_maxed() {
            return false;
        }
        skill.prerequisites.iter().all(|req| {
            self.get(req).map(|p| p.level > 0).unwrap_or(false)
        })
    }

    /// Spend one point on `name`. Returns false and changes nothing when
    /// there are no points, the skill is unknown, or it cannot be learned.
    pub fn use_skill_point(&mut self, name: &str) -> bool {
        if self.points == 0 || !self.can_learn(name) {
            return false;
        }
        let Some(skill) = self.skills.iter_mut().find(|s| s.name == name) else {
            return false;
        };

        self.points -= 1;
        skill.level += 1;
        skill.value *= SKILL_GROWTH;
        log::info!("{} upgraded to level {}", skill.name, skill.level);
        true
    }

    /// Sum of `value * level` over every skill in `category`
    pub fn aggregate(&self, category: SkillCategory) -> f32 {
        self.skills
            .iter()
            .filter(|s| s.category == category)
            .map(Skill::contribution)
            .sum()
    }
}

impl Default for SkillTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Four roots and four tier-2 skills, one pair per category
pub fn default_skills() -> Vec<Skill> {
    vec![
        Skill::new("Power Strike", "Adds to melee damage", SkillCategory::Attack, 3.0),
        Skill::new("Iron Skin", "Raises defense", SkillCategory::Defense, 8.0),
        Skill::new("Arcane Bolt", "Adds to special attack damage", SkillCategory::Magic, 5.0),
        Skill::new("Swift Feet", "Raises movement speed", SkillCategory::Speed, 1.0),
        Skill::new("Cleave", "Heavier melee swings", SkillCategory::Attack, 5.0).requires("Power Strike"),
        Skill::new("Bulwark", "Much higher defense", SkillCategory::Defense, 12.0).requires("Iron Skin"),
        Skill::new("Fireball", "Scorching special attack", SkillCategory::Magic, 8.0).requires("Arcane Bolt"),
        Skill::new("Dash", "Even faster on foot", SkillCategory::Speed, 1.5).requires("Swift Feet"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tree_shape() {
        let tree = SkillTree::new();
        assert_eq!(tree.skills().len(), 8);

        let roots: Vec<_> = tree.skills().iter().filter(|s| s.prerequisites.is_empty()).collect();
        assert_eq!(roots.len(), 4);

        for skill in tree.skills().iter().filter(|s| !s.prerequisites.is_empty()) {
            assert_eq!(skill.prerequisites.len(), 1);
            let root = tree.get(&skill.prerequisites[0]).unwrap();
            assert_eq!(root.category, skill.category);
            assert!(root.prerequisites.is_empty());
        }
    }

    #[test]
    fn test_tier_two_gated_by_root() {
        let mut tree = SkillTree::new();
        tree.add_points(3);

        assert!(!tree.use_skill_point("Cleave"));
        assert_eq!(tree.points(), 3);

        assert!(tree.use_skill_point("Power Strike"));
        assert_eq!(tree.points(), 2);

        assert!(tree.use_skill_point("Cleave"));
        assert_eq!(tree.points(), 1);
        assert_eq!(tree.get("Cleave").unwrap().level, 1);
    }

    #[test]
    fn test_no_points_fails() {
        let mut tree = SkillTree::new();
        assert!(!tree.use_skill_point("Iron Skin"));
        assert_eq!(tree.get("Iron Skin").unwrap().level, 0);
    }

    #[test]
    fn test_unknown_skill_fails() {
        let mut tree = SkillTree::new();
        tree.add_points(1);
        assert!(!tree.use_skill_point("Meteor"));
        assert_eq!(tree.points(), 1);
    }

    #[test]
    fn test_upgrade_grows_value() {
        let mut tree = SkillTree::new();
        tree.add_points(2);
        let base = tree.get("Arcane Bolt").unwrap().value;

        assert!(tree.use_skill_point("Arcane Bolt"));
        let once = tree.get("Arcane Bolt").unwrap().value;
        assert!((once - base * SKILL_GROWTH).abs() < 1e-5);

        assert!(tree.use_skill_point("Arcane Bolt"));
        let twice = tree.get("Arcane Bolt").unwrap().value;
        assert!((twice - base * SKILL_GROWTH * SKILL_GROWTH).abs() < 1e-5);
    }

    #[test]
    fn test_max_level_blocks_upgrade() {
        let mut tree = SkillTree::new();
        tree.add_points(DEFAULT_MAX_LEVEL + 2);
        for _ in 0..DEFAULT_MAX_LEVEL {
            assert!(tree.use_skill_point("Swift Feet"));
        }
        assert!(!tree.use_skill_point("Swift Feet"));
        assert_eq!(tree.points(), 2);
        assert_eq!(tree.get("Swift Feet").unwrap().level, DEFAULT_MAX_LEVEL);
    }

    #[test]
    fn test_unlearned_skills_contribute_nothing() {
        let tree = SkillTree::new();
        assert_eq!(tree.aggregate(SkillCategory::Attack), 0.0);
        assert_eq!(tree.aggregate(SkillCategory::Defense), 0.0);
    }

    #[test]
    fn test_aggregate_sums_value_times_level() {
        let mut tree = SkillTree::new();
        tree.add_points(3);
        tree.use_skill_point("Iron Skin");
        tree.use_skill_point("Iron Skin");
        tree.use_skill_point("Bulwark");

        let iron = tree.get("Iron Skin").unwrap();
        let bulwark = tree.get("Bulwark").unwrap();
        let expected = iron.value * 2.0 + bulwark.value;
        assert!((tree.aggregate(SkillCategory::Defense) - expected).abs() < 1e-4);
        assert_eq!(tree.aggregate(SkillCategory::Magic), 0.0);
    }

    #[test]
    fn test_missing_prerequisite_blocks_forever() {
        let skills = vec![Skill::new("Orphan", "", SkillCategory::Magic, 1.0).requires("Nowhere")];
        let mut tree = SkillTree::with_skills(skills);
        tree.add_points(1);
        assert!(!tree.can_learn("Orphan"));
        assert!(!tree.use_skill_point("Orphan"));
    }
}
