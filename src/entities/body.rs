//! Common entity data
//!
//! Every object placed in the world carries a [`Body`]: where it is, how
//! big it is for collision, what kind of thing it is, and whether it is
//! still in play.

/// Position in the game world. Y is up; gameplay distances use X/Z.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance on the ground plane
    pub fn distance_xz(&self, other: &Position) -> f32 {
        ((self.x - other.x).powi(2) + (self.z - other.z).powi(2)).sqrt()
    }

    /// Move up to `step` units toward `target` on the ground plane,
    /// stopping `keep_away` short of it
    pub fn step_toward(&mut self, target: &Position, step: f32, keep_away: f32) {
        let dx = target.x - self.x;
        let dz = target.z - self.z;
        let dist = (dx * dx + dz * dz).sqrt();
        let travel = step.min(dist - keep_away);
        if dist <= f32::EPSILON || travel <= 0.0 {
            return;
        }
        self.x += dx / dist * travel;
        self.z += dz / dist * travel;
    }
}

/// What an entity is, as far as rendering and filtering care
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Player,
    Tree,
    Rock,
    Bush,
    Grass,
    House,
    Wall,
    Npc,
    Enemy,
    Boss,
    Item,
    Portal,
}

impl Category {
    pub fn glyph(&self) -> char {
        match self {
            Category::Player => '@',
            Category::Tree => '♣',
            Category::Rock => '●',
            Category::Bush => '"',
            Category::Grass => ',',
            Category::House => '▲',
            Category::Wall => '█',
            Category::Npc => '☺',
            Category::Enemy => 'e',
            Category::Boss => 'B',
            Category::Item => '+',
            Category::Portal => 'O',
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Category::Player => (255, 255, 200),
            Category::Tree => (40, 140, 60),
            Category::Rock => (140, 140, 140),
            Category::Bush => (70, 160, 70),
            Category::Grass => (90, 130, 60),
            Category::House => (180, 120, 70),
            Category::Wall => (110, 100, 90),
            Category::Npc => (230, 210, 120),
            Category::Enemy => (220, 70, 60),
            Category::Boss => (255, 40, 40),
            Category::Item => (120, 230, 120),
            Category::Portal => (150, 110, 255),
        }
    }

    /// Whether this category fights the player
    pub fn is_hostile(&self) -> bool {
        matches!(self, Category::Enemy | Category::Boss)
    }
}

/// Identity and lifecycle data shared by every entity
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Position,
    /// Collision radius
    pub size: f32,
    pub category: Category,
    /// False once defeated or consumed; inactive entities are skipped
    /// by AI, drawing and collision until the map is rebuilt
    pub active: bool,
    pub collidable: bool,
}

impl Body {
    pub fn new(category: Category, position: Position, size: f32) -> Self {
        Self {
            position,
            size,
            category,
            active: true,
            collidable: true,
        }
    }

    pub fn passable(mut self) -> Self {
        self.collidable = false;
        self
    }
}

/// The contract every world object fulfils
pub trait Entity {
    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    /// Advance internal timers by `dt` seconds
    fn update(&mut self, _dt: f32) {}

    fn position(&self) -> Position {
        self.body().position
    }

    fn category(&self) -> Category {
        self.body().category
    }

    fn size(&self) -> f32 {
        self.body().size
    }

    fn is_active(&self) -> bool {
        self.body().active
    }

    fn is_collidable(&self) -> bool {
        self.body().collidable
    }
}

/// Flip-flop used by renderers for two-frame walk/idle animations
#[derive(Debug, Clone, PartialEq)]
pub struct AnimToggle {
    interval: f32,
    timer: f32,
    on: bool,
}

impl AnimToggle {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.01),
            timer: 0.0,
            on: false,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.timer += dt;
        while self.timer >= self.interval {
            self.timer -= self.interval;
            self.on = !self.on;
        }
    }

    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval.max(0.01);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
