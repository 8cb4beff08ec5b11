//! Maps and map loading
//!
//! Each [`MapId`] has a loader that builds its full entity list in one go.
//! The game swaps the result in wholesale; nothing is patched in place.

use std::f32::consts::{PI, TAU};

use rand::Rng;

use super::dungeon::{cell_center, generate_dungeon, DungeonGrid, CELL_SIZE, GRID_SIZE, START_CELL};
use super::terrain::{height, is_underwater};
use super::trail::{generate_branch, generate_trail, Trail, TrailPoint};
use crate::audio::AudioCue;
use crate::config::GameConfig;
use crate::entities::{
    Boss, Category, Enemy, EnemyKind, Pickup, Portal, Position, Scenery, WorldEntity,
};

/// Wall posts per cell edge
const WALL_POSTS: usize = 3;
const WALL_POST_SIZE: f32 = 0.8;

/// Scenery never spawns this close to the overworld spawn point
const SPAWN_CLEARANCE: f32 = 5.0;

const HOUSE_SIZE: f32 = 2.0;
const PARADISE_SIZE: f32 = 14.0;
const HOUSE_INTERIOR_SIZE: f32 = 6.0;

/// Every place the player can be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapId {
    Overworld,
    DungeonOne,
    DungeonTwo,
    DungeonThree,
    BossArena,
    Paradise,
    House,
}

impl MapId {
    pub fn name(&self) -> &'static str {
        match self {
            MapId::Overworld => "The Emberwild",
            MapId::DungeonOne => "Ashen Hollow I",
            MapId::DungeonTwo => "Ashen Hollow II",
            MapId::DungeonThree => "Ashen Hollow III",
            MapId::BossArena => "Cinder Throne",
            MapId::Paradise => "Verdant Rest",
            MapId::House => "Hearthhome",
        }
    }

    /// Where the player appears after arriving through a portal
    pub fn spawn_point(&self) -> Position {
        match self {
            MapId::Overworld => Position::new(0.0, height(0.0, 0.0), 0.0),
            MapId::DungeonOne | MapId::DungeonTwo | MapId::DungeonThree | MapId::BossArena => {
                let (x, z) = cell_center(START_CELL.0, START_CELL.1);
                Position::new(x, 0.0, z)
            }
            MapId::Paradise => Position::new(0.0, 0.0, -6.0),
            MapId::House => Position::new(0.0, 0.0, 2.0),
        }
    }

    /// Background color (r, g, b)
    pub fn sky_color(&self) -> (u8, u8, u8) {
        match self {
            MapId::Overworld => (120, 170, 220),
            MapId::DungeonOne => (30, 26, 34),
            MapId::DungeonTwo => (24, 20, 30),
            MapId::DungeonThree => (18, 12, 24),
            MapId::BossArena => (60, 14, 10),
            MapId::Paradise => (250, 210, 170),
            MapId::House => (70, 50, 35),
        }
    }

    /// Loop that plays while on this map
    pub fn ambient(&self) -> AudioCue {
        match self {
            MapId::Overworld => AudioCue::ForestAmbience,
            MapId::DungeonOne | MapId::DungeonTwo | MapId::DungeonThree => AudioCue::DungeonAmbience,
            MapId::BossArena => AudioCue::ArenaTheme,
            MapId::Paradise => AudioCue::ParadiseTheme,
            MapId::House => AudioCue::HearthAmbience,
        }
    }

    /// 1-based depth for the three dungeon levels
    pub fn dungeon_level(&self) -> Option<u32> {
        match self {
            MapId::DungeonOne => Some(1),
            MapId::DungeonTwo => Some(2),
            MapId::DungeonThree => Some(3),
            _ => None,
        }
    }

    /// Where the exit of a dungeon level leads
    pub fn next(&self) -> Option<MapId> {
        match self {
            MapId::DungeonOne => Some(MapId::DungeonTwo),
            MapId::DungeonTwo => Some(MapId::DungeonThree),
            MapId::DungeonThree => Some(MapId::BossArena),
            _ => None,
        }
    }

    /// Half-extent of the walkable square, centered on the origin
    pub fn bounds(&self, world_size: f32) -> f32 {
        match self {
            MapId::Overworld => world_size,
            MapId::DungeonOne | MapId::DungeonTwo | MapId::DungeonThree | MapId::BossArena => {
                GRID_SIZE as f32 * CELL_SIZE * 0.5
            }
            MapId::Paradise => PARADISE_SIZE,
            MapId::House => HOUSE_INTERIOR_SIZE,
        }
    }

    /// Only the overworld has a height field and lakes
    pub fn has_terrain(&self) -> bool {
        matches!(self, MapId::Overworld)
    }
}

/// A freshly built map, ready to be swapped in
#[derive(Debug, Clone)]
pub struct MapContents {
    pub id: MapId,
    pub entities: Vec<WorldEntity>,
    /// Overworld only
    pub trail: Trail,
    /// Dungeon floor cell centers (x, z)
    pub floor: Vec<(f32, f32)>,
    pub sky: (u8, u8, u8),
}

impl MapContents {
    fn empty(id: MapId) -> Self {
        Self {
            id,
            entities: Vec::new(),
            trail: Trail::default(),
            floor: Vec::new(),
            sky: id.sky_color(),
        }
    }
}

/// Build the complete contents of map `id`
pub fn load_map(id: MapId, config: &GameConfig, rng: &mut impl Rng) -> MapContents {
    let contents = match id {
        MapId::Overworld => populate_overworld(config, rng),
        MapId::DungeonOne | MapId::DungeonTwo | MapId::DungeonThree => {
            let level = id.dungeon_level().unwrap_or(1);
            populate_dungeon(id, level, config, rng)
        }
        MapId::BossArena => populate_arena(config, rng),
        MapId::Paradise => populate_paradise(rng),
        MapId::House => populate_house(),
    };
    log::info!("Loaded {} with {} entities", id.name(), contents.entities.len());
    contents
}

/// Ground-level position on the overworld
fn ground(x: f32, z: f32) -> Position {
    Position::new(x, height(x, z), z)
}

fn random_point(extent: f32, rng: &mut impl Rng) -> (f32, f32) {
    (rng.gen_range(-extent..extent), rng.gen_range(-extent..extent))
}

fn populate_overworld(config: &GameConfig, rng: &mut impl Rng) -> MapContents {
    let settings = &config.overworld;
    let world_size = config.world_size;
    let mut map = MapContents::empty(MapId::Overworld);

    let mut trail = generate_trail(world_size, rng);
    let origins = trail.clearings.clone();
    if !origins.is_empty() {
        for _ in 0..settings.branches {
            let origin = origins[rng.gen_range(0..origins.len())];
            let base_angle = if rng.gen_bool(0.5) { 0.0 } else { PI };
            generate_branch(&mut trail, origin, base_angle, world_size, rng);
        }
    }

    let spawn = MapId::Overworld.spawn_point();
    let mut occupied: Vec<(f32, f32, f32)> = Vec::new();

    // Homestead near the west end of the trail
    let anchor = trail
        .points
        .iter()
        .copied()
        .min_by(|a, b| (a.x + 10.0).abs().total_cmp(&(b.x + 10.0).abs()))
        .unwrap_or(TrailPoint::new(-10.0, 0.0));
    let side: f32 = if is_underwater(anchor.x, anchor.z + 6.0) { -6.0 } else { 6.0 };
    let house = ground(anchor.x, anchor.z + side);
    map.entities.push(Scenery::solid(Category::House, house, HOUSE_SIZE).into());
    let door_z = house.z - side.signum() * (HOUSE_SIZE + 0.6);
    map.entities.push(Portal::new(ground(house.x, door_z), MapId::House).into());
    occupied.push((house.x, house.z, HOUSE_SIZE + 2.0));

    // A villager and a waystone near spawn
    map.entities.push(Scenery::solid(Category::Npc, ground(2.5, 2.5), 0.5).into());
    if let Some(end) = trail.end() {
        let target = ground(end.x - 4.0, end.z);
        map.entities.push(Portal::waystone(ground(-3.0, 3.0), MapId::Overworld, target).into());
        map.entities.push(Portal::new(ground(end.x, end.z), MapId::DungeonOne).into());
        occupied.push((end.x, end.z, 2.0));
    }

    // Clearings host wolves and supplies, but not right next to spawn
    for clearing in trail.clearings.iter() {
        if clearing.distance(spawn.x, spawn.z) < SPAWN_CLEARANCE * 2.0 {
            continue;
        }
        if rng.gen_bool(settings.enemy_chance.clamp(0.0, 1.0)) {
            let pos = ground(clearing.x + rng.gen_range(-1.0..1.0), clearing.z + rng.gen_range(-1.0..1.0));
            map.entities.push(Enemy::new(EnemyKind::Wolf, settings.enemy_level, pos).into());
        } else if rng.gen_bool(settings.pickup_chance.clamp(0.0, 1.0)) {
            map.entities.push(Pickup::new(ground(clearing.x, clearing.z)).into());
        }
    }

    let scatter = [
        (Category::Tree, settings.trees, 0.7, true),
        (Category::Rock, settings.rocks, 0.6, true),
        (Category::Bush, settings.bushes, 0.4, false),
        (Category::Grass, settings.grass, 0.3, false),
    ];
    for (category, count, size, solid) in scatter {
        let mut placed = 0;
        let mut attempts = 0;
        while placed < count && attempts < count * 4 {
            attempts += 1;
            let (x, z) = random_point(world_size, rng);
            if trail.distance_to(x, z) < settings.trail_clearance
                || is_underwater(x, z)
                || spawn.distance_xz(&Position::new(x, 0.0, z)) < SPAWN_CLEARANCE
                || occupied.iter().any(|&(ox, oz, r)| ((x - ox).powi(2) + (z - oz).powi(2)).sqrt() < r)
            {
                continue;
            }
            let entity = if solid {
                Scenery::solid(category, ground(x, z), size)
            } else {
                Scenery::decor(category, ground(x, z), size)
            };
            map.entities.push(entity.into());
            placed += 1;
        }
    }

    map.trail = trail;
    map
}

/// Walls along every open/closed cell boundary, leaving one gap in
/// `door_cell` if it has a closed edge.
fn build_walls(grid: &DungeonGrid, door_cell: (usize, usize)) -> Vec<WorldEntity> {
    let mut walls = Vec::new();
    let mut door_left = true;
    let half = CELL_SIZE * 0.5;

    for (cx, cy) in grid.open_cells() {
        let (x, z) = cell_center(cx, cy);
        for (dx, dy) in [(1i32, 0i32), (-1, 0), (0, 1), (0, -1)] {
            if grid.is_open(cx as i32 + dx, cy as i32 + dy) {
                continue;
            }
            if door_left && (cx, cy) == door_cell {
                door_left = false;
                continue;
            }
            let edge_x = x + dx as f32 * half;
            let edge_z = z + dy as f32 * half;
            for i in 0..WALL_POSTS {
                let t = (i as f32 + 0.5) / WALL_POSTS as f32 * CELL_SIZE - half;
                let (px, pz) = if dx != 0 { (edge_x, edge_z + t) } else { (edge_x + t, edge_z) };
                walls.push(Scenery::solid(Category::Wall, Position::new(px, 0.0, pz), WALL_POST_SIZE).into());
            }
        }
    }
    walls
}

/// Somewhere inside cell `(cx, cy)`, away from its walls
fn jitter_in_cell(cx: usize, cy: usize, rng: &mut impl Rng) -> Position {
    let (x, z) = cell_center(cx, cy);
    let spread = CELL_SIZE * 0.25;
    Position::new(x + rng.gen_range(-spread..spread), 0.0, z + rng.gen_range(-spread..spread))
}

fn populate_dungeon(id: MapId, level: u32, config: &GameConfig, rng: &mut impl Rng) -> MapContents {
    let settings = &config.dungeon;
    let (rooms, branch_chance) = settings.for_level(level);
    let grid = generate_dungeon(rooms, branch_chance, rng);
    let mut map = MapContents::empty(id);

    map.floor = grid.open_cells().map(|(x, y)| cell_center(x, y)).collect();
    map.entities.extend(build_walls(&grid, grid.end));

    for (cx, cy) in grid.open_cells() {
        if (cx, cy) == grid.start || (cx, cy) == grid.end {
            continue;
        }
        if rng.gen_bool(settings.obstacle_chance.clamp(0.0, 1.0)) {
            map.entities.push(Scenery::solid(Category::Rock, jitter_in_cell(cx, cy, rng), 0.6).into());
        }
        if rng.gen_bool(settings.item_chance.clamp(0.0, 1.0)) {
            map.entities.push(Pickup::new(jitter_in_cell(cx, cy, rng)).into());
        }
        if rng.gen_bool(settings.enemy_chance.clamp(0.0, 1.0)) {
            let kind = if rng.gen_bool(0.5) { EnemyKind::Skeleton } else { EnemyKind::Wraith };
            map.entities.push(Enemy::new(kind, level + 1, jitter_in_cell(cx, cy, rng)).into());
        }
    }

    if let Some(next) = id.next() {
        let (x, z) = cell_center(grid.end.0, grid.end.1);
        map.entities.push(Portal::new(Position::new(x, 0.0, z), next).into());
    }
    map
}

fn populate_arena(config: &GameConfig, rng: &mut impl Rng) -> MapContents {
    let grid = generate_dungeon(config.dungeon.arena_rooms, 0.5, rng);
    let mut map = MapContents::empty(MapId::BossArena);

    map.floor = grid.open_cells().map(|(x, y)| cell_center(x, y)).collect();
    map.entities.extend(build_walls(&grid, grid.end));

    // The walk can wander back to the start; the boss keeps its distance
    let lair = grid.farthest_from_start();
    let (x, z) = cell_center(lair.0, lair.1);
    map.entities.push(Boss::new(Position::new(x, 0.0, z), config.boss).into());
    map
}

fn populate_paradise(rng: &mut impl Rng) -> MapContents {
    let mut map = MapContents::empty(MapId::Paradise);

    // A ring of trees around a meadow
    let ring = 24;
    for i in 0..ring {
        let angle = i as f32 / ring as f32 * TAU;
        let r = PARADISE_SIZE - 1.5;
        map.entities.push(
            Scenery::solid(Category::Tree, Position::new(angle.cos() * r, 0.0, angle.sin() * r), 0.7).into(),
        );
    }
    for _ in 0..40 {
        let (x, z) = random_point(PARADISE_SIZE - 3.0, rng);
        map.entities.push(Scenery::decor(Category::Grass, Position::new(x, 0.0, z), 0.3).into());
    }

    map.entities.push(Scenery::solid(Category::Npc, Position::new(3.0, 0.0, 0.0), 0.5).into());
    map.entities.push(Pickup::new(Position::new(-3.0, 0.0, 0.0)).into());
    map.entities.push(Portal::new(Position::new(0.0, 0.0, 6.0), MapId::Overworld).into());
    map
}

fn populate_house() -> MapContents {
    let mut map = MapContents::empty(MapId::House);

    // Walls around a square room
    let edge = HOUSE_INTERIOR_SIZE;
    let mut t = -edge;
    while t <= edge {
        for (x, z) in [(t, -edge), (t, edge), (-edge, t), (edge, t)] {
            map.entities.push(Scenery::solid(Category::Wall, Position::new(x, 0.0, z), 0.6).into());
        }
        t += 1.0;
    }

    map.entities.push(Scenery::solid(Category::Npc, Position::new(-2.0, 0.0, -3.0), 0.5).into());
    map.entities.push(Pickup::new(Position::new(2.0, 0.0, -3.0)).into());
    map.entities.push(Portal::new(Position::new(0.0, 0.0, 4.5), MapId::Overworld).into());
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Entity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn portals(map: &MapContents) -> Vec<&Portal> {
        map.entities.iter().filter_map(|e| e.as_portal()).collect()
    }

    #[test]
    fn test_overworld_has_dungeon_entrance() {
        let mut rng = StdRng::seed_from_u64(11);
        let map = load_map(MapId::Overworld, &GameConfig::default(), &mut rng);
        assert!(!map.trail.points.is_empty());
        assert_eq!(portals(&map).iter().filter(|p| p.destination == MapId::DungeonOne).count(), 1);
        assert!(portals(&map).iter().any(|p| p.destination == MapId::House));
    }

    #[test]
    fn test_overworld_scenery_stays_dry_and_off_trail() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let map = load_map(MapId::Overworld, &config, &mut rng);
        for e in map.entities.iter() {
            if matches!(e.category(), Category::Tree | Category::Rock | Category::Bush | Category::Grass) {
                let p = e.position();
                assert!(!is_underwater(p.x, p.z));
                assert!(map.trail.distance_to(p.x, p.z) >= config.overworld.trail_clearance);
                assert_eq!(p.y, height(p.x, p.z));
            }
        }
    }

    #[test]
    fn test_dungeon_exit_leads_deeper() {
        let config = GameConfig::default();
        for (id, next) in [
            (MapId::DungeonOne, MapId::DungeonTwo),
            (MapId::DungeonTwo, MapId::DungeonThree),
            (MapId::DungeonThree, MapId::BossArena),
        ] {
            let mut rng = StdRng::seed_from_u64(21);
            let map = load_map(id, &config, &mut rng);
            let exits = portals(&map);
            assert_eq!(exits.len(), 1);
            assert_eq!(exits[0].destination, next);
            assert!(!map.floor.is_empty());
            assert!(map.entities.iter().any(|e| e.category() == Category::Wall));
        }
    }

    #[test]
    fn test_dungeon_enemies_scale_with_depth() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(8);
        let map = load_map(MapId::DungeonTwo, &config, &mut rng);
        for e in map.entities.iter() {
            if let WorldEntity::Enemy(enemy) = e {
                assert_eq!(enemy.level, 3);
                assert_ne!(enemy.kind, EnemyKind::Wolf);
            }
        }
    }

    #[test]
    fn test_arena_holds_one_boss_and_no_exit() {
        let mut rng = StdRng::seed_from_u64(5);
        let map = load_map(MapId::BossArena, &GameConfig::default(), &mut rng);
        assert_eq!(map.entities.iter().filter(|e| e.as_boss().is_some()).count(), 1);
        assert!(portals(&map).is_empty());
    }

    #[test]
    fn test_boss_never_spawns_on_player() {
        let config = GameConfig::default();
        let spawn = MapId::BossArena.spawn_point();
        for seed in 0..300 {
            let mut rng = StdRng::seed_from_u64(seed);
            let map = load_map(MapId::BossArena, &config, &mut rng);
            let boss = map.entities.iter().find_map(|e| e.as_boss()).unwrap();
            assert!(
                boss.position().distance_xz(&spawn) >= CELL_SIZE,
                "seed {} put the boss at the spawn",
                seed
            );
        }
    }

    #[test]
    fn test_house_and_paradise_lead_home() {
        let mut rng = StdRng::seed_from_u64(1);
        for id in [MapId::House, MapId::Paradise] {
            let map = load_map(id, &GameConfig::default(), &mut rng);
            let exits = portals(&map);
            assert_eq!(exits.len(), 1);
            assert_eq!(exits[0].destination, MapId::Overworld);
        }
    }

    #[test]
    fn test_dungeon_spawn_is_start_cell() {
        let spawn = MapId::DungeonOne.spawn_point();
        let (x, z) = cell_center(START_CELL.0, START_CELL.1);
        assert_eq!((spawn.x, spawn.z), (x, z));
    }
}
