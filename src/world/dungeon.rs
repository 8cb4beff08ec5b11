//! Dungeon grid generator
//!
//! A drunkard's walk over a small boolean grid. The walk knows nothing
//! about what will be placed later; map loading reads the finished grid
//! and decides where walls, loot and monsters go.
//!
//! The walk can wander back over itself and branch cells can end up
//! detached from the main path. Neither is corrected.

use rand::Rng;

/// Width and height of the dungeon grid in cells
pub const GRID_SIZE: usize = 16;

/// World units per grid cell
pub const CELL_SIZE: f32 = 4.0;

/// Where every walk begins
pub const START_CELL: (usize, usize) = (GRID_SIZE / 2, GRID_SIZE / 2);

/// Cardinal directions as (dx, dy)
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Occupancy grid produced by [`generate_dungeon`]
#[derive(Debug, Clone)]
pub struct DungeonGrid {
    cells: [[bool; GRID_SIZE]; GRID_SIZE],
    /// Cell the walk started on (player spawn)
    pub start: (usize, usize),
    /// Cell the walk ended on (exit)
    pub end: (usize, usize),
}

impl DungeonGrid {
    fn new() -> Self {
        Self {
            cells: [[false; GRID_SIZE]; GRID_SIZE],
            start: START_CELL,
            end: START_CELL,
        }
    }

    /// Whether `(x, y)` is carved. Out-of-range cells are solid.
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= GRID_SIZE as i32 || y >= GRID_SIZE as i32 {
            return false;
        }
        self.cells[y as usize][x as usize]
    }

    fn carve(&mut self, x: usize, y: usize) {
        self.cells[y][x] = true;
    }

    /// All carved cells, row by row
    pub fn open_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..GRID_SIZE).flat_map(move |y| {
            (0..GRID_SIZE).filter_map(move |x| self.cells[y][x].then_some((x, y)))
        })
    }

    /// Number of carved cells
    pub fn open_count(&self) -> usize {
        self.open_cells().count()
    }

    /// The carved cell farthest from `start`; `start` itself when nothing
    /// else is open
    pub fn farthest_from_start(&self) -> (usize, usize) {
        let (sx, sy) = (self.start.0 as i32, self.start.1 as i32);
        self.open_cells()
            .max_by_key(|&(x, y)| {
                let (dx, dy) = (x as i32 - sx, y as i32 - sy);
                dx * dx + dy * dy
            })
            .unwrap_or(self.start)
    }
}

/// World-space center `(x, z)` of a grid cell.
///
/// The grid is centered on the world origin.
pub fn cell_center(x: usize, y: usize) -> (f32, f32) {
    let offset = GRID_SIZE as f32 * CELL_SIZE * 0.5;
    (
        x as f32 * CELL_SIZE + CELL_SIZE * 0.5 - offset,
        y as f32 * CELL_SIZE + CELL_SIZE * 0.5 - offset,
    )
}

/// Keep a coordinate inside the grid interior (the outer ring stays solid)
fn clamp_interior(v: i32) -> usize {
    v.clamp(1, GRID_SIZE as i32 - 2) as usize
}

/// Carve a dungeon with a random walk of `room_count` steps.
///
/// With probability `branch_chance` per step, one extra cell next to the
/// cursor is carved as well.
pub fn generate_dungeon(room_count: u32, branch_chance: f64, rng: &mut impl Rng) -> DungeonGrid {
    let mut grid = DungeonGrid::new();
    let (mut cx, mut cy) = START_CELL;
    grid.carve(cx, cy);

    let branch_chance = branch_chance.clamp(0.0, 1.0);

    for _ in 0..room_count {
        let (dx, dy) = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];
        cx = clamp_interior(cx as i32 + dx);
        cy = clamp_interior(cy as i32 + dy);
        grid.carve(cx, cy);

        if branch_chance > 0.0 && rng.gen_bool(branch_chance) {
            let (bx, by) = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];
            grid.carve(clamp_interior(cx as i32 + bx), clamp_interior(cy as i32 + by));
        }
    }

    grid.end = (cx, cy);
    log::debug!(
        "Dungeon grid carved: {} cells from {} steps, exit at {:?}",
        grid.open_count(),
        room_count,
        grid.end
    );
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_start_cell_always_open() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = generate_dungeon(0, 0.0, &mut rng);
        assert!(grid.is_open(START_CELL.0 as i32, START_CELL.1 as i32));
        assert_eq!(grid.open_count(), 1);
        assert_eq!(grid.end, START_CELL);
    }

    #[test]
    fn test_walk_is_bounded_by_steps() {
        let mut rng = StdRng::seed_from_u64(42);
        let grid = generate_dungeon(30, 0.0, &mut rng);
        // Revisits are no-ops, so at most one new cell per step
        assert!(grid.open_count() <= 31);
        assert!(grid.open_count() >= 2);
    }

    #[test]
    fn test_outer_ring_stays_solid() {
        let mut rng = StdRng::seed_from_u64(9);
        let grid = generate_dungeon(400, 0.5, &mut rng);
        for i in 0..GRID_SIZE as i32 {
            assert!(!grid.is_open(i, 0));
            assert!(!grid.is_open(i, GRID_SIZE as i32 - 1));
            assert!(!grid.is_open(0, i));
            assert!(!grid.is_open(GRID_SIZE as i32 - 1, i));
        }
    }

    #[test]
    fn test_branching_carves_at_most_two_cells_per_step() {
        let mut rng = StdRng::seed_from_u64(5);
        let grid = generate_dungeon(40, 1.0, &mut rng);
        assert!(grid.open_count() <= 81);
    }

    #[test]
    fn test_farthest_cell_leaves_start() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = generate_dungeon(10, 0.5, &mut rng);
            let far = grid.farthest_from_start();
            assert_ne!(far, grid.start);
            assert!(grid.is_open(far.0 as i32, far.1 as i32));
        }
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(generate_dungeon(0, 0.0, &mut rng).farthest_from_start(), START_CELL);
    }

    #[test]
    fn test_end_cell_is_open() {
        let mut rng = StdRng::seed_from_u64(77);
        let grid = generate_dungeon(25, 0.3, &mut rng);
        assert!(grid.is_open(grid.end.0 as i32, grid.end.1 as i32));
    }

    #[test]
    fn test_out_of_range_is_solid() {
        let mut rng = StdRng::seed_from_u64(2);
        let grid = generate_dungeon(10, 0.0, &mut rng);
        assert!(!grid.is_open(-1, 3));
        assert!(!grid.is_open(3, GRID_SIZE as i32));
    }

    #[test]
    fn test_cell_centers_are_symmetric() {
        let (x0, z0) = cell_center(0, 0);
        let (x1, z1) = cell_center(GRID_SIZE - 1, GRID_SIZE - 1);
        assert!((x0 + x1).abs() < 1e-5);
        assert!((z0 + z1).abs() < 1e-5);
    }
}
