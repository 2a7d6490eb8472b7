//! The procedural scene: a checkerboard floor plus a bitmask of spheres.

use crate::{Color, Floor};
use card_math::Vec3;

/// Number of depth rows in the sphere grid.
pub const GRID_ROWS: usize = 9;
/// Number of columns (presence bits used) per row.
pub const GRID_COLUMNS: usize = 20;

/// Occupancy of the card grid, one word per depth row.
/// Bit `col` of `rows[row]` set means a sphere sits in that cell.
const CARD_ROWS: [u32; GRID_ROWS] = [
    247570, 280596, 280600, 249748, 18578, 18577, 231184, 16, 16,
];

/// A 9x20 lattice of spheres stored as presence bits.
///
/// Cell `(row, col)` maps to the world point `offset + (col, 0, row)`:
/// columns run along x, rows run along z (height above the floor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGrid {
    rows: [u32; GRID_ROWS],
    /// World position of cell (0, 0)
    pub offset: Vec3,
    /// Squared sphere radius, used directly in the intersection quadratic
    pub radius_squared: f32,
}

impl SphereGrid {
    /// Build a grid from raw row masks, with the card's placement and radius.
    /// Bits past `GRID_COLUMNS` are ignored.
    pub const fn new(rows: [u32; GRID_ROWS]) -> Self {
        Self {
            rows,
            offset: Vec3::new(0.0, 0.0, 4.0),
            radius_squared: 0.5,
        }
    }

    /// The grid spelling out the card's letters.
    pub const fn card() -> Self {
        Self::new(CARD_ROWS)
    }

    /// A grid with no spheres at all.
    pub const fn empty() -> Self {
        Self::new([0; GRID_ROWS])
    }

    /// Returns true if a sphere occupies `(row, col)`.
    ///
    /// Out-of-range cells are never occupied.
    #[inline]
    pub fn occupied(&self, row: usize, col: usize) -> bool {
        row < GRID_ROWS && col < GRID_COLUMNS && self.rows[row] & (1u32 << col) != 0
    }

    /// Occupied cells in table-scan order (row by row, low bit first).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..GRID_ROWS).flat_map(move |row| {
            (0..GRID_COLUMNS)
                .filter(move |&col| self.occupied(row, col))
                .map(move |col| (row, col))
        })
    }

    /// Number of spheres in the grid.
    pub fn count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| (row & ((1u32 << GRID_COLUMNS) - 1)).count_ones() as usize)
            .sum()
    }

    /// World-space center of the sphere in `(row, col)`.
    #[inline]
    pub fn center(&self, row: usize, col: usize) -> Vec3 {
        self.offset + Vec3::new(col as f32, 0.0, row as f32)
    }
}

impl Default for SphereGrid {
    fn default() -> Self {
        Self::card()
    }
}

/// Everything the tracer reads: geometry, light and the surface constants.
///
/// Built once and shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Ground plane at z = 0
    pub floor: Floor,
    /// The sphere lattice
    pub grid: SphereGrid,
    /// Hits closer than this are ignored (self-intersection guard)
    pub epsilon: f32,

    /// Point light position
    pub light_position: Vec3,

    /// Sky color at the horizon
    pub horizon_color: Color,
    /// Falloff power applied to `1 - direction.z`
    pub sky_exponent: i32,

    /// Floor albedo when the tile parity is odd
    pub floor_odd: Color,
    /// Floor albedo when the tile parity is even
    pub floor_even: Color,
    /// Tiles per world unit
    pub tile_scale: f32,
    /// Weight of the diffuse term on the floor
    pub diffuse_weight: f32,
    /// Light the floor receives even in full shadow
    pub ambient: f32,

    /// Power of the sphere highlight
    pub specular_exponent: i32,
    /// Energy kept per mirror bounce
    pub bounce_attenuation: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            floor: Floor,
            grid: SphereGrid::card(),
            epsilon: 0.01,
            light_position: Vec3::new(10.0, 10.0, 25.0),
            horizon_color: Color::new(0.1, 0.9, 0.4),
            sky_exponent: 3,
            floor_odd: Color::new(3.0, 1.0, 1.0),
            floor_even: Color::new(3.0, 2.0, 3.0),
            tile_scale: 0.2,
            diffuse_weight: 0.2,
            ambient: 0.1,
            specular_exponent: 99,
            bounce_attenuation: 0.7,
        }
    }
}

impl Scene {
    /// The default scene with a different sphere grid.
    pub fn with_grid(grid: SphereGrid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    /// Color of a ray that escapes the scene.
    ///
    /// Brightest toward the horizon, black straight up.
    pub fn sky_color(&self, direction: Vec3) -> Color {
        self.horizon_color * (1.0 - direction.z).powi(self.sky_exponent)
    }

    /// Checkerboard albedo at a floor point.
    pub fn floor_albedo(&self, point: Vec3) -> Color {
        let tile = (point.x * self.tile_scale).ceil() + (point.y * self.tile_scale).ceil();
        if (tile as i64) & 1 != 0 {
            self.floor_odd
        } else {
            self.floor_even
        }
    }
}
