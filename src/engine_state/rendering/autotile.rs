//! Auto-tiling of top faces.
//!
//! Blocks with an `AutoTileConfig` pick the tile for their top face from an atlas,
//! based on which horizontal neighbours share their block type. This gives continuous
//! looking edges on terrain such as grass or paths.
//!
//! # Pattern resolution
//! 1. A 4-bit mask records same-type neighbours: north (−Z) = 1, east (+X) = 2,
//!    south (+Z) = 4, west (−X) = 8.
//! 2. For each diagonal whose two cardinal neighbours are both present, a diagonal cell
//!    of a different type (or empty) is an open corner. The first open corner, checked
//!    in the order top-right, top-left, bottom-right, bottom-left, selects an inner-corner
//!    tile that overrides the mask tile.
//!
//! # Atlas layout
//! Mask `m` lives at column `m % 4`, row `m / 4`. The inner-corner tiles occupy row 4,
//! columns 0 to 3 in the order above. A 4x5 atlas therefore covers every pattern;
//! smaller atlases fall back to the isolated tile (mask 0) for cells they lack.

use std::fmt;

use cgmath::Point3;
use log::warn;

use crate::engine_state::voxels::{block::AutoTileConfig, world::VoxelStore};

pub const NORTH: u8 = 1;
pub const EAST: u8 = 2;
pub const SOUTH: u8 = 4;
pub const WEST: u8 = 8;

/// Inner-corner tiles, named by their position with north at the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InnerCorner {
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl InnerCorner {
    /// Corners in precedence order.
    pub const ALL: [InnerCorner; 4] = [
        InnerCorner::TopRight,
        InnerCorner::TopLeft,
        InnerCorner::BottomRight,
        InnerCorner::BottomLeft,
    ];

    /// The two cardinal bits that must both be set for this corner to open.
    fn cardinals(self) -> u8 {
        match self {
            InnerCorner::TopRight => NORTH | EAST,
            InnerCorner::TopLeft => NORTH | WEST,
            InnerCorner::BottomRight => SOUTH | EAST,
            InnerCorner::BottomLeft => SOUTH | WEST,
        }
    }

    /// `(dx, dz)` of the diagonal cell.
    fn diagonal(self) -> (i32, i32) {
        match self {
            InnerCorner::TopRight => (1, -1),
            InnerCorner::TopLeft => (-1, -1),
            InnerCorner::BottomRight => (1, 1),
            InnerCorner::BottomLeft => (-1, 1),
        }
    }
}

/// Resolved auto-tile pattern: the neighbour mask plus an optional corner override.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AutoTilePattern {
    pub mask: u8,
    pub corner: Option<InnerCorner>,
}

impl fmt::Display for AutoTilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.corner {
            Some(corner) => write!(f, "{}:{:?}", self.mask, corner),
            None => write!(f, "{}", self.mask),
        }
    }
}

/// Same-type flags for the 3x3 horizontal neighbourhood of a cell.
///
/// Indexed `[dz + 1][dx + 1]`; the centre entry is ignored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Neighborhood {
    same: [[bool; 3]; 3],
}

impl Neighborhood {
    /// Builds a neighbourhood from a predicate over `(dx, dz)` offsets in `-1..=1`.
    pub fn from_fn(mut is_same: impl FnMut(i32, i32) -> bool) -> Self {
        let mut same = [[false; 3]; 3];
        for dz in -1..=1 {
            for dx in -1..=1 {
                if dx != 0 || dz != 0 {
                    same[(dz + 1) as usize][(dx + 1) as usize] = is_same(dx, dz);
                }
            }
        }
        Neighborhood { same }
    }

    /// Samples the store around `center` on the same Y layer.
    pub fn sample(store: &VoxelStore, center: Point3<i32>, block_type: &str) -> Self {
        Self::from_fn(|dx, dz| {
            store.is_type(Point3::new(center.x + dx, center.y, center.z + dz), block_type)
        })
    }

    /// Returns the same-type flag at `(dx, dz)`.
    pub fn is_same(&self, dx: i32, dz: i32) -> bool {
        self.same[(dz + 1) as usize][(dx + 1) as usize]
    }
}

/// Resolves the auto-tile pattern of a neighbourhood. Pure and order independent.
pub fn resolve_pattern(neighborhood: &Neighborhood) -> AutoTilePattern {
    let mut mask = 0;
    if neighborhood.is_same(0, -1) {
        mask |= NORTH;
    }
    if neighborhood.is_same(1, 0) {
        mask |= EAST;
    }
    if neighborhood.is_same(0, 1) {
        mask |= SOUTH;
    }
    if neighborhood.is_same(-1, 0) {
        mask |= WEST;
    }

    let corner = InnerCorner::ALL.into_iter().find(|corner| {
        let (dx, dz) = corner.diagonal();
        mask & corner.cardinals() == corner.cardinals() && !neighborhood.is_same(dx, dz)
    });

    AutoTilePattern { mask, corner }
}

/// A tile position in an atlas grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasCell {
    pub column: u32,
    pub row: u32,
}

const fn cell(column: u32, row: u32) -> AtlasCell {
    AtlasCell { column, row }
}

/// Atlas cell of each neighbour mask.
pub const MASK_TILES: [AtlasCell; 16] = [
    cell(0, 0),
    cell(1, 0),
    cell(2, 0),
    cell(3, 0),
    cell(0, 1),
    cell(1, 1),
    cell(2, 1),
    cell(3, 1),
    cell(0, 2),
    cell(1, 2),
    cell(2, 2),
    cell(3, 2),
    cell(0, 3),
    cell(1, 3),
    cell(2, 3),
    cell(3, 3),
];

/// Atlas cell of each inner corner, in `InnerCorner::ALL` order.
pub const CORNER_TILES: [AtlasCell; 4] = [cell(0, 4), cell(1, 4), cell(2, 4), cell(3, 4)];

/// Returns the layout cell for a pattern, before any atlas bounds check.
pub fn atlas_cell(pattern: AutoTilePattern) -> AtlasCell {
    match pattern.corner {
        Some(corner) => CORNER_TILES[corner as usize],
        None => MASK_TILES[(pattern.mask & 0x0f) as usize],
    }
}

/// A rectangle in normalised texture space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl UvRect {
    /// The whole texture.
    pub const FULL: UvRect = UvRect {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    fn of_cell(cell: AtlasCell, columns: u32, rows: u32) -> Self {
        let columns = columns as f32;
        let rows = rows as f32;
        UvRect {
            u0: cell.column as f32 / columns,
            v0: cell.row as f32 / rows,
            u1: (cell.column + 1) as f32 / columns,
            v1: (cell.row + 1) as f32 / rows,
        }
    }
}

fn fits(cell: AtlasCell, config: &AutoTileConfig) -> bool {
    cell.column < config.atlas_columns && cell.row < config.atlas_rows
}

/// Maps a pattern to its UV rectangle in the configured atlas.
///
/// Patterns whose tile lies outside the atlas fall back to the isolated tile with a
/// warning. A degenerate atlas (zero columns or rows) maps to the full texture.
pub fn uv_rect(config: &AutoTileConfig, pattern: AutoTilePattern) -> UvRect {
    let cell = atlas_cell(pattern);
    if fits(cell, config) {
        return UvRect::of_cell(cell, config.atlas_columns, config.atlas_rows);
    }

    warn!(
        "Auto-tile pattern {} has no tile in {}x{} atlas '{}', using the isolated tile",
        pattern, config.atlas_columns, config.atlas_rows, config.atlas_texture_id
    );

    let isolated = MASK_TILES[0];
    if fits(isolated, config) {
        UvRect::of_cell(isolated, config.atlas_columns, config.atlas_rows)
    } else {
        UvRect::FULL
    }
}
