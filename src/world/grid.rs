//! Tile grid shared with the game logic.
//!
//! The renderer only ever reads it; every cell is one of a handful of
//! [`Cell`] kinds decoded from the compact integer codes the level data uses.

use glam::IVec2;
use thiserror::Error;

use crate::math::{FRAC_BITS, Fixed};

/// Cell edge in map units.
pub const CELL_SIZE: i32 = 64;
/// `fixed >> CELL_SHIFT` is the cell index of a fixed-point coordinate.
pub const CELL_SHIFT: u32 = FRAC_BITS + 6;

pub const MAP_WIDTH: usize = 64;
pub const MAP_HEIGHT: usize = 64;

/// Fixed-point world coordinate of the middle of `cell`.
#[inline]
pub fn cell_center(cell: IVec2) -> (Fixed, Fixed) {
    let half = Fixed::from_int(CELL_SIZE / 2);
    (
        Fixed(cell.x << CELL_SHIFT) + half,
        Fixed(cell.y << CELL_SHIFT) + half,
    )
}

/// Size of the door / enemy / item registries.
pub const REGISTRY_SLOTS: usize = 64;

/// Registry slot owning `cell`: the low three bits of each coordinate.
///
/// Two cells eight apart on both axes share a slot; the registries resolve
/// that by storing the owning cell next to the payload.
#[inline]
pub const fn registry_slot(cell: IVec2) -> usize {
    (((cell.y & 7) << 3) + (cell.x & 7)) as usize
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HealthKind {
    Small,
    Large,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Door,
    Enemy(EnemyKind),
    Health(HealthKind),
    /// Spent enemy cell; walkable, invisible.
    Corpse,
    Exit,
}

impl Cell {
    /// Level-data code of this cell.
    pub const fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Wall => 1,
            Cell::Door => 2,
            Cell::Enemy(EnemyKind::Primary) => 3,
            Cell::Enemy(EnemyKind::Secondary) => 4,
            Cell::Health(HealthKind::Small) => 5,
            Cell::Health(HealthKind::Large) => 6,
            Cell::Corpse => 7,
            Cell::Exit => 8,
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = MapError;

    fn try_from(code: u8) -> Result<Self, MapError> {
        Ok(match code {
            0 => Cell::Empty,
            1 => Cell::Wall,
            2 => Cell::Door,
            3 => Cell::Enemy(EnemyKind::Primary),
            4 => Cell::Enemy(EnemyKind::Secondary),
            5 => Cell::Health(HealthKind::Small),
            6 => Cell::Health(HealthKind::Large),
            7 => Cell::Corpse,
            8 => Cell::Exit,
            other => return Err(MapError::UnknownCode(other)),
        })
    }
}

/// Things that can go wrong while building a map.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map data holds {got} cells, expected {expected}")]
    BadDimensions { expected: usize, got: usize },

    #[error("unknown cell code {0}")]
    UnknownCode(u8),

    #[error("unknown map glyph `{glyph}` at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
}

/// Row-major cell grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Default for GridMap {
    fn default() -> Self {
        Self::new(MAP_WIDTH, MAP_HEIGHT)
    }
}

impl GridMap {
    /// An all-empty map.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Decode raw level codes.
    pub fn from_codes(width: usize, height: usize, codes: &[u8]) -> Result<Self, MapError> {
        if codes.len() != width * height {
            return Err(MapError::BadDimensions {
                expected: width * height,
                got: codes.len(),
            });
        }
        let cells = codes
            .iter()
            .map(|&c| Cell::try_from(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a map from ASCII rows; the map is as wide as the longest row,
    /// shorter rows are padded with empty cells.
    ///
    /// ```text
    /// #  wall        D  door        > exit
    /// e  enemy       E  enemy (2nd) x  corpse
    /// h  health      H  health (+)  . or space: empty
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Result<Self, MapError> {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut map = Self::new(width, rows.len());
        for (row, line) in rows.iter().enumerate() {
            for (col, glyph) in line.chars().enumerate() {
                let cell = match glyph {
                    '.' | ' ' => Cell::Empty,
                    '#' => Cell::Wall,
                    'D' => Cell::Door,
                    'e' => Cell::Enemy(EnemyKind::Primary),
                    'E' => Cell::Enemy(EnemyKind::Secondary),
                    'h' => Cell::Health(HealthKind::Small),
                    'H' => Cell::Health(HealthKind::Large),
                    'x' => Cell::Corpse,
                    '>' => Cell::Exit,
                    glyph => return Err(MapError::UnknownGlyph { glyph, row, col }),
                };
                map.cells[row * width + col] = cell;
            }
        }
        Ok(map)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major index of `cell`, `None` outside the grid.
    #[inline]
    pub fn index(&self, cell: IVec2) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    #[inline]
    pub fn get(&self, cell: IVec2) -> Option<Cell> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// Overwrite one cell. Returns `false` if `cell` lies outside the grid.
    pub fn set(&mut self, cell: IVec2, value: Cell) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_cells() {
        for code in 0..=8u8 {
            assert_eq!(Cell::try_from(code).unwrap().code(), code);
        }
        assert_eq!(Cell::try_from(9), Err(MapError::UnknownCode(9)));
    }

    #[test]
    fn from_codes_checks_length() {
        let err = GridMap::from_codes(2, 2, &[0, 1, 0]).unwrap_err();
        assert_eq!(
            err,
            MapError::BadDimensions {
                expected: 4,
                got: 3
            }
        );
    }

    #[test]
    fn ascii_map_layout() {
        let map = GridMap::from_ascii(&["####", "#.D#", "#eH"]).unwrap();
        assert_eq!((map.width(), map.height()), (4, 3));
        assert_eq!(map.get(IVec2::new(2, 1)), Some(Cell::Door));
        assert_eq!(
            map.get(IVec2::new(1, 2)),
            Some(Cell::Enemy(EnemyKind::Primary))
        );
        // padded short row
        assert_eq!(map.get(IVec2::new(3, 2)), Some(Cell::Empty));
        assert_eq!(map.get(IVec2::new(4, 0)), None);
        assert_eq!(map.get(IVec2::new(-1, 0)), None);
    }

    #[test]
    fn ascii_rejects_unknown_glyph() {
        let err = GridMap::from_ascii(&["#?"]).unwrap_err();
        assert_eq!(
            err,
            MapError::UnknownGlyph {
                glyph: '?',
                row: 0,
                col: 1
            }
        );
    }

    #[test]
    fn cell_center_is_mid_cell() {
        let (x, y) = cell_center(IVec2::new(1, 2));
        assert_eq!(x, Fixed::from_int(96));
        assert_eq!(y, Fixed::from_int(160));
    }
}
