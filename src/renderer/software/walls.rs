//! Per-column grid traversal.
//!
//! Each ray is walked twice: once across horizontal grid lines (y = k·64)
//! and once across vertical ones (x = k·64). Whichever crossing is nearer
//! along the view axis wins. Doors are thin leaves set half a cell deep,
//! so they are tested at the half-stepped midpoint of the crossing.

use glam::IVec2;
use smallvec::SmallVec;

use crate::{
    math::{Angle, Fixed},
    world::{
        CELL_SHIFT, CELL_SIZE, Camera, Cell, DoorTable, EnemyKind, GridMap, HealthKind, TEX_MASK,
    },
};

/// Distance recorded for a column whose ray leaves the map.
pub const NO_HIT: Fixed = Fixed::MAX;

/// Offset of column 0 from the camera heading; columns sweep clockwise.
pub const COLUMN_ANGLE_BIAS: i32 = 59;

/// Which family of grid lines a hit lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallFace {
    /// On a line of constant y (north / south face).
    Horizontal,
    /// On a line of constant x (east / west face).
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallHit {
    pub cell: IVec2,
    pub face: WallFace,
    pub door: bool,
    /// Perpendicular distance along the view axis.
    pub distance: Fixed,
    /// Texture column, `0..64`.
    pub tex_col: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SightingKind {
    Enemy(EnemyKind),
    Health(HealthKind),
}

/// An entity cell a ray passed through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sighting {
    pub cell: IVec2,
    pub kind: SightingKind,
}

pub type Sightings = SmallVec<[Sighting; 4]>;

/// Everything one column's ray found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnCast {
    pub hit: Option<WallHit>,
    pub sightings: Sightings,
}

impl ColumnCast {
    /// Z-buffer value for this column.
    #[inline]
    pub fn distance(&self) -> Fixed {
        self.hit.map_or(NO_HIT, |h| h.distance)
    }
}

/// Where one traversal stopped.
#[derive(Clone, Copy, Debug)]
struct Crossing {
    x: Fixed,
    y: Fixed,
    cell: IVec2,
    /// Leaf width when the crossing is a door.
    leaf: Option<i32>,
}

/// Ray angle of screen column `column`.
#[inline]
pub fn column_angle(camera: &Camera, column: usize) -> Angle {
    camera
        .angle
        .wrapping_add(COLUMN_ANGLE_BIAS - column as i32)
}

/// Read-only view of the world needed to trace rays for one frame.
pub struct WallCaster<'a> {
    camera: &'a Camera,
    map: &'a GridMap,
    doors: &'a DoorTable,
}

impl<'a> WallCaster<'a> {
    pub fn new(camera: &'a Camera, map: &'a GridMap, doors: &'a DoorTable) -> Self {
        Self { camera, map, doors }
    }

    /// Trace `ray` to the nearest solid surface.
    ///
    /// Pure: the same inputs always give the same result, and entity cells
    /// are reported, not recorded.
    pub fn cast(&self, ray: Angle) -> ColumnCast {
        let mut sightings = Sightings::new();
        let horizontal = self.horizontal(ray, &mut sightings);
        let vertical = self.vertical(ray, &mut sightings);

        let depth = |c: &Option<Crossing>| {
            c.as_ref()
                .map_or(NO_HIT, |c| self.camera.depth_of(c.x, c.y))
        };
        let (hd, vd) = (depth(&horizontal), depth(&vertical));

        let hit = if hd < vd {
            horizontal.map(|c| self.resolve(c, WallFace::Horizontal, hd, ray))
        } else {
            vertical.map(|c| self.resolve(c, WallFace::Vertical, vd, ray))
        };

        ColumnCast { hit, sightings }
    }

    fn resolve(&self, c: Crossing, face: WallFace, distance: Fixed, ray: Angle) -> WallHit {
        let (along, mirrored) = match face {
            WallFace::Horizontal => (c.x, !ray.faces_north()),
            WallFace::Vertical => (c.y, ray.faces_west()),
        };
        let col = along.to_int() & TEX_MASK;
        let tex_col = match c.leaf {
            Some(leaf) => col + CELL_SIZE - leaf,
            None if mirrored => TEX_MASK - col,
            None => col,
        };
        WallHit {
            cell: c.cell,
            face,
            door: c.leaf.is_some(),
            distance,
            tex_col,
        }
    }

    /// Crossings with lines of constant y.
    fn horizontal(&self, ray: Angle, sightings: &mut Sightings) -> Option<Crossing> {
        if ray == Angle::ZERO || ray == Angle::HALF {
            return None;
        }
        let cam = self.camera;
        let north = ray.faces_north();
        let row = cam.y.raw() >> CELL_SHIFT;
        let cell_step = Fixed::from_int(CELL_SIZE);

        let (mut y, step_y) = if north {
            (Fixed(row << CELL_SHIFT), -cell_step)
        } else {
            (Fixed((row + 1) << CELL_SHIFT), cell_step)
        };
        let cot = ray.cot();
        let mut x = cam.x - (y - cam.y) * cot;
        let step_x = -(step_y * cot);

        loop {
            let cell = IVec2::new(
                x.raw() >> CELL_SHIFT,
                (y.raw() >> CELL_SHIFT) - i32::from(north),
            );
            match self.map.get(cell)? {
                Cell::Wall => {
                    return Some(Crossing {
                        x,
                        y,
                        cell,
                        leaf: None,
                    });
                }
                Cell::Door => {
                    let leaf = self.doors.leaf_width(cell);
                    let mid_x = x + step_x.half();
                    if (mid_x.to_int() & TEX_MASK) < leaf {
                        return Some(Crossing {
                            x: mid_x,
                            y: y + step_y.half(),
                            cell,
                            leaf: Some(leaf),
                        });
                    }
                }
                other => note_sighting(other, cell, sightings),
            }
            x += step_x;
            y += step_y;
        }
    }

    /// Crossings with lines of constant x.
    fn vertical(&self, ray: Angle, sightings: &mut Sightings) -> Option<Crossing> {
        if ray == Angle::QUARTER || ray == Angle::THREE_QUARTERS {
            return None;
        }
        let cam = self.camera;
        let west = ray.faces_west();
        let col = cam.x.raw() >> CELL_SHIFT;
        let cell_step = Fixed::from_int(CELL_SIZE);

        let (mut x, step_x) = if west {
            (Fixed(col << CELL_SHIFT), -cell_step)
        } else {
            (Fixed((col + 1) << CELL_SHIFT), cell_step)
        };
        let tan = ray.tan();
        let mut y = cam.y - (x - cam.x) * tan;
        let step_y = -(step_x * tan);

        loop {
            let cell = IVec2::new(
                (x.raw() >> CELL_SHIFT) - i32::from(west),
                y.raw() >> CELL_SHIFT,
            );
            match self.map.get(cell)? {
                Cell::Wall => {
                    return Some(Crossing {
                        x,
                        y,
                        cell,
                        leaf: None,
                    });
                }
                Cell::Door => {
                    let leaf = self.doors.leaf_width(cell);
                    let mid_y = y + step_y.half();
                    if (mid_y.to_int() & TEX_MASK) < leaf {
                        return Some(Crossing {
                            x: x + step_x.half(),
                            y: mid_y,
                            cell,
                            leaf: Some(leaf),
                        });
                    }
                }
                other => note_sighting(other, cell, sightings),
            }
            x += step_x;
            y += step_y;
        }
    }
}

#[inline]
fn note_sighting(cell_kind: Cell, cell: IVec2, sightings: &mut Sightings) {
    let kind = match cell_kind {
        Cell::Enemy(kind) => SightingKind::Enemy(kind),
        Cell::Health(kind) => SightingKind::Health(kind),
        _ => return,
    };
    sightings.push(Sighting { cell, kind });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Door, DoorState};

    fn corridor() -> GridMap {
        GridMap::from_ascii(&[
            "########", //
            "#.e#...#", //
            "########",
        ])
        .unwrap()
    }

    #[test]
    fn wall_two_cells_ahead() {
        let map = corridor();
        let doors = DoorTable::new();
        // west edge of cell (1, 1), looking east
        let cam = Camera::new(Fixed::from_int(64), Fixed::from_int(96), Angle::ZERO);
        let caster = WallCaster::new(&cam, &map, &doors);

        let cast = caster.cast(column_angle(&cam, 59));
        let hit = cast.hit.unwrap();
        assert_eq!(hit.cell, IVec2::new(3, 1));
        assert_eq!(hit.face, WallFace::Vertical);
        assert!(!hit.door);
        assert!((hit.distance - Fixed::from_int(128)).raw().abs() < Fixed::ONE.raw());
        assert!((0..64).contains(&hit.tex_col));

        // the enemy in (2, 1) was passed on the way
        assert!(cast.sightings.contains(&Sighting {
            cell: IVec2::new(2, 1),
            kind: SightingKind::Enemy(EnemyKind::Primary),
        }));
    }

    #[test]
    fn horizontal_face_when_looking_north() {
        let map = GridMap::from_ascii(&["###", "#.#", "#.#", "#.#", "###"]).unwrap();
        let doors = DoorTable::new();
        let cam = Camera::new(Fixed::from_int(96), Fixed::from_int(224), Angle::QUARTER);
        let hit = WallCaster::new(&cam, &map, &doors)
            .cast(Angle::QUARTER)
            .hit
            .unwrap();
        assert_eq!(hit.face, WallFace::Horizontal);
        assert_eq!(hit.cell, IVec2::new(1, 0));
        assert!((hit.distance - Fixed::from_int(160)).raw().abs() < Fixed::ONE.raw());
    }

    #[test]
    fn cast_is_deterministic() {
        let map = corridor();
        let doors = DoorTable::new();
        let cam = Camera::new(Fixed::from_int(80), Fixed(6_000_000), Angle::new(17));
        let caster = WallCaster::new(&cam, &map, &doors);
        for column in 0..120 {
            let ray = column_angle(&cam, column);
            assert_eq!(caster.cast(ray), caster.cast(ray));
        }
    }

    #[test]
    fn leaving_the_map_is_no_hit() {
        let map = GridMap::from_ascii(&["...", "...", "..."]).unwrap();
        let doors = DoorTable::new();
        let cam = Camera::at_cell(IVec2::new(1, 1), Angle::new(40));
        let cast = WallCaster::new(&cam, &map, &doors).cast(cam.angle);
        assert_eq!(cast.hit, None);
        assert_eq!(cast.distance(), NO_HIT);
    }

    fn half_open_door() -> (GridMap, DoorTable) {
        let map = GridMap::from_ascii(&[
            "########", //
            "#..D.#..", //
            "########",
        ])
        .unwrap();
        let mut doors = DoorTable::new();
        doors.insert(Door {
            cell: IVec2::new(3, 1),
            state: DoorState::Opening,
            offset: Fixed::from_int(32),
            tics: 0,
        });
        (map, doors)
    }

    #[test]
    fn half_open_door_blocks_near_edge() {
        let (map, doors) = half_open_door();
        // lateral offset ≈19 into the cell: inside the leaf
        let cam = Camera::new(Fixed::from_int(96), Fixed::from_int(84), Angle::ZERO);
        let hit = WallCaster::new(&cam, &map, &doors)
            .cast(Angle::ZERO)
            .hit
            .unwrap();
        assert!(hit.door);
        assert_eq!(hit.cell, IVec2::new(3, 1));
        assert!((hit.distance - Fixed::from_int(128)).raw().abs() < Fixed::ONE.raw());
        assert_eq!(hit.tex_col, 19 + 64 - 32);
    }

    #[test]
    fn half_open_door_passes_far_edge() {
        let (map, doors) = half_open_door();
        // lateral offset ≈47: past the leaf, ray reaches the wall behind
        let cam = Camera::new(Fixed::from_int(96), Fixed::from_int(112), Angle::ZERO);
        let hit = WallCaster::new(&cam, &map, &doors)
            .cast(Angle::ZERO)
            .hit
            .unwrap();
        assert!(!hit.door);
        assert_eq!(hit.cell, IVec2::new(5, 1));
        assert!(hit.distance > Fixed::from_int(200));
    }

    #[test]
    fn untracked_door_is_shut() {
        let (map, _) = half_open_door();
        let doors = DoorTable::new();
        let cam = Camera::new(Fixed::from_int(96), Fixed::from_int(112), Angle::ZERO);
        let hit = WallCaster::new(&cam, &map, &doors)
            .cast(Angle::ZERO)
            .hit
            .unwrap();
        assert!(hit.door);
        assert_eq!(hit.tex_col, 47);
    }
}
