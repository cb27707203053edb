//! Floor and ceiling filler.
//!
//! The lower half of the screen is cut into one *band* per logical row.
//! Every floor pixel of a band lies at the same distance, so walking a band
//! left to right is a constant world-space step. The caster records, per
//! column, the first floor row below the wall slice; the sweep below turns
//! those column tops into horizontal runs and fills each run together with
//! its mirror-image ceiling run.
//!
//! A band's cursor is set up once per frame and carried across the gaps
//! between its runs, so a band split by nearer walls costs one setup.

use crate::{
    math::{Fixed, PLANE_DISTANCE},
    renderer::framebuffer::{FrameBuffer, HORIZON, VIEW_ROWS, VIEW_WIDTH},
    world::{Camera, TEX_MASK, TEX_SIZE, Texture},
};

/// `1 / cos(half field of view)`: the view-axis distance of a band scaled
/// to the distance along the edge rays.
pub const FOV_INV_COS: Fixed = Fixed(92_119);
/// `1 / 128`, one column's share of the full field of view.
pub const INV_FOV_COLUMNS: Fixed = Fixed(512);
/// Field-of-view edges relative to the camera heading.
const FOV_LEFT: i32 = 63;
const FOV_RIGHT: i32 = -64;
/// The 120 screen columns sit inside the 128-column field of view.
const EDGE_INSET: i32 = 4;

/// Floor bands: one per row between the horizon and the bottom edge.
pub const BANDS: usize = VIEW_ROWS - HORIZON;

#[derive(Clone, Copy, Debug, Default)]
struct Band {
    /// First column of the run currently open.
    start: i32,
    /// Column after the last run filled this frame, `None` if untouched.
    stop: Option<i32>,
    x: Fixed,
    y: Fixed,
    step_x: Fixed,
    step_y: Fixed,
}

/// Per-frame floor/ceiling accumulator.
#[derive(Clone, Debug)]
pub struct Visplanes {
    /// First floor row per column, offset by one so `top[0]` and
    /// `top[VIEW_WIDTH + 1]` are the closed sentinels.
    top: [i32; VIEW_WIDTH + 2],
    min_x: i32,
    max_x: i32,
    bands: [Band; BANDS],
    setups: u32,
}

impl Default for Visplanes {
    fn default() -> Self {
        Self {
            top: [VIEW_ROWS as i32; VIEW_WIDTH + 2],
            min_x: VIEW_WIDTH as i32,
            max_x: -1,
            bands: [Band::default(); BANDS],
            setups: 0,
        }
    }
}

impl Visplanes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Column `x` shows floor from row `floor_top` down.
    pub fn mark(&mut self, x: usize, floor_top: i32) {
        if floor_top >= VIEW_ROWS as i32 {
            return;
        }
        debug_assert!(floor_top > HORIZON as i32);
        self.top[x + 1] = floor_top;
        self.min_x = self.min_x.min(x as i32);
        self.max_x = self.max_x.max(x as i32);
    }

    /// Touched column range, `None` when no column shows floor.
    pub fn span(&self) -> Option<(i32, i32)> {
        (self.min_x <= self.max_x).then_some((self.min_x, self.max_x))
    }

    /// Fresh band setups since the last [`reset`](Self::reset).
    pub fn setups(&self) -> u32 {
        self.setups
    }

    /// Sweep the marked columns and paint every floor run and its ceiling
    /// mirror.
    pub fn fill(
        &mut self,
        fb: &mut FrameBuffer,
        camera: &Camera,
        floor: &Texture,
        ceiling: &Texture,
    ) {
        let Some((min_x, max_x)) = self.span() else {
            return;
        };

        for x in min_x..=max_x + 1 {
            let mut t1 = self.top[x as usize];
            let mut t2 = self.top[x as usize + 1];

            // rows that were floor in x-1 but are not in x: close
            while t1 < t2 {
                self.close_run(fb, camera, floor, ceiling, t1, x);
                t1 += 1;
            }
            // rows that are floor in x but were not in x-1: open
            while t2 < t1 {
                self.bands[(t2 - HORIZON as i32) as usize].start = x;
                t2 += 1;
            }
        }
    }

    /// Fill the open run of floor row `row`, ending before column `end`.
    fn close_run(
        &mut self,
        fb: &mut FrameBuffer,
        camera: &Camera,
        floor: &Texture,
        ceiling: &Texture,
        row: i32,
        end: i32,
    ) {
        let index = (row - HORIZON as i32) as usize;
        if self.bands[index].stop.is_none() {
            self.setups += 1;
        }
        let band = &mut self.bands[index];

        match band.stop {
            None => {
                let distance = PLANE_DISTANCE[index] * FOV_INV_COS;
                let left = camera.angle.wrapping_add(FOV_LEFT);
                let right = camera.angle.wrapping_add(FOV_RIGHT);
                let (x1, y1) = (distance * left.cos(), -(distance * left.sin()));
                let (x2, y2) = (distance * right.cos(), -(distance * right.sin()));
                band.step_x = (x2 - x1) * INV_FOV_COLUMNS;
                band.step_y = (y2 - y1) * INV_FOV_COLUMNS;
                let skip = band.start + EDGE_INSET;
                band.x = (camera.x + x1).wrapping_add(band.step_x.wrapping_scale(skip));
                band.y = (camera.y + y1).wrapping_add(band.step_y.wrapping_scale(skip));
            }
            Some(stop) => {
                let skip = band.start - stop;
                band.x = band.x.wrapping_add(band.step_x.wrapping_scale(skip));
                band.y = band.y.wrapping_add(band.step_y.wrapping_scale(skip));
            }
        }

        let ceiling_row = VIEW_ROWS - 1 - row as usize;
        for col in band.start..end {
            let tx = band.x.to_int() & TEX_MASK;
            let ty = band.y.to_int() & TEX_MASK;
            let texel = ty as usize * TEX_SIZE + tx as usize;
            fb.plot(col as usize, row as usize, floor.texel(texel));
            fb.plot(col as usize, ceiling_row, ceiling.texel(texel));
            band.x = band.x.wrapping_add(band.step_x);
            band.y = band.y.wrapping_add(band.step_y);
        }

        band.stop = Some(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Angle;

    fn noisy(seed: usize) -> Texture {
        let pixels = (0..TEX_SIZE * TEX_SIZE)
            .map(|i| ((i * 31 + seed) % 251) as u8)
            .collect();
        Texture::new("NOISE", pixels).unwrap()
    }

    fn camera() -> Camera {
        Camera::new(Fixed::from_int(300), Fixed::from_int(200), Angle::new(70))
    }

    fn render(marks: impl Iterator<Item = (usize, i32)>) -> (FrameBuffer, u32) {
        let mut planes = Visplanes::new();
        for (x, top) in marks {
            planes.mark(x, top);
        }
        let mut fb = FrameBuffer::new();
        fb.fill(0xFF);
        planes.fill(&mut fb, &camera(), &noisy(1), &noisy(2));
        (fb, planes.setups())
    }

    #[test]
    fn nothing_marked_draws_nothing() {
        let (fb, setups) = render(std::iter::empty());
        assert_eq!(setups, 0);
        assert!(fb.pixels().iter().all(|&p| p == 0xFF));
    }

    #[test]
    fn runs_fill_floor_and_mirrored_ceiling() {
        let (fb, setups) = render((10..20).map(|x| (x, 50)));
        assert_eq!(setups, (VIEW_ROWS - 50) as u32);
        for x in 0..VIEW_WIDTH {
            let inside = (10..20).contains(&x);
            assert_eq!(fb.get(x, 49), 0xFF);
            assert_eq!(fb.get(x, 14), 0xFF);
            for row in 50..VIEW_ROWS {
                assert_eq!(fb.get(x, row) != 0xFF, inside, "floor x={x} row={row}");
                let mirror = VIEW_ROWS - 1 - row;
                assert_eq!(fb.get(x, mirror) != 0xFF, inside, "ceiling x={x} row={mirror}");
            }
        }
    }

    #[test]
    fn split_band_is_set_up_once_and_stays_continuous() {
        const GAP: usize = 5;
        let (whole, whole_setups) = render((0..12).map(|x| (x, 40)));
        // a full-height wall in column GAP marks nothing there
        let (split, split_setups) = render((0..12).filter(|&x| x != GAP).map(|x| (x, 40)));

        assert_eq!(whole_setups, (VIEW_ROWS - 40) as u32);
        assert_eq!(split_setups, whole_setups);
        for x in (0..12).filter(|&x| x != GAP) {
            for row in 0..VIEW_ROWS {
                assert_eq!(split.get(x, row), whole.get(x, row), "x={x} row={row}");
            }
        }
        assert_eq!(split.get(GAP, 40), 0xFF);
    }

    #[test]
    fn stepped_tops_open_and_close_bands() {
        // staircase: deeper columns reveal more rows
        let (fb, _) = render((0..8).map(|x| (x, 56 - x as i32)));
        for x in 0..8 {
            let top = 56 - x;
            assert_eq!(fb.get(x, top - 1), 0xFF);
            assert_ne!(fb.get(x, top), 0xFF);
            assert_ne!(fb.get(x, VIEW_ROWS - 1), 0xFF);
        }
    }
}
