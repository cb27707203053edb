use glam::IVec2;

use crate::math::{Angle, Fixed};

use super::grid::{CELL_SHIFT, cell_center};

/// Player view-point in world space.
///
/// * Only **yaw** exists – no pitch, no roll.
/// * Position is 16.16 fixed-point map units; one cell is 64 units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    pub x: Fixed,
    pub y: Fixed,
    pub angle: Angle,
}

/// A world point expressed relative to the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CamSpace {
    /// Offset to the right of the view axis.
    pub lateral: Fixed,
    /// Perpendicular distance along the view axis.
    pub depth: Fixed,
}

impl Camera {
    pub fn new(x: Fixed, y: Fixed, angle: Angle) -> Self {
        Self { x, y, angle }
    }

    /// Camera standing in the middle of `cell`.
    pub fn at_cell(cell: IVec2, angle: Angle) -> Self {
        let (x, y) = cell_center(cell);
        Self { x, y, angle }
    }

    /// Grid cell the eye is in.
    #[inline]
    pub fn cell(&self) -> IVec2 {
        IVec2::new(self.x.raw() >> CELL_SHIFT, self.y.raw() >> CELL_SHIFT)
    }

    /// Distance of `(px, py)` along the view axis.
    ///
    /// This is the projection onto the forward vector, not the Euclidean
    /// distance, so walls come out flat instead of fish-eyed.
    #[inline]
    pub fn depth_of(&self, px: Fixed, py: Fixed) -> Fixed {
        (px - self.x) * self.angle.cos() - (py - self.y) * self.angle.sin()
    }

    /// Rotate `(px, py)` by −yaw around the eye.
    #[inline]
    pub fn to_cam(&self, px: Fixed, py: Fixed) -> CamSpace {
        let dx = px - self.x;
        let dy = py - self.y;
        let (s, c) = (self.angle.sin(), self.angle.cos());
        CamSpace {
            lateral: dx * s + dy * c,
            depth: dx * c - dy * s,
        }
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move `forward` units along the view axis and `side` units to the left.
    pub fn step(&mut self, forward: Fixed, side: Fixed) {
        let left = self.angle.wrapping_add(Angle::QUARTER.raw() as i32);
        self.x += forward * self.angle.cos() + side * left.cos();
        self.y -= forward * self.angle.sin() + side * left.sin();
    }

    /// Rotate by `steps` angle units (positive = turn left).
    pub fn turn(&mut self, steps: i32) {
        self.angle = self.angle.wrapping_add(steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_of_center_position() {
        let cam = Camera::at_cell(IVec2::new(3, 7), Angle::ZERO);
        assert_eq!(cam.cell(), IVec2::new(3, 7));
        assert_eq!(cam.x, Fixed::from_int(3 * 64 + 32));
    }

    #[test]
    fn to_cam_axes_align() {
        let cam = Camera::new(Fixed::ZERO, Fixed::ZERO, Angle::ZERO);
        // Straight ahead (east) → depth, no lateral offset to speak of.
        let ahead = cam.to_cam(Fixed::from_int(10), Fixed::ZERO);
        assert!((ahead.depth - Fixed::from_int(10)).raw().abs() < 64);
        assert!(ahead.lateral.raw().abs() < Fixed::ONE.raw());
        // South is to the right when facing east.
        let right = cam.to_cam(Fixed::ZERO, Fixed::from_int(5));
        assert!(right.lateral > Fixed::from_int(4));
        assert!(right.depth.raw().abs() < Fixed::ONE.raw());
    }

    #[test]
    fn depth_matches_to_cam() {
        let cam = Camera::new(Fixed::from_int(100), Fixed::from_int(90), Angle::new(77));
        let (px, py) = (Fixed::from_int(300), Fixed::from_int(12));
        assert_eq!(cam.depth_of(px, py), cam.to_cam(px, py).depth);
    }

    #[test]
    fn step_moves_along_heading() {
        let mut cam = Camera::at_cell(IVec2::new(4, 4), Angle::QUARTER);
        let before = cam;
        cam.step(Fixed::from_int(10), Fixed::ZERO);
        // Facing north: y shrinks, x barely moves.
        assert!(cam.y < before.y - Fixed::from_int(9));
        assert!((cam.x - before.x).raw().abs() < Fixed::ONE.raw());
        cam.turn(-128);
        assert_eq!(cam.angle, Angle::ZERO);
    }
}
