//! Discrete angle circle.
//!
//! * 512 steps per turn, `0` = +X (east), increasing counter-clockwise.
//! * World Y grows *south*, so a unit step along angle `a` is
//!   `(+cos a, −sin a)`.
//! * Every value is kept masked to `0..512`; trig lookups never see an
//!   out-of-range index.

use super::fixed::Fixed;
use super::tables::{SIN_TABLE, TAN_TABLE};

pub const ANGLES: u32 = 512;
pub const ANGLE_MASK: u32 = ANGLES - 1;

const QUARTER_SHIFT: u32 = 7;
const QUARTER_MASK: u32 = (1 << QUARTER_SHIFT) - 1;
const LAST: usize = QUARTER_MASK as usize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(u16);

/// Which quarter of the circle an angle lies in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    First,
    Second,
    Third,
    Fourth,
}

impl Angle {
    pub const ZERO: Angle = Angle(0);
    pub const QUARTER: Angle = Angle(128);
    pub const HALF: Angle = Angle(256);
    pub const THREE_QUARTERS: Angle = Angle(384);

    #[inline(always)]
    pub const fn new(raw: u32) -> Self {
        Angle((raw & ANGLE_MASK) as u16)
    }

    #[inline(always)]
    pub const fn raw(self) -> u32 {
        self.0 as u32
    }

    /// Add a signed number of steps, wrapping around the circle.
    #[inline(always)]
    pub const fn wrapping_add(self, steps: i32) -> Self {
        Angle::new((self.0 as i32).wrapping_add(steps) as u32)
    }

    /// Quadrant and index inside it.
    #[inline(always)]
    pub const fn quadrant(self) -> (Quadrant, usize) {
        let raw = self.0 as u32;
        let index = (raw & QUARTER_MASK) as usize;
        let quadrant = match raw >> QUARTER_SHIFT {
            0 => Quadrant::First,
            1 => Quadrant::Second,
            2 => Quadrant::Third,
            _ => Quadrant::Fourth,
        };
        (quadrant, index)
    }

    /// Ray travels towards −Y (north).
    #[inline(always)]
    pub const fn faces_north(self) -> bool {
        self.0 < Self::HALF.0
    }

    /// Ray travels towards −X (west).
    #[inline(always)]
    pub const fn faces_west(self) -> bool {
        self.0 >= Self::QUARTER.0 && self.0 < Self::THREE_QUARTERS.0
    }

    pub const fn sin(self) -> Fixed {
        let (q, i) = self.quadrant();
        Fixed(match q {
            Quadrant::First => SIN_TABLE[i],
            Quadrant::Second => SIN_TABLE[LAST - i],
            Quadrant::Third => -SIN_TABLE[i],
            Quadrant::Fourth => -SIN_TABLE[LAST - i],
        })
    }

    pub const fn cos(self) -> Fixed {
        let (q, i) = self.quadrant();
        Fixed(match q {
            Quadrant::First => SIN_TABLE[LAST - i],
            Quadrant::Second => -SIN_TABLE[i],
            Quadrant::Third => -SIN_TABLE[LAST - i],
            Quadrant::Fourth => SIN_TABLE[i],
        })
    }

    /// Tangent. Meaningless at `QUARTER` and `THREE_QUARTERS`; callers must
    /// branch on those before asking.
    pub const fn tan(self) -> Fixed {
        let (q, i) = self.quadrant();
        Fixed(match q {
            Quadrant::First | Quadrant::Third => TAN_TABLE[i],
            Quadrant::Second | Quadrant::Fourth => -TAN_TABLE[LAST - i],
        })
    }

    /// Cotangent. Meaningless at `ZERO` and `HALF`; callers must branch on
    /// those before asking.
    pub const fn cot(self) -> Fixed {
        let (q, i) = self.quadrant();
        Fixed(match q {
            Quadrant::First | Quadrant::Third => TAN_TABLE[LAST - i],
            Quadrant::Second | Quadrant::Fourth => -TAN_TABLE[i],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_angles() -> impl Iterator<Item = Angle> {
        (0..ANGLES).map(Angle::new)
    }

    #[test]
    fn wraps_modulo_turn() {
        assert_eq!(Angle::new(512), Angle::ZERO);
        assert_eq!(Angle::new(512 + 511), Angle::new(511));
        assert_eq!(Angle::ZERO.wrapping_add(-1), Angle::new(511));
        assert_eq!(Angle::new(500).wrapping_add(20), Angle::new(8));
    }

    #[test]
    fn pythagorean_identity_holds() {
        for a in all_angles() {
            let s = a.sin();
            let c = a.cos();
            let sum = (s * s + c * c).raw();
            assert!((sum - Fixed::ONE.raw()).abs() <= 8, "angle {a:?}: {sum}");
        }
    }

    #[test]
    fn tan_matches_sin_over_cos() {
        for a in all_angles() {
            if a == Angle::QUARTER || a == Angle::THREE_QUARTERS {
                continue;
            }
            let ratio = ((a.sin().raw() as i64) << 16) / a.cos().raw() as i64;
            let tan = a.tan().raw() as i64;
            let tol = (ratio.abs() / 100).max(4);
            assert!((tan - ratio).abs() <= tol, "angle {a:?}: tan {tan} vs {ratio}");
        }
    }

    #[test]
    fn cot_matches_cos_over_sin() {
        for a in all_angles() {
            if a == Angle::ZERO || a == Angle::HALF {
                continue;
            }
            let ratio = ((a.cos().raw() as i64) << 16) / a.sin().raw() as i64;
            let cot = a.cot().raw() as i64;
            let tol = (ratio.abs() / 100).max(4);
            assert!((cot - ratio).abs() <= tol, "angle {a:?}: cot {cot} vs {ratio}");
        }
    }

    #[test]
    fn sign_follows_quadrant() {
        assert!(Angle::new(64).sin() > Fixed::ZERO && Angle::new(64).cos() > Fixed::ZERO);
        assert!(Angle::new(192).sin() > Fixed::ZERO && Angle::new(192).cos() < Fixed::ZERO);
        assert!(Angle::new(320).sin() < Fixed::ZERO && Angle::new(320).cos() < Fixed::ZERO);
        assert!(Angle::new(448).sin() < Fixed::ZERO && Angle::new(448).cos() > Fixed::ZERO);
    }

    #[test]
    fn direction_predicates() {
        assert!(Angle::QUARTER.faces_north());
        assert!(!Angle::THREE_QUARTERS.faces_north());
        assert!(Angle::HALF.faces_west());
        assert!(!Angle::ZERO.faces_west());
    }
}
