//! 16.16 signed fixed-point scalar.
//!
//! Every arithmetic operator **saturates** instead of wrapping: the ray
//! caster multiplies cell steps by tangents that grow without bound near a
//! quarter turn, and a sign flip there would send the ray the wrong way.
//! Texture-space accumulators that are consumed modulo the texture size use
//! the explicit `wrapping_*` helpers.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Number of fractional bits.
pub const FRAC_BITS: u32 = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(1 << FRAC_BITS);
    pub const MAX: Fixed = Fixed(i32::MAX);
    pub const MIN: Fixed = Fixed(i32::MIN);

    /// Whole number → fixed. `v` must fit in 15 bits plus sign.
    #[inline(always)]
    pub const fn from_int(v: i32) -> Self {
        Fixed(v << FRAC_BITS)
    }

    #[inline(always)]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part, rounded towards negative infinity.
    #[inline(always)]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRAC_BITS
    }

    /// `self / 2`, rounded towards negative infinity.
    #[inline(always)]
    pub const fn half(self) -> Self {
        Fixed(self.0 >> 1)
    }

    /// Widening multiply, shift back, clamp to the `i32` range.
    #[inline]
    pub const fn mul(self, rhs: Fixed) -> Fixed {
        let wide = (self.0 as i64 * rhs.0 as i64) >> FRAC_BITS;
        if wide > i32::MAX as i64 {
            Fixed::MAX
        } else if wide < i32::MIN as i64 {
            Fixed::MIN
        } else {
            Fixed(wide as i32)
        }
    }

    /// Multiply by a plain integer (no fractional shift), saturating.
    #[inline]
    pub const fn scale(self, n: i32) -> Fixed {
        Fixed(self.0.saturating_mul(n))
    }

    #[inline(always)]
    pub const fn wrapping_add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }

    #[inline(always)]
    pub const fn wrapping_scale(self, n: i32) -> Fixed {
        Fixed(self.0.wrapping_mul(n))
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline(always)]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline(always)]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline(always)]
    fn neg(self) -> Fixed {
        Fixed(self.0.saturating_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline(always)]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::mul(self, rhs)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [i32; 12] = [
        0,
        1,
        -1,
        0x8000,
        -0x8000,
        1 << FRAC_BITS,
        -(3 << FRAC_BITS),
        279_620,
        92_119,
        -10_680_573,
        46_340 << 8,
        i32::MAX,
    ];

    #[test]
    fn mul_is_commutative() {
        for &a in &SAMPLES {
            for &b in &SAMPLES {
                assert_eq!(Fixed(a) * Fixed(b), Fixed(b) * Fixed(a), "{a} * {b}");
            }
        }
    }

    #[test]
    fn mul_matches_exact_product_in_range() {
        for &a in &SAMPLES {
            for &b in &SAMPLES {
                let exact = (a as i64 * b as i64) >> FRAC_BITS;
                if exact >= i32::MIN as i64 && exact <= i32::MAX as i64 {
                    assert_eq!((Fixed(a) * Fixed(b)).raw() as i64, exact, "{a} * {b}");
                }
            }
        }
    }

    #[test]
    fn mul_saturates_instead_of_wrapping() {
        let big = Fixed::from_int(30_000);
        assert_eq!(big * big, Fixed::MAX);
        assert_eq!(big * -big, Fixed::MIN);
        assert_eq!(Fixed::MIN * Fixed::MIN, Fixed::MAX);
        assert_eq!(Fixed::MAX * Fixed::from_int(-2), Fixed::MIN);
    }

    #[test]
    fn add_and_sub_saturate() {
        assert_eq!(Fixed::MAX + Fixed::ONE, Fixed::MAX);
        assert_eq!(Fixed::MIN - Fixed::ONE, Fixed::MIN);
        assert_eq!(-Fixed::MIN, Fixed::MAX);
        assert_eq!(Fixed::MAX.wrapping_add(Fixed(1)), Fixed::MIN);
    }

    #[test]
    fn integer_part_floors() {
        assert_eq!(Fixed(-1).to_int(), -1);
        assert_eq!(Fixed::from_int(5).half(), Fixed(5 << 15));
        assert_eq!(Fixed(-3).half(), Fixed(-2));
    }
}
