use crate::math::{Fixed, SCALAR_STEPS, SCALAR_TABLE};

/// Tallest projected height, for anything nearer than the first table entry.
pub const MAX_HEIGHT: i32 = 2 * SCALAR_STEPS as i32;

/// On-screen height (logical rows) of a 64-unit wall or sprite at
/// perpendicular distance `distance`.
///
/// Binary search over [`SCALAR_TABLE`] for the last entry nearer than
/// `distance`; heights are even and lie in `2..=512`. Non-increasing in
/// `distance`.
pub fn find_height(distance: Fixed) -> i32 {
    let d = distance.raw();
    let mut l: i32 = 0;
    let mut r: i32 = SCALAR_STEPS as i32 - 1;

    while l <= r {
        let m = (l + r) >> 1;
        let at = SCALAR_TABLE[m as usize].raw() << 6;
        if at == d {
            return MAX_HEIGHT - 2 * m;
        }
        if at < d {
            l = m + 1;
        } else {
            r = m - 1;
        }
    }

    if r < 0 { MAX_HEIGHT } else { MAX_HEIGHT - 2 * r }
}

/// Texels advanced per logical row for a slice `height` rows tall.
#[inline]
pub fn texture_step(height: i32) -> Fixed {
    let i = ((MAX_HEIGHT - height) >> 1).clamp(0, SCALAR_STEPS as i32 - 1);
    SCALAR_TABLE[i as usize]
}
