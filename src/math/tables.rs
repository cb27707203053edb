//! Precomputed lookup tables.
//!
//! The two trig tables cover one quadrant (128 angle units) sampled at the
//! *centre* of every angle step, so no entry is exactly 0 or 1 and `tan`
//! never has to return infinity. The perspective tables are derived at
//! compile time from the screen and cell dimensions.

use super::fixed::{FRAC_BITS, Fixed};

/// `sin((i + 0.5) · 2π / 512)` in 16.16, `i` in `0..128`.
pub const SIN_TABLE: [i32; 128] = [
    402, 1206, 2010, 2814, 3617, 4420, 5222, 6023, 6823, 7623, 8421, 9218, 10013, 10807, 11600,
    12390, 13179, 13966, 14751, 15533, 16313, 17091, 17866, 18638, 19408, 20175, 20938, 21699,
    22456, 23210, 23960, 24707, 25450, 26189, 26925, 27656, 28383, 29105, 29824, 30538, 31247,
    31952, 32651, 33346, 34036, 34721, 35400, 36074, 36743, 37406, 38064, 38716, 39362, 40002,
    40636, 41263, 41885, 42501, 43110, 43712, 44308, 44897, 45480, 46055, 46624, 47186, 47740,
    48288, 48828, 49360, 49886, 50403, 50914, 51416, 51911, 52398, 52877, 53348, 53811, 54266,
    54713, 55152, 55582, 56004, 56417, 56822, 57219, 57606, 57986, 58356, 58718, 59070, 59414,
    59749, 60075, 60392, 60700, 60998, 61288, 61568, 61839, 62100, 62353, 62596, 62829, 63053,
    63268, 63473, 63668, 63854, 64030, 64197, 64353, 64501, 64638, 64766, 64884, 64992, 65091,
    65179, 65258, 65327, 65386, 65436, 65475, 65505, 65524, 65534,
];

/// `tan((i + 0.5) · 2π / 512)` in 16.16, `i` in `0..128`.
pub const TAN_TABLE: [i32; 128] = [
    402, 1206, 2011, 2816, 3622, 4430, 5238, 6048, 6861, 7675, 8491, 9310, 10132, 10957, 11786,
    12618, 13454, 14294, 15139, 15989, 16843, 17704, 18569, 19441, 20320, 21205, 22097, 22996,
    23903, 24819, 25743, 26675, 27618, 28570, 29532, 30505, 31489, 32485, 33493, 34514, 35548,
    36596, 37658, 38736, 39829, 40939, 42065, 43210, 44373, 45556, 46759, 47984, 49230, 50500,
    51794, 53114, 54460, 55834, 57236, 58669, 60134, 61633, 63166, 64736, 66345, 67994, 69685,
    71422, 73205, 75038, 76923, 78864, 80862, 82922, 85047, 87241, 89507, 91851, 94277, 96790,
    99396, 102101, 104911, 107834, 110877, 114049, 117360, 120820, 124439, 128232, 132211, 136392,
    140792, 145431, 150329, 155512, 161005, 166839, 173050, 179677, 186765, 194367, 202544,
    211365, 220913, 231286, 242597, 254986, 268616, 283691, 300457, 319222, 340373, 364404,
    391956, 423871, 461291, 505787, 559593, 625996, 710035, 819849, 969498, 1185538, 1524876,
    2135471, 3559833, 10680573,
];

/// Number of projected heights the scalar table distinguishes.
pub const SCALAR_STEPS: usize = 256;

/// `SCALAR_TABLE[i] = 64 / (512 - 2i)` in 16.16.
///
/// Read two ways: as the texel step for a slice `512 - 2i` pixels tall, and,
/// shifted left by 6, as the perpendicular distance at which a 64-unit wall
/// projects to that height.
pub const SCALAR_TABLE: [Fixed; SCALAR_STEPS] = build_scalar_table();

const fn build_scalar_table() -> [Fixed; SCALAR_STEPS] {
    let mut out = [Fixed::ZERO; SCALAR_STEPS];
    let mut i = 0;
    while i < SCALAR_STEPS {
        out[i] = Fixed((64 << FRAC_BITS) / (512 - 2 * i as i32));
        i += 1;
    }
    out
}

/// Number of floor row-bands below the horizon (one per logical row).
pub const PLANE_BANDS: usize = 32;

/// Straight-ahead distance of the floor seen through row-band `b`
/// (`b` rows below the horizon, sampled at the row centre).
pub const PLANE_DISTANCE: [Fixed; PLANE_BANDS] = build_plane_distance();

const fn build_plane_distance() -> [Fixed; PLANE_BANDS] {
    let mut out = [Fixed::ZERO; PLANE_BANDS];
    let mut b = 0;
    while b < PLANE_BANDS {
        out[b] = Fixed((1 << 28) / (2 * b as i32 + 1));
        b += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_table_endpoints() {
        assert_eq!(SCALAR_TABLE[0], Fixed(8192));
        assert_eq!(SCALAR_TABLE[1], Fixed(8224));
        assert_eq!(SCALAR_TABLE[128], Fixed(16384));
        assert_eq!(SCALAR_TABLE[255], Fixed(2_097_152));
        assert!(SCALAR_TABLE.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn plane_distance_samples() {
        assert_eq!(PLANE_DISTANCE[0], Fixed(268_435_456));
        assert_eq!(PLANE_DISTANCE[1], Fixed(89_478_485));
        assert_eq!(PLANE_DISTANCE[31], Fixed(4_260_880));
    }

    #[test]
    fn trig_tables_are_increasing() {
        assert!(SIN_TABLE.windows(2).all(|w| w[0] < w[1]));
        assert!(TAN_TABLE.windows(2).all(|w| w[0] < w[1]));
    }
}
