use crate::{
    math::Fixed,
    renderer::framebuffer::{BLACK, FrameBuffer, VIEW_ROWS},
    world::{TEX_MASK, Texture},
};

use super::projection::texture_step;

/// First logical row of a centred slice `height` rows tall (negative when
/// the slice overflows the view).
#[inline]
pub fn slice_start(height: i32) -> i32 {
    (VIEW_ROWS as i32 - height) >> 1
}

/// Scale texture column `tex_col` of `texture` to `height` rows and draw it
/// centred in screen column `x`.
pub fn draw_wall_slice(
    fb: &mut FrameBuffer,
    texture: &Texture,
    tex_col: i32,
    x: usize,
    start: i32,
    height: i32,
) {
    let step = texture_step(height);
    let column = texture.column(tex_col);

    // taller than the view: skip the clipped-off top texels
    let (first_row, rows, mut v) = if start < 0 {
        (0, VIEW_ROWS as i32, step.scale(-start))
    } else {
        (start, height.min(VIEW_ROWS as i32 - start), Fixed::ZERO)
    };

    for row in first_row..first_row + rows {
        fb.plot(x, row as usize, column[(v.to_int() & TEX_MASK) as usize]);
        v = v.wrapping_add(step);
    }
}

/// Paint the ceiling and floor of column `x` around a slice with palette
/// index 0.
pub fn blank_planes(fb: &mut FrameBuffer, x: usize, start: i32, height: i32) {
    let end = (start + height).max(0) as usize;
    for row in 0..start.max(0) as usize {
        fb.plot(x, row, BLACK);
    }
    for row in end.min(VIEW_ROWS)..VIEW_ROWS {
        fb.plot(x, row, BLACK);
    }
}
