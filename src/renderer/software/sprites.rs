use glam::IVec2;

use crate::{
    math::Fixed,
    renderer::framebuffer::{COLOR_KEY, FrameBuffer, RED, VIEW_ROWS, VIEW_WIDTH},
    world::{Camera, TEX_MASK, Texture, cell_center},
};

use super::projection::{find_height, texture_step};
use super::slice::slice_start;

/// Screen column of the view axis.
const CENTER_X: i32 = VIEW_WIDTH as i32 / 2;

/// A billboard placed on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisSprite {
    /// Left edge column; may be negative.
    pub x: i32,
    /// Top logical row; negative when taller than the view.
    pub y: i32,
    /// Square edge in logical rows / columns.
    pub size: i32,
    /// Perpendicular distance, compared against the Z-buffer.
    pub distance: Fixed,
    /// Draw every opaque texel in the damage colour.
    pub damaged: bool,
}

/// Place the billboard standing in the middle of `cell`.
///
/// `None` when it is behind the eye or entirely off either screen edge.
pub fn project_sprite(camera: &Camera, cell: IVec2, damaged: bool) -> Option<VisSprite> {
    let (px, py) = cell_center(cell);
    let rel = camera.to_cam(px, py);
    if rel.depth <= Fixed::ZERO {
        return None;
    }

    let size = find_height(rel.depth);
    let offset = (rel.lateral * Fixed::from_int(size)).raw() >> 6;
    let x = CENTER_X + (offset >> 16) - (size >> 1);
    if x + size <= 0 || x >= VIEW_WIDTH as i32 {
        return None;
    }

    Some(VisSprite {
        x,
        y: slice_start(size),
        size,
        distance: rel.depth,
        damaged,
    })
}

/// Blit `sprite` with `texture` (column-major), clipped to the view and
/// hidden wherever the Z-buffer holds something nearer.
pub fn draw_sprite(
    fb: &mut FrameBuffer,
    zbuffer: &[Fixed],
    sprite: &VisSprite,
    texture: &Texture,
) {
    let step = texture_step(sprite.size);

    let (x0, mut u) = if sprite.x < 0 {
        (0, step.scale(-sprite.x))
    } else {
        (sprite.x, Fixed::ZERO)
    };
    let x1 = (sprite.x + sprite.size).min(VIEW_WIDTH as i32);

    let (row0, rows, v0) = if sprite.y < 0 {
        (0, VIEW_ROWS as i32, step.scale(-sprite.y))
    } else {
        (sprite.y, sprite.size.min(VIEW_ROWS as i32 - sprite.y), Fixed::ZERO)
    };

    for x in x0..x1 {
        let column = texture.column(u.to_int());
        u = u.wrapping_add(step);

        if sprite.distance >= zbuffer[x as usize] {
            continue;
        }

        let mut v = v0;
        for row in row0..row0 + rows {
            let color = column[(v.to_int() & TEX_MASK) as usize];
            v = v.wrapping_add(step);
            if color == COLOR_KEY {
                continue;
            }
            let color = if sprite.damaged { RED } else { color };
            fb.plot(x as usize, row as usize, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Angle;
    use crate::world::TEX_SIZE;

    /// Opaque 0x40 with a colour-keyed top-left quadrant.
    fn keyed() -> Texture {
        let pixels = (0..TEX_SIZE * TEX_SIZE)
            .map(|i| {
                let (col, row) = (i / TEX_SIZE, i % TEX_SIZE);
                if col < 32 && row < 32 { COLOR_KEY } else { 0x40 }
            })
            .collect();
        Texture::new("KEYED", pixels).unwrap()
    }

    fn looking_east() -> Camera {
        Camera::at_cell(IVec2::new(1, 1), Angle::ZERO)
    }

    #[test]
    fn centred_sprite_two_cells_ahead() {
        let s = project_sprite(&looking_east(), IVec2::new(3, 1), false).unwrap();
        // cos(0) is a hair under one, so the depth lands just short of 128
        assert!((32..=34).contains(&s.size), "size = {}", s.size);
        assert_eq!(s.y, slice_start(s.size));
        // sin(0) is not quite zero either; the drift stays under a column
        assert_eq!(s.x, 60 - s.size / 2);
    }

    #[test]
    fn behind_or_off_screen_is_discarded() {
        let cam = looking_east();
        assert_eq!(project_sprite(&cam, IVec2::new(0, 1), false), None);
        assert_eq!(project_sprite(&cam, IVec2::new(1, 1), false), None);
        // far off to the right, close by
        assert_eq!(project_sprite(&cam, IVec2::new(2, 9), false), None);
    }

    #[test]
    fn occluded_columns_are_skipped() {
        let sprite = VisSprite {
            x: 10,
            y: 0,
            size: 64,
            distance: Fixed::from_int(64),
            damaged: false,
        };
        let mut z = [Fixed::MAX; VIEW_WIDTH];
        // a wall exactly as near as the sprite hides it too
        z[50..74].fill(Fixed::from_int(64));
        let mut fb = FrameBuffer::new();
        draw_sprite(&mut fb, &z, &sprite, &keyed());

        for x in 10..74 {
            let drawn = fb.get(x, 40) == 0x40;
            assert_eq!(drawn, x < 50, "column {x}");
        }
        // keyed texels never land
        assert_eq!(fb.get(20, 5), 0);
        assert_eq!(fb.get(45, 5), 0x40);
    }

    #[test]
    fn damage_flash_and_edge_clipping() {
        let sprite = VisSprite {
            x: -16,
            y: -16,
            size: 96,
            distance: Fixed::from_int(40),
            damaged: true,
        };
        let z = [Fixed::MAX; VIEW_WIDTH];
        let mut fb = FrameBuffer::new();
        draw_sprite(&mut fb, &z, &sprite, &keyed());
        // bottom-right texels are opaque: drawn red
        assert_eq!(fb.get(70, 63), RED);
        // past the right edge of the sprite
        assert_eq!(fb.get(80, 63), 0);
        // top-left texels are keyed even after clipping
        assert_eq!(fb.get(0, 0), 0);
    }
}
