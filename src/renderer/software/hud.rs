//! Overlays drawn on top of the 3-D view, and the full-screen scenes.

use crate::{
    renderer::{
        HudState,
        framebuffer::{BLACK, COLOR_KEY, FrameBuffer, RED, VIEW_ROWS, VIEW_WIDTH},
    },
    world::{Role, Scene, TEX_SIZE, Texture, TextureAtlas},
};

/// Health (1..=100) → bar width in columns.
#[rustfmt::skip]
pub const HEALTH_BAR_TABLE: [u8; 100] = [
     0,  0,  1,  1,  2,  3,  3,  4,  5,  5,
     6,  7,  7,  8,  8,  9, 10, 10, 11, 12,
    12, 13, 14, 14, 15, 16, 16, 17, 17, 18,
    19, 19, 20, 21, 21, 22, 23, 23, 24, 24,
    25, 26, 26, 27, 28, 28, 29, 30, 30, 31,
    32, 32, 33, 33, 34, 35, 35, 36, 37, 37,
    38, 39, 39, 40, 40, 41, 42, 42, 43, 44,
    44, 45, 46, 46, 47, 48, 48, 49, 49, 50,
    51, 51, 52, 53, 53, 54, 55, 55, 56, 56,
    57, 58, 58, 59, 60, 60, 61, 62, 62, 63,
];

/// Weapon sprite: a 25×26 cell of the `HAND` sheet, idle frame at x 0 and
/// firing frame at x 25.
const WEAPON_W: usize = 25;
const WEAPON_H: usize = 26;
const WEAPON_X: usize = 95;
const WEAPON_ROW: usize = 38;

const HEALTH_BAR_X: usize = 28;
const HEALTH_BAR_ROW: usize = 60;
const HEALTH_BAR_ROWS: usize = 2;

/// Full-screen graphics are 64 wide, centred between two side bars.
const SCREEN_X: usize = (VIEW_WIDTH - TEX_SIZE) / 2;
const SIDE_BAR_W: usize = SCREEN_X;

/// Solid rectangle in logical rows, clipped to the view.
pub fn draw_rect(fb: &mut FrameBuffer, x: usize, row: usize, w: usize, rows: usize, color: u8) {
    for r in row..(row + rows).min(VIEW_ROWS) {
        for c in x..(x + w).min(VIEW_WIDTH) {
            fb.plot(c, r, color);
        }
    }
}

/// Copy a `w × h` region of a row-major graphic, starting at
/// `(src_x, src_row)`, to `(x, row)`. Colour-keyed texels are skipped.
#[allow(clippy::too_many_arguments)]
pub fn draw_graphic(
    fb: &mut FrameBuffer,
    graphic: &Texture,
    src_x: usize,
    src_row: usize,
    x: usize,
    row: usize,
    w: usize,
    h: usize,
) {
    for dy in 0..h.min(VIEW_ROWS.saturating_sub(row)) {
        for dx in 0..w.min(VIEW_WIDTH.saturating_sub(x)) {
            let color = graphic.texel((src_row + dy) * TEX_SIZE + src_x + dx);
            if color != COLOR_KEY {
                fb.plot(x + dx, row + dy, color);
            }
        }
    }
}

/// Weapon, health bar and, while dying, the blood curtain.
pub fn draw_hud(fb: &mut FrameBuffer, hud: &HudState, scene: Scene, atlas: &TextureAtlas) {
    let src_x = if hud.firing { WEAPON_W } else { 0 };
    draw_graphic(
        fb,
        atlas.get(Role::Hand),
        src_x,
        0,
        WEAPON_X,
        WEAPON_ROW,
        WEAPON_W,
        WEAPON_H,
    );

    if hud.health > 0 {
        let index = usize::from(hud.health.min(100)) - 1;
        let width = usize::from(HEALTH_BAR_TABLE[index]);
        draw_rect(fb, HEALTH_BAR_X, HEALTH_BAR_ROW, width, HEALTH_BAR_ROWS, RED);
    }

    if scene == Scene::Dying {
        for (x, &height) in hud.blood.iter().take(VIEW_WIDTH).enumerate() {
            draw_rect(fb, x, 0, 1, usize::from(height), RED);
        }
    }
}

/// Title, death, victory and credits screens. Returns `false` for scenes
/// that show the 3-D view instead.
pub fn draw_screen(fb: &mut FrameBuffer, scene: Scene, atlas: &TextureAtlas) -> bool {
    let Some(role) = Role::screen(scene) else {
        return false;
    };
    let bars = if scene == Scene::Dead { RED } else { BLACK };
    draw_rect(fb, 0, 0, SIDE_BAR_W, VIEW_ROWS, bars);
    draw_graphic(fb, atlas.get(role), 0, 0, SCREEN_X, 0, TEX_SIZE, TEX_SIZE);
    draw_rect(fb, SCREEN_X + TEX_SIZE, 0, SIDE_BAR_W, VIEW_ROWS, bars);
    true
}
