//! Rendering abstraction layer.
//!
//! *Game logic never touches a frame page directly.* Once per frame it
//! snapshots the world into a [`FrameInput`] and hands it to a type that
//! implements [`Renderer`], which paints the back page of a
//! [`FramePages`] pair.
//!
//! * The software column renderer in [`software`] is the only back-end.
//! * A helper blanket-impl [`RendererExt`] adds `render_frame` so call-sites
//!   stay short.

use bitflags::bitflags;

use crate::world::{Camera, DoorTable, EnemyTable, GridMap, Scene, TextureAtlas};

pub mod framebuffer;
pub mod software;

pub use framebuffer::{
    BLACK, COLOR_KEY, FB_ROWS, FrameBuffer, FramePages, HORIZON, RED, ROW_SCALE, VIEW_ROWS,
    VIEW_WIDTH,
};

bitflags! {
    /// Per-frame switches.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct RenderFlags: u8 {
        /// Skip the floor/ceiling filler and paint both planes with index 0.
        const SOLID_PLANES = 0x01;
        const NO_SPRITES   = 0x02;
        const NO_HUD       = 0x04;
    }
}

/// Player-facing overlay state.
#[derive(Clone, Copy, Debug, Default)]
pub struct HudState<'a> {
    /// `0..=100`; the bar is hidden at 0.
    pub health: u8,
    /// Show the firing frame of the weapon.
    pub firing: bool,
    /// Per-column height of the death overlay, in logical rows.
    pub blood: &'a [u8],
}

/// Read-only world snapshot for one frame.
#[derive(Clone, Copy)]
pub struct FrameInput<'a> {
    pub camera: Camera,
    pub map: &'a GridMap,
    pub doors: &'a DoorTable,
    pub enemies: &'a EnemyTable,
    pub scene: Scene,
    pub hud: HudState<'a>,
    /// Global animation counter; enemies alternate frames on its low bit.
    pub anim_frame: u32,
    pub flags: RenderFlags,
}

/// A renderer that paints palette-indexed pages.
///
/// `end_frame` publishes the finished page and loans it to a
/// user-supplied closure.
pub trait Renderer {
    /// Clear per-frame scratch state.
    fn begin_frame(&mut self);

    /// Paint everything `input` shows into `target`.
    fn draw_frame(&mut self, input: &FrameInput, atlas: &TextureAtlas, target: &mut FrameBuffer);

    /// Flip `pages` and **loan** the new front page to `submit`.
    ///
    /// * `submit(&FrameBuffer)` is run exactly once per frame.
    /// * A windowed caller expands palette indices and presents there.
    fn end_frame<F>(&mut self, pages: &mut FramePages, submit: F)
    where
        F: FnOnce(&FrameBuffer),
    {
        pages.swap();
        submit(pages.front());
    }
}

/// Convenience blanket-impl with a one-liner `render_frame` adaptor.
pub trait RendererExt: Renderer {
    fn render_frame<F>(
        &mut self,
        input: &FrameInput,
        atlas: &TextureAtlas,
        pages: &mut FramePages,
        submit: F,
    ) where
        F: FnOnce(&FrameBuffer),
    {
        self.begin_frame();
        self.draw_frame(input, atlas, pages.back_mut());
        self.end_frame(pages, submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
