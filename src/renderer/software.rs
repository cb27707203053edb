//! ---------------------------------------------------------------------------
//! Classic software (CPU) column renderer
//!
//! * Paints palette indices into a [`FrameBuffer`](super::FrameBuffer), one
//!   screen column per ray.
//! * Walls fill a per-column Z-buffer that floor/ceiling spans ignore and
//!   sprites test against, so entities need no sorting.
//! * Integer arithmetic only: 16.16 [`Fixed`](crate::math::Fixed) and table
//!   lookups.
//! ---------------------------------------------------------------------------

pub mod hud;
pub mod planes;
pub mod projection;
pub mod renderer;
pub mod requests;
pub mod slice;
pub mod sprites;
pub mod walls;

pub use planes::Visplanes;
pub use projection::{find_height, texture_step};
pub use renderer::{FrameStats, Software};
pub use requests::RenderRequests;
pub use slice::draw_wall_slice;
pub use sprites::{VisSprite, draw_sprite, project_sprite};
pub use walls::{
    ColumnCast, NO_HIT, Sighting, SightingKind, Sightings, WallCaster, WallFace, WallHit,
    column_angle,
};
