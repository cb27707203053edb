//! Fixed-point first-person raycaster for a 64×64 tile grid.
//!
//! * [`math`] – 16.16 fixed-point scalars, the 512-step angle circle and the
//!   quarter-wave trig tables.
//! * [`world`] – read-only snapshots the renderer consumes every frame:
//!   camera pose, grid map, door and enemy registries, textures.
//! * [`renderer`] – the column caster, wall slices, visplane floors,
//!   sprites and HUD, sequenced by [`renderer::Software`].

pub mod math;
pub mod renderer;
pub mod world;
