use log::trace;

use crate::{
    math::Fixed,
    renderer::{
        FrameInput, RenderFlags, Renderer,
        framebuffer::{BLACK, FrameBuffer, VIEW_WIDTH},
    },
    world::{Role, TextureAtlas},
};

use super::{
    hud::{draw_hud, draw_screen},
    planes::Visplanes,
    projection::find_height,
    requests::RenderRequests,
    slice::{blank_planes, draw_wall_slice, slice_start},
    sprites::{draw_sprite, project_sprite},
    walls::{NO_HIT, WallCaster, WallFace, WallHit, column_angle},
};

/// Counters for the last frame, reported at `trace` level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub walls: u32,
    pub sightings: u32,
    pub plane_setups: u32,
    pub sprites: u32,
}

pub struct Software {
    zbuffer: [Fixed; VIEW_WIDTH],
    visplanes: Visplanes,
    requests: RenderRequests,
    stats: FrameStats,
}

impl Default for Software {
    fn default() -> Self {
        Self {
            zbuffer: [NO_HIT; VIEW_WIDTH],
            visplanes: Visplanes::default(),
            requests: RenderRequests::default(),
            stats: FrameStats::default(),
        }
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self) {
        self.zbuffer.fill(NO_HIT);
        self.visplanes.reset();
        self.requests.reset();
        self.stats = FrameStats::default();
    }

    fn draw_frame(&mut self, input: &FrameInput, atlas: &TextureAtlas, fb: &mut FrameBuffer) {
        if draw_screen(fb, input.scene, atlas) {
            return;
        }

        self.cast_walls(input, atlas, fb);

        if !input.flags.contains(RenderFlags::SOLID_PLANES) {
            self.visplanes.fill(
                fb,
                &input.camera,
                atlas.get(Role::Floor),
                atlas.get(Role::Ceiling),
            );
            self.stats.plane_setups = self.visplanes.setups();
        }

        if !input.flags.contains(RenderFlags::NO_SPRITES) {
            self.draw_sprites(input, atlas, fb);
        }

        if !input.flags.contains(RenderFlags::NO_HUD) {
            draw_hud(fb, &input.hud, input.scene, atlas);
        }

        trace!("frame: {:?}", self.stats);
    }
}

/*──────────────────────── frame stages ───────────────────────────────*/
impl Software {
    pub fn zbuffer(&self) -> &[Fixed; VIEW_WIDTH] {
        &self.zbuffer
    }

    pub fn render_requests(&self) -> &RenderRequests {
        &self.requests
    }

    pub fn visplanes(&self) -> &Visplanes {
        &self.visplanes
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// One ray per column: wall slice, Z-buffer entry, floor top, sightings.
    fn cast_walls(&mut self, input: &FrameInput, atlas: &TextureAtlas, fb: &mut FrameBuffer) {
        let camera = input.camera;
        let caster = WallCaster::new(&camera, input.map, input.doors);
        let solid_planes = input.flags.contains(RenderFlags::SOLID_PLANES);

        for x in 0..VIEW_WIDTH {
            let cast = caster.cast(column_angle(&camera, x));
            self.stats.sightings += cast.sightings.len() as u32;
            self.requests.extend(&cast.sightings);

            let distance = cast.distance();
            let height = find_height(distance);
            let start = slice_start(height);

            match cast.hit {
                Some(hit) => {
                    self.stats.walls += 1;
                    let texture = atlas.get(wall_role(&hit));
                    draw_wall_slice(fb, texture, hit.tex_col, x, start, height);
                }
                // ray left the map: a black sliver on the horizon
                None => {
                    for row in start..start + height {
                        fb.plot(x, row as usize, BLACK);
                    }
                }
            }

            if solid_planes {
                blank_planes(fb, x, start, height);
            } else {
                self.visplanes.mark(x, start + height);
            }

            self.zbuffer[x] = distance;
        }
    }

    /// Items first, then enemies, each in registry slot order.
    fn draw_sprites(&mut self, input: &FrameInput, atlas: &TextureAtlas, fb: &mut FrameBuffer) {
        let camera = &input.camera;
        let mut drawn = 0;

        for (cell, kind) in self.requests.items() {
            if let Some(sprite) = project_sprite(camera, cell, false) {
                draw_sprite(fb, &self.zbuffer, &sprite, atlas.get(Role::health(kind)));
                drawn += 1;
            }
        }

        for (cell, kind) in self.requests.enemies() {
            let damaged = input.enemies.is_damaged(cell);
            if let Some(sprite) = project_sprite(camera, cell, damaged) {
                let texture = atlas.get(Role::enemy(kind, input.anim_frame));
                draw_sprite(fb, &self.zbuffer, &sprite, texture);
                drawn += 1;
            }
        }

        self.stats.sprites = drawn;
    }
}

fn wall_role(hit: &WallHit) -> Role {
    match (hit.face, hit.door) {
        (WallFace::Horizontal, false) => Role::WallHorizontal,
        (WallFace::Vertical, false) => Role::WallVertical,
        (WallFace::Horizontal, true) => Role::DoorHorizontal,
        (WallFace::Vertical, true) => Role::DoorVertical,
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
