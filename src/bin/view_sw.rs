//! Interactive viewer for the software raycaster.
//!
//! Builds a demo level and procedural textures, runs just enough game
//! logic to walk around (doors, pickups, a shootable enemy, dying) and
//! presents the palette-indexed page in a `minifb` window.
//!
//! Controls  W/S or ↑/↓ move · A/D strafe · ←/→ turn · Space open door ·
//! Ctrl fire · Tab toggle solid planes · Enter confirm · Esc quit
//!
//! ```bash
//! cargo run --release --bin view_sw -- --scale 4
//! ```

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use glam::IVec2;
use log::{debug, info};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use once_cell::sync::Lazy;

use gridcast::{
    math::{Angle, Fixed},
    renderer::{
        COLOR_KEY, FB_ROWS, FrameBuffer, FrameInput, FramePages, HudState, RenderFlags, RendererExt,
        VIEW_ROWS, VIEW_WIDTH,
        software::{SightingKind, Software, WallCaster, column_angle},
    },
    world::{
        Camera, Cell, DoorTable, EnemyStatus, EnemyTable, GridMap, HealthKind, Palette, Role,
        Scene, TEX_SIZE, Texture, TextureAtlas, TextureBank, TextureError, cell_center,
    },
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Integer window scale (the page is shown 240 × 128 before scaling)
    #[arg(long, default_value_t = 4)]
    scale: usize,

    /// Paint floor and ceiling flat black instead of texturing them
    #[arg(long)]
    solid_planes: bool,

    /// Initial heading in angle steps (512 per turn, 128 = north)
    #[arg(long, default_value_t = 128)]
    angle: u32,

    /// Target frame rate; one game tic per frame
    #[arg(long, default_value_t = 30)]
    fps: usize,
}

// ─── demo level ─────────────────────────────────────────────────────────────
const DEMO_MAP: &[&str] = &[
    "################",
    "#......#.......#",
    "#..e...D...E...#",
    "#......#.......#",
    "###D####...h...#",
    "#......#.......#",
    "#..h...####D####",
    "#......#.......#",
    "#...E..D...e..>#",
    "#......#.......#",
    "################",
];
const START_CELL: IVec2 = IVec2::new(2, 9);

const MOVE_SPEED: Fixed = Fixed::from_int(3);
const TURN_SPEED: i32 = 4;
/// How far ahead of the eye Space looks for a door.
const USE_RANGE: Fixed = Fixed::from_int(48);

const START_HEALTH: u8 = 100;
const ENEMY_HITS: u8 = 3;
const DAMAGE_FLASH_TICS: u32 = 4;
const ENEMY_ATTACK_TICS: u32 = 30;
const ENEMY_DAMAGE: u8 = 7;
const ANIM_TICS: u32 = 12;

// ─── palette ────────────────────────────────────────────────────────────────
/// 16 hues × 16 shades, with index 0 black and 0x2A a strong red.
static PALETTE: Lazy<Palette> = Lazy::new(|| {
    const HUES: [u32; 16] = [
        0x808080, 0xA05030, 0xC03020, 0x906040, 0x607090, 0x507050, 0x707060, 0x405080,
        0xB09040, 0x60A0A0, 0xA060A0, 0x40A040, 0xD0D060, 0x804020, 0x3060C0, 0xE0E0E0,
    ];
    let mut pal = Palette::default();
    for i in 0..256 {
        let hue = HUES[i >> 4];
        let level = (i & 15) as u32 + 1;
        let ch = |shift: u32| (((hue >> shift) & 0xFF) * level / 16) << shift;
        pal[i] = ch(16) | ch(8) | ch(0);
    }
    pal[0] = 0x000000;
    pal[0x2A] = 0xC01010;
    pal
});

const fn shade(hue: u8, level: u8) -> u8 {
    (hue << 4) | (level & 15)
}

// ─── procedural textures ────────────────────────────────────────────────────
fn column_major(name: &str, f: impl Fn(usize, usize) -> u8) -> Result<Texture, TextureError> {
    let mut pixels = vec![0; TEX_SIZE * TEX_SIZE];
    for col in 0..TEX_SIZE {
        for row in 0..TEX_SIZE {
            pixels[col * TEX_SIZE + row] = f(col, row);
        }
    }
    Texture::new(name, pixels)
}

fn row_major(name: &str, f: impl Fn(usize, usize) -> u8) -> Result<Texture, TextureError> {
    let mut pixels = vec![0; TEX_SIZE * TEX_SIZE];
    for row in 0..TEX_SIZE {
        for col in 0..TEX_SIZE {
            pixels[row * TEX_SIZE + col] = f(col, row);
        }
    }
    Texture::new(name, pixels)
}

fn bricks(hue: u8, bright: u8) -> impl Fn(usize, usize) -> u8 {
    move |col, row| {
        let offset = if (row / 16) % 2 == 0 { 0 } else { 16 };
        if row % 16 == 0 || (col + offset) % 32 == 0 {
            shade(0, 4)
        } else {
            shade(hue, bright - ((col ^ row) & 1) as u8)
        }
    }
}

fn checker(hue: u8, light: u8, dark: u8) -> impl Fn(usize, usize) -> u8 {
    move |col, row| {
        if (col / 8 + row / 8) % 2 == 0 {
            shade(hue, light)
        } else {
            shade(hue, dark)
        }
    }
}

fn tiles(col: usize, row: usize) -> u8 {
    if col % 16 == 0 || row % 16 == 0 {
        shade(0, 3)
    } else {
        shade(7, 6)
    }
}

fn door(hue: u8) -> impl Fn(usize, usize) -> u8 {
    move |col, row| match (col, row) {
        (c, _) if c % 16 == 0 => shade(hue, 5),
        (50..=54, 30..=34) => shade(12, 14),
        _ => shade(hue, 10 + (row / 8 % 2) as u8),
    }
}

/// Round body with two eyes; `frame` shifts the eyes.
fn creature(hue: u8, frame: usize) -> impl Fn(usize, usize) -> u8 {
    move |col, row| {
        let (dx, dy) = (col as i32 - 32, row as i32 - 36);
        if dx * dx + dy * dy > 26 * 26 {
            return COLOR_KEY;
        }
        let eye_x = 22 + frame * 4;
        let eye = (eye_x..eye_x + 4).contains(&col) || (eye_x + 14..eye_x + 18).contains(&col);
        if eye && (24..28).contains(&row) {
            shade(15, 15)
        } else {
            shade(hue, 8 + (row / 10) as u8)
        }
    }
}

fn medkit(big: bool) -> impl Fn(usize, usize) -> u8 {
    let half = if big { 20 } else { 12 };
    move |col, row| {
        let (dx, dy) = ((col as i32 - 32).abs(), (row as i32 - 44).abs());
        if dx > half || dy > half {
            COLOR_KEY
        } else if dx < 4 || dy < 4 {
            0x2A
        } else {
            shade(15, 14)
        }
    }
}

/// Two 25×26 weapon frames side by side in the top-left of the sheet.
fn hand(col: usize, row: usize) -> u8 {
    let (frame, x) = (col / 25, col % 25);
    if frame > 1 || row >= 26 {
        return COLOR_KEY;
    }
    let barrel = (10..15).contains(&x) && row >= 6;
    let grip = (6..19).contains(&x) && row >= 16;
    let flash = frame == 1 && (7..18).contains(&x) && row < 6;
    if flash {
        shade(12, 15)
    } else if barrel || grip {
        shade(0, 6 + (x % 3) as u8)
    } else {
        COLOR_KEY
    }
}

fn demo_atlas() -> anyhow::Result<TextureAtlas> {
    let mut bank = TextureBank::default();
    let textures = [
        (Role::WallHorizontal, column_major("WALL_H", bricks(1, 12))?),
        (Role::WallVertical, column_major("WALL_V", bricks(1, 9))?),
        (Role::DoorHorizontal, column_major("DOOR_H", door(3))?),
        (Role::DoorVertical, column_major("DOOR_V", door(13))?),
        (Role::Floor, row_major("FLOOR", checker(6, 7, 5))?),
        (Role::Ceiling, row_major("CEILING", tiles)?),
        (Role::Enemy0A, column_major("ENEMY0A", creature(5, 0))?),
        (Role::Enemy0B, column_major("ENEMY0B", creature(5, 1))?),
        (Role::Enemy1A, column_major("ENEMY1A", creature(10, 0))?),
        (Role::Enemy1B, column_major("ENEMY1B", creature(10, 1))?),
        (Role::Health0, column_major("HEALTH0", medkit(false))?),
        (Role::Health1, column_major("HEALTH1", medkit(true))?),
        (Role::Hand, row_major("HAND", hand)?),
        (Role::Title, row_major("TITLE", checker(14, 12, 6))?),
        (Role::Dead, row_major("DEAD", checker(2, 12, 6))?),
        (Role::Won, row_major("WON", checker(11, 12, 6))?),
        (Role::Credits, row_major("CREDITS", checker(8, 12, 6))?),
    ];
    for (role, tex) in textures {
        bank.insert(role.name(), tex)
            .with_context(|| format!("registering {}", role.name()))?;
    }
    info!("{} textures generated", bank.len() - 1);
    Ok(TextureAtlas::from_bank(bank)?)
}

// ─── game logic ─────────────────────────────────────────────────────────────
/// Keys sampled once per tic.
#[derive(Default)]
struct Controls {
    forward: i32,
    strafe: i32,
    turn: i32,
    use_door: bool,
    fire: bool,
    fire_pressed: bool,
    confirm: bool,
    toggle_planes: bool,
}

impl Controls {
    fn sample(win: &Window) -> Self {
        let down = |keys: &[Key]| keys.iter().any(|&k| win.is_key_down(k));
        let axis = |pos: &[Key], neg: &[Key]| i32::from(down(pos)) - i32::from(down(neg));
        Self {
            forward: axis(&[Key::W, Key::Up], &[Key::S, Key::Down]),
            strafe: axis(&[Key::A], &[Key::D]),
            turn: axis(&[Key::Left], &[Key::Right]),
            use_door: win.is_key_pressed(Key::Space, KeyRepeat::No),
            fire: down(&[Key::LeftCtrl, Key::RightCtrl]),
            fire_pressed: win.is_key_pressed(Key::LeftCtrl, KeyRepeat::No)
                || win.is_key_pressed(Key::RightCtrl, KeyRepeat::No),
            confirm: win.is_key_pressed(Key::Enter, KeyRepeat::No),
            toggle_planes: win.is_key_pressed(Key::Tab, KeyRepeat::No),
        }
    }
}

struct Game {
    map: GridMap,
    doors: DoorTable,
    enemies: EnemyTable,
    enemy_hits: HashMap<IVec2, u8>,
    camera: Camera,
    start_angle: Angle,
    health: u8,
    scene: Scene,
    blood: [u8; VIEW_WIDTH],
    tic: u32,
    firing: bool,
}

impl Game {
    fn new(start_angle: Angle) -> anyhow::Result<Self> {
        let map = GridMap::from_ascii(DEMO_MAP).context("parsing the demo map")?;
        Ok(Self {
            map,
            doors: DoorTable::new(),
            enemies: EnemyTable::new(),
            enemy_hits: HashMap::new(),
            camera: Camera::at_cell(START_CELL, start_angle),
            start_angle,
            health: START_HEALTH,
            scene: Scene::Title,
            blood: [0; VIEW_WIDTH],
            tic: 0,
            firing: false,
        })
    }

    fn restart(&mut self) -> anyhow::Result<()> {
        let scene = self.scene;
        *self = Self::new(self.start_angle)?;
        self.scene = scene;
        Ok(())
    }

    fn set_scene(&mut self, scene: Scene) {
        if scene != self.scene {
            info!("scene {:?} -> {:?}", self.scene, scene);
            self.scene = scene;
        }
    }

    fn passable(&self, cell: IVec2) -> bool {
        match self.map.get(cell) {
            Some(Cell::Wall | Cell::Enemy(_)) | None => false,
            Some(Cell::Door) => self.doors.get(cell).is_some_and(|d| !d.blocks()),
            Some(_) => true,
        }
    }

    fn advance(&mut self, ctl: &Controls) -> anyhow::Result<()> {
        self.tic = self.tic.wrapping_add(1);

        if ctl.confirm {
            let next = self.scene.on_confirm();
            if self.scene == Scene::Dead || next == Scene::Title {
                self.restart()?;
            }
            self.set_scene(next);
        }

        match self.scene {
            Scene::Playing => self.play(ctl),
            Scene::Dying => {
                self.grow_blood();
                if self.blood.iter().all(|&h| usize::from(h) >= VIEW_ROWS) {
                    self.set_scene(self.scene.on_death_overlay_full());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn play(&mut self, ctl: &Controls) {
        self.camera.turn(ctl.turn * TURN_SPEED);

        let before = self.camera;
        self.camera
            .step(MOVE_SPEED.scale(ctl.forward), MOVE_SPEED.scale(ctl.strafe));
        if !self.passable(self.camera.cell()) {
            self.camera = before;
        }

        if ctl.use_door {
            let ahead = self.camera.x + USE_RANGE * self.camera.angle.cos();
            let ahead_y = self.camera.y - USE_RANGE * self.camera.angle.sin();
            let probe = Camera::new(ahead, ahead_y, self.camera.angle);
            if self.map.get(probe.cell()) == Some(Cell::Door) {
                debug!("door at {} triggered", probe.cell());
                self.doors.trigger(probe.cell());
            }
        }
        self.doors.tick_all(self.camera.cell());

        self.pick_up();
        self.fire(ctl);
        self.take_hits();

        if self.map.get(self.camera.cell()) == Some(Cell::Exit) {
            self.set_scene(Scene::Won);
        }
    }

    fn pick_up(&mut self) {
        let cell = self.camera.cell();
        if let Some(Cell::Health(kind)) = self.map.get(cell) {
            let amount = match kind {
                HealthKind::Small => 10,
                HealthKind::Large => 25,
            };
            self.health = self.health.saturating_add(amount).min(START_HEALTH);
            self.map.set(cell, Cell::Empty);
            debug!("picked up {kind:?} at {cell}, health {}", self.health);
        }
    }

    /// Hitscan along the centre column's ray.
    fn fire(&mut self, ctl: &Controls) {
        self.firing = ctl.fire;

        // clear damage flashes that have run out
        if self.tic % DAMAGE_FLASH_TICS == 0 {
            for cell in self.enemy_hits.keys() {
                self.enemies.set(EnemyStatus {
                    cell: *cell,
                    damaged: false,
                });
            }
        }

        if !ctl.fire_pressed {
            return;
        }
        let caster = WallCaster::new(&self.camera, &self.map, &self.doors);
        let cast = caster.cast(column_angle(&self.camera, VIEW_WIDTH / 2 - 1));
        let wall = cast.distance();
        let target = cast
            .sightings
            .iter()
            .filter(|s| matches!(s.kind, SightingKind::Enemy(_)))
            .map(|s| {
                let (x, y) = cell_center(s.cell);
                (self.camera.depth_of(x, y), s.cell)
            })
            .filter(|&(depth, _)| depth < wall)
            .min_by_key(|&(depth, _)| depth);
        let Some((_, cell)) = target else {
            return;
        };

        let hits = self.enemy_hits.entry(cell).or_insert(0);
        *hits += 1;
        if *hits >= ENEMY_HITS {
            debug!("enemy at {cell} down");
            self.enemy_hits.remove(&cell);
            self.enemies.remove(cell);
            self.map.set(cell, Cell::Corpse);
        } else {
            self.enemies.set(EnemyStatus {
                cell,
                damaged: true,
            });
        }
    }

    /// Enemies next to the player bite every so often.
    fn take_hits(&mut self) {
        if self.tic % ENEMY_ATTACK_TICS != 0 {
            return;
        }
        let me = self.camera.cell();
        let adjacent = (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| me + IVec2::new(dx, dy)))
            .filter(|&c| matches!(self.map.get(c), Some(Cell::Enemy(_))))
            .count() as u8;
        if adjacent == 0 {
            return;
        }
        self.health = self.health.saturating_sub(ENEMY_DAMAGE * adjacent);
        debug!("bitten, health {}", self.health);
        if self.health == 0 {
            self.set_scene(Scene::Dying);
        }
    }

    /// Blood runs down each column at its own pace.
    fn grow_blood(&mut self) {
        for (x, h) in self.blood.iter_mut().enumerate() {
            let speed = 1 + ((x as u32 * 7 + self.tic) % 3) as u8;
            *h = h.saturating_add(speed).min(VIEW_ROWS as u8);
        }
    }
}

// ─── presentation ───────────────────────────────────────────────────────────
/// Expand palette indices to 0x00RRGGBB, doubling columns and scaling by
/// `scale`.
fn present(fb: &FrameBuffer, out: &mut [u32], scale: usize) {
    let out_w = VIEW_WIDTH * 2 * scale;
    for (y, row) in fb.pixels().chunks_exact(VIEW_WIDTH).enumerate() {
        for (x, &idx) in row.iter().enumerate() {
            let rgb = PALETTE.rgb(idx);
            for sy in 0..scale {
                let base = (y * scale + sy) * out_w + x * 2 * scale;
                out[base..base + 2 * scale].fill(rgb);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse();
    info!("starting viewer: {args:?}");

    let scale = args.scale.max(1);
    let (win_w, win_h) = (VIEW_WIDTH * 2 * scale, FB_ROWS * scale);

    let atlas = demo_atlas().context("building demo textures")?;
    let mut game = Game::new(Angle::new(args.angle))?;
    let mut flags = if args.solid_planes {
        RenderFlags::SOLID_PLANES
    } else {
        RenderFlags::empty()
    };

    let mut renderer = Software::default();
    let mut pages = FramePages::new();
    let mut out = vec![0u32; win_w * win_h];

    let mut win = Window::new("gridcast software render", win_w, win_h, WindowOptions::default())
        .context("opening window")?;
    win.set_target_fps(args.fps);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let ctl = Controls::sample(&win);
        if ctl.toggle_planes {
            flags.toggle(RenderFlags::SOLID_PLANES);
            info!("solid planes: {}", flags.contains(RenderFlags::SOLID_PLANES));
        }
        game.advance(&ctl)?;

        let t0 = Instant::now();
        let input = FrameInput {
            camera: game.camera,
            map: &game.map,
            doors: &game.doors,
            enemies: &game.enemies,
            scene: game.scene,
            hud: HudState {
                health: game.health,
                firing: game.firing,
                blood: &game.blood,
            },
            anim_frame: game.tic / ANIM_TICS,
            flags,
        };
        renderer.render_frame(&input, &atlas, &mut pages, |front| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            present(front, &mut out, scale);
        });
        win.update_with_buffer(&out, win_w, win_h)
            .context("presenting frame")?;

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!(
                "avg render: {:.3} ms  ({:.0} FPS headroom), {:?}",
                avg_ms,
                1000.0 / avg_ms,
                renderer.stats()
            );
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
