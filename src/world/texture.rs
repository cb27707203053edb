// Format-agnostic repository of 64×64 palette-indexed images.
// The renderer reaches them through `TextureAtlas` roles only.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use log::warn;
use thiserror::Error;

use super::grid::{EnemyKind, HealthKind};
use super::scene::Scene;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Edge of every texture, in texels.
pub const TEX_SIZE: usize = 64;
pub const TEX_MASK: i32 = TEX_SIZE as i32 - 1;

/// One palette index per texel.
///
/// Wall, door and sprite images are stored column-major
/// (`column * 64 + row`); floor, ceiling and HUD graphics row-major.
/// The bank does not care which.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u8>,
}

/// Convenience checkerboard 64×64 (8-texel squares, dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT_IDX: u8 = 8;
        const DARK_IDX: u8 = 16;
        let mut pix = vec![0u8; TEX_SIZE * TEX_SIZE];
        for y in 0..TEX_SIZE {
            for x in 0..TEX_SIZE {
                pix[y * TEX_SIZE + x] = if ((x >> 3) ^ (y >> 3)) & 1 == 0 {
                    LIGHT_IDX
                } else {
                    DARK_IDX
                };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            w: TEX_SIZE,
            h: TEX_SIZE,
            pixels: pix,
        }
    }
}

impl Texture {
    /// Wrap `pixels` as a 64×64 texture.
    pub fn new<S: Into<String>>(name: S, pixels: Vec<u8>) -> Result<Self, TextureError> {
        let tex = Texture {
            name: name.into(),
            w: TEX_SIZE,
            h: TEX_SIZE,
            pixels,
        };
        tex.check_size()?;
        Ok(tex)
    }

    fn check_size(&self) -> Result<(), TextureError> {
        if self.w != TEX_SIZE || self.h != TEX_SIZE || self.pixels.len() != self.w * self.h {
            return Err(TextureError::BadSize {
                name: self.name.clone(),
                w: self.w,
                h: self.h,
                len: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Texel at flat `index`, wrapped into the image.
    #[inline]
    pub fn texel(&self, index: usize) -> u8 {
        self.pixels[index & (TEX_SIZE * TEX_SIZE - 1)]
    }

    /// One stored column of a column-major image.
    #[inline]
    pub fn column(&self, col: i32) -> &[u8] {
        let start = (col & TEX_MASK) as usize * TEX_SIZE;
        &self.pixels[start..start + TEX_SIZE]
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    #[error("texture `{name}` is {w}×{h} with {len} texels, expected 64×64")]
    BadSize {
        name: String,
        w: usize,
        h: usize,
        len: usize,
    },
}

/// Palette index → `0x00RRGGBB`. Only the presentation layer needs this.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette(pub [u32; 256]);

impl Default for Palette {
    fn default() -> Self {
        Palette([0u32; 256])
    }
}

impl Palette {
    #[inline]
    pub fn rgb(&self, idx: u8) -> u32 {
        self.0[idx as usize]
    }
}

impl Index<usize> for Palette {
    type Output = u32;
    fn index(&self, idx: usize) -> &u32 {
        &self.0[idx]
    }
}

impl IndexMut<usize> for Palette {
    fn index_mut(&mut self, idx: usize) -> &mut u32 {
        &mut self.0[idx]
    }
}

/// A palette-agnostic, format-agnostic cache of textures.
///
/// * Does **not** know where pixels come from; that's the loader's job.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::new(Texture::default())
    }
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    }

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Fallback-safe borrow: bad ids resolve to the checkerboard.
    #[inline]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data
            .get(id as usize)
            .unwrap_or(&self.data[NO_TEXTURE as usize])
    }

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`) or the image is not
    ///   64×64 (`BadSize`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        tex.check_size()?;
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/// What a texture is used for. Each role is looked up by its bank name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    WallHorizontal,
    WallVertical,
    DoorHorizontal,
    DoorVertical,
    Floor,
    Ceiling,
    Enemy0A,
    Enemy0B,
    Enemy1A,
    Enemy1B,
    Health0,
    Health1,
    Hand,
    Title,
    Dead,
    Won,
    Credits,
}

impl Role {
    pub const COUNT: usize = 17;

    /// Every role, in discriminant order.
    pub const ALL: [Role; Role::COUNT] = [
        Role::WallHorizontal,
        Role::WallVertical,
        Role::DoorHorizontal,
        Role::DoorVertical,
        Role::Floor,
        Role::Ceiling,
        Role::Enemy0A,
        Role::Enemy0B,
        Role::Enemy1A,
        Role::Enemy1B,
        Role::Health0,
        Role::Health1,
        Role::Hand,
        Role::Title,
        Role::Dead,
        Role::Won,
        Role::Credits,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Role::WallHorizontal => "WALL_H",
            Role::WallVertical => "WALL_V",
            Role::DoorHorizontal => "DOOR_H",
            Role::DoorVertical => "DOOR_V",
            Role::Floor => "FLOOR",
            Role::Ceiling => "CEILING",
            Role::Enemy0A => "ENEMY0A",
            Role::Enemy0B => "ENEMY0B",
            Role::Enemy1A => "ENEMY1A",
            Role::Enemy1B => "ENEMY1B",
            Role::Health0 => "HEALTH0",
            Role::Health1 => "HEALTH1",
            Role::Hand => "HAND",
            Role::Title => "TITLE",
            Role::Dead => "DEAD",
            Role::Won => "WON",
            Role::Credits => "CREDITS",
        }
    }

    /// Full-screen graphics may be absent; everything the 3-D view draws
    /// may not.
    pub const fn is_screen(self) -> bool {
        matches!(self, Role::Title | Role::Dead | Role::Won | Role::Credits)
    }

    /// Sprite of `kind` on animation frame `frame` (only the low bit counts).
    pub const fn enemy(kind: EnemyKind, frame: u32) -> Role {
        match (kind, frame & 1) {
            (EnemyKind::Primary, 0) => Role::Enemy0A,
            (EnemyKind::Primary, _) => Role::Enemy0B,
            (EnemyKind::Secondary, 0) => Role::Enemy1A,
            (EnemyKind::Secondary, _) => Role::Enemy1B,
        }
    }

    pub const fn health(kind: HealthKind) -> Role {
        match kind {
            HealthKind::Small => Role::Health0,
            HealthKind::Large => Role::Health1,
        }
    }

    /// Full-screen graphic shown by `scene`, if it is not the 3-D view.
    pub const fn screen(scene: Scene) -> Option<Role> {
        match scene {
            Scene::Title => Some(Role::Title),
            Scene::Dead => Some(Role::Dead),
            Scene::Won => Some(Role::Won),
            Scene::Credits => Some(Role::Credits),
            Scene::Playing | Scene::Dying => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtlasError {
    #[error("texture bank has no `{0}` texture")]
    MissingRole(&'static str),
}

/// A bank with every [`Role`] resolved to an id up front, so the render
/// path never does a name lookup or handles a missing texture.
pub struct TextureAtlas {
    bank: TextureBank,
    ids: [TextureId; Role::COUNT],
}

impl TextureAtlas {
    /// Resolve every role. Missing screen graphics fall back to the
    /// checkerboard with a warning; any other missing role is an error.
    pub fn from_bank(bank: TextureBank) -> Result<Self, AtlasError> {
        let mut ids = [NO_TEXTURE; Role::COUNT];
        for role in Role::ALL {
            ids[role as usize] = match bank.id(role.name()) {
                Some(id) => id,
                None if role.is_screen() => {
                    warn!("no `{}` texture, using the checkerboard", role.name());
                    NO_TEXTURE
                }
                None => return Err(AtlasError::MissingRole(role.name())),
            };
        }
        Ok(Self { bank, ids })
    }

    #[inline]
    pub fn get(&self, role: Role) -> &Texture {
        self.bank.texture_or_missing(self.ids[role as usize])
    }

    pub fn bank(&self) -> &TextureBank {
        &self.bank
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn flat_tex(color: u8) -> Texture {
        Texture::new("Flat", vec![color; TEX_SIZE * TEX_SIZE]).unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default();
        let red = bank.insert("RED", flat_tex(0x00)).unwrap();
        let blue = bank.insert("BLUE", flat_tex(0xFF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("BLUE"), Some(blue));
        assert_eq!(bank.id("NOPE"), None);

        assert_eq!(bank.texture(red).unwrap().pixels[0], 0x00);
        assert_eq!(bank.texture(blue).unwrap().pixels[0], 0xFF);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default();
        bank.insert("WOOD", flat_tex(1)).unwrap();
        let err = bank.insert("WOOD", flat_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        // texture count still 2 (checker + first WOOD)
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_and_size_guards() {
        let bank = TextureBank::default();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.texture_or_missing(bad).name, "CHECKER");

        let err = Texture::new("TINY", vec![0; 16]).unwrap_err();
        assert!(matches!(err, TextureError::BadSize { len: 16, .. }));
    }

    #[test]
    fn column_slices_are_column_major() {
        let pixels = (0..TEX_SIZE * TEX_SIZE).map(|i| (i / TEX_SIZE) as u8).collect();
        let tex = Texture::new("COLS", pixels).unwrap();
        assert!(tex.column(5).iter().all(|&p| p == 5));
        assert_eq!(tex.column(64 + 5), tex.column(5));
    }

    fn full_bank(skip: &[Role]) -> TextureBank {
        let mut bank = TextureBank::default();
        for (i, role) in Role::ALL.iter().enumerate() {
            if !skip.contains(role) {
                bank.insert(role.name(), flat_tex(i as u8)).unwrap();
            }
        }
        bank
    }

    #[test]
    fn atlas_resolves_roles() {
        let atlas = TextureAtlas::from_bank(full_bank(&[Role::Credits])).unwrap();
        assert_eq!(atlas.get(Role::Floor).pixels[0], Role::Floor as u8);
        assert_eq!(
            atlas.get(Role::enemy(EnemyKind::Secondary, 3)).pixels[0],
            Role::Enemy1B as u8
        );
        // missing screen falls back
        assert_eq!(atlas.get(Role::Credits).name, "CHECKER");
    }

    #[test]
    fn atlas_requires_view_textures() {
        let err = TextureAtlas::from_bank(full_bank(&[Role::DoorVertical])).err();
        assert_eq!(err, Some(AtlasError::MissingRole("DOOR_V")));
    }
}
