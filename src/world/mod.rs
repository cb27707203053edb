mod camera;
mod door;
mod entity;
mod grid;
mod scene;
mod texture;

pub use camera::{CamSpace, Camera};

pub use door::{DOOR_SHUT, DOOR_SPEED, DOOR_WAIT_TICS, Door, DoorEvent, DoorState, DoorTable};

pub use entity::{EnemyStatus, EnemyTable};

pub use grid::{
    CELL_SHIFT, CELL_SIZE, Cell, EnemyKind, GridMap, HealthKind, MAP_HEIGHT, MAP_WIDTH, MapError,
    REGISTRY_SLOTS, cell_center, registry_slot,
};

pub use scene::Scene;

pub use texture::{
    AtlasError, NO_TEXTURE, Palette, Role, TEX_MASK, TEX_SIZE, Texture, TextureAtlas,
    TextureBank, TextureError, TextureId,
};
