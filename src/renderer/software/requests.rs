//! Entities the caster saw this frame.

use glam::IVec2;

use crate::world::{EnemyKind, HealthKind, REGISTRY_SLOTS, registry_slot};

use super::walls::{Sighting, SightingKind};

/// Slot-indexed list of visible items and enemies, rebuilt every frame.
///
/// Each registry slot keeps at most one request; a cell aliasing an
/// already-claimed slot replaces it.
#[derive(Clone, Debug)]
pub struct RenderRequests {
    items: [Option<(IVec2, HealthKind)>; REGISTRY_SLOTS],
    enemies: [Option<(IVec2, EnemyKind)>; REGISTRY_SLOTS],
}

impl Default for RenderRequests {
    fn default() -> Self {
        Self {
            items: [None; REGISTRY_SLOTS],
            enemies: [None; REGISTRY_SLOTS],
        }
    }
}

impl RenderRequests {
    pub fn reset(&mut self) {
        self.items.fill(None);
        self.enemies.fill(None);
    }

    pub fn extend(&mut self, sightings: &[Sighting]) {
        for s in sightings {
            let slot = registry_slot(s.cell);
            match s.kind {
                SightingKind::Health(kind) => self.items[slot] = Some((s.cell, kind)),
                SightingKind::Enemy(kind) => self.enemies[slot] = Some((s.cell, kind)),
            }
        }
    }

    /// Visible items in slot order.
    pub fn items(&self) -> impl Iterator<Item = (IVec2, HealthKind)> + '_ {
        self.items.iter().flatten().copied()
    }

    /// Visible enemies in slot order.
    pub fn enemies(&self) -> impl Iterator<Item = (IVec2, EnemyKind)> + '_ {
        self.enemies.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.items.iter().all(Option::is_none) && self.enemies.iter().all(Option::is_none)
    }
}
