//! Enemy registry as the renderer sees it.
//!
//! Health, AI state and attack timers live in the game logic; the renderer
//! only needs to know whether an enemy is flashing from a hit.

use glam::IVec2;

use super::grid::{REGISTRY_SLOTS, registry_slot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyStatus {
    pub cell: IVec2,
    /// Draw with the flat damage colour this frame.
    pub damaged: bool,
}

#[derive(Clone, Debug)]
pub struct EnemyTable {
    slots: [Option<EnemyStatus>; REGISTRY_SLOTS],
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            slots: [None; REGISTRY_SLOTS],
        }
    }
}

impl EnemyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, status: EnemyStatus) {
        self.slots[registry_slot(status.cell)] = Some(status);
    }

    pub fn remove(&mut self, cell: IVec2) {
        let slot = &mut self.slots[registry_slot(cell)];
        if matches!(slot, Some(s) if s.cell == cell) {
            *slot = None;
        }
    }

    pub fn get(&self, cell: IVec2) -> Option<&EnemyStatus> {
        self.slots[registry_slot(cell)]
            .as_ref()
            .filter(|s| s.cell == cell)
    }

    #[inline]
    pub fn is_damaged(&self, cell: IVec2) -> bool {
        self.get(cell).is_some_and(|s| s.damaged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_flag_is_per_cell() {
        let mut table = EnemyTable::new();
        let cell = IVec2::new(5, 6);
        table.set(EnemyStatus {
            cell,
            damaged: true,
        });
        assert!(table.is_damaged(cell));
        // same slot, different cell
        assert!(!table.is_damaged(IVec2::new(13, 6)));
        table.remove(cell);
        assert!(!table.is_damaged(cell));
    }
}
