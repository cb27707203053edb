//! Sliding doors.
//!
//! A door cell blocks rays up to its leaf edge: the leaf slides sideways
//! inside the cell and `offset` is how much of the 64-unit opening it still
//! covers (64 = shut, 0 = fully open). Game logic drives [`Door::tick`]; the
//! renderer reads [`DoorTable::leaf_width`].

use glam::IVec2;

use crate::math::Fixed;

use super::grid::{CELL_SIZE, REGISTRY_SLOTS, registry_slot};

/// Leaf width of a shut door.
pub const DOOR_SHUT: Fixed = Fixed::from_int(CELL_SIZE);
/// Leaf travel per game tic (≈ 4.27 units).
pub const DOOR_SPEED: Fixed = Fixed(279_620);
/// Tics a door lingers before opening / closing.
pub const DOOR_WAIT_TICS: u32 = 30;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DoorState {
    #[default]
    ClosedWaiting,
    Opening,
    OpenWaiting,
    Closing,
}

/// What happened during one [`Door::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorEvent {
    Idle,
    StartedOpening,
    Opened,
    StartedClosing,
    /// Fully shut again; the owner may free the registry slot.
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Door {
    pub cell: IVec2,
    pub state: DoorState,
    pub offset: Fixed,
    pub tics: u32,
}

impl Door {
    /// A freshly triggered door: shut, counting down to open.
    pub fn new(cell: IVec2) -> Self {
        Self {
            cell,
            state: DoorState::ClosedWaiting,
            offset: DOOR_SHUT,
            tics: 0,
        }
    }

    /// Whether the door still stops the player.
    #[inline]
    pub fn blocks(&self) -> bool {
        matches!(self.state, DoorState::ClosedWaiting | DoorState::Opening)
    }

    /// Advance one game tic. A door never starts closing on the player.
    pub fn tick(&mut self, player_inside: bool) -> DoorEvent {
        match self.state {
            DoorState::ClosedWaiting => {
                self.tics += 1;
                if self.tics >= DOOR_WAIT_TICS {
                    self.state = DoorState::Opening;
                    self.tics = 0;
                    return DoorEvent::StartedOpening;
                }
                DoorEvent::Idle
            }
            DoorState::Opening => {
                self.offset -= DOOR_SPEED;
                if self.offset < Fixed::ZERO {
                    self.state = DoorState::OpenWaiting;
                    self.offset = Fixed::ZERO;
                    return DoorEvent::Opened;
                }
                DoorEvent::Idle
            }
            DoorState::OpenWaiting => {
                if !player_inside {
                    self.tics += 1;
                    if self.tics >= DOOR_WAIT_TICS {
                        self.state = DoorState::Closing;
                        self.tics = 0;
                        return DoorEvent::StartedClosing;
                    }
                }
                DoorEvent::Idle
            }
            DoorState::Closing => {
                self.offset += DOOR_SPEED;
                if self.offset > DOOR_SHUT {
                    *self = Door::new(self.cell);
                    return DoorEvent::Released;
                }
                DoorEvent::Idle
            }
        }
    }
}

/// Fixed-size registry of animating doors.
#[derive(Clone, Debug)]
pub struct DoorTable {
    slots: [Option<Door>; REGISTRY_SLOTS],
}

impl Default for DoorTable {
    fn default() -> Self {
        Self {
            slots: [None; REGISTRY_SLOTS],
        }
    }
}

impl DoorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Door animating in `cell`, if its slot currently belongs to it.
    pub fn get(&self, cell: IVec2) -> Option<&Door> {
        self.slots[registry_slot(cell)]
            .as_ref()
            .filter(|d| d.cell == cell)
    }

    /// Leaf width of the door in `cell` in whole units; shut if no animation
    /// is registered for it.
    #[inline]
    pub fn leaf_width(&self, cell: IVec2) -> i32 {
        self.get(cell).map_or(DOOR_SHUT, |d| d.offset).to_int()
    }

    /// Register `cell` as an animating door, taking over its slot if another
    /// cell held it. Returns the (possibly pre-existing) entry.
    pub fn trigger(&mut self, cell: IVec2) -> &mut Door {
        let slot = &mut self.slots[registry_slot(cell)];
        if !matches!(slot, Some(d) if d.cell == cell) {
            *slot = Some(Door::new(cell));
        }
        slot.get_or_insert_with(|| Door::new(cell))
    }

    /// Mutable access for scripted setups (and tests).
    pub fn insert(&mut self, door: Door) {
        self.slots[registry_slot(door.cell)] = Some(door);
    }

    /// Tick every registered door, freeing the slots of doors that shut.
    pub fn tick_all(&mut self, player_cell: IVec2) {
        for slot in self.slots.iter_mut() {
            let released = match slot {
                Some(door) => door.tick(door.cell == player_cell) == DoorEvent::Released,
                None => false,
            };
            if released {
                *slot = None;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Door> + '_ {
        self.slots.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until(door: &mut Door, want: DoorEvent, player_inside: bool) -> u32 {
        for n in 1..=1000 {
            if door.tick(player_inside) == want {
                return n;
            }
        }
        panic!("door never reached {want:?}");
    }

    #[test]
    fn full_cycle() {
        let mut door = Door::new(IVec2::new(2, 3));
        assert!(door.blocks());
        assert_eq!(run_until(&mut door, DoorEvent::StartedOpening, false), 30);
        assert_eq!(door.state, DoorState::Opening);

        // 64 units at ≈4.27/tic
        let n = run_until(&mut door, DoorEvent::Opened, false);
        assert_eq!(n, 16);
        assert_eq!(door.offset, Fixed::ZERO);
        assert!(!door.blocks());

        run_until(&mut door, DoorEvent::StartedClosing, false);
        run_until(&mut door, DoorEvent::Released, false);
        assert_eq!(door.state, DoorState::ClosedWaiting);
        assert_eq!(door.offset, DOOR_SHUT);
    }

    #[test]
    fn open_door_waits_for_player_to_leave() {
        let mut door = Door {
            cell: IVec2::ZERO,
            state: DoorState::OpenWaiting,
            offset: Fixed::ZERO,
            tics: 0,
        };
        for _ in 0..100 {
            assert_eq!(door.tick(true), DoorEvent::Idle);
        }
        assert_eq!(door.state, DoorState::OpenWaiting);
    }

    #[test]
    fn table_slot_ownership() {
        let mut table = DoorTable::new();
        let a = IVec2::new(1, 1);
        let alias = IVec2::new(9, 9);
        table.trigger(a).offset = Fixed::from_int(20);
        assert_eq!(table.leaf_width(a), 20);
        assert_eq!(table.leaf_width(alias), 64, "alias cell reads as shut");

        table.trigger(alias);
        assert!(table.get(a).is_none());
        assert_eq!(table.leaf_width(a), 64);
    }

    #[test]
    fn tick_all_releases_finished_doors() {
        let mut table = DoorTable::new();
        table.insert(Door {
            cell: IVec2::new(4, 4),
            state: DoorState::Closing,
            offset: DOOR_SHUT,
            tics: 0,
        });
        table.tick_all(IVec2::ZERO);
        assert_eq!(table.iter().count(), 0);
    }
}
