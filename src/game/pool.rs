//! Fixed arena of falling-note slots. Slots are never reallocated; a note
//! "dies" by clearing `active`.

use super::{NOTE_HEIGHT, SCREEN_HEIGHT};

pub const POOL_CAPACITY: usize = 16;

/// Index into the note arena (`0..POOL_CAPACITY`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotHandle(u8);

impl SlotHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoteSlot {
    pub active: bool,
    pub lane: u8,
    /// Top edge in screen pixels.
    pub y: u16,
}

impl NoteSlot {
    pub fn center(&self) -> u16 {
        self.y + NOTE_HEIGHT / 2
    }

    /// True when the note's vertical extent `[y, y + NOTE_HEIGHT)` overlaps `[top, bottom)`.
    pub fn overlaps(&self, top: u16, bottom: u16) -> bool {
        self.y + NOTE_HEIGHT > top && self.y < bottom
    }
}

#[derive(Clone, Debug, Default)]
pub struct NotePool {
    slots: [NoteSlot; POOL_CAPACITY],
}

impl NotePool {
    pub fn slots(&self) -> &[NoteSlot; POOL_CAPACITY] {
        &self.slots
    }

    pub fn get(&self, handle: SlotHandle) -> &NoteSlot {
        &self.slots[handle.index()]
    }

    /// Active slots in pool order together with their handles.
    pub fn active(&self) -> impl Iterator<Item = (SlotHandle, &NoteSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (SlotHandle(i as u8), s))
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    /// Activate the lowest-indexed free slot. `None` means the pool is full and
    /// the spawn is dropped.
    pub fn spawn(&mut self, lane: u8) -> Option<SlotHandle> {
        let idx = self.slots.iter().position(|s| !s.active)?;
        self.slots[idx] = NoteSlot { active: true, lane, y: 0 };
        Some(SlotHandle(idx as u8))
    }

    pub fn deactivate(&mut self, handle: SlotHandle) {
        self.slots[handle.index()].active = false;
    }

    /// Move every live note down by `speed` and retire the ones that left the
    /// screen. Returns how many expired this tick.
    pub fn advance(&mut self, speed: u16) -> u32 {
        let mut expired = 0;
        for slot in self.slots.iter_mut().filter(|s| s.active) {
            slot.y += speed;
            if slot.y > SCREEN_HEIGHT + NOTE_HEIGHT {
                slot.active = false;
                expired += 1;
            }
        }
        expired
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, idx: usize, lane: u8, y: u16) {
        self.slots[idx] = NoteSlot { active: true, lane, y };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_uses_lowest_free_slot() {
        let mut pool = NotePool::default();
        let a = pool.spawn(0).unwrap();
        let b = pool.spawn(1).unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));
        pool.deactivate(a);
        let c = pool.spawn(3).unwrap();
        assert_eq!(c.index(), 0);
        assert_eq!(pool.get(c).lane, 3);
        assert_eq!(pool.get(c).y, 0);
    }

    #[test]
    fn test_spawn_dropped_when_full() {
        let mut pool = NotePool::default();
        for i in 0..POOL_CAPACITY {
            assert!(pool.spawn((i % 4) as u8).is_some());
        }
        assert_eq!(pool.spawn(2), None);
        assert_eq!(pool.live_count(), POOL_CAPACITY);
    }

    #[test]
    fn test_advance_expires_past_bottom() {
        let mut pool = NotePool::default();
        pool.place(0, 1, 510);
        pool.place(1, 2, 100);
        assert_eq!(pool.advance(2), 0); // 512 is not past 480 + 32
        assert_eq!(pool.advance(2), 1);
        assert!(!pool.slots()[0].active);
        assert_eq!(pool.slots()[1].y, 104);
        // already expired notes do not expire again
        assert_eq!(pool.advance(2), 0);
    }

    #[test]
    fn test_overlap_window_edges() {
        let n = NoteSlot { active: true, lane: 0, y: 328 };
        assert!(!n.overlaps(360, 460)); // bottom edge at 360 is exclusive
        let n = NoteSlot { y: 329, ..n };
        assert!(n.overlaps(360, 460));
        let n = NoteSlot { y: 460, ..n };
        assert!(!n.overlaps(360, 460));
    }
}
