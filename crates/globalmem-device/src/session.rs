//! Slot+generation tables for sessions and other host-visible ids.
//!
//! An id packs a table tag (upper 16 bits), a slot index (middle 32 bits)
//! and a generation counter (lower 16 bits). Removing an entry bumps its
//! slot's generation, so an id that outlives its entry is detected instead
//! of silently addressing whoever reused the slot. The tag keeps ids from
//! one table from resolving in another.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Tag of tables built with [`SlotTable::new`].
pub const UNTAGGED: u16 = 0;

static NEXT_TAG: AtomicU32 = AtomicU32::new(1);

/// A fresh non-zero table tag.
///
/// Tags cycle through `1..=u16::MAX`, so two tables only share a tag if
/// 65535 others were created between them.
pub(crate) fn next_tag() -> u16 {
    loop {
        let tag = NEXT_TAG.fetch_add(1, Ordering::Relaxed) as u16;
        if tag != UNTAGGED {
            return tag;
        }
    }
}

fn encode(tag: u16, slot: u32, generation: u16) -> u64 {
    ((tag as u64) << 48) | ((slot as u64) << 16) | generation as u64
}

fn decode(id: u64) -> (u16, usize, u16) {
    (
        (id >> 48) as u16,
        ((id >> 16) as u32) as usize,
        id as u16,
    )
}

/// Opaque name of an open session on a [`Device`](crate::Device).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tag, slot, generation) = decode(self.0);
        write!(f, "{tag}.{slot}#{generation}")
    }
}

struct Slot<T> {
    generation: u16,
    value: Option<T>,
}

/// Maps `u64` ids to owned values, reusing freed slots.
pub struct SlotTable<T> {
    tag: u16,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> SlotTable<T> {
    /// An empty table whose ids carry [`UNTAGGED`].
    pub const fn new() -> Self {
        Self::with_tag(UNTAGGED)
    }

    /// An empty table whose ids carry `tag`. Ids issued by a table with a
    /// different tag never resolve here.
    pub const fn with_tag(tag: u16) -> Self {
        Self {
            tag,
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// The tag stamped into every id this table issues.
    pub fn tag(&self) -> u16 {
        self.tag
    }

    /// Store `value` and return the id that names it.
    pub fn insert(&mut self, value: T) -> u64 {
        self.live += 1;
        match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.slots[slot as usize];
                entry.value = Some(value);
                encode(self.tag, slot, entry.generation)
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                encode(self.tag, slot, 0)
            }
        }
    }

    /// Slot index of `id` if it names a live entry of this table.
    fn locate(&self, id: u64) -> Option<usize> {
        let (tag, slot, generation) = decode(id);
        let entry = self.slots.get(slot)?;
        (tag == self.tag && entry.generation == generation && entry.value.is_some())
            .then_some(slot)
    }

    /// The live value behind `id`, or `None` if `id` is stale, unknown or
    /// issued by another table.
    pub fn get(&self, id: u64) -> Option<&T> {
        let slot = self.locate(id)?;
        self.slots[slot].value.as_ref()
    }

    /// Mutable access to the live value behind `id`.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        let slot = self.locate(id)?;
        self.slots[slot].value.as_mut()
    }

    /// Take the value behind `id` out of the table.
    ///
    /// The slot's generation is bumped. A slot whose generation wraps to 0
    /// is retired rather than recycled, so an id from the slot's first
    /// lifetime can never match again.
    pub fn remove(&mut self, id: u64) -> Option<T> {
        let slot = self.locate(id)?;
        let entry = &mut self.slots[slot];
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        if entry.generation != 0 {
            self.free.push(slot as u32);
        }
        self.live -= 1;
        Some(value)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get() {
        let mut table = SlotTable::new();
        let id = table.insert('a');
        assert_eq!(table.get(id), Some(&'a'));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn removed_id_is_stale() {
        let mut table = SlotTable::new();
        let id = table.insert(1u8);
        assert_eq!(table.remove(id), Some(1));
        assert_eq!(table.get(id), None);
        assert_eq!(table.get_mut(id), None);
        assert_eq!(table.remove(id), None);
        assert!(table.is_empty());
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut table = SlotTable::new();
        let first = table.insert(1u8);
        table.remove(first);
        let second = table.insert(2u8);
        let (_, slot1, gen1) = decode(first);
        let (_, slot2, gen2) = decode(second);
        assert_eq!(slot1, slot2);
        assert_eq!(gen2, gen1 + 1);
        assert_eq!(table.get(first), None);
        assert_eq!(table.get(second), Some(&2));
    }

    #[test]
    fn unknown_slot_is_none() {
        let table: SlotTable<u8> = SlotTable::new();
        assert_eq!(table.get(encode(UNTAGGED, 7, 0)), None);
    }

    #[test]
    fn ids_do_not_cross_tables() {
        let mut a = SlotTable::with_tag(1);
        let mut b = SlotTable::with_tag(2);
        let ida = a.insert('a');
        let idb = b.insert('b');
        assert_ne!(ida, idb);
        assert_eq!(b.get(ida), None);
        assert_eq!(b.remove(ida), None);
        assert_eq!(b.get(idb), Some(&'b'));
        assert_eq!(a.get(idb), None);
    }

    #[test]
    fn next_tag_is_never_untagged() {
        let first = next_tag();
        let second = next_tag();
        assert_ne!(first, UNTAGGED);
        assert_ne!(first, second);
    }

    #[test]
    fn wrapped_generation_retires_slot() {
        let mut table = SlotTable::new();
        let id = table.insert(1u8);
        table.remove(id);
        table.slots[0].generation = u16::MAX;
        let last = table.insert(2u8);
        assert_eq!(decode(last).2, u16::MAX);
        table.remove(last);
        assert!(table.free.is_empty());

        let fresh = table.insert(3u8);
        assert_eq!(decode(fresh).1, 1);
        assert_eq!(table.get(id), None);
    }

    #[test]
    fn session_id_display() {
        assert_eq!(SessionId(encode(4, 3, 9)).to_string(), "4.3#9");
    }
}
