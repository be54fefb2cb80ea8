//! Slot storage and probe walks shared by the open-addressing tables.
//!
//! Each table supplies a [`Probe`] for a value; everything else (tombstone
//! handling, duplicate detection, the bounded walk) lives here so the three
//! strategies only differ in the sequence of indices they visit.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::table::CapacityError;

/// One cell of an open-addressing table.
#[derive(Clone)]
pub(crate) enum Slot<T> {
    /// Never held a value. Ends every probe walk.
    Open,
    /// Holds a live value.
    Filled(T),
    /// Held a value that was removed. Probe walks continue past it.
    Deleted,
}

/// The collision-resolution step between successive probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stride {
    /// `home + i`
    Linear,
    /// `home + i²`
    Quadratic,
    /// `home + i * step`, where `step` is in `1..len`.
    Double(usize),
}

/// The bounded sequence of slot indices examined for one value.
///
/// Yields at most `len` indices, starting with `hash % len`.
#[derive(Debug, Clone)]
pub(crate) struct Probe {
    home: usize,
    len: usize,
    attempt: usize,
    stride: Stride,
}

impl Probe {
    #[inline(always)]
    pub(crate) fn new(hash: u64, len: usize, stride: Stride) -> Self {
        let home = if len == 0 {
            0
        } else {
            (hash % len as u64) as usize
        };
        debug_assert!(match stride {
            Stride::Double(step) => len == 0 || (step >= 1 && step < len.max(2)),
            _ => true,
        });
        Self {
            home,
            len,
            attempt: 0,
            stride,
        }
    }
}

impl Iterator for Probe {
    type Item = usize;

    #[inline(always)]
    fn next(&mut self) -> Option<usize> {
        if self.attempt >= self.len {
            return None;
        }

        let len = self.len as u128;
        let i = self.attempt as u128;
        let offset = match self.stride {
            Stride::Linear => i,
            Stride::Quadratic => (i * i) % len,
            Stride::Double(step) => (i * step as u128) % len,
        };
        self.attempt += 1;

        let index = ((self.home as u128 + offset) % len) as usize;
        debug_assert!(index < self.len);
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.attempt;
        (remaining, Some(remaining))
    }
}

/// Where a value should go, as found by one probe walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// An equal value already lives at this index.
    Present(usize),
    /// The value can be written at this index.
    Vacant(usize),
    /// Neither an equal value nor a free slot is reachable.
    Full,
}

/// The slot array of an open-addressing table.
#[derive(Clone)]
pub(crate) struct Slots<T> {
    slots: Box<[Slot<T>]>,
    filled: usize,
    deleted: usize,
}

impl<T> Slots<T> {
    pub(crate) fn with_len(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || Slot::Open);
        Self {
            slots: slots.into_boxed_slice(),
            filled: 0,
            deleted: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.filled
    }

    #[inline(always)]
    pub(crate) fn tombstones(&self) -> usize {
        self.deleted
    }

    /// Resets every slot to `Open`, dropping all values and tombstones.
    pub(crate) fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Open;
        }
        self.filled = 0;
        self.deleted = 0;
    }

    fn find_index(&self, probe: Probe, eq: impl Fn(&T) -> bool) -> Option<usize> {
        for index in probe {
            match &self.slots[index] {
                Slot::Open => return None,
                Slot::Filled(v) if eq(v) => return Some(index),
                Slot::Filled(_) | Slot::Deleted => {}
            }
        }
        None
    }

    fn placement(&self, probe: Probe, eq: impl Fn(&T) -> bool) -> Placement {
        let mut first_deleted = None;
        for index in probe {
            match &self.slots[index] {
                Slot::Open => return Placement::Vacant(first_deleted.unwrap_or(index)),
                Slot::Deleted => {
                    first_deleted.get_or_insert(index);
                }
                Slot::Filled(v) if eq(v) => return Placement::Present(index),
                Slot::Filled(_) => {}
            }
        }
        first_deleted.map_or(Placement::Full, Placement::Vacant)
    }

    fn fill(&mut self, index: usize, value: T) {
        match core::mem::replace(&mut self.slots[index], Slot::Filled(value)) {
            Slot::Open => {}
            Slot::Deleted => self.deleted -= 1,
            Slot::Filled(_) => unreachable!("overwrote a live slot at {index}"),
        }
        self.filled += 1;
    }

    fn tombstone(&mut self, index: usize) -> T {
        match core::mem::replace(&mut self.slots[index], Slot::Deleted) {
            Slot::Filled(v) => {
                self.filled -= 1;
                self.deleted += 1;
                v
            }
            _ => unreachable!("tombstoned a slot without a value at {index}"),
        }
    }

    pub(crate) fn get(&self, probe: Probe, value: &T) -> Option<&T>
    where
        T: Eq,
    {
        let index = self.find_index(probe, |v| v == value)?;
        match &self.slots[index] {
            Slot::Filled(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn contains(&self, probe: Probe, value: &T) -> bool
    where
        T: Eq,
    {
        self.find_index(probe, |v| v == value).is_some()
    }

    pub(crate) fn try_insert(&mut self, probe: Probe, value: T) -> Result<bool, CapacityError<T>>
    where
        T: Eq,
    {
        match self.placement(probe, |v| v == &value) {
            Placement::Present(_) => Ok(false),
            Placement::Vacant(index) => {
                self.fill(index, value);
                Ok(true)
            }
            Placement::Full => Err(CapacityError(value)),
        }
    }

    pub(crate) fn take(&mut self, probe: Probe, value: &T) -> Option<T>
    where
        T: Eq,
    {
        let index = self.find_index(probe, |v| v == value)?;
        Some(self.tombstone(index))
    }

    /// Replaces `old` with `new`.
    ///
    /// `old`'s slot is tombstoned before `new` is placed, so `new` lands in
    /// that very slot whenever it is the first vacancy on `new`'s own probe
    /// sequence. If `new` cannot be placed, `old` is restored where it was.
    pub(crate) fn try_change(
        &mut self,
        old_probe: Probe,
        old: &T,
        new_probe: Probe,
        new: T,
    ) -> Result<bool, CapacityError<T>>
    where
        T: Eq,
    {
        let Some(old_index) = self.find_index(old_probe, |v| v == old) else {
            return Ok(false);
        };
        if old == &new {
            return Ok(true);
        }

        let old_value = self.tombstone(old_index);
        match self.placement(new_probe, |v| v == &new) {
            Placement::Present(_) => Ok(true),
            Placement::Vacant(index) => {
                self.fill(index, new);
                Ok(true)
            }
            Placement::Full => {
                self.fill(old_index, old_value);
                Err(CapacityError(new))
            }
        }
    }

    /// Index of each live value along its own probe sequence.
    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn probe_histogram(&self, probe_for: impl Fn(&T) -> Probe) -> Vec<usize> {
        let mut hist = alloc::vec![0usize; self.capacity()];
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Filled(v) = slot
                && let Some(distance) = probe_for(v).position(|i| i == index)
            {
                hist[distance] += 1;
            }
        }
        while hist.len() > 1 && hist.last() == Some(&0) {
            hist.pop();
        }
        hist
    }

    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn debug_stats(&self) -> DebugStats {
        let capacity = self.capacity();
        DebugStats {
            filled: self.filled,
            deleted: self.deleted,
            open: capacity - self.filled - self.deleted,
            capacity,
            load_factor: if capacity == 0 {
                0.0
            } else {
                self.filled as f64 / capacity as f64
            },
            tombstone_ratio: if capacity == 0 {
                0.0
            } else {
                self.deleted as f64 / capacity as f64
            },
            total_bytes: capacity * core::mem::size_of::<Slot<T>>(),
        }
    }
}

impl<T> Debug for Slots<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::string::String;

        let statusmap = self
            .slots
            .chunks(16)
            .map(|row| {
                row.iter()
                    .map(|slot| match slot {
                        Slot::Open => '.',
                        Slot::Filled(_) => '#',
                        Slot::Deleted => 'x',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>();

        f.debug_struct("Slots")
            .field("statusmap", &statusmap)
            .field("filled", &self.filled)
            .field("deleted", &self.deleted)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Occupancy statistics for an open-addressing table.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Slots holding a live value
    pub filled: usize,
    /// Tombstoned slots
    pub deleted: usize,
    /// Slots that never held a value
    pub open: usize,
    /// Total number of slots
    pub capacity: usize,
    /// filled / capacity
    pub load_factor: f64,
    /// deleted / capacity
    pub tombstone_ratio: f64,
    /// Bytes used by the slot array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Open Addressing Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.filled,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Tombstones: {} ({:.2}% of slots)",
            self.deleted,
            self.tombstone_ratio * 100.0
        );
        println!("Never used: {} slots", self.open);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// Pretty-prints a probe-length histogram horizontally using stdout.
#[cfg(all(feature = "std", any(test, feature = "stats")))]
pub(crate) fn print_histogram(title: &str, hist: &[usize]) {
    let max = hist.iter().copied().max().unwrap_or(0);
    let total: usize = hist.iter().sum();
    if max == 0 {
        println!("{title}: empty");
        return;
    }

    let max_bar = 60usize;
    println!("{title} ({total} entries):");
    for (i, &count) in hist.iter().enumerate() {
        let width = (count * max_bar).div_ceil(max);
        println!("{i:>3} | {} ({count})", "█".repeat(width));
    }
}
