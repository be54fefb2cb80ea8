use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::hasher::DefaultHashBuilder;
use crate::open_addressing::Probe;
use crate::open_addressing::Slots;
use crate::open_addressing::Stride;
use crate::table::CapacityError;
use crate::table::Table;

/// A fixed-capacity hash set resolving collisions by linear probing.
///
/// A value hashing to slot `h` is looked for in `h, h + 1, h + 2, …`
/// (wrapping), for at most `capacity` slots. Removal leaves a tombstone so
/// that values placed further along the same run stay reachable; a later
/// insert reuses the first tombstone on its path.
///
/// Every slot is reachable from every home slot, so an insert is only
/// dropped once all `capacity` slots hold live values.
///
/// # Examples
///
/// ```rust
/// use probe_hash::LinearProbeTable;
/// use probe_hash::Table;
///
/// let mut table: LinearProbeTable<&str> = LinearProbeTable::new(8);
/// table.insert("apple");
/// table.insert("pear");
/// assert!(table.search(&"apple"));
///
/// table.remove(&"apple");
/// assert!(!table.search(&"apple"));
/// assert!(table.search(&"pear"));
/// ```
#[derive(Clone)]
pub struct LinearProbeTable<T, S = DefaultHashBuilder> {
    slots: Slots<T>,
    hash_builder: S,
}

impl<T, S> Debug for LinearProbeTable<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LinearProbeTable")
            .field("slots", &self.slots)
            .finish()
    }
}

impl<T> LinearProbeTable<T, DefaultHashBuilder> {
    /// Creates a table with exactly `capacity` slots using the default hasher
    /// builder.
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<T, S> LinearProbeTable<T, S> {
    /// Creates a table with exactly `capacity` slots using `hash_builder`.
    pub fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            slots: Slots::with_len(capacity),
            hash_builder,
        }
    }

    /// Returns the number of tombstoned slots.
    pub fn tombstones(&self) -> usize {
        self.slots.tombstones()
    }

    /// Returns a reference to the table's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes every value and tombstone.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T, S> LinearProbeTable<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    #[inline(always)]
    fn probe(&self, value: &T) -> Probe {
        let hash = self.hash_builder.hash_one(value);
        Probe::new(hash, self.slots.capacity(), Stride::Linear)
    }

    /// Returns a reference to the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.slots.get(self.probe(value), value)
    }

    /// Removes and returns the stored value equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let probe = self.probe(value);
        self.slots.take(probe, value)
    }

    /// Counts live values by the number of probes needed to reach them.
    ///
    /// Index `0` counts values sitting in their home slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        self.slots.probe_histogram(|v| self.probe(v))
    }

    /// Returns occupancy statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::DebugStats {
        self.slots.debug_stats()
    }

    /// Pretty-prints the probe-length histogram using stdout.
    #[cfg(all(feature = "std", any(test, feature = "stats")))]
    pub fn print_probe_histogram(&self) {
        crate::open_addressing::print_histogram("linear probe lengths", &self.probe_histogram());
    }
}

impl<T, S> Table<T> for LinearProbeTable<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn try_insert(&mut self, value: T) -> Result<bool, CapacityError<T>> {
        let probe = self.probe(&value);
        let result = self.slots.try_insert(probe, value);
        if result.is_err() {
            event!(
                trace,
                capacity = self.slots.capacity(),
                "linear probe table full, insert dropped"
            );
        }
        result
    }

    fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    fn search(&self, value: &T) -> bool {
        self.slots.contains(self.probe(value), value)
    }

    fn try_change(&mut self, old: &T, new: T) -> Result<bool, CapacityError<T>> {
        let old_probe = self.probe(old);
        let new_probe = self.probe(&new);
        self.slots.try_change(old_probe, old, new_probe, new)
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn capacity(&self) -> usize {
        self.slots.capacity()
    }
}
