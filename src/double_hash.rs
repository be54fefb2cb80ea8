use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::hasher::DefaultHashBuilder;
use crate::open_addressing::Probe;
use crate::open_addressing::Slots;
use crate::open_addressing::Stride;
use crate::primes;
use crate::table::CapacityError;
use crate::table::Table;

/// A fixed-capacity hash set resolving collisions by double hashing.
///
/// The probe step is derived from the value itself:
/// `step = 1 + (h2 mod R)`, where `h2` is the upper half of the value's hash,
/// and the walk visits `home, home + step, home + 2·step, …` modulo the slot
/// count. Values that collide on their home slot usually diverge on the
/// next probe, so clusters stay short.
///
/// # Sizing
///
/// A table requested with capacity `N` allocates `P` slots, the smallest
/// prime `>= N`. The step modulus `R` is the largest prime `<= N` that is
/// also below `P` (or `1` if there is none). Every step then lies in
/// `1..P`, is coprime with the prime `P`, and each probe sequence visits all
/// `P` slots exactly once.
///
/// # Examples
///
/// ```rust
/// use probe_hash::DoubleHashTable;
/// use probe_hash::Table;
///
/// let mut table: DoubleHashTable<u64> = DoubleHashTable::new(100);
/// assert_eq!(table.capacity(), 101);
/// assert_eq!(table.step_modulus(), 97);
///
/// for v in 0..101 {
///     table.insert(v);
/// }
/// assert_eq!(table.len(), 101);
/// ```
#[derive(Clone)]
pub struct DoubleHashTable<T, S = DefaultHashBuilder> {
    slots: Slots<T>,
    step_modulus: u64,
    requested: usize,
    hash_builder: S,
}

impl<T, S> Debug for DoubleHashTable<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DoubleHashTable")
            .field("requested", &self.requested)
            .field("step_modulus", &self.step_modulus)
            .field("slots", &self.slots)
            .finish()
    }
}

impl<T> DoubleHashTable<T, DefaultHashBuilder> {
    /// Creates a table for at least `capacity` values using the default
    /// hasher builder. See the type-level docs for how the slot count is
    /// chosen.
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<T, S> DoubleHashTable<T, S> {
    /// Creates a table for at least `capacity` values using `hash_builder`.
    ///
    /// A capacity of zero allocates no slots.
    pub fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        let (prime_size, step_modulus) = if capacity == 0 {
            (0, 1)
        } else {
            let prime_size = primes::next_prime_at_least(capacity);
            let step_modulus =
                primes::prev_prime_at_most(capacity.min(prime_size - 1)).unwrap_or(1);
            (prime_size, step_modulus)
        };

        event!(
            debug,
            requested = capacity,
            prime_size,
            step_modulus,
            "sized double hash table"
        );

        Self {
            slots: Slots::with_len(prime_size),
            step_modulus: step_modulus as u64,
            requested: capacity,
            hash_builder,
        }
    }

    /// Returns the capacity passed at construction.
    ///
    /// [`capacity`](Table::capacity) reports the number of slots actually
    /// allocated, which is the next prime at or above this value.
    pub fn requested_capacity(&self) -> usize {
        self.requested
    }

    /// Returns `R`, the modulus of the probe step `1 + (h2 mod R)`.
    pub fn step_modulus(&self) -> usize {
        self.step_modulus as usize
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

impl<T, S> DoubleHashTable<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    #[inline(always)]
    fn probe(&self, value: &T) -> Probe {
        let hash = self.hash_builder.hash_one(value);
        let step = 1 + ((hash >> 32) % self.step_modulus) as usize;
        Probe::new(hash, self.slots.capacity(), Stride::Double(step))
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
        crate::open_addressing::print_histogram(
            "double hash probe lengths",
            &self.probe_histogram(),
        );
    }
}

impl<T, S> Table<T> for DoubleHashTable<T, S>
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
                "double hash table full, insert dropped"
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
