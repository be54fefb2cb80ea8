use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::hasher::DefaultHashBuilder;
use crate::table::CapacityError;
use crate::table::Table;

/// A hash set resolving collisions by separate chaining.
///
/// The table has a fixed number of buckets; a value lives in bucket
/// `hash(value) mod buckets`, and each bucket is an ordered set, so a
/// bucket that attracts many collisions still answers lookups in
/// logarithmic time. There are no tombstones: removal erases the value.
///
/// Buckets never fill up, so [`try_insert`] always succeeds. The bucket count
/// is never changed, so the load factor grows without bound as values are
/// added.
///
/// [`try_insert`]: Table::try_insert
///
/// # Examples
///
/// ```rust
/// use probe_hash::ChainedTable;
/// use probe_hash::Table;
///
/// let mut table: ChainedTable<u32> = ChainedTable::new(4);
/// for v in 0..100 {
///     table.insert(v);
/// }
/// assert_eq!(table.len(), 100);
/// assert_eq!(table.capacity(), 4);
/// assert!(table.search(&42));
/// ```
#[derive(Clone)]
pub struct ChainedTable<T, S = DefaultHashBuilder> {
    buckets: Box<[BTreeSet<T>]>,
    len: usize,
    hash_builder: S,
}

impl<T, S> Debug for ChainedTable<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChainedTable")
            .field("buckets", &self.buckets)
            .field("len", &self.len)
            .finish()
    }
}

impl<T> ChainedTable<T, DefaultHashBuilder> {
    /// Creates a table with `capacity` buckets using the default hasher
    /// builder. A capacity of zero is raised to one bucket.
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<T, S> ChainedTable<T, S> {
    /// Creates a table with `capacity` buckets using `hash_builder`. A
    /// capacity of zero is raised to one bucket.
    pub fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        let mut buckets = Vec::with_capacity(capacity.max(1));
        buckets.resize_with(capacity.max(1), BTreeSet::new);
        Self {
            buckets: buckets.into_boxed_slice(),
            len: 0,
            hash_builder,
        }
    }

    /// Returns a reference to the table's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes every value, keeping the buckets.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Returns the number of values in each bucket, in bucket order.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets.iter().map(BTreeSet::len).collect()
    }

    /// Counts buckets by the number of values they hold.
    ///
    /// Index `k` is the number of buckets holding exactly `k` values.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let longest = self.buckets.iter().map(BTreeSet::len).max().unwrap_or(0);
        let mut hist = alloc::vec![0usize; longest + 1];
        for bucket in self.buckets.iter() {
            hist[bucket.len()] += 1;
        }
        hist
    }

    /// Returns bucket usage statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> ChainStats {
        let buckets = self.buckets.len();
        ChainStats {
            buckets,
            elements: self.len,
            empty_buckets: self.buckets.iter().filter(|b| b.is_empty()).count(),
            longest_chain: self.buckets.iter().map(BTreeSet::len).max().unwrap_or(0),
            load_factor: self.len as f64 / buckets as f64,
        }
    }

    /// Pretty-prints the chain-length histogram using stdout.
    #[cfg(all(feature = "std", any(test, feature = "stats")))]
    pub fn print_chain_histogram(&self) {
        crate::open_addressing::print_histogram("chain lengths", &self.chain_histogram());
    }
}

impl<T, S> ChainedTable<T, S>
where
    T: Hash,
    S: BuildHasher,
{
    #[inline(always)]
    fn bucket_index(&self, value: &T) -> usize {
        let hash = self.hash_builder.hash_one(value);
        (hash % self.buckets.len() as u64) as usize
    }
}

impl<T, S> ChainedTable<T, S>
where
    T: Hash + Ord,
    S: BuildHasher,
{
    /// Returns a reference to the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.buckets[self.bucket_index(value)].get(value)
    }

    /// Removes and returns the stored value equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let index = self.bucket_index(value);
        let taken = self.buckets[index].take(value);
        if taken.is_some() {
            self.len -= 1;
        }
        taken
    }
}

impl<T, S> Table<T> for ChainedTable<T, S>
where
    T: Hash + Ord,
    S: BuildHasher,
{
    fn try_insert(&mut self, value: T) -> Result<bool, CapacityError<T>> {
        let index = self.bucket_index(&value);
        let inserted = self.buckets[index].insert(value);
        if inserted {
            self.len += 1;
        }
        Ok(inserted)
    }

    fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    fn search(&self, value: &T) -> bool {
        self.buckets[self.bucket_index(value)].contains(value)
    }

    fn try_change(&mut self, old: &T, new: T) -> Result<bool, CapacityError<T>> {
        if self.take(old).is_none() {
            return Ok(false);
        }
        // `new` goes to its own bucket, which need not be `old`'s.
        self.try_insert(new)?;
        Ok(true)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }
}

/// Bucket usage statistics for a [`ChainedTable`].
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct ChainStats {
    /// Number of buckets
    pub buckets: usize,
    /// Number of stored values
    pub elements: usize,
    /// Buckets holding no value
    pub empty_buckets: usize,
    /// Size of the fullest bucket
    pub longest_chain: usize,
    /// elements / buckets
    pub load_factor: f64,
}

#[cfg(any(test, feature = "stats"))]
impl ChainStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Chaining Statistics ===");
        println!(
            "Population: {} values in {} buckets ({:.2} per bucket)",
            self.elements, self.buckets, self.load_factor
        );
        println!(
            "Empty buckets: {} ({:.2}%)",
            self.empty_buckets,
            self.empty_buckets as f64 / self.buckets as f64 * 100.0
        );
        println!("Longest chain: {}", self.longest_chain);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use core::hash::BuildHasherDefault;
    use core::hash::Hasher;

    use super::*;

    #[derive(Default)]
    struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, _: &[u8]) {
            unimplemented!("identity hasher only supports u64")
        }

        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }
    }

    type Identity = BuildHasherDefault<IdentityHasher>;

    fn identity_table(capacity: usize) -> ChainedTable<u64, Identity> {
        ChainedTable::with_hasher(capacity, Identity::default())
    }

    #[test]
    fn values_land_in_hash_bucket() {
        let mut table = identity_table(4);
        for v in [0, 4, 8, 1, 6] {
            table.insert(v);
        }
        assert_eq!(table.chain_lengths(), vec![3, 1, 1, 0]);
        assert_eq!(table.chain_histogram(), vec![1, 2, 0, 1]);
    }

    #[test]
    fn duplicates_collapse() {
        let mut table = identity_table(4);
        assert_eq!(table.try_insert(5), Ok(true));
        assert_eq!(table.try_insert(5), Ok(false));
        assert_eq!(table.len(), 1);
        assert!(table.remove(&5));
        assert!(!table.search(&5));
        assert!(!table.remove(&5));
    }

    #[test]
    fn change_moves_between_buckets() {
        let mut table = identity_table(4);
        table.insert(1);
        assert!(table.change(&1, 2));
        assert_eq!(table.chain_lengths(), vec![0, 0, 1, 0]);
        assert!(table.search(&2));
        assert!(!table.search(&1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn change_absent_does_not_insert() {
        let mut table = identity_table(4);
        assert!(!table.change(&1, 2));
        assert!(!table.search(&2));
        assert!(table.is_empty());
    }

    #[test]
    fn never_full() {
        let mut table: ChainedTable<u64> = ChainedTable::new(3);
        for v in 0..1000 {
            assert_eq!(table.try_insert(v), Ok(true));
        }
        assert_eq!(table.len(), 1000);
        let stats = table.debug_stats();
        assert_eq!(stats.buckets, 3);
        assert_eq!(stats.elements, 1000);
        assert!(stats.longest_chain >= 334);
    }

    #[test]
    fn zero_capacity_gets_one_bucket() {
        let mut table: ChainedTable<u64> = ChainedTable::new(0);
        assert_eq!(table.capacity(), 1);
        table.insert(1);
        table.insert(2);
        assert!(table.search(&1) && table.search(&2));
    }

    #[test]
    fn clear_and_take() {
        let mut table = identity_table(2);
        table.insert(1);
        table.insert(3);
        assert_eq!(table.take(&3), Some(3));
        assert_eq!(table.get(&1), Some(&1));
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.debug_stats().empty_buckets, 2);
    }
}
