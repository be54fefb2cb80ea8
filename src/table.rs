//! The contract shared by every table in this crate.

use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;

/// Returned when a value cannot be placed because every slot it can reach is
/// occupied. Carries the rejected value back to the caller.
///
/// # Examples
///
/// ```rust
/// use probe_hash::LinearProbeTable;
/// use probe_hash::Table;
///
/// let mut table = LinearProbeTable::<u32>::new(1);
/// assert_eq!(table.try_insert(1), Ok(true));
///
/// let err = table.try_insert(2).unwrap_err();
/// assert_eq!(err.into_inner(), 2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CapacityError<T>(pub T);

impl<T> CapacityError<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Debug for CapacityError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityError").finish_non_exhaustive()
    }
}

impl<T> Display for CapacityError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no reachable slot is free for the value")
    }
}

impl<T> core::error::Error for CapacityError<T> {}

/// A fixed-capacity set supporting insert, remove, search and change.
///
/// Every table in this crate implements `Table`, so callers can hold a
/// `&mut dyn Table<T>` and stay agnostic of the collision strategy that was
/// constructed.
///
/// # Full tables
///
/// Capacity is fixed at construction. [`insert`] on a table with no reachable
/// free slot silently drops the value; the only way to notice is a later
/// [`search`] returning `false`. Use [`try_insert`] to get the value back
/// instead.
///
/// [`insert`]: Table::insert
/// [`search`]: Table::search
/// [`try_insert`]: Table::try_insert
///
/// # Examples
///
/// ```rust
/// use probe_hash::ChainedTable;
/// use probe_hash::DoubleHashTable;
/// use probe_hash::LinearProbeTable;
/// use probe_hash::QuadraticProbeTable;
/// use probe_hash::Table;
///
/// let mut tables: Vec<Box<dyn Table<u64>>> = vec![
///     Box::new(LinearProbeTable::<u64>::new(16)),
///     Box::new(QuadraticProbeTable::<u64>::new(16)),
///     Box::new(DoubleHashTable::<u64>::new(16)),
///     Box::new(ChainedTable::<u64>::new(16)),
/// ];
///
/// for table in &mut tables {
///     table.insert(7);
///     assert!(table.search(&7));
///     assert!(table.change(&7, 8));
///     assert!(!table.search(&7));
///     assert!(table.remove(&8));
///     assert!(table.is_empty());
/// }
/// ```
pub trait Table<T> {
    /// Adds `value` unless an equal value is present.
    ///
    /// Returns `Ok(true)` if the value was newly inserted and `Ok(false)` if
    /// an equal value was already present. If no free slot is reachable, the
    /// table is left untouched and the value is returned inside the error.
    fn try_insert(&mut self, value: T) -> Result<bool, CapacityError<T>>;

    /// Adds `value` unless an equal value is present, silently dropping it
    /// if the table is full.
    fn insert(&mut self, value: T) {
        let _ = self.try_insert(value);
    }

    /// Removes the value equal to `value`. Returns whether one was present.
    fn remove(&mut self, value: &T) -> bool;

    /// Returns `true` if a value equal to `value` is present.
    fn search(&self, value: &T) -> bool;

    /// Replaces the value equal to `old` with `new`.
    ///
    /// Returns `Ok(false)` without touching the table if `old` is absent;
    /// `new` is never inserted on its own. Returns `Ok(true)` once `old` is
    /// gone and `new` is present. If `new` has no reachable free slot, `old`
    /// is kept and `new` is returned inside the error.
    fn try_change(&mut self, old: &T, new: T) -> Result<bool, CapacityError<T>>;

    /// Replaces the value equal to `old` with `new`, returning whether the
    /// replacement happened.
    fn change(&mut self, old: &T, new: T) -> bool {
        matches!(self.try_change(old, new), Ok(true))
    }

    /// Returns the number of values in the table.
    fn len(&self) -> usize;

    /// Returns `true` if the table holds no values.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed number of slots (or buckets) of the table.
    fn capacity(&self) -> usize;
}
