#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Emits a `tracing` event when the `tracing` feature is enabled and
/// compiles to nothing otherwise.
macro_rules! event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)+);
    };
}

/// Separate chaining over ordered buckets.
pub mod chained;

/// Open addressing with a value-dependent probe step over a prime number of
/// slots.
pub mod double_hash;

pub mod hasher;

/// Open addressing with a `+1` probe step.
pub mod linear;

mod open_addressing;

pub mod primes;

/// Open addressing with `+i²` probe offsets.
pub mod quadratic;

pub mod table;

#[cfg(any(test, feature = "stats"))]
pub use chained::ChainStats;
pub use chained::ChainedTable;
pub use double_hash::DoubleHashTable;
pub use hasher::DefaultHashBuilder;
pub use linear::LinearProbeTable;
#[cfg(any(test, feature = "stats"))]
pub use open_addressing::DebugStats;
pub use quadratic::QuadraticProbeTable;
pub use table::CapacityError;
pub use table::Table;
