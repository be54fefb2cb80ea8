use core::hash::BuildHasherDefault;
use core::hash::Hash;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use probe_hash::CapacityError;
use probe_hash::ChainedTable;
use probe_hash::DoubleHashTable;
use probe_hash::LinearProbeTable;
use probe_hash::QuadraticProbeTable;
use probe_hash::Table;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

type Sip = BuildHasherDefault<SipHasher>;

trait Key: Clone + Hash + Ord + 'static {
    fn new(key: u64) -> Self;
}

impl Key for u64 {
    fn new(key: u64) -> Self {
        black_box(key)
    }
}

impl Key for String {
    fn new(key: u64) -> Self {
        black_box(format!("key_{:016X}", key))
    }
}

/// `hashbrown` behind the same trait, capped at the same capacity so every
/// contender sees identical workloads.
struct Hashbrown<T> {
    set: hashbrown::HashSet<T, Sip>,
    capacity: usize,
}

impl<T: Hash + Eq> Table<T> for Hashbrown<T> {
    fn try_insert(&mut self, value: T) -> Result<bool, CapacityError<T>> {
        if self.set.len() >= self.capacity && !self.set.contains(&value) {
            return Err(CapacityError(value));
        }
        Ok(self.set.insert(value))
    }

    fn remove(&mut self, value: &T) -> bool {
        self.set.remove(value)
    }

    fn search(&self, value: &T) -> bool {
        self.set.contains(value)
    }

    fn try_change(&mut self, old: &T, new: T) -> Result<bool, CapacityError<T>> {
        if !self.set.remove(old) {
            return Ok(false);
        }
        self.set.insert(new);
        Ok(true)
    }

    fn len(&self) -> usize {
        self.set.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

type Factory<T> = fn(usize) -> Box<dyn Table<T>>;

fn contenders<T: Key>() -> [(&'static str, Factory<T>); 5] {
    [
        ("linear", |c| {
            Box::new(LinearProbeTable::<T, Sip>::with_hasher(c, Sip::default()))
        }),
        ("quadratic", |c| {
            Box::new(QuadraticProbeTable::<T, Sip>::with_hasher(c, Sip::default()))
        }),
        ("double", |c| {
            Box::new(DoubleHashTable::<T, Sip>::with_hasher(c, Sip::default()))
        }),
        ("chained", |c| {
            Box::new(ChainedTable::<T, Sip>::with_hasher(c, Sip::default()))
        }),
        ("hashbrown", |c| {
            Box::new(Hashbrown {
                set: hashbrown::HashSet::with_capacity_and_hasher(c, Sip::default()),
                capacity: c,
            })
        }),
    ]
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 11),
    (1 << 12),
    (1 << 13),
    (1 << 14),
    (1 << 15),
    (1 << 16),
];

/// Fraction of the capacity filled before measuring lookups and churn.
const LOAD_PERCENT: usize = 75;

fn random_keys<T: Key>(count: usize) -> Vec<T> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| T::new(rng.try_next_u64().unwrap()))
        .collect()
}

fn prefilled<T: Key>(factory: Factory<T>, size: usize, keys: &[T]) -> Box<dyn Table<T>> {
    let mut table = factory(size);
    for key in keys.iter().take(size * LOAD_PERCENT / 100) {
        table.insert(key.clone());
    }
    table
}

fn bench_insert_random<T: Key>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_random_{}", core::any::type_name::<T>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<T>(size);
        let count = size * 9 / 10;
        group.throughput(Throughput::Elements(count as u64));

        for (name, factory) in contenders::<T>() {
            group.bench_function(format!("{name}/{size}"), |b| {
                b.iter_batched(
                    || {
                        let mut keys = keys.clone();
                        keys.shuffle(&mut SmallRng::from_os_rng());
                        keys
                    },
                    |keys| {
                        let mut table = factory(size);
                        for key in keys.into_iter().take(count) {
                            table.insert(key);
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

fn bench_find_hit_miss<T: Key>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_miss_{}", core::any::type_name::<T>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<T>(size);
        let misses = random_keys::<T>(size * LOAD_PERCENT / 100);
        let mut probes: Vec<T> = keys
            .iter()
            .take(size * LOAD_PERCENT / 100)
            .chain(misses.iter())
            .cloned()
            .collect();
        probes.shuffle(&mut SmallRng::from_os_rng());
        group.throughput(Throughput::Elements(probes.len() as u64));

        for (name, factory) in contenders::<T>() {
            let table = prefilled(factory, size, &keys);
            group.bench_function(format!("{name}/{size}"), |b| {
                b.iter(|| {
                    let mut found = 0usize;
                    for key in &probes {
                        found += table.search(key) as usize;
                    }
                    black_box(found)
                })
            });
        }
    }

    group.finish();
}

fn bench_find_zipf<T: Key>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_zipf_{}", core::any::type_name::<T>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<T>(size);
        let live = size * LOAD_PERCENT / 100;
        let distr = Zipf::new(live as f32, 1.0).unwrap();
        let mut rng = SmallRng::from_os_rng();
        let probes: Vec<T> = (0..live)
            .map(|_| keys[rng.sample(distr) as usize - 1].clone())
            .collect();
        group.throughput(Throughput::Elements(probes.len() as u64));

        for (name, factory) in contenders::<T>() {
            let table = prefilled(factory, size, &keys);
            group.bench_function(format!("{name}/{size}"), |b| {
                b.iter(|| {
                    let mut found = 0usize;
                    for key in &probes {
                        found += table.search(key) as usize;
                    }
                    black_box(found)
                })
            });
        }
    }

    group.finish();
}

/// Remove and re-insert at steady load, which piles up tombstones in the
/// open-addressing tables.
fn bench_churn<T: Key>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<T>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<T>(size);
        let fresh = random_keys::<T>(size);
        let live = size * LOAD_PERCENT / 100;
        group.throughput(Throughput::Elements(live as u64 * 2));

        for (name, factory) in contenders::<T>() {
            group.bench_function(format!("{name}/{size}"), |b| {
                b.iter_batched(
                    || prefilled(factory, size, &keys),
                    |mut table| {
                        for (old, new) in keys.iter().take(live).zip(fresh.iter()) {
                            table.remove(old);
                            table.insert(new.clone());
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<u64>,
    bench_insert_random::<String>,
    bench_find_hit_miss::<u64>,
    bench_find_hit_miss::<String>,
    bench_find_zipf::<u64>,
    bench_find_zipf::<String>,
    bench_churn::<u64>,
    bench_churn::<String>,
);

criterion_main!(benches);
