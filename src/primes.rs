//! Primality helpers used when sizing a [`DoubleHashTable`].
//!
//! These run once at construction, never on the lookup path.
//!
//! [`DoubleHashTable`]: crate::DoubleHashTable

/// Witnesses for a deterministic Miller-Rabin test. Testing against the
/// first twelve primes is exact for every `n < 3.3 * 10^24`, which covers
/// all of `u64`.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

#[inline(always)]
fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1u64;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

/// Returns `true` if `n` is prime.
///
/// # Examples
///
/// ```rust
/// use probe_hash::primes::is_prime;
///
/// assert!(is_prime(2));
/// assert!(is_prime(1_000_000_007));
/// assert!(!is_prime(1));
/// assert!(!is_prime(561)); // Carmichael number
/// ```
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in &WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut d = n - 1;
    let mut r = 0;
    while d % 2 == 0 {
        d /= 2;
        r += 1;
    }

    'witness: for &a in &WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..r {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

/// Returns the smallest prime `p >= n`.
///
/// # Panics
///
/// Panics if no such prime fits in a `usize`.
///
/// # Examples
///
/// ```rust
/// use probe_hash::primes::next_prime_at_least;
///
/// assert_eq!(next_prime_at_least(0), 2);
/// assert_eq!(next_prime_at_least(13), 13);
/// assert_eq!(next_prime_at_least(14), 17);
/// ```
pub fn next_prime_at_least(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate as u64) {
        candidate = candidate
            .checked_add(1)
            .expect("no prime capacity fits in usize");
    }
    candidate
}

/// Returns the largest prime `p <= n`, or `None` when `n < 2`.
///
/// # Examples
///
/// ```rust
/// use probe_hash::primes::prev_prime_at_most;
///
/// assert_eq!(prev_prime_at_most(1), None);
/// assert_eq!(prev_prime_at_most(13), Some(13));
/// assert_eq!(prev_prime_at_most(16), Some(13));
/// ```
pub fn prev_prime_at_most(n: usize) -> Option<usize> {
    (2..=n).rev().find(|&candidate| is_prime(candidate as u64))
}
