//! Random number generation, shuffling, and random matchings.
//!
//! Nothing in this crate draws from an ambient global generator: every
//! random operation receives an explicit `&mut R`. Callers that run
//! several grouping requests in parallel give each one its own generator.
//!
//! # Reproducibility
//!
//! For reproducible groupings, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use animal_grouper::random::create_rng;
/// use rand::Rng;
/// let mut a = create_rng(7);
/// let mut b = create_rng(7);
/// assert_eq!(a.random::<u64>(), b.random::<u64>());
/// ```
pub fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Creates a generator seeded from the operating system's entropy source.
pub fn entropy_rng() -> SmallRng {
    SmallRng::from_os_rng()
}

/// Fisher-Yates (Durstenfeld) in-place shuffle.
///
/// Each of the n! permutations is equally likely.
///
/// Reference: Knuth (1997), *TAOCP* Vol. 2, §3.4.2, Algorithm P.
///
/// # Complexity
/// Time: O(n), Space: O(1)
pub fn shuffle<T, R: Rng + ?Sized>(slice: &mut [T], rng: &mut R) {
    let n = slice.len();
    if n <= 1 {
        return;
    }
    for i in (1..n).rev() {
        let j = rng.random_range(0..=i);
        slice.swap(i, j);
    }
}

/// Returns a shuffled copy of `values`, leaving the input untouched.
///
/// # Examples
/// ```
/// use animal_grouper::random::{create_rng, shuffled};
/// let weights = [18.0, 19.5, 21.0, 22.5];
/// let mut rng = create_rng(42);
/// let mut out = shuffled(&weights, &mut rng);
/// out.sort_by(|a, b| a.partial_cmp(b).unwrap());
/// assert_eq!(out, weights);
/// ```
pub fn shuffled<T: Clone, R: Rng + ?Sized>(values: &[T], rng: &mut R) -> Vec<T> {
    let mut owned = values.to_vec();
    shuffle(&mut owned, rng);
    owned
}

/// Draws a uniformly random one-to-one matching of `0..n` onto `0..n`.
///
/// Position `i` of the result is the partner index matched with `i`. For
/// every position in order, a partner is drawn uniformly from the indices
/// not yet used, so each of the n! matchings is equally likely.
///
/// # Examples
/// ```
/// use animal_grouper::random::{create_rng, random_matching};
/// let mut rng = create_rng(3);
/// let mut m = random_matching(5, &mut rng);
/// m.sort();
/// assert_eq!(m, vec![0, 1, 2, 3, 4]);
/// ```
pub fn random_matching<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut unused: Vec<usize> = (0..n).collect();
    let mut matching = Vec::with_capacity(n);
    while !unused.is_empty() {
        let pick = rng.random_range(0..unused.len());
        matching.push(unused.remove(pick));
    }
    matching
}

// ============================================================================
// Tests
// ============================================================================
