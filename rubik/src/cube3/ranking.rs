//! Perfect hashing of partial permutations and orientations.

use crate::cube3::utils::MAX_PIECES;
use arrayvec::ArrayVec;

/// Returns `n! / (n-k)!`, the number of sequences of `k` distinct items chosen from `n`.
pub const fn pick(n: u8, k: u8) -> u32 {
    let mut result = 1u32;
    let mut i = n - k + 1;
    while i <= n {
        result *= i as u32;
        i += 1;
    }
    result
}

/// Ranks (and unranks) sequences of `k` distinct values drawn from `0..n`
/// using the Lehmer code restricted to the first `k` positions.
///
/// The ranks form the range `[0, n!/(n-k)!)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermutationRanker {
    n: u8,
    /// `picks[i]` is the number of ways to fill positions `i+1..k` with the values left, `pick(n-1-i, k-1-i)`.
    picks: ArrayVec<u32, MAX_PIECES>
}

impl PermutationRanker {
    /// Constructs the ranker for sequences of `k` distinct values from `0..n`. Requires `k <= n <= 12`.
    pub fn new(n: u8, k: u8) -> Self {
        assert!(k <= n && n as usize <= MAX_PIECES);
        Self { n, picks: (0..k).map(|i| pick(n - 1 - i, k - 1 - i)).collect() }
    }

    #[inline] pub fn n(&self) -> u8 { self.n }

    #[inline] pub fn k(&self) -> u8 { self.picks.len() as u8 }

    /// Returns the number of different ranks, `n!/(n-k)!`.
    #[inline] pub fn count(&self) -> u32 { pick(self.n, self.k()) }

    /// Returns the rank of `perm`, which must consist of `k` distinct values less than `n`.
    #[inline] pub fn rank(&self, perm: &[u8]) -> u32 {
        debug_assert_eq!(perm.len(), self.picks.len());
        let mut seen = 0u32; // bit v is set if the value v has been seen
        let mut result = 0;
        for (&value, &pick) in perm.iter().zip(self.picks.iter()) {
            let smaller_seen = (seen & ((1 << value) - 1)).count_ones();
            result += (value as u32 - smaller_seen) * pick;
            seen |= 1 << value;
        }
        result
    }

    /// Writes to `perm` (of length `k`) the sequence whose rank is `rank`.
    pub fn unrank(&self, mut rank: u32, perm: &mut [u8]) {
        debug_assert_eq!(perm.len(), self.picks.len());
        debug_assert!(rank < self.count());
        let mut unused = (1u32 << self.n) - 1; // bit v is set if the value v is not used yet
        for (value, &pick) in perm.iter_mut().zip(self.picks.iter()) {
            let mut digit = rank / pick;
            rank %= pick;
            let mut candidates = unused;
            while digit > 0 { candidates &= candidates - 1; digit -= 1; }   // clear lowest bits
            *value = candidates.trailing_zeros() as u8;
            unused &= !(1 << *value);
        }
    }
}

/// Returns `radix` to the power of `exponent`.
#[inline] pub const fn power(radix: u8, exponent: u8) -> u32 {
    (radix as u32).pow(exponent as u32)
}

/// Encodes `orientations` as digits of a number written in base `radix`, the i-th orientation is the i-th least significant digit.
#[inline] pub fn encode_orientations(orientations: &[u8], radix: u8) -> u32 {
    orientations.iter().rev().fold(0, |acc, &o| acc * radix as u32 + o as u32)
}

/// Inverse of `encode_orientations`: writes `orientations.len()` base-`radix` digits of `value` to `orientations`.
pub fn decode_orientations(mut value: u32, radix: u8, orientations: &mut [u8]) {
    for o in orientations.iter_mut() {
        *o = (value % radix as u32) as u8;
        value /= radix as u32;
    }
}
