//! Exact factorials and binomials on big integers.

use num_bigint::BigInt;
use num_traits::One;

/// n!
pub fn factorial(n: u32) -> BigInt {
    (1..=n).fold(BigInt::one(), |acc, k| acc * k)
}

/// n (n-1) ... (n-k+1), the number of k-permutations of n.
/// Zero when k > n.
pub fn falling_factorial(n: u32, k: u32) -> BigInt {
    if k > n {
        return BigInt::from(0u32);
    }
    ((n - k + 1)..=n).fold(BigInt::one(), |acc, j| acc * j)
}

/// C(n, k). Zero when k > n.
pub fn binomial(n: u32, k: u32) -> BigInt {
    if k > n {
        return BigInt::from(0u32);
    }
    let k = k.min(n - k);
    falling_factorial(n, k) / factorial(k)
}
