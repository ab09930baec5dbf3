//! Exact rational powers and radical normalisation.

use num_bigint::BigInt;
use num_integer::Roots;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Primes above this are not searched for when pulling powers out of a radicand.
const TRIAL_DIVISION_LIMIT: u64 = 1_000_000;

/// `base^k` for an integer `k`. `None` for `0^-k` or an exponent too large to compute.
pub(crate) fn rational_powi(base: &BigRational, k: &BigInt) -> Option<BigRational> {
    let k = k.to_i64()?;
    let magnitude = u32::try_from(k.unsigned_abs()).ok()?;
    let numer = base.numer().pow(magnitude);
    let denom = base.denom().pow(magnitude);
    if k >= 0 {
        Some(BigRational::new(numer, denom))
    } else if numer.is_zero() {
        None
    } else {
        Some(BigRational::new(denom, numer))
    }
}

/// Splits `base^exponent` (positive base, non-integer exponent p/q) into `c * N^(1/q)`.
///
/// With `base = a/d` and `exponent = k + p'/q` (`0 < p' < q`):
/// `base^exponent = base^k / d * (a^p' * d^(q - p'))^(1/q)`.
pub(crate) fn split_power(
    base: &BigRational,
    exponent: &BigRational,
) -> Option<(BigRational, u32, BigInt)> {
    if !base.is_positive() || exponent.is_integer() {
        return None;
    }
    let q = exponent.denom().to_u32()?;
    let k = exponent.floor().to_integer();
    let remainder = (exponent.numer() - &k * exponent.denom()).to_u32()?;

    let a = base.numer();
    let d = base.denom();
    let coeff = rational_powi(base, &k)? / BigRational::from_integer(d.clone());
    let radicand = a.pow(remainder) * d.pow(q - remainder);
    Some((coeff, q, radicand))
}

/// Writes a positive integer `n` as `outside^q * inside`, pulling out every q-th power factor
/// whose prime is below the trial-division bound.
pub(crate) fn extract_root(n: &BigInt, q: u32) -> (BigInt, BigInt) {
    let root = n.nth_root(q);
    if &root.pow(q) == n {
        return (root, BigInt::one());
    }

    let mut rest = n.clone();
    let mut outside = BigInt::one();
    let mut inside = BigInt::one();
    let mut p: u64 = 2;
    while p <= TRIAL_DIVISION_LIMIT {
        let prime = BigInt::from(p);
        if &prime * &prime * &prime > rest {
            break;
        }
        let mut count = 0u32;
        while (&rest % &prime).is_zero() {
            rest /= &prime;
            count += 1;
        }
        if count > 0 {
            outside *= prime.pow(count / q);
            inside *= prime.pow(count % q);
        }
        p += if p == 2 { 1 } else { 2 };
    }

    // Below the cube-root bound the remainder has at most two prime factors,
    // so it carries a q-th power only if it is one.
    let root = rest.nth_root(q);
    if root.pow(q) == rest {
        outside *= root;
    } else {
        inside *= rest;
    }
    (outside, inside)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_rational_powi() {
        assert_eq!(rational_powi(&ratio(2, 3), &BigInt::from(3)), Some(ratio(8, 27)));
        assert_eq!(rational_powi(&ratio(2, 3), &BigInt::from(-2)), Some(ratio(9, 4)));
        assert_eq!(rational_powi(&ratio(0, 1), &BigInt::from(-1)), None);
    }

    #[test]
    fn test_split_power_half() {
        // (1/2)^(1/2) = (1/2) * 2^(1/2)
        let (c, q, n) = split_power(&ratio(1, 2), &ratio(1, 2)).unwrap();
        assert_eq!((c, q, n), (ratio(1, 2), 2, BigInt::from(2)));

        // 2^(-1/2) = (1/2) * 2^(1/2)
        let (c, q, n) = split_power(&ratio(2, 1), &ratio(-1, 2)).unwrap();
        assert_eq!((c, q, n), (ratio(1, 2), 2, BigInt::from(2)));

        // 2^(3/2) = 2 * 2^(1/2)
        let (c, q, n) = split_power(&ratio(2, 1), &ratio(3, 2)).unwrap();
        assert_eq!((c, q, n), (ratio(2, 1), 2, BigInt::from(2)));
    }

    #[test]
    fn test_split_power_rejects_integer_exponent() {
        assert!(split_power(&ratio(2, 1), &ratio(2, 1)).is_none());
        assert!(split_power(&ratio(-2, 1), &ratio(1, 2)).is_none());
    }

    #[test]
    fn test_extract_root() {
        assert_eq!(extract_root(&BigInt::from(8), 2), (BigInt::from(2), BigInt::from(2)));
        assert_eq!(extract_root(&BigInt::from(72), 2), (BigInt::from(6), BigInt::from(2)));
        assert_eq!(extract_root(&BigInt::from(144), 2), (BigInt::from(12), BigInt::from(1)));
        assert_eq!(extract_root(&BigInt::from(54), 3), (BigInt::from(3), BigInt::from(2)));
        assert_eq!(extract_root(&BigInt::from(15), 2), (BigInt::from(1), BigInt::from(15)));
    }

    #[test]
    fn test_extract_root_large_prime_square() {
        // 1_000_003 is prime and never reached as a trial divisor.
        let p = BigInt::from(1_000_003u64);
        let n = &p * &p * BigInt::from(3);
        assert_eq!(extract_root(&n, 2), (p, BigInt::from(3)));
    }
}
