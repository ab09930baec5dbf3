//! Radial wave function R_nl(r) of a hydrogen-like atom.
//!
//! With κ = 2Z/(n·a0), R is `r^l · exp(-κr/2) · Σ b_i r^i` where the series coefficients follow
//! `b[i+1] = b[i] · κ · (i+l+1-n) / ((i+1)(i+2l+2))` and `b[0]` is fixed by `∫ R² r² dr = 1`.

use log::{debug, trace};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::combinatorics::factorial;
use crate::config::AtomParams;
use crate::error::{OrbitalError, Result};
use crate::symbolic::Expr;
use crate::variables;

pub(crate) fn validate(n: u32, l: u32) -> Result<()> {
    if n == 0 {
        return Err(OrbitalError::InvalidPrincipal(n));
    }
    if l >= n {
        return Err(OrbitalError::AngularOutOfRange { n, l });
    }
    Ok(())
}

/// Ratio b[i+1] / (b[i] · κ): (i+l+1-n) / ((i+1)(i+2l+2))
fn step_ratio(n: u32, l: u32, i: u32) -> BigRational {
    let numer = i64::from(i) + i64::from(l) + 1 - i64::from(n);
    let denom = (i64::from(i) + 1) * (i64::from(i) + 2 * i64::from(l) + 2);
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

/// P(j) = Π_{u<j} step_ratio(u), so that b[j] = b[0] · κ^j · P(j).
fn series_product(n: u32, l: u32, j: u32) -> BigRational {
    (0..j).fold(BigRational::one(), |acc, u| acc * step_ratio(n, l, u))
}

/// Exact double sum S = Σ_j Σ_k P(j) P(k) (j+k+2l+2)!, j, k in 0..n-l.
pub fn normalization_sum(n: u32, l: u32) -> Result<BigRational> {
    validate(n, l)?;
    let terms = n - l;
    let products: Vec<BigRational> = (0..terms).map(|j| series_product(n, l, j)).collect();

    let mut sum = BigRational::zero();
    for (j, pj) in products.iter().enumerate() {
        for (k, pk) in products.iter().enumerate() {
            let order = j as u32 + k as u32 + 2 * l + 2;
            sum += pj * pk * BigRational::from_integer(factorial(order));
        }
    }
    debug!("normalization sum for n={n}, l={l}: {sum}");
    Ok(sum)
}

/// κ = 2Z / (n·a0)
pub fn decay_constant(n: u32, params: &AtomParams) -> Expr {
    Expr::from(2) * params.z.clone() / (Expr::from(n) * params.a0.clone())
}

/// b0 = κ^((2l+3)/2) / sqrt(S)
pub fn leading_coefficient(n: u32, l: u32, params: &AtomParams) -> Result<Expr> {
    let sum = normalization_sum(n, l)?;
    let kappa = decay_constant(n, params);
    let b0 = kappa.pow(Expr::rational(2 * l + 3, 2)) * Expr::from(sum).sqrt().recip();
    debug!("b0 for n={n}, l={l}: {b0}");
    Ok(b0)
}

/// b[0..n-l], each obtained from its predecessor.
pub fn series_coefficients(n: u32, l: u32, params: &AtomParams) -> Result<Vec<Expr>> {
    let b0 = leading_coefficient(n, l, params)?;
    let kappa = decay_constant(n, params);
    let terms = (n - l) as usize;

    let mut coefficients = Vec::with_capacity(terms);
    coefficients.push(b0);
    for i in 0..(n - l - 1) {
        let next = &coefficients[i as usize] * &kappa * Expr::from(step_ratio(n, l, i));
        trace!("b[{}] = {next}", i + 1);
        coefficients.push(next);
    }
    debug!("{} series coefficients for n={n}, l={l}", coefficients.len());
    Ok(coefficients)
}

/// R_nl(r) = r^l · exp(-Z r / (n a0)) · Σ b_i r^i
///
/// The polynomial stays a factor of the product; nothing is multiplied out.
pub fn radial_wavefunction(n: u32, l: u32, params: &AtomParams, r: &Expr) -> Result<Expr> {
    let coefficients = series_coefficients(n, l, params)?;
    let polynomial = Expr::sum(
        coefficients
            .into_iter()
            .enumerate()
            .map(|(i, b)| b * r.clone().powi(i as i64)),
    );
    let decay = (-(params.z.clone() * r.clone()) / (Expr::from(n) * params.a0.clone())).exp();
    Ok(Expr::product([r.clone().powi(i64::from(l)), decay, polynomial]))
}

/// ∫_0^∞ R² r² dr, evaluated exactly. Equal to 1 for every valid (n, l).
pub fn radial_norm(n: u32, l: u32, params: &AtomParams) -> Result<Expr> {
    let r = variables::r();
    let radial = radial_wavefunction(n, l, params, &r.to_expr())?;
    let integrand = Expr::product([radial.clone(), radial, r.to_expr().powi(2)]);
    integrand.integrate_semi_infinite(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Bindings;

    fn z() -> Expr {
        variables::z().to_expr()
    }

    fn a0() -> Expr {
        variables::a0().to_expr()
    }

    fn r() -> Expr {
        variables::r().to_expr()
    }

    #[test]
    fn test_validate() {
        assert!(validate(1, 0).is_ok());
        assert!(matches!(validate(0, 0), Err(OrbitalError::InvalidPrincipal(0))));
        assert!(matches!(
            validate(2, 2),
            Err(OrbitalError::AngularOutOfRange { n: 2, l: 2 })
        ));
        assert!(radial_wavefunction(3, 5, &AtomParams::default(), &r()).is_err());
    }

    #[test]
    fn test_normalization_sum_single_term() {
        // l = n-1 leaves only j = k = 0: (2l+2)!
        assert_eq!(normalization_sum(1, 0).unwrap(), BigRational::from_integer(2.into()));
        assert_eq!(normalization_sum(3, 2).unwrap(), BigRational::from_integer(720.into()));
    }

    #[test]
    fn test_normalization_sum_two_terms() {
        // n=2, l=0: P(1) = -1/2, S = 2! - 2·(1/2)·3! + (1/4)·4! = 2
        assert_eq!(normalization_sum(2, 0).unwrap(), BigRational::from_integer(2.into()));
    }

    #[test]
    fn test_ground_state() {
        let params = AtomParams::default();
        let radial = radial_wavefunction(1, 0, &params, &r()).unwrap();
        let expected = Expr::from(2)
            * z().pow(Expr::rational(3, 2))
            * a0().pow(Expr::rational(-3, 2))
            * (-(z() * r()) / a0()).exp();
        assert_eq!(radial, expected);

        let radial = radial_wavefunction(1, 0, &AtomParams::atomic_units(), &r()).unwrap();
        assert_eq!(radial, Expr::from(2) * (-r()).exp());
    }

    #[test]
    fn test_series_length() {
        let params = AtomParams::atomic_units();
        for n in 1..=5 {
            for l in 0..n {
                let b = series_coefficients(n, l, &params).unwrap();
                assert_eq!(b.len(), (n - l) as usize);
            }
        }
    }

    #[test]
    fn test_recurrence_matches_closed_form() {
        let params = AtomParams::default();
        for n in 1..=4 {
            for l in 0..n {
                let b = series_coefficients(n, l, &params).unwrap();
                assert_eq!(b[0], leading_coefficient(n, l, &params).unwrap());
                let kappa = decay_constant(n, &params);
                for (j, bj) in b.iter().enumerate() {
                    let closed = &b[0]
                        * kappa.clone().powi(j as i64)
                        * Expr::from(series_product(n, l, j as u32));
                    assert_eq!(bj, &closed, "n={n} l={l} j={j}");
                }
            }
        }
    }

    #[test]
    fn test_radial_norm_atomic_units() {
        let params = AtomParams::atomic_units();
        for n in 1..=4 {
            for l in 0..n {
                assert_eq!(radial_norm(n, l, &params).unwrap(), Expr::one(), "n={n} l={l}");
            }
        }
    }

    #[test]
    fn test_radial_norm_symbolic() {
        let params = AtomParams::default();
        for (n, l) in [(1, 0), (2, 1), (3, 0), (3, 2)] {
            assert_eq!(radial_norm(n, l, &params).unwrap(), Expr::one(), "n={n} l={l}");
        }
    }

    #[test]
    fn test_radial_reference_value() {
        let params = AtomParams::atomic_units();
        let radial = radial_wavefunction(3, 2, &params, &Expr::rational(3, 2)).unwrap();
        let value = radial.eval_real(&Bindings::new()).unwrap();
        assert!((value - 0.012304).abs() < 1e-6, "R(3,2,1.5) = {value}");
    }
}
