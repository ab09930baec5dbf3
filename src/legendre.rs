//! Associated Legendre functions P_l^|m|(w), without the Condon-Shortley phase.
//!
//! `associated_legendre` writes out the (l+|m|)-th derivative of (w²-1)^l term by term:
//!
//! ```text
//! P_l^|m|(w) = (1-w²)^(|m|/2) / (2^l l!) · Σ_{j=⌈(l+|m|)/2⌉}^{l} (-1)^(l-j) C(l,j) (2j)!/(2j-l-|m|)! w^(2j-l-|m|)
//! ```
//!
//! The Rodrigues form that differentiates symbolically is kept alongside to check it against.

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::combinatorics::{binomial, factorial, falling_factorial};
use crate::error::{OrbitalError, Result};
use crate::symbolic::Expr;
use crate::variables;

pub(crate) fn validate(l: u32, m: i32) -> Result<()> {
    if m.unsigned_abs() > l {
        return Err(OrbitalError::MagneticOutOfRange { l, m });
    }
    Ok(())
}

/// 1 / (2^l l!)
fn rodrigues_scale(l: u32) -> Expr {
    let denom = BigInt::from(2u32).pow(l) * factorial(l);
    Expr::from(BigRational::new(BigInt::from(1u32), denom))
}

/// (1-w²)^(|m|/2)
fn envelope(m_abs: u32, w: &Expr) -> Expr {
    (Expr::one() - w.clone().powi(2)).pow(Expr::rational(m_abs, 2))
}

/// P_l^|m|(w) as a finite sum; no symbolic differentiation involved.
pub fn associated_legendre(l: u32, m: i32, w: &Expr) -> Result<Expr> {
    validate(l, m)?;
    let m_abs = m.unsigned_abs();
    let order = l + m_abs;

    let mut terms = Vec::with_capacity((l + 1) as usize);
    for j in ((order + 1) / 2)..=l {
        let mut coefficient = binomial(l, j) * falling_factorial(2 * j, order);
        if (l - j) % 2 == 1 {
            coefficient = -coefficient;
        }
        terms.push(Expr::from(coefficient) * w.clone().powi(i64::from(2 * j - order)));
    }

    Ok(Expr::product([
        rodrigues_scale(l),
        envelope(m_abs, w),
        Expr::sum(terms),
    ]))
}

/// P_l^|m|(w) = (1-w²)^(|m|/2) / (2^l l!) · d^(l+|m|)/dw^(l+|m|) (w²-1)^l
pub(crate) fn associated_legendre_rodrigues(l: u32, m: i32, w: &Expr) -> Result<Expr> {
    validate(l, m)?;
    let m_abs = m.unsigned_abs();
    let x = variables::w();

    let mut derivative = (x.to_expr().powi(2) - Expr::one()).powi(i64::from(l));
    for _ in 0..(l + m_abs) {
        // keep the intermediate a flat polynomial
        derivative = derivative.diff(x).expand();
    }

    Ok(Expr::product([
        rodrigues_scale(l),
        envelope(m_abs, w),
        derivative.subs(x, w),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Bindings;

    fn w() -> Expr {
        variables::w().to_expr()
    }

    #[test]
    fn test_low_orders() {
        assert_eq!(associated_legendre(0, 0, &w()).unwrap(), Expr::one());
        assert_eq!(associated_legendre(1, 0, &w()).unwrap(), w());
        // P_2 = (3w² - 1)/2
        let p2 = (Expr::from(3) * w().powi(2) - Expr::one()) / Expr::from(2);
        assert_eq!(associated_legendre(2, 0, &w()).unwrap().expand(), p2.expand());
        // P_1^1 = sqrt(1-w²), no phase
        let p11 = (Expr::one() - w().powi(2)).sqrt();
        assert_eq!(associated_legendre(1, -1, &w()).unwrap(), p11);
    }

    #[test]
    fn test_forms_agree() {
        for l in 0..=6u32 {
            for m in -(l as i32)..=(l as i32) {
                let sum = associated_legendre(l, m, &w()).unwrap();
                let direct = associated_legendre_rodrigues(l, m, &w()).unwrap();
                assert!((sum - direct).expand().is_zero(), "l={l} m={m}");
            }
        }
    }

    #[test]
    fn test_forms_agree_at_cos_theta() {
        let arg = variables::theta().to_expr().cos();
        let sum = associated_legendre(3, 2, &arg).unwrap();
        let direct = associated_legendre_rodrigues(3, 2, &arg).unwrap();
        assert!((sum - direct).expand().is_zero());
    }

    #[test]
    fn test_sign_alternates() {
        // P_3^1(w) = (3/2)(5w² - 1) sqrt(1-w²)
        let value = associated_legendre(3, 1, &w())
            .unwrap()
            .eval_real(&Bindings::new().with(variables::w(), 0.5))
            .unwrap();
        let expected = 1.5 * (5. * 0.25 - 1.) * (0.75f64).sqrt();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_large_order() {
        assert!(matches!(
            associated_legendre(2, 3, &w()),
            Err(OrbitalError::MagneticOutOfRange { l: 2, m: 3 })
        ));
        assert!(associated_legendre_rodrigues(1, -2, &w()).is_err());
    }
}
