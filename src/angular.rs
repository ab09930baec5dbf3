//! Angular factors: S_lm(θ), T_m(φ) and their product, the spherical harmonic Y_lm(θ, φ).

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::combinatorics::factorial;
use crate::error::Result;
use crate::legendre::{self, associated_legendre};
use crate::physics::AngularBasis;
use crate::symbolic::Expr;

/// sqrt((2l+1)/2 · (l-|m|)! / (l+|m|)!)
fn polar_norm(l: u32, m_abs: u32) -> Expr {
    let numer = BigInt::from(2 * l + 1) * factorial(l - m_abs);
    let denom = BigInt::from(2u32) * factorial(l + m_abs);
    Expr::from(BigRational::new(numer, denom)).sqrt()
}

/// 1 / sqrt(2π)
fn azimuthal_norm() -> Expr {
    (Expr::from(2) * Expr::pi()).sqrt().recip()
}

/// S_lm(θ) = sqrt((2l+1)/2 · (l-|m|)!/(l+|m|)!) · P_l^|m|(cos θ)
///
/// Depends on m only through |m|.
pub fn polar_part(l: u32, m: i32, theta: &Expr) -> Result<Expr> {
    legendre::validate(l, m)?;
    let legendre = associated_legendre(l, m, &theta.clone().cos())?;
    Ok(polar_norm(l, m.unsigned_abs()) * legendre)
}

/// T_m(φ) = exp(i m φ) / sqrt(2π)
pub fn azimuthal_part(m: i32, phi: &Expr) -> Expr {
    let phase = Expr::imaginary_unit() * Expr::from(m) * phi.clone();
    azimuthal_norm() * phase.exp()
}

/// cos(m φ) / sqrt(2π)
pub fn azimuthal_part_real(m: i32, phi: &Expr) -> Expr {
    azimuthal_norm() * (Expr::from(m) * phi.clone()).cos()
}

/// sin(m φ) / sqrt(2π)
pub fn azimuthal_part_imag(m: i32, phi: &Expr) -> Expr {
    azimuthal_norm() * (Expr::from(m) * phi.clone()).sin()
}

/// Azimuthal factor in the requested basis.
pub fn azimuthal_part_basis(m: i32, phi: &Expr, basis: AngularBasis) -> Expr {
    match basis {
        AngularBasis::Complex => azimuthal_part(m, phi),
        AngularBasis::Real => azimuthal_part_real(m, phi),
        AngularBasis::Imaginary => azimuthal_part_imag(m, phi),
    }
}

/// Y_lm(θ, φ) = S_lm(θ) T_m(φ)
pub fn spherical_harmonic(l: u32, m: i32, theta: &Expr, phi: &Expr) -> Result<Expr> {
    spherical_harmonic_basis(l, m, theta, phi, AngularBasis::Complex)
}

pub fn spherical_harmonic_real(l: u32, m: i32, theta: &Expr, phi: &Expr) -> Result<Expr> {
    spherical_harmonic_basis(l, m, theta, phi, AngularBasis::Real)
}

pub fn spherical_harmonic_imag(l: u32, m: i32, theta: &Expr, phi: &Expr) -> Result<Expr> {
    spherical_harmonic_basis(l, m, theta, phi, AngularBasis::Imaginary)
}

pub fn spherical_harmonic_basis(
    l: u32,
    m: i32,
    theta: &Expr,
    phi: &Expr,
    basis: AngularBasis,
) -> Result<Expr> {
    let polar = polar_part(l, m, theta)?;
    Ok(polar * azimuthal_part_basis(m, phi, basis))
}
