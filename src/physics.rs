//! Hydrogen-like atom wave functions ψ_nlm(r, θ, φ) = R_nl(r) Y_lm(θ, φ)
//! Every formula is exact; parameters and coordinates are passed in, never global.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::angular;
use crate::config::{AtomParams, Coordinates};
use crate::error::Result;
use crate::legendre;
use crate::radial::{self, radial_wavefunction};
use crate::symbolic::Expr;

/// Represents quantum numbers (n, l, m_l)
/// n: Principal quantum number (1, 2, 3, ...)
/// l: Azimuthal quantum number (0 to n-1)
/// m_l: Magnetic quantum number (-l to l)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumNumbers {
    pub n: u32,
    pub l: u32,
    pub m_l: i32,
}

/// Which part of T_m(φ) = exp(i m φ)/sqrt(2π) enters a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngularBasis {
    Complex,
    /// cos(m φ)/sqrt(2π)
    Real,
    /// sin(m φ)/sqrt(2π)
    Imaginary,
}

impl AngularBasis {
    pub fn from_query(value: Option<&str>) -> Self {
        match value.unwrap_or("complex").to_lowercase().as_str() {
            "real" | "re" => AngularBasis::Real,
            "imag" | "imaginary" | "im" => AngularBasis::Imaginary,
            _ => AngularBasis::Complex,
        }
    }
}

impl QuantumNumbers {
    pub fn new(n: u32, l: u32, m_l: i32) -> Result<Self> {
        radial::validate(n, l)?;
        legendre::validate(l, m_l)?;
        Ok(QuantumNumbers { n, l, m_l })
    }
}

/// ψ_nlm = R_nl Y_lm
pub fn wavefunction(qn: QuantumNumbers, params: &AtomParams, coords: &Coordinates) -> Result<Expr> {
    wavefunction_basis(qn, params, coords, AngularBasis::Complex)
}

/// R_nl · Re(Y_lm)
pub fn wavefunction_real(
    qn: QuantumNumbers,
    params: &AtomParams,
    coords: &Coordinates,
) -> Result<Expr> {
    wavefunction_basis(qn, params, coords, AngularBasis::Real)
}

/// R_nl · Im(Y_lm)
pub fn wavefunction_imag(
    qn: QuantumNumbers,
    params: &AtomParams,
    coords: &Coordinates,
) -> Result<Expr> {
    wavefunction_basis(qn, params, coords, AngularBasis::Imaginary)
}

pub fn wavefunction_basis(
    qn: QuantumNumbers,
    params: &AtomParams,
    coords: &Coordinates,
    basis: AngularBasis,
) -> Result<Expr> {
    let radial = radial_wavefunction(qn.n, qn.l, params, &coords.r)?;
    let angular =
        angular::spherical_harmonic_basis(qn.l, qn.m_l, &coords.theta, &coords.phi, basis)?;
    Ok(radial * angular)
}

/// |ψ|² = R² S² / (2π)
pub fn probability_density(
    qn: QuantumNumbers,
    params: &AtomParams,
    coords: &Coordinates,
) -> Result<Expr> {
    let radial = radial_wavefunction(qn.n, qn.l, params, &coords.r)?;
    let polar = angular::polar_part(qn.l, qn.m_l, &coords.theta)?;
    let two_pi = Expr::from(2) * Expr::pi();
    Ok(Expr::product([radial.clone(), radial, polar.clone(), polar, two_pi.recip()]))
}

/// Every factor of one orbital, as written out by the demo binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Orbital {
    pub quantum_numbers: QuantumNumbers,
    pub basis: AngularBasis,
    pub radial: Expr,
    pub polar: Expr,
    pub azimuthal: Expr,
    pub harmonic: Expr,
    pub wavefunction: Expr,
}

impl Orbital {
    pub fn generate(
        qn: QuantumNumbers,
        params: &AtomParams,
        coords: &Coordinates,
        basis: AngularBasis,
    ) -> Result<Self> {
        let radial = radial_wavefunction(qn.n, qn.l, params, &coords.r)?;
        let polar = angular::polar_part(qn.l, qn.m_l, &coords.theta)?;
        let azimuthal = angular::azimuthal_part_basis(qn.m_l, &coords.phi, basis);
        let harmonic = &polar * &azimuthal;
        let wavefunction = &radial * &harmonic;
        debug!("generated orbital {qn:?} in {basis:?} basis");
        Ok(Orbital {
            quantum_numbers: qn,
            basis,
            radial,
            polar,
            azimuthal,
            harmonic,
            wavefunction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrbitalError;
    use crate::symbolic::Bindings;
    use crate::variables;

    #[test]
    fn test_quantum_numbers() {
        assert!(QuantumNumbers::new(1, 0, 0).is_ok());
        assert!(QuantumNumbers::new(2, 1, -1).is_ok());
        assert!(QuantumNumbers::new(2, 1, 0).is_ok());
        assert!(QuantumNumbers::new(2, 1, 1).is_ok());

        assert!(matches!(
            QuantumNumbers::new(0, 0, 0),
            Err(OrbitalError::InvalidPrincipal(0))
        ));
        assert!(matches!(
            QuantumNumbers::new(2, 2, 0),
            Err(OrbitalError::AngularOutOfRange { .. })
        ));
        assert!(matches!(
            QuantumNumbers::new(2, 1, 2),
            Err(OrbitalError::MagneticOutOfRange { .. })
        ));
    }

    #[test]
    fn test_angular_basis_from_query() {
        assert_eq!(AngularBasis::from_query(None), AngularBasis::Complex);
        assert_eq!(AngularBasis::from_query(Some("Real")), AngularBasis::Real);
        assert_eq!(AngularBasis::from_query(Some("imag")), AngularBasis::Imaginary);
        assert_eq!(AngularBasis::from_query(Some("other")), AngularBasis::Complex);
    }

    #[test]
    fn test_ground_state_wavefunction() {
        let qn = QuantumNumbers::new(1, 0, 0).unwrap();
        let coords = Coordinates::default();
        let psi = wavefunction(qn, &AtomParams::atomic_units(), &coords).unwrap();
        // 2 e^{-r} / sqrt(4π) = e^{-r} / sqrt(π)
        let expected = Expr::pi().sqrt().recip() * (-variables::r().to_expr()).exp();
        assert_eq!(psi, expected);
    }

    #[test]
    fn test_real_plus_imag_matches_complex() {
        let qn = QuantumNumbers::new(3, 2, -1).unwrap();
        let params = AtomParams::atomic_units();
        let coords = Coordinates::default();
        let psi = wavefunction(qn, &params, &coords).unwrap();
        let re = wavefunction_real(qn, &params, &coords).unwrap();
        let im = wavefunction_imag(qn, &params, &coords).unwrap();

        let b = Bindings::new()
            .with(variables::r(), 2.5)
            .with(variables::theta(), 1.1)
            .with(variables::phi(), 0.4);
        let value = psi.eval(&b).unwrap();
        assert!((value.re - re.eval_real(&b).unwrap()).abs() < 1e-12);
        assert!((value.im - im.eval_real(&b).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_probability_density_is_modulus_squared() {
        let qn = QuantumNumbers::new(2, 1, 1).unwrap();
        let params = AtomParams::atomic_units();
        let coords = Coordinates::default();
        let psi = wavefunction(qn, &params, &coords).unwrap();
        let density = probability_density(qn, &params, &coords).unwrap();

        let b = Bindings::new()
            .with(variables::r(), 1.7)
            .with(variables::theta(), 0.8)
            .with(variables::phi(), 2.0);
        let value = psi.eval(&b).unwrap().norm_sqr();
        assert!((value - density.eval_real(&b).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_psi_real_reference_value() {
        let qn = QuantumNumbers::new(3, 2, -2).unwrap();
        let coords = Coordinates::new(
            Expr::rational(3, 2),
            Expr::pi() / Expr::from(5),
            Expr::pi() / Expr::from(7),
        );
        let value = wavefunction_real(qn, &AtomParams::atomic_units(), &coords)
            .unwrap()
            .eval_real(&Bindings::new())
            .unwrap();
        assert!((value - 0.001024).abs() < 5e-7, "psiReal = {value}");
    }

    #[test]
    fn test_orbital_generate() {
        let qn = QuantumNumbers::new(2, 1, 0).unwrap();
        let orbital = Orbital::generate(
            qn,
            &AtomParams::default(),
            &Coordinates::default(),
            AngularBasis::Real,
        )
        .unwrap();
        assert_eq!(orbital.wavefunction, &orbital.radial * &orbital.harmonic);
        let json = serde_json::to_value(&orbital).unwrap();
        assert_eq!(json["basis"], "real");
        assert_eq!(json["quantum_numbers"]["n"], 2);
    }
}
