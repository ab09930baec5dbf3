//! Exact closed-form wave functions of hydrogen-like atoms.
//!
//! ```
//! use hydrogenic::{radial_wavefunction, AtomParams};
//!
//! let r = hydrogenic::variables::r().to_expr();
//! let ground = radial_wavefunction(1, 0, &AtomParams::atomic_units(), &r).unwrap();
//! assert_eq!(ground.to_string(), "2*exp(-r)");
//! ```

pub mod angular;
pub mod combinatorics;
pub mod config;
pub mod error;
pub mod legendre;
pub mod logger;
pub mod physics;
pub mod radial;
pub mod symbolic;
pub mod variables;

pub use angular::{
    azimuthal_part, azimuthal_part_imag, azimuthal_part_real, polar_part, spherical_harmonic,
    spherical_harmonic_imag, spherical_harmonic_real,
};
pub use config::{AtomParams, Coordinates};
pub use error::{OrbitalError, Result};
pub use legendre::associated_legendre;
pub use physics::{
    probability_density, wavefunction, wavefunction_basis, wavefunction_imag, wavefunction_real,
    AngularBasis, Orbital, QuantumNumbers,
};
pub use radial::{radial_norm, radial_wavefunction};
pub use symbolic::{Bindings, Expr, Symbol};
