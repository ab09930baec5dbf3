//! Default indeterminates shared by every generator.
//! Z, a0 and r are positive; the angles and the Legendre argument are real.

use once_cell::sync::Lazy;

use crate::symbolic::Symbol;

static NUCLEAR_CHARGE: Lazy<Symbol> = Lazy::new(|| Symbol::positive("Z"));
static BOHR_RADIUS: Lazy<Symbol> = Lazy::new(|| Symbol::positive("a0"));
static RADIUS: Lazy<Symbol> = Lazy::new(|| Symbol::positive("r"));
static POLAR: Lazy<Symbol> = Lazy::new(|| Symbol::real("theta"));
static AZIMUTH: Lazy<Symbol> = Lazy::new(|| Symbol::real("phi"));
static LEGENDRE_ARG: Lazy<Symbol> = Lazy::new(|| Symbol::real("w"));

/// Nuclear charge `Z`
pub fn z() -> &'static Symbol {
    &NUCLEAR_CHARGE
}

/// Bohr radius `a0`
pub fn a0() -> &'static Symbol {
    &BOHR_RADIUS
}

pub fn r() -> &'static Symbol {
    &RADIUS
}

pub fn theta() -> &'static Symbol {
    &POLAR
}

pub fn phi() -> &'static Symbol {
    &AZIMUTH
}

/// Argument of the associated Legendre function before `cos(theta)` is substituted.
pub fn w() -> &'static Symbol {
    &LEGENDRE_ARG
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Domain;

    #[test]
    fn test_domains() {
        assert_eq!(z().domain(), Domain::Positive);
        assert_eq!(a0().domain(), Domain::Positive);
        assert_eq!(r().domain(), Domain::Positive);
        assert_eq!(theta().domain(), Domain::Real);
        assert_eq!(phi().domain(), Domain::Real);
        assert_eq!(w().domain(), Domain::Real);
    }

    #[test]
    fn test_symbols_are_shared() {
        assert_eq!(z(), &Symbol::positive("Z"));
        assert_eq!(a0().name(), "a0");
    }
}
