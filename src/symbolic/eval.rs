//! Floating-point evaluation, used to check generated formulas against reference values.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::ToPrimitive;

use super::expr::{Constant, Expr, Function, Symbol};
use crate::error::{OrbitalError, Result};

/// Values substituted for symbols during evaluation.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    values: BTreeMap<Symbol, Complex64>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: &Symbol, value: f64) -> Self {
        self.values.insert(symbol.clone(), Complex64::new(value, 0.));
        self
    }

    pub fn with_complex(mut self, symbol: &Symbol, value: Complex64) -> Self {
        self.values.insert(symbol.clone(), value);
        self
    }

    pub fn get(&self, symbol: &Symbol) -> Option<Complex64> {
        self.values.get(symbol).copied()
    }
}

fn rational_to_f64(value: &BigRational) -> f64 {
    match (value.numer().to_f64(), value.denom().to_f64()) {
        (Some(n), Some(d)) => n / d,
        _ => f64::NAN,
    }
}

impl Expr {
    pub fn eval(&self, bindings: &Bindings) -> Result<Complex64> {
        let value = match self {
            Expr::Number(value) => Complex64::new(rational_to_f64(value), 0.),
            Expr::Constant(Constant::Pi) => Complex64::new(PI, 0.),
            Expr::Constant(Constant::I) => Complex64::i(),
            Expr::Symbol(s) => bindings
                .get(s)
                .ok_or_else(|| OrbitalError::UnboundSymbol(s.name().to_string()))?,
            Expr::Add(terms) => {
                let mut total = Complex64::new(0., 0.);
                for term in terms {
                    total += term.eval(bindings)?;
                }
                total
            }
            Expr::Mul(factors) => {
                let mut total = Complex64::new(1., 0.);
                for factor in factors {
                    total *= factor.eval(bindings)?;
                }
                total
            }
            Expr::Pow(base, exponent) => {
                let b = base.eval(bindings)?;
                if let Some(k) = exponent.as_number().filter(|e| e.is_integer()) {
                    match k.to_integer().to_i32() {
                        Some(k) => b.powi(k),
                        None => b.powc(exponent.eval(bindings)?),
                    }
                } else {
                    let e = exponent.eval(bindings)?;
                    if b.im == 0. && b.re >= 0. && e.im == 0. {
                        Complex64::new(b.re.powf(e.re), 0.)
                    } else {
                        b.powc(e)
                    }
                }
            }
            Expr::Func(function, arg) => {
                let a = arg.eval(bindings)?;
                match function {
                    Function::Exp => a.exp(),
                    Function::Log => a.ln(),
                    Function::Sin => a.sin(),
                    Function::Cos => a.cos(),
                }
            }
        };
        Ok(value)
    }

    /// Real part of [`Expr::eval`].
    pub fn eval_real(&self, bindings: &Bindings) -> Result<f64> {
        Ok(self.eval(bindings)?.re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_eval_polynomial() {
        let x = Symbol::real("x");
        let e = x.to_expr().powi(2) * Expr::rational(3, 2) - Expr::one();
        let v = e.eval_real(&Bindings::new().with(&x, 2.)).unwrap();
        assert!((v - 5.).abs() < EPSILON);
    }

    #[test]
    fn test_eval_radical_and_pi() {
        let e = (Expr::from(2) * Expr::pi()).sqrt().recip();
        let v = e.eval_real(&Bindings::new()).unwrap();
        assert!((v - 1. / (2. * PI).sqrt()).abs() < EPSILON);
    }

    #[test]
    fn test_eval_euler() {
        let phi = Symbol::real("phi");
        let e = (Expr::imaginary_unit() * phi.to_expr()).exp();
        let v = e.eval(&Bindings::new().with(&phi, PI / 3.)).unwrap();
        assert!((v.re - 0.5).abs() < EPSILON);
        assert!((v.im - (PI / 3.).sin()).abs() < EPSILON);
    }

    #[test]
    fn test_eval_unbound_symbol() {
        let e = Symbol::positive("Z").to_expr();
        match e.eval(&Bindings::new()) {
            Err(OrbitalError::UnboundSymbol(name)) => assert_eq!(name, "Z"),
            other => panic!("expected unbound symbol, got {other:?}"),
        }
    }
}
