//! Expression tree and its canonicalising constructors.
//!
//! Every `Expr` is built through [`Expr::sum`], [`Expr::product`], [`Expr::pow`] or
//! [`Expr::apply`], which keep the tree in one normal form: sums and products are flat and
//! sorted, like terms and equal bases are merged, rational constants are folded and numeric
//! radicals are reduced. Two values built from equal parts therefore compare equal with `==`.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use super::numeric::{extract_root, rational_powi, split_power};

/// Value assumption attached to a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    Positive,
    Real,
    Complex,
}

/// A named indeterminate.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol {
    name: Arc<str>,
    domain: Domain,
}

impl Symbol {
    pub fn new(name: &str, domain: Domain) -> Self {
        Self {
            name: Arc::from(name),
            domain,
        }
    }

    pub fn positive(name: &str) -> Self {
        Self::new(name, Domain::Positive)
    }

    pub fn real(name: &str) -> Self {
        Self::new(name, Domain::Real)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn to_expr(&self) -> Expr {
        Expr::Symbol(self.clone())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Constant {
    Pi,
    /// The imaginary unit.
    I,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Function {
    Exp,
    Log,
    Sin,
    Cos,
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Sin => "sin",
            Function::Cos => "cos",
        }
    }
}

/// An exact closed-form expression.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Expr {
    Number(BigRational),
    Constant(Constant),
    Symbol(Symbol),
    Add(Vec<Expr>),
    /// Rational coefficient (when not 1) first, remaining factors sorted.
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Func(Function, Box<Expr>),
}

impl Default for Expr {
    fn default() -> Self {
        Expr::zero()
    }
}

impl Expr {
    pub fn zero() -> Self {
        Expr::Number(BigRational::zero())
    }

    pub fn one() -> Self {
        Expr::Number(BigRational::one())
    }

    pub fn integer<T: Into<BigInt>>(value: T) -> Self {
        Expr::Number(BigRational::from_integer(value.into()))
    }

    /// `numer / denom` in lowest terms. Panics if `denom` is zero.
    pub fn rational<N: Into<BigInt>, D: Into<BigInt>>(numer: N, denom: D) -> Self {
        Expr::Number(BigRational::new(numer.into(), denom.into()))
    }

    pub fn pi() -> Self {
        Expr::Constant(Constant::Pi)
    }

    pub fn imaginary_unit() -> Self {
        Expr::Constant(Constant::I)
    }

    pub fn as_number(&self) -> Option<&BigRational> {
        match self {
            Expr::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Number(value) if value.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Number(value) if value.is_one())
    }

    pub(crate) fn is_integer_number(&self) -> bool {
        matches!(self, Expr::Number(value) if value.is_integer())
    }

    /// Non-negative integer value, if this is one that fits in a `u32`.
    pub(crate) fn as_small_natural(&self) -> Option<u32> {
        match self {
            Expr::Number(value) if value.is_integer() => value.to_integer().to_u32(),
            _ => None,
        }
    }

    /// Rational coefficient of a term: the value of a number, the leading factor of a
    /// product, otherwise 1.
    pub fn coefficient(&self) -> BigRational {
        match self {
            Expr::Number(value) => value.clone(),
            Expr::Mul(factors) => match factors.first() {
                Some(Expr::Number(value)) => value.clone(),
                _ => BigRational::one(),
            },
            _ => BigRational::one(),
        }
    }

    fn into_coefficient_and_term(self) -> (BigRational, Expr) {
        match self {
            Expr::Number(value) => (value, Expr::one()),
            Expr::Mul(mut factors) => {
                if matches!(factors.first(), Some(Expr::Number(_))) {
                    if let Expr::Number(coeff) = factors.remove(0) {
                        return (coeff, Expr::from_factors(factors));
                    }
                }
                (BigRational::one(), Expr::Mul(factors))
            }
            other => (BigRational::one(), other),
        }
    }

    /// Wraps an already canonical, coefficient-free factor list.
    fn from_factors(mut factors: Vec<Expr>) -> Expr {
        match factors.len() {
            0 => Expr::one(),
            1 => factors.swap_remove(0),
            _ => Expr::Mul(factors),
        }
    }

    fn scaled(coeff: BigRational, term: Expr) -> Expr {
        if coeff.is_zero() {
            return Expr::zero();
        }
        if coeff.is_one() {
            return term;
        }
        match term {
            Expr::Number(value) => Expr::Number(coeff * value),
            Expr::Mul(mut factors) => {
                factors.insert(0, Expr::Number(coeff));
                Expr::Mul(factors)
            }
            other => Expr::Mul(vec![Expr::Number(coeff), other]),
        }
    }

    /// Canonical sum.
    pub fn sum<I: IntoIterator<Item = Expr>>(terms: I) -> Expr {
        let mut collected: BTreeMap<Expr, BigRational> = BTreeMap::new();
        let mut pending: Vec<Expr> = terms.into_iter().collect();

        while let Some(term) = pending.pop() {
            if let Expr::Add(inner) = term {
                pending.extend(inner);
                continue;
            }
            let (coeff, rest) = term.into_coefficient_and_term();
            if coeff.is_zero() {
                continue;
            }
            *collected.entry(rest).or_insert_with(BigRational::zero) += coeff;
        }

        let mut terms: Vec<Expr> = collected
            .into_iter()
            .filter(|(_, coeff)| !coeff.is_zero())
            .map(|(rest, coeff)| Expr::scaled(coeff, rest))
            .collect();
        match terms.len() {
            0 => Expr::zero(),
            1 => terms.swap_remove(0),
            _ => Expr::Add(terms),
        }
    }

    /// Canonical product.
    pub fn product<I: IntoIterator<Item = Expr>>(factors: I) -> Expr {
        let mut coeff = BigRational::one();
        let mut radicals: BTreeMap<u32, BigInt> = BTreeMap::new();
        let mut powers: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
        let mut exp_args: Vec<Expr> = Vec::new();
        let mut out: Vec<Expr> = Vec::new();
        let mut pending: Vec<Expr> = factors.into_iter().collect();

        while let Some(factor) = pending.pop() {
            match factor {
                Expr::Number(value) => coeff *= value,
                Expr::Mul(inner) => pending.extend(inner),
                Expr::Func(Function::Exp, arg) => exp_args.push(*arg),
                Expr::Pow(base, exponent) => {
                    let numeric = match (base.as_ref(), exponent.as_ref()) {
                        (Expr::Number(b), Expr::Number(e)) => Some(split_power(b, e)),
                        _ => None,
                    };
                    match numeric {
                        Some(Some((c, q, radicand))) => {
                            coeff *= c;
                            *radicals.entry(q).or_insert_with(BigInt::one) *= radicand;
                        }
                        // Negative base or oversized exponent: kept as written.
                        Some(None) => out.push(Expr::Pow(base, exponent)),
                        None => powers.entry(*base).or_default().push(*exponent),
                    }
                }
                other => powers.entry(other).or_default().push(Expr::one()),
            }
        }
        if coeff.is_zero() {
            return Expr::zero();
        }

        let mut regroup = false;
        for (base, exponents) in powers {
            match base.pow(Expr::sum(exponents)) {
                Expr::Number(value) => coeff *= value,
                Expr::Func(Function::Exp, arg) => exp_args.push(*arg),
                merged @ Expr::Mul(_) => {
                    regroup = true;
                    out.push(merged);
                }
                other => out.push(other),
            }
        }

        if !exp_args.is_empty() {
            match Expr::sum(exp_args).exp() {
                Expr::Number(value) => coeff *= value,
                other => out.push(other),
            }
        }

        for (q, radicand) in radicals {
            let (outside, inside) = extract_root(&radicand, q);
            coeff *= BigRational::from_integer(outside);
            if !inside.is_one() {
                out.push(Expr::Pow(
                    Box::new(Expr::Number(BigRational::from_integer(inside))),
                    Box::new(Expr::rational(1, q)),
                ));
            }
        }

        if regroup {
            out.push(Expr::Number(coeff));
            return Expr::product(out);
        }
        if coeff.is_zero() {
            return Expr::zero();
        }
        out.sort();
        if !coeff.is_one() {
            out.insert(0, Expr::Number(coeff));
        }
        Expr::from_factors(out)
    }

    /// Canonical power.
    pub fn pow(self, exponent: Expr) -> Expr {
        if exponent.is_zero() || self.is_one() {
            return Expr::one();
        }
        if exponent.is_one() {
            return self;
        }
        match (self, exponent) {
            (Expr::Number(base), Expr::Number(exponent)) => Expr::number_pow(base, exponent),
            (Expr::Constant(Constant::I), Expr::Number(exponent)) if exponent.is_integer() => {
                Expr::i_pow(&exponent.to_integer())
            }
            (Expr::Pow(base, inner), outer)
                if outer.is_integer_number()
                    || (base.is_positive() && inner.is_real() && outer.is_real()) =>
            {
                let exponent = Expr::product([*inner, outer]);
                base.pow(exponent)
            }
            (Expr::Mul(factors), exponent)
                if exponent.is_integer_number()
                    || (exponent.is_real() && factors.iter().all(Expr::is_positive)) =>
            {
                Expr::product(factors.into_iter().map(|f| f.pow(exponent.clone())))
            }
            (Expr::Func(Function::Exp, arg), exponent)
                if exponent.is_integer_number() || (arg.is_real() && exponent.is_real()) =>
            {
                Expr::product([*arg, exponent]).exp()
            }
            (base, exponent) => Expr::Pow(Box::new(base), Box::new(exponent)),
        }
    }

    fn number_pow(base: BigRational, exponent: BigRational) -> Expr {
        if exponent.is_integer() {
            return match rational_powi(&base, &exponent.to_integer()) {
                Some(value) => Expr::Number(value),
                None => Expr::Pow(
                    Box::new(Expr::Number(base)),
                    Box::new(Expr::Number(exponent)),
                ),
            };
        }
        if base.is_zero() && exponent.is_positive() {
            return Expr::zero();
        }
        // Radical normal form is produced by `product`.
        Expr::product([Expr::Pow(
            Box::new(Expr::Number(base)),
            Box::new(Expr::Number(exponent)),
        )])
    }

    fn i_pow(k: &BigInt) -> Expr {
        match k.mod_floor(&BigInt::from(4)).to_u32() {
            Some(0) => Expr::one(),
            Some(1) => Expr::imaginary_unit(),
            Some(2) => Expr::integer(-1),
            _ => Expr::Mul(vec![Expr::integer(-1), Expr::imaginary_unit()]),
        }
    }

    pub fn powi(self, k: i64) -> Expr {
        self.pow(Expr::integer(k))
    }

    pub fn sqrt(self) -> Expr {
        self.pow(Expr::rational(1, 2))
    }

    pub fn recip(self) -> Expr {
        self.powi(-1)
    }

    pub fn exp(self) -> Expr {
        Expr::apply(Function::Exp, self)
    }

    pub fn log(self) -> Expr {
        Expr::apply(Function::Log, self)
    }

    pub fn sin(self) -> Expr {
        Expr::apply(Function::Sin, self)
    }

    pub fn cos(self) -> Expr {
        Expr::apply(Function::Cos, self)
    }

    /// Canonical function application.
    pub fn apply(function: Function, arg: Expr) -> Expr {
        match function {
            Function::Exp if arg.is_zero() => Expr::one(),
            Function::Log if arg.is_one() => Expr::zero(),
            Function::Log => match arg {
                Expr::Func(Function::Exp, inner) if inner.is_real() => *inner,
                other => Expr::Func(Function::Log, Box::new(other)),
            },
            Function::Sin if arg.is_zero() => Expr::zero(),
            Function::Cos if arg.is_zero() => Expr::one(),
            // sin is odd, cos is even
            Function::Sin if arg.has_negative_sign() => -Expr::apply(Function::Sin, -arg),
            Function::Cos if arg.has_negative_sign() => Expr::apply(Function::Cos, -arg),
            _ => Expr::Func(function, Box::new(arg)),
        }
    }

    pub(crate) fn has_negative_sign(&self) -> bool {
        !matches!(self, Expr::Add(_)) && self.coefficient().is_negative()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        match self {
            Expr::Number(_) | Expr::Constant(_) => false,
            Expr::Symbol(s) => s == symbol,
            Expr::Add(items) | Expr::Mul(items) => items.iter().any(|e| e.contains(symbol)),
            Expr::Pow(base, exponent) => base.contains(symbol) || exponent.contains(symbol),
            Expr::Func(_, arg) => arg.contains(symbol),
        }
    }

    /// True when the value is known to be a positive real under the symbol assumptions.
    pub fn is_positive(&self) -> bool {
        match self {
            Expr::Number(value) => value.is_positive(),
            Expr::Constant(Constant::Pi) => true,
            Expr::Constant(Constant::I) => false,
            Expr::Symbol(s) => s.domain == Domain::Positive,
            Expr::Add(items) | Expr::Mul(items) => items.iter().all(Expr::is_positive),
            Expr::Pow(base, exponent) => base.is_positive() && exponent.is_real(),
            Expr::Func(Function::Exp, arg) => arg.is_real(),
            Expr::Func(..) => false,
        }
    }

    /// True when the value is known to be real under the symbol assumptions.
    pub fn is_real(&self) -> bool {
        match self {
            Expr::Number(_) | Expr::Constant(Constant::Pi) => true,
            Expr::Constant(Constant::I) => false,
            Expr::Symbol(s) => s.domain != Domain::Complex,
            Expr::Add(items) | Expr::Mul(items) => items.iter().all(Expr::is_real),
            Expr::Pow(base, exponent) => {
                (base.is_positive() && exponent.is_real())
                    || (base.is_real() && exponent.is_integer_number())
            }
            Expr::Func(Function::Log, arg) => arg.is_positive(),
            Expr::Func(_, arg) => arg.is_real(),
        }
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::integer(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::integer(value)
    }
}

impl From<u32> for Expr {
    fn from(value: u32) -> Self {
        Expr::integer(value)
    }
}

impl From<BigInt> for Expr {
    fn from(value: BigInt) -> Self {
        Expr::integer(value)
    }
}

impl From<BigRational> for Expr {
    fn from(value: BigRational) -> Self {
        Expr::Number(value)
    }
}

impl From<Symbol> for Expr {
    fn from(value: Symbol) -> Self {
        Expr::Symbol(value)
    }
}

impl From<&Symbol> for Expr {
    fn from(value: &Symbol) -> Self {
        Expr::Symbol(value.clone())
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::sum([self, rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum([self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::product([self, rhs])
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::product([self, rhs.recip()])
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::product([Expr::integer(-1), self])
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        -self.clone()
    }
}

macro_rules! forward_ref_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<&Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $imp::$method(self, rhs.clone())
            }
        }

        impl $imp<Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $imp::$method(self.clone(), rhs)
            }
        }

        impl $imp<&Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $imp::$method(self.clone(), rhs.clone())
            }
        }
    };
}

forward_ref_binop!(Add, add);
forward_ref_binop!(Sub, sub);
forward_ref_binop!(Mul, mul);
forward_ref_binop!(Div, div);

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Symbol::real("x").to_expr()
    }

    fn y() -> Expr {
        Symbol::real("y").to_expr()
    }

    fn p() -> Expr {
        Symbol::positive("p").to_expr()
    }

    #[test]
    fn test_sum_combines_like_terms() {
        let e = x() + y() + x() * Expr::from(2) - y();
        assert_eq!(e, Expr::from(3) * x());
        assert!((x() - x()).is_zero());
    }

    #[test]
    fn test_sum_is_order_independent() {
        let a = Expr::sum([x(), Expr::from(1), y()]);
        let b = Expr::sum([y(), x(), Expr::from(1)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_product_merges_powers() {
        let e = x() * x().powi(2) / x();
        assert_eq!(e, x().powi(2));
        assert_eq!(x() / x(), Expr::one());
    }

    #[test]
    fn test_product_with_zero() {
        assert!((x() * Expr::zero()).is_zero());
    }

    #[test]
    fn test_rational_folding() {
        let e = Expr::rational(1, 2) + Expr::rational(1, 3);
        assert_eq!(e, Expr::rational(5, 6));
        assert_eq!(Expr::from(2).powi(-3), Expr::rational(1, 8));
    }

    #[test]
    fn test_numeric_radicals() {
        assert_eq!(Expr::from(4).sqrt(), Expr::from(2));
        assert_eq!(Expr::from(8).sqrt(), Expr::from(2) * Expr::from(2).sqrt());
        assert_eq!(Expr::from(2).sqrt() * Expr::from(2).sqrt(), Expr::from(2));
        assert_eq!(Expr::rational(1, 2).sqrt() * Expr::from(2).sqrt(), Expr::one());
        // 1/sqrt(4 pi) == 1/(sqrt(2) sqrt(2 pi))
        let a = (Expr::from(4) * Expr::pi()).sqrt().recip();
        let b = (Expr::from(2).sqrt() * (Expr::from(2) * Expr::pi()).sqrt()).recip();
        assert_eq!(a, b);
    }

    #[test]
    fn test_power_distributes_over_positive_product() {
        let e = (Expr::from(2) * p()).pow(Expr::rational(3, 2));
        let expected = Expr::from(2) * Expr::from(2).sqrt() * p().pow(Expr::rational(3, 2));
        assert_eq!(e, expected);
    }

    #[test]
    fn test_power_keeps_real_product_together() {
        let e = (x() * y()).sqrt();
        assert!(matches!(e, Expr::Pow(..)));
        // integer powers always distribute
        assert_eq!((x() * y()).powi(2), x().powi(2) * y().powi(2));
    }

    #[test]
    fn test_imaginary_unit_powers() {
        let i = Expr::imaginary_unit();
        assert_eq!(i.clone() * i.clone(), Expr::from(-1));
        assert_eq!(i.clone().powi(4), Expr::one());
        assert_eq!(i.clone().powi(3), -Expr::imaginary_unit());
    }

    #[test]
    fn test_exp_factors_merge() {
        let e = x().exp() * y().exp();
        assert_eq!(e, (x() + y()).exp());
        assert_eq!(x().exp() * (-x()).exp(), Expr::one());
        assert_eq!(x().exp().powi(2), (Expr::from(2) * x()).exp());
    }

    #[test]
    fn test_trig_parity() {
        assert_eq!((-x()).cos(), x().cos());
        assert_eq!((-x()).sin(), -x().sin());
        assert_eq!(Expr::zero().cos(), Expr::one());
        assert!(Expr::zero().sin().is_zero());
    }

    #[test]
    fn test_assumptions() {
        assert!(p().is_positive());
        assert!(!x().is_positive());
        assert!(x().is_real());
        assert!((Expr::from(2) * p()).sqrt().is_positive());
        assert!(!Expr::imaginary_unit().is_real());
    }

    #[test]
    fn test_contains() {
        let sx = Symbol::real("x");
        let e = (x() + Expr::from(1)).powi(3) * y().exp();
        assert!(e.contains(&sx));
        assert!(!y().contains(&sx));
    }
}
