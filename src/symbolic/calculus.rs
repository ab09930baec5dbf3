//! Differentiation, expansion, substitution and exact moments on `[0, inf)`.

use super::expr::{Expr, Function, Symbol};
use crate::combinatorics::factorial;
use crate::error::{OrbitalError, Result};

impl Expr {
    /// d/dx.
    pub fn diff(&self, x: &Symbol) -> Expr {
        if !self.contains(x) {
            return Expr::zero();
        }
        match self {
            Expr::Number(_) | Expr::Constant(_) => Expr::zero(),
            Expr::Symbol(s) => {
                if s == x {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.diff(x))),
            Expr::Mul(factors) => {
                // product rule
                let mut terms = Vec::with_capacity(factors.len());
                for (i, factor) in factors.iter().enumerate() {
                    let d = factor.diff(x);
                    if d.is_zero() {
                        continue;
                    }
                    let others = factors
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, f)| f.clone());
                    terms.push(Expr::product(others.chain(std::iter::once(d))));
                }
                Expr::sum(terms)
            }
            Expr::Pow(base, exponent) => {
                let base = base.as_ref();
                let exponent = exponent.as_ref();
                if !exponent.contains(x) {
                    // e * b^(e-1) * b'
                    let lowered = base.clone().pow(exponent - &Expr::one());
                    Expr::product([exponent.clone(), lowered, base.diff(x)])
                } else {
                    // b^e * (e' log b + e b' / b)
                    let log_term = exponent.diff(x) * base.clone().log();
                    let ratio_term = exponent * base.diff(x) / base;
                    self * (log_term + ratio_term)
                }
            }
            Expr::Func(function, arg) => {
                let inner = arg.diff(x);
                let outer = match function {
                    Function::Exp => self.clone(),
                    Function::Log => arg.as_ref().clone().recip(),
                    Function::Sin => arg.as_ref().clone().cos(),
                    Function::Cos => -arg.as_ref().clone().sin(),
                };
                outer * inner
            }
        }
    }

    /// k-th derivative.
    pub fn diff_n(&self, x: &Symbol, k: u32) -> Expr {
        let mut out = self.clone();
        for _ in 0..k {
            if out.is_zero() {
                break;
            }
            out = out.diff(x);
        }
        out
    }

    /// Distributes products over sums and expands positive integer powers of sums.
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Number(_) | Expr::Constant(_) | Expr::Symbol(_) => self.clone(),
            Expr::Add(terms) => Expr::sum(terms.iter().map(Expr::expand)),
            Expr::Mul(factors) => {
                let expanded: Vec<Expr> = factors.iter().map(Expr::expand).collect();
                distribute(&expanded)
            }
            Expr::Pow(base, exponent) => {
                let base = base.expand();
                let exponent = exponent.expand();
                let is_sum = matches!(base, Expr::Add(_));
                match exponent.as_small_natural() {
                    Some(k) if is_sum => distribute(&vec![base; k as usize]),
                    _ => base.pow(exponent),
                }
            }
            Expr::Func(function, arg) => Expr::apply(*function, arg.expand()),
        }
    }

    /// Replaces every occurrence of `x` by `value`, re-canonicalising on the way up.
    pub fn subs(&self, x: &Symbol, value: &Expr) -> Expr {
        if !self.contains(x) {
            return self.clone();
        }
        match self {
            Expr::Number(_) | Expr::Constant(_) => self.clone(),
            Expr::Symbol(s) => {
                if s == x {
                    value.clone()
                } else {
                    self.clone()
                }
            }
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.subs(x, value))),
            Expr::Mul(factors) => Expr::product(factors.iter().map(|f| f.subs(x, value))),
            Expr::Pow(base, exponent) => base.subs(x, value).pow(exponent.subs(x, value)),
            Expr::Func(function, arg) => Expr::apply(*function, arg.subs(x, value)),
        }
    }

    /// `∫_0^∞ self dx` for integrands that expand to `Σ c · x^k · exp(-α x)` with `α > 0`
    /// free of `x`. Each term contributes `c · k! / α^(k+1)`.
    pub fn integrate_semi_infinite(&self, x: &Symbol) -> Result<Expr> {
        let expanded = self.expand();
        let terms = match expanded {
            Expr::Add(terms) => terms,
            other => vec![other],
        };

        let mut out = Vec::with_capacity(terms.len());
        for term in terms {
            out.push(moment(term, x)?);
        }
        Ok(Expr::sum(out))
    }
}

/// Multiplies out a list of factors, any of which may be a sum.
fn distribute(factors: &[Expr]) -> Expr {
    let mut terms = vec![Expr::one()];
    for factor in factors {
        let parts: Vec<Expr> = match factor {
            Expr::Add(inner) => inner.clone(),
            other => vec![other.clone()],
        };
        let mut next = Vec::with_capacity(terms.len() * parts.len());
        for term in &terms {
            for part in &parts {
                next.push(term * part);
            }
        }
        terms = next;
    }
    Expr::sum(terms)
}

fn moment(term: Expr, x: &Symbol) -> Result<Expr> {
    let factors = match term {
        Expr::Mul(factors) => factors,
        other => vec![other],
    };

    let mut power: u32 = 0;
    let mut rate: Option<Expr> = None;
    let mut rest = Vec::with_capacity(factors.len());
    for factor in factors {
        if !factor.contains(x) {
            rest.push(factor);
            continue;
        }
        match &factor {
            Expr::Symbol(s) if s == x => power += 1,
            Expr::Pow(base, exponent) if matches!(base.as_ref(), Expr::Symbol(s) if s == x) => {
                match exponent.as_small_natural() {
                    Some(k) => power += k,
                    None => {
                        return Err(OrbitalError::UnsupportedIntegrand(format!(
                            "power {exponent} of {x}"
                        )))
                    }
                }
            }
            Expr::Func(Function::Exp, arg) => {
                let slope = arg.diff(x);
                let offset = (arg.as_ref() - &(&slope * &x.to_expr())).expand();
                if slope.contains(x) || offset.contains(x) {
                    return Err(OrbitalError::UnsupportedIntegrand(format!(
                        "exponent {arg} is not linear in {x}"
                    )));
                }
                rest.push(offset.exp());
                rate = Some(-slope);
            }
            other => {
                return Err(OrbitalError::UnsupportedIntegrand(format!("factor {other}")));
            }
        }
    }

    let rate = match rate {
        Some(rate) if rate.is_positive() => rate,
        _ => {
            return Err(OrbitalError::UnsupportedIntegrand(format!(
                "no decaying exponential in {x}"
            )))
        }
    };
    let value = Expr::integer(factorial(power)) * rate.pow(Expr::integer(-(i64::from(power) + 1)));
    Ok(Expr::product(rest) * value)
}
