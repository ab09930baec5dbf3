//! Text output: SymPy-compatible source via `Display`, and LaTeX.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed};

use super::expr::{Constant, Expr, Function, Symbol};

// Binding strength of the printed form.
const ADD: u8 = 1;
const MUL: u8 = 2;
const POW: u8 = 3;
const ATOM: u8 = 4;

/// A term split into sign, numerator factors and denominator factors.
struct Fraction {
    negative: bool,
    numer: Vec<Expr>,
    denom: Vec<Expr>,
}

fn fraction(e: &Expr) -> Fraction {
    let factors: Vec<Expr> = match e {
        Expr::Mul(factors) => factors.clone(),
        other => vec![other.clone()],
    };
    let mut out = Fraction {
        negative: false,
        numer: Vec::new(),
        denom: Vec::new(),
    };
    for factor in factors {
        match factor {
            Expr::Number(value) => {
                out.negative = value.is_negative();
                let numer = value.numer().abs();
                if !numer.is_one() {
                    out.numer.push(Expr::integer(numer));
                }
                if !value.denom().is_one() {
                    out.denom.push(Expr::integer(value.denom().clone()));
                }
            }
            Expr::Pow(base, exponent) if exponent.has_negative_sign() => {
                let inverted = -exponent.as_ref();
                if inverted.is_one() {
                    out.denom.push(*base);
                } else {
                    out.denom.push(Expr::Pow(base, Box::new(inverted)));
                }
            }
            other => out.numer.push(other),
        }
    }
    out
}

/// Sum terms in print order: positive terms before negative ones, each group
/// in descending structural order.
fn ordered_terms(terms: &[Expr]) -> Vec<&Expr> {
    let mut ordered: Vec<&Expr> = terms.iter().rev().collect();
    ordered.sort_by_key(|t| t.has_negative_sign());
    ordered
}

fn is_inverse_power(e: &Expr) -> bool {
    matches!(e, Expr::Pow(_, exponent) if exponent.has_negative_sign())
}

fn unit_fraction_denominator(exponent: &Expr) -> Option<BigInt> {
    match exponent.as_number() {
        Some(value) if value.numer().is_one() && !value.is_integer() => Some(value.denom().clone()),
        _ => None,
    }
}

fn number_precedence(value: &BigRational) -> u8 {
    if value.is_negative() {
        ADD
    } else if !value.is_integer() {
        MUL
    } else {
        ATOM
    }
}

fn wrap(text: String, own: u8, outer: u8) -> String {
    if own < outer {
        format!("({text})")
    } else {
        text
    }
}

fn plain(e: &Expr, outer: u8) -> String {
    match e {
        Expr::Number(value) => wrap(value.to_string(), number_precedence(value), outer),
        Expr::Constant(Constant::Pi) => "pi".to_string(),
        Expr::Constant(Constant::I) => "I".to_string(),
        Expr::Symbol(s) => s.name().to_string(),
        Expr::Add(terms) => {
            let mut text = String::new();
            for (i, term) in ordered_terms(terms).into_iter().enumerate() {
                if i == 0 {
                    text.push_str(&plain(term, ADD));
                } else if term.has_negative_sign() {
                    text.push_str(" - ");
                    text.push_str(&plain(&-term, ADD));
                } else {
                    text.push_str(" + ");
                    text.push_str(&plain(term, ADD));
                }
            }
            wrap(text, ADD, outer)
        }
        Expr::Mul(_) => plain_fraction(e, outer),
        Expr::Pow(..) if is_inverse_power(e) => plain_fraction(e, outer),
        Expr::Pow(base, exponent) => {
            if exponent.as_number() == Some(&BigRational::new(1.into(), 2.into())) {
                return format!("sqrt({})", plain(base, 0));
            }
            let text = format!("{}**{}", plain(base, ATOM), plain(exponent, ATOM));
            wrap(text, POW, outer)
        }
        Expr::Func(function, arg) => format!("{}({})", function.name(), plain(arg, 0)),
    }
}

fn plain_fraction(e: &Expr, outer: u8) -> String {
    let Fraction {
        negative,
        numer,
        denom,
    } = fraction(e);

    let (mut text, mut own) = match numer.as_slice() {
        [] => ("1".to_string(), ATOM),
        [single] => (plain(single, MUL), precedence(single)),
        many => {
            let parts: Vec<String> = many.iter().map(|f| plain(f, MUL)).collect();
            (parts.join("*"), MUL)
        }
    };
    match denom.as_slice() {
        [] => {}
        [single] => {
            text = format!("{text}/{}", plain(single, POW));
            own = MUL;
        }
        many => {
            let parts: Vec<String> = many.iter().map(|f| plain(f, MUL)).collect();
            text = format!("{text}/({})", parts.join("*"));
            own = MUL;
        }
    }
    if negative {
        text = format!("-{text}");
        own = ADD;
    }
    wrap(text, own, outer)
}

fn precedence(e: &Expr) -> u8 {
    match e {
        Expr::Number(value) => number_precedence(value),
        Expr::Add(_) => ADD,
        Expr::Mul(_) => MUL,
        Expr::Pow(_, exponent) => {
            if is_inverse_power(e) {
                MUL
            } else if unit_fraction_denominator(exponent).map_or(false, |q| q == BigInt::from(2)) {
                ATOM
            } else {
                POW
            }
        }
        Expr::Constant(_) | Expr::Symbol(_) | Expr::Func(..) => ATOM,
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&plain(self, 0))
    }
}

const GREEK: [&str; 24] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega",
];

fn latex_symbol(symbol: &Symbol) -> String {
    let name = symbol.name();
    let split = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (stem, index) = name.split_at(split);
    let stem = if GREEK.contains(&stem) {
        format!("\\{stem}")
    } else {
        stem.to_string()
    };
    if index.is_empty() || stem.is_empty() {
        stem + index
    } else {
        format!("{stem}_{{{index}}}")
    }
}

fn latex_number(value: &BigRational) -> String {
    let sign = if value.is_negative() { "-" } else { "" };
    if value.is_integer() {
        value.to_string()
    } else {
        format!("{sign}\\frac{{{}}}{{{}}}", value.numer().abs(), value.denom())
    }
}

fn latex_wrap(text: String, own: u8, outer: u8) -> String {
    if own < outer {
        format!("\\left({text}\\right)")
    } else {
        text
    }
}

fn latex(e: &Expr, outer: u8) -> String {
    match e {
        Expr::Number(value) => latex_wrap(latex_number(value), number_precedence(value).max(MUL), outer),
        Expr::Constant(Constant::Pi) => "\\pi".to_string(),
        Expr::Constant(Constant::I) => "i".to_string(),
        Expr::Symbol(s) => latex_symbol(s),
        Expr::Add(terms) => {
            let mut text = String::new();
            for (i, term) in ordered_terms(terms).into_iter().enumerate() {
                if i == 0 {
                    text.push_str(&latex(term, ADD));
                } else if term.has_negative_sign() {
                    text.push_str(" - ");
                    text.push_str(&latex(&-term, ADD));
                } else {
                    text.push_str(" + ");
                    text.push_str(&latex(term, ADD));
                }
            }
            latex_wrap(text, ADD, outer)
        }
        Expr::Mul(_) => latex_fraction(e, outer),
        Expr::Pow(..) if is_inverse_power(e) => latex_fraction(e, outer),
        Expr::Pow(base, exponent) => match unit_fraction_denominator(exponent) {
            Some(q) if q == BigInt::from(2) => format!("\\sqrt{{{}}}", latex(base, 0)),
            Some(q) => format!("\\sqrt[{q}]{{{}}}", latex(base, 0)),
            None => {
                let text = format!("{}^{{{}}}", latex(base, ATOM), latex(exponent, 0));
                latex_wrap(text, POW, outer)
            }
        },
        Expr::Func(Function::Exp, arg) => format!("e^{{{}}}", latex(arg, 0)),
        Expr::Func(function, arg) => {
            format!("\\{}{{\\left({} \\right)}}", function.name(), latex(arg, 0))
        }
    }
}

fn latex_fraction(e: &Expr, outer: u8) -> String {
    let Fraction {
        negative,
        numer,
        denom,
    } = fraction(e);

    let join = |factors: &[Expr]| -> String {
        if factors.is_empty() {
            return "1".to_string();
        }
        let parts: Vec<String> = factors.iter().map(|f| latex(f, MUL)).collect();
        parts.join(" ")
    };

    let mut text = if denom.is_empty() {
        join(&numer)
    } else {
        format!("\\frac{{{}}}{{{}}}", join(&numer), join(&denom))
    };
    let mut own = MUL;
    if negative {
        text = format!("-{text}");
        own = ADD;
    }
    latex_wrap(text, own, outer)
}

impl Expr {
    pub fn to_latex(&self) -> String {
        latex(self, 0)
    }
}
