//! Atom parameters and coordinates passed explicitly to every generator.
//! Values are exact: integers, fractions, decimals (read as exact fractions) or symbol names.

use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use regex::Regex;
use serde::Deserialize;

use crate::error::{OrbitalError, Result};
use crate::symbolic::{Expr, Symbol};
use crate::variables;

/// Nuclear charge and Bohr radius.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomParams {
    pub z: Expr,
    pub a0: Expr,
}

impl Default for AtomParams {
    /// Free symbols `Z` and `a0`.
    fn default() -> Self {
        AtomParams {
            z: variables::z().to_expr(),
            a0: variables::a0().to_expr(),
        }
    }
}

/// Raw value as it appears in a parameter file: `1`, `0.529`, `"1/2"`, `"Zeff"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParamValue {
    Number(serde_json::Number),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamFile {
    #[serde(default, alias = "Z")]
    z: Option<ParamValue>,
    #[serde(default)]
    a0: Option<ParamValue>,
}

impl AtomParams {
    pub fn new(z: Expr, a0: Expr) -> Self {
        AtomParams { z, a0 }
    }

    /// Z = 1, a0 = 1
    pub fn atomic_units() -> Self {
        AtomParams::new(Expr::one(), Expr::one())
    }

    /// Reads `{"z": ..., "a0": ...}`. Missing keys keep the free symbol.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: ParamFile = serde_json::from_str(text)?;
        let mut params = AtomParams::default();
        if let Some(value) = file.z {
            params.z = value.into_expr()?;
        }
        if let Some(value) = file.a0 {
            params.a0 = value.into_expr()?;
        }
        Ok(params)
    }

    /// Applies a single `name=value` override such as `Z=2` or `a0=0.529`.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<()> {
        let (name, value) = assignment.split_once('=').ok_or_else(|| {
            OrbitalError::InvalidParameter(format!("expected name=value, got `{assignment}`"))
        })?;
        let value = parse_value(value)?;
        match name.trim() {
            "Z" | "z" => self.z = value,
            "a0" => self.a0 = value,
            other => {
                return Err(OrbitalError::InvalidParameter(format!(
                    "unknown parameter `{other}`"
                )))
            }
        }
        Ok(())
    }
}

impl ParamValue {
    fn into_expr(self) -> Result<Expr> {
        match self {
            ParamValue::Number(number) => parse_value(&number.to_string()),
            ParamValue::Text(text) => parse_value(&text),
        }
    }
}

/// Parses an exact value: `p/q`, a decimal with optional exponent, or an identifier.
pub fn parse_value(text: &str) -> Result<Expr> {
    let re = Regex::new(
        r"^\s*(?:(?P<num>[+-]?\d+)\s*/\s*(?P<den>\d+)|(?P<mant>[+-]?(?:\d+\.?\d*|\.\d+))(?:[eE](?P<exp>[+-]?\d+))?|(?P<sym>[A-Za-z_][A-Za-z0-9_]*))\s*$",
    )
    .map_err(|e| OrbitalError::InvalidParameter(format!("regex: {e}")))?;
    let caps = re
        .captures(text)
        .ok_or_else(|| OrbitalError::InvalidParameter(format!("cannot parse `{text}`")))?;

    if let (Some(num), Some(den)) = (caps.name("num"), caps.name("den")) {
        let num = parse_int(num.as_str())?;
        let den = parse_int(den.as_str())?;
        if den.is_zero() {
            return Err(OrbitalError::InvalidParameter(format!("zero denominator in `{text}`")));
        }
        return Ok(Expr::from(BigRational::new(num, den)));
    }
    if let Some(mantissa) = caps.name("mant") {
        let exponent = match caps.name("exp") {
            Some(e) => e
                .as_str()
                .parse::<i32>()
                .map_err(|e| OrbitalError::InvalidParameter(format!("exponent in `{text}`: {e}")))?,
            None => 0,
        };
        return parse_decimal(mantissa.as_str(), exponent).map(Expr::from);
    }
    match caps.name("sym") {
        Some(name) => Ok(Symbol::positive(name.as_str()).to_expr()),
        None => Err(OrbitalError::InvalidParameter(format!("cannot parse `{text}`"))),
    }
}

fn parse_int(text: &str) -> Result<BigInt> {
    BigInt::from_str(text.trim_start_matches('+'))
        .map_err(|e| OrbitalError::InvalidParameter(format!("`{text}`: {e}")))
}

/// `mantissa * 10^exponent` as an exact fraction.
fn parse_decimal(mantissa: &str, exponent: i32) -> Result<BigRational> {
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let negative = int_part.starts_with('-');
    let digits: String = int_part
        .trim_start_matches(['+', '-'])
        .chars()
        .chain(frac_part.chars())
        .collect();
    let mut value = BigRational::from_integer(parse_int(if digits.is_empty() { "0" } else { &digits })?);

    let shift = exponent - frac_part.len() as i32;
    let scale = BigRational::from_integer(BigInt::from(10u32).pow(shift.unsigned_abs()));
    if shift >= 0 {
        value *= scale;
    } else {
        value /= scale;
    }
    if negative {
        value = -value;
    }
    Ok(value)
}

/// Spherical coordinates at which a wave function is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub r: Expr,
    pub theta: Expr,
    pub phi: Expr,
}

impl Default for Coordinates {
    fn default() -> Self {
        Coordinates {
            r: variables::r().to_expr(),
            theta: variables::theta().to_expr(),
            phi: variables::phi().to_expr(),
        }
    }
}

impl Coordinates {
    pub fn new(r: Expr, theta: Expr, phi: Expr) -> Self {
        Coordinates { r, theta, phi }
    }
}
