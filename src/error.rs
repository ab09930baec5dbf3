//! Typed errors for orbital generation.
//!
//! Invalid quantum numbers are rejected up front instead of producing
//! negative factorials or empty coefficient ranges further down.

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, OrbitalError>;

#[derive(Debug, thiserror::Error)]
pub enum OrbitalError {
    #[error("principal quantum number must be at least 1, got {0}")]
    InvalidPrincipal(u32),

    #[error("angular quantum number l = {l} must be below n = {n}")]
    AngularOutOfRange { n: u32, l: u32 },

    #[error("magnetic quantum number m = {m} exceeds l = {l} in magnitude")]
    MagneticOutOfRange { l: u32, m: i32 },

    #[error("no value bound for symbol `{0}`")]
    UnboundSymbol(String),

    #[error("cannot integrate over [0, inf): {0}")]
    UnsupportedIntegrand(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_angular_out_of_range() {
        let err = OrbitalError::AngularOutOfRange { n: 2, l: 2 };
        assert_eq!(err.to_string(), "angular quantum number l = 2 must be below n = 2");
    }

    #[test]
    fn test_display_magnetic_out_of_range() {
        let err = OrbitalError::MagneticOutOfRange { l: 1, m: -2 };
        assert!(err.to_string().contains("m = -2"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: OrbitalError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("json:"));
    }
}
