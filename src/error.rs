// src/error.rs

use thiserror::Error;

/// fov_checker error type
#[derive(Error, Debug)]
pub enum FovError {
    /// A caller-supplied value is outside the range the geometry is defined for.
    #[error("invalid argument `{name}` = {value}: expected {expected}")]
    InvalidArgument {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for FovError {
    fn from(e: toml::de::Error) -> Self {
        FovError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FovError>;

/// Fails with [`FovError::InvalidArgument`] unless `check` holds for `value`.
pub(crate) fn ensure(
    name: &'static str,
    value: f64,
    expected: &'static str,
    check: impl FnOnce(f64) -> bool,
) -> Result<()> {
    if value.is_finite() && check(value) {
        Ok(())
    } else {
        Err(FovError::InvalidArgument {
            name,
            value,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_rejects_nan_even_when_check_passes() {
        assert!(ensure("tilt_deg", f64::NAN, "[0, 90]", |_| true).is_err());
    }

    #[test]
    fn invalid_argument_message_names_the_field() {
        let err = ensure("pan_deg", 200.0, "[0, 180]", |v| v <= 180.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument `pan_deg` = 200: expected [0, 180]"
        );
    }
}
