#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

use std::fmt;

pub mod clip;
pub mod curve;
pub mod dom;
pub mod fill;
pub mod geom;
pub mod path;
pub mod primitive;
pub mod shape;
pub mod transform;

pub use dom::{convert, Element};
pub use geom::Point;
pub use primitive::Primitive;
pub use transform::Transform;

/// The error type for this crate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A flattening tolerance that was zero, negative, or not finite.
    InvalidTolerance(f64),
    /// A fixed segment count of zero.
    InvalidSegmentCount,
    /// A radius that was zero, negative, or not finite.
    InvalidRadius(f64),
    /// A fill step that was zero, negative, or not finite.
    InvalidStep(f64),
    /// A configuration field that failed validation.
    InvalidConfig(&'static str),
    /// The document root was not an `svg` element.
    NotAnSvgDocument,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTolerance(tol) => {
                write!(f, "flattening tolerance must be positive, got {tol}")
            }
            Error::InvalidSegmentCount => {
                write!(f, "segment count must be at least one")
            }
            Error::InvalidRadius(r) => {
                write!(f, "radius must be positive, got {r}")
            }
            Error::InvalidStep(step) => {
                write!(f, "fill step must be positive, got {step}")
            }
            Error::InvalidConfig(field) => {
                write!(f, "{field} must be positive and finite")
            }
            Error::NotAnSvgDocument => {
                write!(f, "the document root is not an svg element")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Conversion parameters, validated at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Maximum distance between a flattened polyline and the true curve.
    pub tolerance: f64,
    /// Width of the working area; primitives are clipped to it.
    pub width: f64,
    /// Height of the working area.
    pub height: f64,
    /// Spacing between adjacent fill passes.
    pub fill_step: f64,
}

impl Config {
    /// Builds a configuration, rejecting non-positive or non-finite fields.
    pub fn new(tolerance: f64, width: f64, height: f64, fill_step: f64) -> Result<Config, Error> {
        fn check(value: f64, field: &'static str) -> Result<(), Error> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(Error::InvalidConfig(field))
            }
        }
        check(tolerance, "tolerance")?;
        check(width, "width")?;
        check(height, "height")?;
        check(fill_step, "fill step")?;
        Ok(Config {
            tolerance,
            width,
            height,
            fill_step,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn config_validates_every_field() {
        assert!(Config::new(0.1, 200.0, 100.0, 1.0).is_ok());
        assert_matches!(
            Config::new(0.0, 200.0, 100.0, 1.0),
            Err(Error::InvalidConfig("tolerance"))
        );
        assert_matches!(
            Config::new(0.1, -200.0, 100.0, 1.0),
            Err(Error::InvalidConfig("width"))
        );
        assert_matches!(
            Config::new(0.1, 200.0, f64::NAN, 1.0),
            Err(Error::InvalidConfig("height"))
        );
        assert_matches!(
            Config::new(0.1, 200.0, 100.0, f64::INFINITY),
            Err(Error::InvalidConfig("fill step"))
        );
    }
}
