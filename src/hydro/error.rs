use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]

/**
 * Error to represent invalid hydrodynamics data or primitive variable recovery.
 */
pub enum Error {
    NegativeGasPressure(f64),
    NegativeMassDensity(f64),
    InvalidInputShape(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            NegativeGasPressure(p) => write!(fmt, "negative gas pressure: {}", p),
            NegativeMassDensity(d) => write!(fmt, "negative mass density: {}", d),
            InvalidInputShape(n) => write!(fmt, "invalid input shape: got {} components, expected 4", n),
        }
    }
}

impl error::Error for Error {}
