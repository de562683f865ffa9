use crate::hydro;
use std::error;
use std::fmt;

#[derive(Debug)]

/**
 * Errors raised while setting up, advancing, or writing out a simulation.
 */
pub enum Error {
    InvalidGridConfig(String),
    NonPhysicalState {
        index: (usize, usize),
        iteration: u64,
        time: f64,
        mass_density: f64,
        gas_pressure: f64,
    },
    Hydro(hydro::error::Error),
    Io(std::io::Error),
    Encode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            InvalidGridConfig(reason) => write!(fmt, "invalid grid configuration: {}", reason),
            NonPhysicalState {
                index,
                iteration,
                time,
                mass_density,
                gas_pressure,
            } => write!(
                fmt,
                "non-physical state in zone ({}, {}) at iteration {} (t={:.6}): density={} pressure={}",
                index.0, index.1, iteration, time, mass_density, gas_pressure
            ),
            Hydro(e) => write!(fmt, "{}", e),
            Io(e) => write!(fmt, "i/o error: {}", e),
            Encode(reason) => write!(fmt, "could not encode snapshot: {}", reason),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Hydro(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<hydro::error::Error> for Error {
    fn from(e: hydro::error::Error) -> Self {
        Error::Hydro(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
