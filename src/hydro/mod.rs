//! Equations of gas dynamics: state vectors, the ideal-gas equation of state,
//! physical fluxes and approximate Riemann solvers.

pub mod error;
pub mod euler2d;
pub mod geometry;
