//! Shocktube integrates the 2D compressible Euler equations of an ideal gas
//! on a uniform, cell-centered rectilinear mesh. It uses a first-order
//! finite-volume scheme: HLLC approximate Riemann fluxes on zone faces,
//! zero-gradient outflow on the domain edges, and explicit forward-Euler time
//! steps limited by the CFL condition. The canonical use is the Sod shock
//! tube, which exercises a rarefaction, a contact discontinuity and a shock.

pub mod context;
pub mod error;
pub mod field;
pub mod hydro;
pub mod mesh;
pub mod output;
pub mod setup;
pub mod solvers;
