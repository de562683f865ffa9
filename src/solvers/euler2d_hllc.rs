use crate::context::SimulationContext;
use crate::error::Error;
use crate::field::Field;
use crate::hydro::euler2d::{self, Conserved, NUM_FIELDS};
use crate::hydro::geometry::Direction;
use crate::output::OutputSink;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Lower bound on the global signal speed, so a quiescent field still yields a
/// finite time step.
pub const MIN_SIGNAL_SPEED: f64 = 1e-16;

/// Tolerance on the comparison that decides whether an output is due.
pub const OUTPUT_TIME_TOLERANCE: f64 = 1e-10;

/// Summary of a call to [`Solver::run`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunReport {
    pub iterations: u64,
    pub time: f64,
    pub outputs: u64,
    pub interrupted: bool,
}

/// A first-order Godunov scheme for the 2D Euler equations on a uniform mesh:
/// HLLC fluxes on interior faces, zero-gradient outflow on the domain edges,
/// and forward-Euler time advance with a CFL-limited step size.
///
pub struct Solver {
    context: SimulationContext,
    conserved: Field,
    updated: Field,
    flux_i: Field,
    flux_j: Field,
    time: f64,
    iteration: u64,
    next_output_time: f64,
}

impl Solver {
    pub fn new(context: SimulationContext, conserved: Field) -> Result<Self, Error> {
        context.validate()?;

        let (ni, nj) = context.mesh.size;

        if conserved.dim() != (ni, nj) {
            return Err(Error::InvalidGridConfig(format!(
                "state field has shape {:?}, mesh has {:?}",
                conserved.dim(),
                context.mesh.size
            )));
        }
        Ok(Self {
            updated: Field::zeros((ni, nj)),
            flux_i: Field::zeros((ni + 1, nj)),
            flux_j: Field::zeros((ni, nj + 1)),
            context,
            conserved,
            time: 0.0,
            iteration: 0,
            next_output_time: 0.0,
        })
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn conserved(&self) -> &Field {
        &self.conserved
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn is_finished(&self) -> bool {
        self.time >= self.context.end_time
    }

    /// The CFL-limited step size for the current state, clipped so the step
    /// does not overshoot the end time.
    pub fn time_step_size(&self) -> f64 {
        let gamma = self.context.gamma_law_index;
        let max_speed = max_signal_speed(&self.conserved, gamma);
        let dt = self.context.cfl_number * self.context.mesh.min_spacing() / max_speed;
        dt.min(self.context.end_time - self.time)
    }

    /// Advance the solution by one step and return the step size that was
    /// taken. If the updated field contains a zone with non-positive density
    /// or pressure, the step is discarded and the solver is left as it was.
    pub fn advance(&mut self) -> Result<f64, Error> {
        let gamma = self.context.gamma_law_index;
        let (dx, dy) = self.context.mesh.cell_spacing();
        let remaining = self.context.end_time - self.time;
        let dt = self.time_step_size();

        compute_flux(&self.conserved, Direction::X, gamma, &mut self.flux_i);
        compute_flux(&self.conserved, Direction::Y, gamma, &mut self.flux_j);
        apply_update(
            &self.conserved,
            &self.flux_i,
            &self.flux_j,
            dt / dx,
            dt / dy,
            &mut self.updated,
        );

        if let Some(index) = first_non_physical_zone(&self.updated, gamma) {
            let prim = Conserved::from_slice(self.updated.get_slice(index)).recover_primitive(gamma);
            return Err(Error::NonPhysicalState {
                index,
                iteration: self.iteration + 1,
                time: self.time + dt,
                mass_density: prim.mass_density(),
                gas_pressure: prim.gas_pressure(),
            });
        }
        std::mem::swap(&mut self.conserved, &mut self.updated);

        if dt >= remaining {
            self.time = self.context.end_time;
        } else {
            self.time += dt;
        }
        self.iteration += 1;
        Ok(dt)
    }

    /// Whether the current time has reached the next scheduled output.
    pub fn output_due(&self) -> bool {
        self.time >= self.next_output_time - OUTPUT_TIME_TOLERANCE
    }

    /// Advance until the end time, sending the state to `sink` once per output
    /// interval. The `stop` flag is polled between steps; when it is raised
    /// the run ends early and the report is marked as interrupted.
    pub fn run(&mut self, sink: &mut dyn OutputSink, stop: &AtomicBool) -> Result<RunReport, Error> {
        let mut outputs = 0;
        let mut interrupted = false;

        info!(
            "run from t={:.4} to t={:.4} on {}x{} zones",
            self.time, self.context.end_time, self.context.mesh.size.0, self.context.mesh.size.1
        );

        while !self.is_finished() {
            if stop.load(Ordering::Relaxed) {
                warn!("interrupted at iteration {} t={:.4}", self.iteration, self.time);
                interrupted = true;
                break;
            }
            let dt = self.advance()?;

            debug!("[{}] t={:.6} dt={:.3e}", self.iteration, self.time, dt);

            if self.output_due() {
                sink.write(
                    &self.conserved,
                    self.time,
                    self.iteration,
                    &self.context.mesh,
                    self.context.gamma_law_index,
                )?;
                info!("[{}] t={:.4} output {}", self.iteration, self.time, outputs);
                outputs += 1;
                self.next_output_time += self.context.output_interval;
            }
        }

        Ok(RunReport {
            iterations: self.iteration,
            time: self.time,
            outputs,
            interrupted,
        })
    }
}

// ============================================================================
/// The largest value of `max(|u| + a, |v| + a)` over all zones, floored at
/// [`MIN_SIGNAL_SPEED`].
pub fn max_signal_speed(conserved: &Field, gamma_law_index: f64) -> f64 {
    conserved
        .data()
        .par_chunks_exact(NUM_FIELDS)
        .map(|u| {
            Conserved::from_slice(u)
                .recover_primitive(gamma_law_index)
                .max_signal_speed(gamma_law_index)
        })
        .reduce(|| MIN_SIGNAL_SPEED, f64::max)
}

/// Fill the face fluxes normal to `direction`. The flux field has one more
/// zone than the state field along that axis. Faces on the domain edges take
/// the physical flux of the adjacent zone (an outflow condition).
pub fn compute_flux(conserved: &Field, direction: Direction, gamma_law_index: f64, flux: &mut Field) {
    let (ni, nj) = conserved.dim();
    let stride = flux.row_stride();

    let zone = |i: usize, j: usize| Conserved::from_slice(conserved.get_slice((i, j)));

    flux.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(i, row)| {
            for (j, f) in row.chunks_exact_mut(NUM_FIELDS).enumerate() {
                let face = match direction {
                    Direction::X if i == 0 => zone(0, j).flux_vector(direction, gamma_law_index),
                    Direction::X if i == ni => zone(ni - 1, j).flux_vector(direction, gamma_law_index),
                    Direction::X => euler2d::riemann_hllc(zone(i - 1, j), zone(i, j), direction, gamma_law_index),
                    Direction::Y if j == 0 => zone(i, 0).flux_vector(direction, gamma_law_index),
                    Direction::Y if j == nj => zone(i, nj - 1).flux_vector(direction, gamma_law_index),
                    Direction::Y => euler2d::riemann_hllc(zone(i, j - 1), zone(i, j), direction, gamma_law_index),
                };
                face.write_to_slice(f)
            }
        });
}

/// Conservative update `u' = u - dt/dx (f[i+1] - f[i]) - dt/dy (g[j+1] -
/// g[j])`, written into `updated`.
pub fn apply_update(
    conserved: &Field,
    flux_i: &Field,
    flux_j: &Field,
    dt_dx: f64,
    dt_dy: f64,
    updated: &mut Field,
) {
    let stride = updated.row_stride();
    let fi = flux_i.data();
    let fj = flux_j.data();
    let fi_stride = flux_i.row_stride();
    let fj_stride = flux_j.row_stride();

    updated
        .data_mut()
        .par_chunks_mut(stride)
        .zip(conserved.data().par_chunks(stride))
        .enumerate()
        .for_each(|(i, (row1, row0))| {
            let fim = &fi[i * fi_stride..(i + 1) * fi_stride];
            let fip = &fi[(i + 1) * fi_stride..(i + 2) * fi_stride];
            let fj_row = &fj[i * fj_stride..(i + 1) * fj_stride];

            for (j, (u1, u0)) in row1
                .chunks_exact_mut(NUM_FIELDS)
                .zip(row0.chunks_exact(NUM_FIELDS))
                .enumerate()
            {
                let s = j * NUM_FIELDS;
                for n in 0..NUM_FIELDS {
                    u1[n] = u0[n]
                        - (fip[s + n] - fim[s + n]) * dt_dx
                        - (fj_row[s + NUM_FIELDS + n] - fj_row[s + n]) * dt_dy;
                }
            }
        });
}

/// Return the first zone (in row-major order) whose density or pressure is
/// not strictly positive, or which contains a non-finite value.
pub fn first_non_physical_zone(conserved: &Field, gamma_law_index: f64) -> Option<(usize, usize)> {
    let nj = conserved.dim().1;

    conserved
        .data()
        .par_chunks_exact(NUM_FIELDS)
        .position_first(|u| {
            u.iter().any(|x| !x.is_finite())
                || Conserved::from_slice(u).to_primitive(gamma_law_index).is_err()
        })
        .map(|n| (n / nj, n % nj))
}
