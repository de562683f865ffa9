use crate::error::Error;
use crate::mesh::Mesh;
use serde::{Deserialize, Serialize};

/// Run-wide parameters, passed explicitly to every stage of the computation.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationContext {
    pub mesh: Mesh,
    pub gamma_law_index: f64,
    pub cfl_number: f64,
    pub end_time: f64,
    pub output_interval: f64,
}

impl SimulationContext {
    /// Check the mesh and the scalar parameters.
    pub fn validate(&self) -> Result<(), Error> {
        self.mesh.validate()?;

        if !(self.gamma_law_index > 1.0) {
            return Err(Error::InvalidGridConfig(format!(
                "gamma law index must exceed 1, got {}",
                self.gamma_law_index
            )));
        }
        if !(self.cfl_number > 0.0) {
            return Err(Error::InvalidGridConfig(format!(
                "CFL number must be positive, got {}",
                self.cfl_number
            )));
        }
        if !(self.end_time >= 0.0 && self.end_time.is_finite()) {
            return Err(Error::InvalidGridConfig(format!(
                "end time must be non-negative, got {}",
                self.end_time
            )));
        }
        if !(self.output_interval > 0.0) {
            return Err(Error::InvalidGridConfig(format!(
                "output interval must be positive, got {}",
                self.output_interval
            )));
        }
        Ok(())
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self {
            mesh: Mesh {
                area: (0.0..1.0, 0.0..1.0),
                size: (200, 200),
            },
            gamma_law_index: 1.4,
            cfl_number: 0.8,
            end_time: 0.2,
            output_interval: 0.01,
        }
    }
}

// ============================================================================
#[cfg(test)]
mod test {

    use super::SimulationContext;
    use crate::error::Error;
    use crate::mesh::Mesh;

    #[test]
    fn default_context_is_valid() {
        let context = SimulationContext::default();
        assert!(context.validate().is_ok());
        assert_eq!(context.mesh.cell_spacing(), (0.005, 0.005));
    }

    #[test]
    fn bad_scalar_parameters_are_rejected() {
        let bad = |f: fn(&mut SimulationContext)| {
            let mut c = SimulationContext::default();
            f(&mut c);
            c.validate().is_err()
        };
        assert!(bad(|c| c.gamma_law_index = 1.0));
        assert!(bad(|c| c.cfl_number = 0.0));
        assert!(bad(|c| c.end_time = -1.0));
        assert!(bad(|c| c.output_interval = f64::NAN));
    }

    #[test]
    fn context_checks_its_mesh() {
        let context = SimulationContext {
            mesh: Mesh {
                area: (0.0..1.0, 0.0..1.0),
                size: (10, 0),
            },
            ..SimulationContext::default()
        };
        assert!(matches!(context.validate(), Err(Error::InvalidGridConfig(_))));
    }
}
