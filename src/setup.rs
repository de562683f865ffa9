use crate::error::Error;
use crate::field::Field;
use crate::hydro::euler2d::Primitive;
use crate::mesh::Mesh;
use serde::{Deserialize, Serialize};

/// Velocity range assumed for plotting when the color scale is fixed.
pub const VELOCITY_DISPLAY_RANGE: (f64, f64) = (-0.5, 0.5);

/// Value ranges for each primitive field, used as color limits by renderers.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayRanges {
    pub mass_density: (f64, f64),
    pub velocity_x: (f64, f64),
    pub velocity_y: (f64, f64),
    pub gas_pressure: (f64, f64),
}

/// Riemann-problem initial data: two uniform states separated by the plane
/// `x = split`.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShockTube {
    pub left: Primitive,
    pub right: Primitive,
    pub split: f64,
}

/// The products of the setup stage.
pub struct InitialData {
    pub mesh: Mesh,
    pub conserved: Field,
    pub ranges: DisplayRanges,
}

impl ShockTube {
    /// The Sod problem: `(1, 0, 0, 1)` on the left of `x = 0.5` and `(0.125,
    /// 0, 0, 0.1)` on the right.
    pub fn sod() -> Self {
        Self {
            left: Primitive(1.0, 0.0, 0.0, 1.0),
            right: Primitive(0.125, 0.0, 0.0, 0.1),
            split: 0.5,
        }
    }

    /// The primitive state in the zone whose center is at `x`.
    pub fn primitive_at(&self, x: f64) -> Primitive {
        if x < self.split {
            self.left
        } else {
            self.right
        }
    }

    /// Fill a conserved field on the given mesh. Fails if either state has a
    /// non-positive density or pressure.
    pub fn initial_conserved(&self, mesh: &Mesh, gamma_law_index: f64) -> Result<Field, Error> {
        for state in &[self.left, self.right] {
            state.to_conserved(gamma_law_index).to_primitive(gamma_law_index)?;
        }
        Ok(Field::from_function(mesh.size, |index| {
            self.primitive_at(mesh.cell_center(index).0)
                .to_conserved(gamma_law_index)
                .as_array()
        }))
    }

    /// Density and pressure limits spanning both states, and a fixed
    /// velocity range.
    pub fn display_ranges(&self) -> DisplayRanges {
        let span = |a: f64, b: f64| (a.min(b), a.max(b));
        DisplayRanges {
            mass_density: span(self.left.mass_density(), self.right.mass_density()),
            velocity_x: VELOCITY_DISPLAY_RANGE,
            velocity_y: VELOCITY_DISPLAY_RANGE,
            gas_pressure: span(self.left.gas_pressure(), self.right.gas_pressure()),
        }
    }
}

impl Default for ShockTube {
    fn default() -> Self {
        Self::sod()
    }
}

/// Build the mesh, the initial conserved field and the display ranges.
pub fn setup_grid(
    nx: i64,
    ny: i64,
    lx: f64,
    ly: f64,
    tube: &ShockTube,
    gamma_law_index: f64,
) -> Result<InitialData, Error> {
    let mesh = Mesh::new(nx, ny, lx, ly)?;
    let conserved = tube.initial_conserved(&mesh, gamma_law_index)?;
    let ranges = tube.display_ranges();
    Ok(InitialData {
        mesh,
        conserved,
        ranges,
    })
}

// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::{self, euler2d::Conserved};

    #[test]
    fn sod_setup_places_the_discontinuity_at_the_split() {
        let data = setup_grid(10, 4, 1.0, 1.0, &ShockTube::sod(), 1.4).unwrap();
        assert_eq!(data.conserved.dim(), (10, 4));

        for (index, u) in data.conserved.indexes().zip(data.conserved.iter_data()) {
            let expected = if index.0 < 5 { [1.0, 0.0, 0.0, 2.5] } else { [0.125, 0.0, 0.0, 0.25] };
            for (a, b) in u.iter().zip(expected.iter()) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn moving_states_carry_kinetic_energy() {
        let tube = ShockTube {
            left: Primitive(2.0, 1.0, -1.0, 1.0),
            right: Primitive(1.0, 0.0, 0.0, 1.0),
            split: 0.25,
        };
        let mesh = Mesh::new(4, 1, 1.0, 1.0).unwrap();
        let u = tube.initial_conserved(&mesh, 1.4).unwrap();
        let left = Conserved::from_slice(u.get_slice((0, 0)));
        assert_eq!(left, Conserved(2.0, 2.0, -2.0, 1.0 / (1.4 - 1.0) + 2.0));
        let right = Conserved::from_slice(u.get_slice((1, 0)));
        assert_eq!(right.mass_density(), 1.0);
    }

    #[test]
    fn display_ranges_span_both_states() {
        let ranges = ShockTube::sod().display_ranges();
        assert_eq!(ranges.mass_density, (0.125, 1.0));
        assert_eq!(ranges.gas_pressure, (0.1, 1.0));
        assert_eq!(ranges.velocity_x, (-0.5, 0.5));
        assert_eq!(ranges.velocity_y, (-0.5, 0.5));
    }

    #[test]
    fn setup_rejects_bad_grid_and_bad_states() {
        assert!(matches!(
            setup_grid(0, 10, 1.0, 1.0, &ShockTube::sod(), 1.4),
            Err(Error::InvalidGridConfig(_))
        ));
        let tube = ShockTube {
            right: Primitive(0.125, 0.0, 0.0, -0.1),
            ..ShockTube::sod()
        };
        assert!(matches!(
            setup_grid(10, 10, 1.0, 1.0, &tube, 1.4),
            Err(Error::Hydro(hydro::error::Error::NegativeGasPressure(_)))
        ));
    }
}
