use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A simple rectilinear structured mesh, covering the rectangle `[0, Lx] x
/// [0, Ly]` with uniformly spaced zones.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub area: (Range<f64>, Range<f64>),
    pub size: (usize, usize),
}

impl Mesh {
    /// Create a mesh with `nx x ny` zones over a domain of size `lx x ly`.
    /// Zone counts and extents must be strictly positive.
    pub fn new(nx: i64, ny: i64, lx: f64, ly: f64) -> Result<Self, Error> {
        if nx <= 0 || ny <= 0 {
            return Err(Error::InvalidGridConfig(format!(
                "zone counts must be positive, got {} x {}",
                nx, ny
            )));
        }
        let mesh = Self {
            area: (0.0..lx, 0.0..ly),
            size: (nx as usize, ny as usize),
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Check that the mesh has at least one zone along each axis and a
    /// finite, strictly positive extent. Meshes assembled field by field or
    /// deserialized go through this before any stepping.
    pub fn validate(&self) -> Result<(), Error> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(Error::InvalidGridConfig(format!(
                "zone counts must be positive, got {} x {}",
                self.size.0, self.size.1
            )));
        }
        let lx = self.area.0.end - self.area.0.start;
        let ly = self.area.1.end - self.area.1.start;

        if !(lx > 0.0 && lx.is_finite()) || !(ly > 0.0 && ly.is_finite()) {
            return Err(Error::InvalidGridConfig(format!(
                "domain extents must be positive, got {} x {}",
                lx, ly
            )));
        }
        Ok(())
    }

    pub fn cell_spacing(&self) -> (f64, f64) {
        let d0 = (self.area.0.end - self.area.0.start) / self.size.0 as f64;
        let d1 = (self.area.1.end - self.area.1.start) / self.size.1 as f64;
        (d0, d1)
    }

    /// The smaller of the two zone spacings; the length scale in the CFL
    /// condition.
    pub fn min_spacing(&self) -> f64 {
        let (dx, dy) = self.cell_spacing();
        dx.min(dy)
    }

    pub fn cell_center(&self, index: (usize, usize)) -> (f64, f64) {
        let (d0, d1) = self.cell_spacing();
        let x0 = self.area.0.start + d0 * (index.0 as f64 + 0.5);
        let x1 = self.area.1.start + d1 * (index.1 as f64 + 0.5);
        (x0, x1)
    }

    pub fn cell_centers_x(&self) -> Vec<f64> {
        (0..self.size.0).map(|i| self.cell_center((i, 0)).0).collect()
    }

    pub fn cell_centers_y(&self) -> Vec<f64> {
        (0..self.size.1).map(|j| self.cell_center((0, j)).1).collect()
    }

    /// Coordinate matrices `(X, Y)` with `X[i, j] = x[i]` and `Y[i, j] =
    /// y[j]`, flattened in the same `(i, j)` row-major order as a field.
    pub fn meshgrid(&self) -> (Vec<f64>, Vec<f64>) {
        let x = self.cell_centers_x();
        let y = self.cell_centers_y();
        let xx = x.iter().flat_map(|&xi| std::iter::repeat(xi).take(y.len())).collect();
        let yy = x.iter().flat_map(|_| y.iter().cloned()).collect();
        (xx, yy)
    }

    pub fn total_zones(&self) -> usize {
        self.size.0 * self.size.1
    }
}

// ============================================================================
#[cfg(test)]
mod test {

    use super::Mesh;
    use crate::error::Error;

    #[test]
    fn mesh_rejects_non_positive_configuration() {
        assert!(matches!(Mesh::new(0, 10, 1.0, 1.0), Err(Error::InvalidGridConfig(_))));
        assert!(matches!(Mesh::new(10, -1, 1.0, 1.0), Err(Error::InvalidGridConfig(_))));
        assert!(matches!(Mesh::new(10, 10, 0.0, 1.0), Err(Error::InvalidGridConfig(_))));
        assert!(matches!(Mesh::new(10, 10, 1.0, -2.0), Err(Error::InvalidGridConfig(_))));
        assert!(matches!(Mesh::new(10, 10, f64::NAN, 1.0), Err(Error::InvalidGridConfig(_))));
    }

    #[test]
    fn cell_centers_are_offset_by_half_a_zone() {
        let mesh = Mesh::new(4, 2, 1.0, 2.0).unwrap();
        assert_eq!(mesh.cell_spacing(), (0.25, 1.0));
        assert_eq!(mesh.min_spacing(), 0.25);
        assert_eq!(mesh.cell_centers_x(), vec![0.125, 0.375, 0.625, 0.875]);
        assert_eq!(mesh.cell_centers_y(), vec![0.5, 1.5]);
        assert_eq!(mesh.total_zones(), 8);
    }

    #[test]
    fn meshgrid_follows_the_field_ordering() {
        let mesh = Mesh::new(3, 2, 3.0, 2.0).unwrap();
        let (xx, yy) = mesh.meshgrid();
        assert_eq!(xx, vec![0.5, 0.5, 1.5, 1.5, 2.5, 2.5]);
        assert_eq!(yy, vec![0.5, 1.5, 0.5, 1.5, 0.5, 1.5]);
    }

    #[test]
    fn hand_built_meshes_are_checked_too() {
        let empty = Mesh {
            area: (0.0..1.0, 0.0..1.0),
            size: (0, 3),
        };
        assert!(matches!(empty.validate(), Err(Error::InvalidGridConfig(_))));

        let flat = Mesh {
            area: (0.0..0.0, 0.0..1.0),
            size: (4, 3),
        };
        assert!(matches!(flat.validate(), Err(Error::InvalidGridConfig(_))));

        let inverted = Mesh {
            area: (0.0..1.0, 1.0..0.0),
            size: (4, 3),
        };
        assert!(matches!(inverted.validate(), Err(Error::InvalidGridConfig(_))));
        assert!(Mesh::new(4, 3, 1.0, 1.0).unwrap().validate().is_ok());
    }
}
