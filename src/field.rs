use crate::hydro::euler2d::NUM_FIELDS;

/**
 * A field is a mapping from a rectangular `(0..ni, 0..nj)` index space to a
 * fixed number of values per zone. The mapping is backed by a contiguous
 * array in row-major order (the final index increases fastest), so zone
 * `(i, j)` starts at offset `(i * nj + j) * NUM_FIELDS`.
 *
 * The same container holds cell-centered conserved states (`nx x ny`) and
 * face-centered fluxes (`(nx + 1) x ny` or `nx x (ny + 1)`).
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    dim: (usize, usize),
    data: Vec<f64>,
}

impl Field {
    /**
     * Generate a field filled with zeros.
     */
    pub fn zeros(dim: (usize, usize)) -> Self {
        Self {
            dim,
            data: vec![0.0; dim.0 * dim.1 * NUM_FIELDS],
        }
    }

    /**
     * Generate a field with values defined from a closure of the zone index.
     */
    pub fn from_function<F>(dim: (usize, usize), f: F) -> Self
    where
        F: Fn((usize, usize)) -> [f64; NUM_FIELDS],
    {
        let data = (0..dim.0)
            .flat_map(|i| (0..dim.1).map(move |j| (i, j)))
            .flat_map(|index| f(index).to_vec())
            .collect();
        Self { dim, data }
    }

    /**
     * Return the number of zones on each axis.
     */
    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    /**
     * Return the number of zones.
     */
    pub fn len(&self) -> usize {
        self.dim.0 * self.dim.1
    }

    /**
     * Return the linear offset of the first value for the given zone.
     */
    pub fn row_major_offset(&self, index: (usize, usize)) -> usize {
        self.validate_index(index);
        (index.0 * self.dim.1 + index.1) * NUM_FIELDS
    }

    pub fn get_slice(&self, index: (usize, usize)) -> &[f64] {
        let s = self.row_major_offset(index);
        &self.data[s..s + NUM_FIELDS]
    }

    pub fn get_slice_mut(&mut self, index: (usize, usize)) -> &mut [f64] {
        let s = self.row_major_offset(index);
        &mut self.data[s..s + NUM_FIELDS]
    }

    /**
     * Return the flat backing array.
     */
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /**
     * Iterate over the zones in row-major order, yielding one slice of
     * `NUM_FIELDS` values per zone.
     */
    pub fn iter_data(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(NUM_FIELDS)
    }

    /**
     * Iterate over the zone indexes in the same order as `iter_data`.
     */
    pub fn indexes(&self) -> impl Iterator<Item = (usize, usize)> {
        let (ni, nj) = self.dim;
        (0..ni).flat_map(move |i| (0..nj).map(move |j| (i, j)))
    }

    /**
     * The number of values in one row (fixed `i`) of the backing array.
     */
    pub fn row_stride(&self) -> usize {
        self.dim.1 * NUM_FIELDS
    }

    fn validate_index(&self, index: (usize, usize)) {
        if index.0 >= self.dim.0 || index.1 >= self.dim.1 {
            panic!(
                "index ({} {}) out of range on field (0..{} 0..{})",
                index.0, index.1, self.dim.0, self.dim.1
            );
        }
    }
}

// ============================================================================
#[cfg(test)]
mod test {

    use super::Field;

    #[test]
    fn field_layout_is_row_major() {
        let field = Field::from_function((3, 5), |(i, j)| [i as f64, j as f64, 0.0, 1.0]);
        assert_eq!(field.len(), 15);
        assert_eq!(field.row_stride(), 20);
        assert_eq!(field.row_major_offset((1, 2)), 28);
        assert_eq!(field.get_slice((2, 4)), &[2.0, 4.0, 0.0, 1.0]);
        assert_eq!(field.iter_data().count(), 15);

        for (index, slice) in field.indexes().zip(field.iter_data()) {
            assert_eq!(slice[0], index.0 as f64);
            assert_eq!(slice[1], index.1 as f64);
        }
    }

    #[test]
    fn mutable_slices_address_a_single_zone() {
        let mut field = Field::zeros((2, 2));
        field.get_slice_mut((1, 0)).copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(field.data()[8..12], [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(field.data().iter().sum::<f64>(), 10.0);
    }

    #[test]
    #[should_panic]
    fn out_of_range_access_panics() {
        let field = Field::zeros((2, 2));
        field.get_slice((2, 0));
    }
}
