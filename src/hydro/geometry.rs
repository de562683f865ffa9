/**
 * Enum to hold a unit vector in the plane. The normal direction of a cell
 * interface selects which velocity component is normal and which one is
 * tangential.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    X,
    Y,
}

// ============================================================================
impl Direction {
    pub fn along(&self, other: Direction) -> f64 {
        if *self == other {
            1.0
        } else {
            0.0
        }
    }

    /// The in-plane direction perpendicular to this one.
    pub fn transverse(&self) -> Direction {
        match self {
            Direction::X => Direction::Y,
            Direction::Y => Direction::X,
        }
    }
}

// ============================================================================
#[cfg(test)]
mod test {

    use super::Direction;

    #[test]
    fn unit_vectors_are_orthonormal() {
        assert_eq!(Direction::X.along(Direction::X), 1.0);
        assert_eq!(Direction::X.along(Direction::Y), 0.0);
        assert_eq!(Direction::Y.along(Direction::Y), 1.0);
        assert_eq!(Direction::X.transverse(), Direction::Y);
        assert_eq!(Direction::Y.transverse().transverse(), Direction::Y);
    }
}
