/// Mine-local axis-aligned bounds.
///
/// Key properties:
/// - Membership is inclusive on all six faces.
/// - `translate()` recenters the volume at the origin horizontally and puts
///   the top of the mine at z = 0.
/// - Every object derived from a bounds value (filters, render positions)
///   must use the same bounds + translate pair; swapping bounds invalidates
///   all of them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MineBounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoundsError {
    NotFinite,
    Inverted,
}

impl std::fmt::Display for BoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundsError::NotFinite => write!(f, "bounds contain a non-finite extent"),
            BoundsError::Inverted => write!(f, "bounds have min > max on some axis"),
        }
    }
}

impl std::error::Error for BoundsError {}

impl MineBounds {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Result<Self, BoundsError> {
        if min.iter().chain(max.iter()).any(|v| !v.is_finite()) {
            return Err(BoundsError::NotFinite);
        }
        if min[0] > max[0] || min[1] > max[1] || min[2] > max[2] {
            return Err(BoundsError::Inverted);
        }
        Ok(MineBounds { min, max })
    }

    /// Builds bounds from the `[xmin, xmax, ymin, ymax, zmin, zmax]` layout
    /// used by mine plan boundary lists.
    pub fn from_extents(e: [f64; 6]) -> Result<Self, BoundsError> {
        MineBounds::new([e[0], e[2], e[4]], [e[1], e[3], e[5]])
    }

    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        x >= self.min[0]
            && x <= self.max[0]
            && y >= self.min[1]
            && y <= self.max[1]
            && z >= self.min[2]
            && z <= self.max[2]
    }

    /// World-to-render translation: `[-(xmin+xmax)/2, -(ymin+ymax)/2, -zmax]`.
    pub fn translate(&self) -> [f64; 3] {
        [
            -0.5 * (self.min[0] + self.max[0]),
            -0.5 * (self.min[1] + self.max[1]),
            -self.max[2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundsError, MineBounds};

    #[test]
    fn translate_recenters_and_drops_top_to_zero() {
        let b = MineBounds::new([-100.0, -100.0, -50.0], [100.0, 100.0, 50.0]).unwrap();
        assert_eq!(b.translate(), [0.0, 0.0, -50.0]);

        let b = MineBounds::from_extents([0.0, 10.0, 20.0, 40.0, -30.0, -10.0]).unwrap();
        assert_eq!(b.translate(), [-5.0, -30.0, 10.0]);
    }

    #[test]
    fn membership_is_inclusive_on_faces() {
        let b = MineBounds::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]).unwrap();
        assert!(b.contains(0.0, 1.0, 0.5));
        assert!(b.contains(1.0, 0.0, 1.0));
        assert!(!b.contains(1.0000001, 0.5, 0.5));
        assert!(!b.contains(0.5, 0.5, -0.0000001));
    }

    #[test]
    fn rejects_bad_extents() {
        assert_eq!(
            MineBounds::new([0.0, 0.0, 0.0], [f64::NAN, 1.0, 1.0]),
            Err(BoundsError::NotFinite)
        );
        assert_eq!(
            MineBounds::new([2.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
            Err(BoundsError::Inverted)
        );
    }
}
