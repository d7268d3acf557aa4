//! Linear scale mapping from a data domain to a target size range.
//!
//! Key properties:
//! - Strictly monotonic over the domain interior when the target range is
//!   non-degenerate.
//! - Clamped to `factor * target_min` / `factor * target_max` outside the
//!   domain.
//! - A zero-width domain is a construction error, never a NaN at map time.

/// Raw uncertainty values above this are treated as this value.
pub const UNCERTAINTY_CAP: f64 = 50.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScaleError {
    DegenerateDomain { min: f64, max: f64 },
}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::DegenerateDomain { min, max } => {
                write!(f, "scale domain [{min}, {max}] has zero width")
            }
        }
    }
}

impl std::error::Error for ScaleError {}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScaleMap {
    domain: [f64; 2],
    target: [f64; 2],
    factor: f64,
}

impl ScaleMap {
    pub fn new(domain: [f64; 2], target: [f64; 2], factor: f64) -> Result<Self, ScaleError> {
        if domain[0] == domain[1] || !(domain[1] - domain[0]).is_finite() {
            return Err(ScaleError::DegenerateDomain {
                min: domain[0],
                max: domain[1],
            });
        }
        Ok(ScaleMap {
            domain,
            target,
            factor,
        })
    }

    pub fn map(&self, value: f64) -> f64 {
        let t = (value - self.domain[0]) / (self.domain[1] - self.domain[0]);
        let t = t.clamp(0.0, 1.0);
        self.factor * (self.target[0] + (self.target[1] - self.target[0]) * t)
    }
}

/// Scales a raw uncertainty magnitude, capping it at [`UNCERTAINTY_CAP`].
pub fn uncertainty_scale(value: f64, factor: f64) -> f64 {
    value.min(UNCERTAINTY_CAP) * factor
}
