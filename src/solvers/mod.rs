pub mod config;
pub mod impliedvol;

use crate::core::qm;

/// Solvers iteratively evaluate an objective until it hits zero. A
/// one-dimensional solver looks for a single value, such as a volatility.
pub trait OneDimensionalSolver {
    /// Finds a root of the objective between min and max. These are
    /// normally chosen so that the objective is well behaved within the
    /// range: many pricers are unstable given extreme inputs. If the range
    /// does not bracket the root, an error is returned. The range is never
    /// extended to look for a root elsewhere.
    fn find_root(
        &self,
        objective: &mut dyn FnMut(f64) -> Result<f64, qm::Error>,
        min: f64,
        max: f64,
    ) -> Result<f64, qm::Error>;
}
