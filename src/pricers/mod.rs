pub mod blackscholes;

use crate::instruments::options::OptionParameters;

/// A VolPricer gives the price of an option as a function of a single flat
/// volatility. This is the interface that the implied volatility solver
/// inverts, so implementations should be smooth and free of noise in the
/// volatility, and cheap enough to be called dozens of times per solve.
///
/// Implementations hold no mutable state, so they can be shared between
/// threads and used by several solves at once.
pub trait VolPricer: Sync + Send {
    /// Returns the present value of the option. Never negative.
    fn price(&self, params: &OptionParameters, vol: f64) -> f64;
}
