use crate::core::qm;
use serde_json;
use std::io::Read;

/// Settings for the implied volatility solver. All fields have defaults, so
/// a configuration file need only mention the ones it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Lowest volatility searched
    pub vol_min: f64,
    /// Highest volatility searched. 10.0 means 1000% a year, which covers
    /// anything quoted in practice.
    pub vol_max: f64,
    /// Absolute tolerance on the volatility
    pub tolerance: f64,
    pub max_iter: u32,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            vol_min: 0.001,
            vol_max: 10.0,
            tolerance: 1e-10,
            max_iter: 100,
        }
    }
}

impl SolverConfig {
    /// Reads a configuration as JSON from any source of UTF-8 bytes, such
    /// as a file or string, and validates it.
    pub fn from_json(source: &mut dyn Read) -> Result<SolverConfig, qm::Error> {
        let config: SolverConfig = serde_json::from_reader(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), qm::Error> {
        if !(self.vol_min.is_finite() && self.vol_min > 0.0) {
            return Err(qm::Error::InvalidParameters(format!(
                "vol_min must be positive: {}",
                self.vol_min
            )));
        }
        if !(self.vol_max.is_finite() && self.vol_max > self.vol_min) {
            return Err(qm::Error::InvalidParameters(format!(
                "vol_max {} must be finite and above vol_min {}",
                self.vol_max, self.vol_min
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(qm::Error::InvalidParameters(format!(
                "tolerance must be positive: {}",
                self.tolerance
            )));
        }
        if self.max_iter == 0 {
            return Err(qm::Error::invalid("max_iter must be at least one"));
        }
        Ok(())
    }
}
