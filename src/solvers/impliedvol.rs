use crate::core::qm;
use crate::instruments::options::OptionParameters;
use crate::math::brent::zbrent;
use crate::pricers::blackscholes::BlackScholes;
use crate::pricers::VolPricer;
use crate::solvers::config::SolverConfig;
use crate::solvers::OneDimensionalSolver;
use std::fmt;
use std::fmt::Display;
use tracing::debug;

/// The outcome of an implied volatility solve. Either a volatility was
/// found, or the error explains why there is none. There is no default
/// volatility standing in for a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ImpliedVolatilityResult {
    Found(f64),
    NotFound(qm::Error),
}

impl ImpliedVolatilityResult {
    pub fn volatility(&self) -> Option<f64> {
        match *self {
            ImpliedVolatilityResult::Found(vol) => Some(vol),
            ImpliedVolatilityResult::NotFound(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.volatility().is_some()
    }

    pub fn into_result(self) -> Result<f64, qm::Error> {
        match self {
            ImpliedVolatilityResult::Found(vol) => Ok(vol),
            ImpliedVolatilityResult::NotFound(error) => Err(error),
        }
    }
}

impl From<Result<f64, qm::Error>> for ImpliedVolatilityResult {
    fn from(result: Result<f64, qm::Error>) -> Self {
        match result {
            Ok(vol) => ImpliedVolatilityResult::Found(vol),
            Err(error) => ImpliedVolatilityResult::NotFound(error),
        }
    }
}

/// Shows a found volatility as a percentage to two decimal places, and
/// anything else as N/A.
impl Display for ImpliedVolatilityResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ImpliedVolatilityResult::Found(vol) => write!(f, "{:.2}%", vol * 100.0),
            ImpliedVolatilityResult::NotFound(_) => write!(f, "N/A"),
        }
    }
}

/// Solves for implied volatility given a pricer. The pricer can be anything
/// that gives a price with dependence on volatility, but analytic pricers
/// work better, as the solution requires a non-noisy objective function.
///
/// Internally, this solver uses Brent, searching between the configured
/// minimum and maximum volatilities. European option prices increase
/// monotonically with volatility, so there is at most one root in the range.
#[derive(Debug, Clone, Copy)]
pub struct ImpliedVol {
    config: SolverConfig,
}

impl ImpliedVol {
    /// Creates an implied vol solver with the given settings. Brent
    /// converges quadratically once close, so the result is likely to be far
    /// closer than the specified tolerance.
    pub fn new(config: SolverConfig) -> Result<ImpliedVol, qm::Error> {
        config.validate()?;
        Ok(ImpliedVol { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds the Black-Scholes volatility that reprices the quote.
    pub fn solve(&self, quote: f64, params: &OptionParameters) -> ImpliedVolatilityResult {
        self.solve_with_pricer(&BlackScholes::new(), quote, params)
    }

    /// Finds the volatility at which the given pricer reprices the quote.
    pub fn solve_with_pricer(
        &self,
        pricer: &dyn VolPricer,
        quote: f64,
        params: &OptionParameters,
    ) -> ImpliedVolatilityResult {
        let result = self.try_solve(pricer, quote, params);
        if let Err(ref error) = result {
            debug!(%error, quote, ?params, "implied volatility not found");
        }
        result.into()
    }

    fn try_solve(
        &self,
        pricer: &dyn VolPricer,
        quote: f64,
        params: &OptionParameters,
    ) -> Result<f64, qm::Error> {
        if !(quote.is_finite() && quote > 0.0) {
            return Err(qm::Error::NoRootInBracket(format!(
                "quote must be positive: {}",
                quote
            )));
        }
        if params.time_to_expiry() <= 0.0 {
            return Err(qm::Error::invalid(
                "option has expired, so its price does not depend on volatility",
            ));
        }

        let mut objective =
            |vol: f64| -> Result<f64, qm::Error> { Ok(pricer.price(params, vol) - quote) };
        self.find_root(&mut objective, self.config.vol_min, self.config.vol_max)
    }
}

impl Default for ImpliedVol {
    fn default() -> ImpliedVol {
        ImpliedVol {
            config: SolverConfig::default(),
        }
    }
}

impl OneDimensionalSolver for ImpliedVol {
    fn find_root(
        &self,
        objective: &mut dyn FnMut(f64) -> Result<f64, qm::Error>,
        min: f64,
        max: f64,
    ) -> Result<f64, qm::Error> {
        zbrent(min, max, self.config.tolerance, self.config.max_iter, &mut |vol| {
            objective(vol)
        })
    }
}

/// Finds the Black-Scholes implied volatility of a European option with the
/// default solver settings: a search between 0.1% and 1000%.
pub fn solve_implied_vol(quote: f64, params: &OptionParameters) -> ImpliedVolatilityResult {
    ImpliedVol::default().solve(quote, params)
}
