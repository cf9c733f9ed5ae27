use crate::core::qm;
use serde::de::Error;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use std::convert::TryFrom;
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

/// A call option pays (S-K).max(0).
/// A put option pays (K-S).max(0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PutOrCall {
    Put,
    Call,
}

impl PutOrCall {
    /// The payoff at expiry given the spot and strike
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            PutOrCall::Call => (spot - strike).max(0.0),
            PutOrCall::Put => (strike - spot).max(0.0),
        }
    }
}

impl FromStr for PutOrCall {
    type Err = qm::Error;

    /// Accepts "call" or "put", ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("call") {
            Ok(PutOrCall::Call)
        } else if trimmed.eq_ignore_ascii_case("put") {
            Ok(PutOrCall::Put)
        } else {
            Err(qm::Error::InvalidParameters(format!(
                "option type must be 'call' or 'put', not '{}'",
                s
            )))
        }
    }
}

impl Display for PutOrCall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PutOrCall::Call => write!(f, "call"),
            PutOrCall::Put => write!(f, "put"),
        }
    }
}

impl Serialize for PutOrCall {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PutOrCall {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PutOrCall::from_str(&s).map_err(|e| D::Error::custom(e.to_string()))
    }
}

/// The contractual and market inputs that define a European option price,
/// apart from the volatility. Spot and strike are strictly positive, the
/// time to expiry in years and the continuous dividend yield are
/// non-negative, and the rate may take any finite value.
///
/// The only way to create OptionParameters is through `new` (or
/// deserialization, which goes through the same checks), so a value of
/// this type is always safe to price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedOptionParameters")]
pub struct OptionParameters {
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    rate: f64,
    dividend_yield: f64,
    put_or_call: PutOrCall,
}

impl OptionParameters {
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        rate: f64,
        dividend_yield: f64,
        put_or_call: PutOrCall,
    ) -> Result<OptionParameters, qm::Error> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(invalid("spot", spot, "must be positive"));
        }
        if !(strike.is_finite() && strike > 0.0) {
            return Err(invalid("strike", strike, "must be positive"));
        }
        if !(time_to_expiry.is_finite() && time_to_expiry >= 0.0) {
            return Err(invalid("time to expiry", time_to_expiry, "must not be negative"));
        }
        if !rate.is_finite() {
            return Err(invalid("rate", rate, "must be finite"));
        }
        if !(dividend_yield.is_finite() && dividend_yield >= 0.0) {
            return Err(invalid("dividend yield", dividend_yield, "must not be negative"));
        }

        Ok(OptionParameters {
            spot,
            strike,
            time_to_expiry,
            rate,
            dividend_yield,
            put_or_call,
        })
    }

    /// Creates parameters for an underlying that pays no dividends
    pub fn without_dividends(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        rate: f64,
        put_or_call: PutOrCall,
    ) -> Result<OptionParameters, qm::Error> {
        OptionParameters::new(spot, strike, time_to_expiry, rate, 0.0, put_or_call)
    }

    /// Returns a copy of these parameters for the opposite option type,
    /// for example to check put/call parity.
    pub fn with_put_or_call(&self, put_or_call: PutOrCall) -> OptionParameters {
        OptionParameters { put_or_call, ..*self }
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }
    pub fn strike(&self) -> f64 {
        self.strike
    }
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }
    pub fn rate(&self) -> f64 {
        self.rate
    }
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }
    pub fn put_or_call(&self) -> PutOrCall {
        self.put_or_call
    }

    /// Discount factor from expiry to today, e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.time_to_expiry).exp()
    }

    /// Forward price of the underlying at expiry, S e^((r-q)T)
    pub fn forward(&self) -> f64 {
        self.spot * ((self.rate - self.dividend_yield) * self.time_to_expiry).exp()
    }

    /// Spot net of the dividends paid before expiry, S e^(-qT). This is the
    /// discounted forward, computed without going through e^(rT).
    pub fn discounted_spot(&self) -> f64 {
        self.spot * (-self.dividend_yield * self.time_to_expiry).exp()
    }

    /// Present value of the strike, K e^(-rT)
    pub fn discounted_strike(&self) -> f64 {
        self.strike * self.discount_factor()
    }

    /// Payoff if the option were exercised now
    pub fn intrinsic(&self) -> f64 {
        self.put_or_call.intrinsic(self.spot, self.strike)
    }
}

fn invalid(name: &str, value: f64, constraint: &str) -> qm::Error {
    qm::Error::InvalidParameters(format!("{} {} ({})", name, constraint, value))
}

/// Mirror of OptionParameters used for deserialization, before validation
#[derive(Deserialize)]
struct UncheckedOptionParameters {
    spot: f64,
    strike: f64,
    time_to_expiry: f64,
    rate: f64,
    #[serde(default)]
    dividend_yield: f64,
    put_or_call: PutOrCall,
}

impl TryFrom<UncheckedOptionParameters> for OptionParameters {
    type Error = qm::Error;

    fn try_from(p: UncheckedOptionParameters) -> Result<Self, Self::Error> {
        OptionParameters::new(
            p.spot,
            p.strike,
            p.time_to_expiry,
            p.rate,
            p.dividend_yield,
            p.put_or_call,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::numerics::approx_eq;
    use serde_json;

    #[test]
    fn parse_put_or_call() {
        assert_eq!(PutOrCall::from_str("call").unwrap(), PutOrCall::Call);
        assert_eq!(PutOrCall::from_str(" CALL ").unwrap(), PutOrCall::Call);
        assert_eq!(PutOrCall::from_str("Put").unwrap(), PutOrCall::Put);
        assert!(PutOrCall::from_str("straddle").is_err());
        assert!(PutOrCall::from_str("").is_err());
    }

    #[test]
    fn intrinsic_values() {
        assert_eq!(PutOrCall::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(PutOrCall::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(PutOrCall::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(PutOrCall::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn valid_parameters() {
        let params = OptionParameters::new(100.0, 90.0, 0.5, -0.01, 0.02, PutOrCall::Put).unwrap();
        assert_eq!(params.spot(), 100.0);
        assert_eq!(params.strike(), 90.0);
        assert_eq!(params.time_to_expiry(), 0.5);
        assert_eq!(params.rate(), -0.01);
        assert_eq!(params.dividend_yield(), 0.02);
        assert_eq!(params.put_or_call(), PutOrCall::Put);
        assert!(approx_eq(params.discount_factor(), (0.005_f64).exp(), 1e-15));
        assert!(approx_eq(params.forward(), 100.0 * (-0.015_f64).exp(), 1e-12));
        assert!(approx_eq(params.discounted_spot(), 100.0 * (-0.01_f64).exp(), 1e-12));
        assert!(approx_eq(params.discounted_strike(), 90.0 * (0.005_f64).exp(), 1e-12));

        let call = params.with_put_or_call(PutOrCall::Call);
        assert_eq!(call.put_or_call(), PutOrCall::Call);
        assert_eq!(call.strike(), 90.0);
    }

    #[test]
    fn expired_option_is_valid() {
        let params = OptionParameters::without_dividends(100.0, 90.0, 0.0, 0.05, PutOrCall::Call).unwrap();
        assert_eq!(params.intrinsic(), 10.0);
        assert_eq!(params.dividend_yield(), 0.0);
    }

    #[test]
    fn invalid_parameters() {
        let call = PutOrCall::Call;
        assert_invalid(OptionParameters::new(0.0, 100.0, 1.0, 0.05, 0.0, call));
        assert_invalid(OptionParameters::new(-1.0, 100.0, 1.0, 0.05, 0.0, call));
        assert_invalid(OptionParameters::new(100.0, 0.0, 1.0, 0.05, 0.0, call));
        assert_invalid(OptionParameters::new(100.0, 100.0, -0.1, 0.05, 0.0, call));
        assert_invalid(OptionParameters::new(100.0, 100.0, 1.0, std::f64::NAN, 0.0, call));
        assert_invalid(OptionParameters::new(100.0, 100.0, 1.0, 0.05, -0.01, call));
        assert_invalid(OptionParameters::new(std::f64::INFINITY, 100.0, 1.0, 0.05, 0.0, call));
    }

    fn assert_invalid(result: Result<OptionParameters, qm::Error>) {
        match result {
            Err(qm::Error::InvalidParameters(_)) => {}
            other => panic!("expected InvalidParameters, got {:?}", other),
        }
    }

    #[test]
    fn parameters_serde() {
        let params = OptionParameters::new(100.0, 95.0, 0.25, 0.03, 0.01, PutOrCall::Call).unwrap();
        let serialized = serde_json::to_string(&params).unwrap();
        assert_eq!(
            serialized,
            r#"{"spot":100.0,"strike":95.0,"time_to_expiry":0.25,"rate":0.03,"dividend_yield":0.01,"put_or_call":"call"}"#
        );
        let deserialized: OptionParameters = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, params);
    }

    #[test]
    fn deserialization_validates() {
        let no_dividends: OptionParameters = serde_json::from_str(
            r#"{"spot":100,"strike":95,"time_to_expiry":0.25,"rate":0.03,"put_or_call":"Put"}"#,
        )
        .unwrap();
        assert_eq!(no_dividends.dividend_yield(), 0.0);
        assert_eq!(no_dividends.put_or_call(), PutOrCall::Put);

        let negative_spot: Result<OptionParameters, _> = serde_json::from_str(
            r#"{"spot":-100,"strike":95,"time_to_expiry":0.25,"rate":0.03,"put_or_call":"call"}"#,
        );
        assert!(negative_spot.is_err());

        let bad_kind: Result<OptionParameters, _> = serde_json::from_str(
            r#"{"spot":100,"strike":95,"time_to_expiry":0.25,"rate":0.03,"put_or_call":"binary"}"#,
        );
        assert!(bad_kind.is_err());
    }
}
