use crate::instruments::options::OptionParameters;
use crate::instruments::options::PutOrCall;
use crate::math::optionpricing::Black76;
use crate::pricers::VolPricer;

/// Prices European options under Black-Scholes with a continuous dividend
/// yield. Underlyings without dividends simply have a zero yield.
///
/// The pricing is done by Black76 in spot form: a unit discount factor,
/// the discounted spot S e^(-qT) in place of the forward, the discounted
/// strike K e^(-rT) and sqrt variance vol * sqrt(T). This never forms
/// e^(rT) on its own, so large rates or long expiries do not overflow to
/// infinity times zero. Two cases where the formula breaks down are
/// handled separately:
///
/// * At expiry (T = 0) the price is the intrinsic value, regardless of
///   volatility or rates.
/// * With zero volatility the underlying grows deterministically, so the
///   price is the discounted intrinsic value of the forward.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholes {
    black76: Black76,
}

impl BlackScholes {
    pub fn new() -> BlackScholes {
        BlackScholes {
            black76: Black76::new(),
        }
    }

    /// Price of the option given an annualised volatility. Negative or NaN
    /// volatilities are treated as zero. An infinite volatility gives the
    /// limiting price: the discounted spot for a call and the discounted
    /// strike for a put. If the inputs are too extreme to price, the result
    /// is NaN rather than a plausible looking number.
    pub fn price(&self, params: &OptionParameters, vol: f64) -> f64 {
        let time = params.time_to_expiry();
        if time <= 0.0 {
            return params.intrinsic();
        }

        let spot = params.discounted_spot();
        let strike = params.discounted_strike();
        let put_or_call = params.put_or_call();

        let vol = vol.max(0.0);
        if vol.is_infinite() {
            return match put_or_call {
                PutOrCall::Call => spot,
                PutOrCall::Put => strike,
            };
        }

        let sqrt_variance = vol * time.sqrt();
        let price = if sqrt_variance == 0.0 {
            put_or_call.intrinsic(spot, strike)
        } else {
            match put_or_call {
                PutOrCall::Call => self.black76.call_price(1.0, spot, strike, sqrt_variance),
                PutOrCall::Put => self.black76.put_price(1.0, spot, strike, sqrt_variance),
            }
        };

        // cancellation deep out of the money can leave a tiny negative,
        // but NaN must get through to the caller
        if price < 0.0 {
            0.0
        } else {
            price
        }
    }
}

impl VolPricer for BlackScholes {
    fn price(&self, params: &OptionParameters, vol: f64) -> f64 {
        BlackScholes::price(self, params, vol)
    }
}

/// Black-Scholes price of a European option. See `BlackScholes::price`.
pub fn price(params: &OptionParameters, vol: f64) -> f64 {
    BlackScholes::new().price(params, vol)
}
