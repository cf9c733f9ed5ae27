use crate::core::qm;
use crate::dates::year_fraction;
use crate::dates::Date;
use crate::instruments::options::OptionParameters;
use crate::instruments::options::PutOrCall;
use crate::solvers::impliedvol::ImpliedVol;
use crate::solvers::impliedvol::ImpliedVolatilityResult;
use serde::Deserialize;
use serde::Serialize;
use serde_json as sdj;
use std::io::{Read, Write};
use tracing::warn;

/// A request to find the implied volatility of a European option from its
/// market price. The time to expiry is not given directly, but calculated
/// from the valuation and expiry dates on an Act/365 basis. The dividend
/// yield may be omitted for underlyings that pay no dividends.
///
/// The optional label is not used in the calculation, but is echoed in the
/// response so that a caller sending several quotes for the same option
/// (bid, ask, last) can tell the responses apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpliedVolRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub valuation_date: Date,
    pub expiry_date: Date,
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    #[serde(default)]
    pub dividend_yield: f64,
    pub put_or_call: PutOrCall,
    pub price: f64,
}

impl ImpliedVolRequest {
    /// Converts the request to option parameters. Fails if the option has
    /// already expired, as there is then no volatility to find.
    pub fn option_parameters(&self) -> Result<OptionParameters, qm::Error> {
        let time_to_expiry = year_fraction(self.valuation_date, self.expiry_date);
        if time_to_expiry <= 0.0 {
            return Err(qm::Error::InvalidParameters(format!(
                "expiry date {} must be after valuation date {}",
                self.expiry_date, self.valuation_date
            )));
        }

        OptionParameters::new(
            self.spot,
            self.strike,
            time_to_expiry,
            self.rate,
            self.dividend_yield,
            self.put_or_call,
        )
    }
}

/// The request echoed back, with the time to expiry that was used and the
/// implied volatility. If no volatility was found, implied_vol is null and
/// not_found_reason explains why.
#[derive(Debug, Clone, Serialize)]
pub struct ImpliedVolResponse {
    #[serde(flatten)]
    pub request: ImpliedVolRequest,
    pub time_to_expiry: f64,
    pub implied_vol: Option<f64>,
    pub implied_vol_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_found_reason: Option<String>,
    #[serde(skip)]
    pub result: ImpliedVolatilityResult,
}

/// Reads an implied vol request from any source of UTF-8 bytes, such as a
/// file or string.
pub fn implied_vol_request_from_json(source: &mut dyn Read) -> Result<ImpliedVolRequest, qm::Error> {
    let mut deserializer = sdj::Deserializer::from_reader(source);
    let request = ImpliedVolRequest::deserialize(&mut deserializer)?;
    Ok(request)
}

/// Solves for the implied volatility of a request. Bad requests, such as an
/// expiry before the valuation date, are errors. A request whose price
/// cannot be matched is not an error, but gives a response with no vol.
pub fn calculate(solver: &ImpliedVol, request: ImpliedVolRequest) -> Result<ImpliedVolResponse, qm::Error> {
    let params = match request.option_parameters() {
        Ok(params) => params,
        Err(error) => {
            warn!(%error, ?request, "rejected implied vol request");
            return Err(error);
        }
    };

    let result = solver.solve(request.price, &params);
    let not_found_reason = match result {
        ImpliedVolatilityResult::Found(_) => None,
        ImpliedVolatilityResult::NotFound(ref error) => Some(error.to_string()),
    };

    Ok(ImpliedVolResponse {
        request,
        time_to_expiry: params.time_to_expiry(),
        implied_vol: result.volatility(),
        implied_vol_display: result.to_string(),
        not_found_reason,
        result,
    })
}

/// Reads a request as JSON, solves it and writes the response as JSON.
/// Returns the implied volatility result, so the caller need not parse
/// the output to find out what happened.
pub fn implied_vol_from_json(
    source: &mut dyn Read,
    solver: &ImpliedVol,
    pretty: bool,
    out: &mut dyn Write,
) -> Result<ImpliedVolatilityResult, qm::Error> {
    let request = implied_vol_request_from_json(source)?;
    let response = calculate(solver, request)?;
    serialize_output(&response, pretty, out)?;
    Ok(response.result)
}

fn serialize_output<T>(to_write: &T, pretty: bool, out: &mut dyn Write) -> Result<(), qm::Error>
where
    T: Serialize,
{
    if pretty {
        let mut serializer = sdj::Serializer::pretty(out);
        to_write.serialize(&mut serializer)?;
    } else {
        let mut serializer = sdj::Serializer::new(out);
        to_write.serialize(&mut serializer)?;
    }
    Ok(())
}
