//! Core definitions for quantvol

use serde_json;
use std::fmt;
use std::io;
use std::num;
use thiserror::Error as ThisError;

/// Error returned by any quantvol method. The variants distinguish the
/// reasons a calculation can fail, so that callers such as the implied
/// volatility solver can report why no answer was found.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// Inputs outside the modelled domain, such as a non-positive spot
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The target does not correspond to any value in the search range
    #[error("no root in bracket: {0}")]
    NoRootInBracket(String),

    /// An iterative method ran out of iterations
    #[error("not converged: {0}")]
    NotConverged(String),

    /// A calculation produced a NaN or infinity
    #[error("numerical failure: {0}")]
    NumericalFailure(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn invalid(message: &str) -> Error {
        Error::InvalidParameters(message.to_string())
    }

    /// The message carried by the error, without the category prefix
    pub fn message(&self) -> &str {
        match self {
            Error::InvalidParameters(m)
            | Error::NoRootInBracket(m)
            | Error::NotConverged(m)
            | Error::NumericalFailure(m)
            | Error::Serialization(m) => m,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Serialization(format!("io error: {}", error))
    }
}

impl From<num::ParseIntError> for Error {
    fn from(error: num::ParseIntError) -> Self {
        Error::InvalidParameters(format!(
            "Error {} when parsing integer. Badly-formed date?",
            error
        ))
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Serialization(format!("Error {} when serializing/deserializing", error))
    }
}

impl From<fmt::Error> for Error {
    fn from(error: fmt::Error) -> Self {
        Error::Serialization(format!("Error {} when formatting", error))
    }
}
