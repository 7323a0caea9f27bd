//! Errors raised while setting up logging.
//!
//! Logging calls themselves never fail; only configuration does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The module filter expression is not a valid regular expression.
    #[error("invalid log filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A command-line flag that takes a value was given without one.
    #[error("missing value for '--{flag}'")]
    MissingArgValue { flag: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
