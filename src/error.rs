//! Error types for the catalog loader and the command-line surface.
//!
//! Ledger transitions and fee calculation never produce these; they report
//! failure through `bool` and `Option`.

use thiserror::Error;

/// Result type alias for fallible I/O-facing operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Amount argument that is unparseable or outside the accepted range
    #[error("Invalid amount '{0}': must be greater than 0 and at most 1,000,000")]
    InvalidAmount(String),

    /// Non-numeric argument where a count was expected
    #[error("Invalid {name} '{value}'")]
    InvalidArgument { name: &'static str, value: String },

    /// Required positional argument not supplied
    #[error("Missing {0} argument. Usage: campus-rentals quote <amount> [completed_rentals] | campus-rentals match <catalog.csv|-> <request> [budget]")]
    MissingArgument(&'static str),

    /// First argument is not a known subcommand
    #[error("Unknown command '{0}'. Expected 'quote' or 'match'")]
    UnknownCommand(String),
}
