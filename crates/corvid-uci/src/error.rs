//! UCI protocol errors.

use corvid_engine::EngineError;

/// Errors that can occur during UCI protocol handling.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing `startpos` or `fen`, or has stray tokens.
    #[error("malformed position command")]
    MalformedPosition,

    /// A parameter was given without its value.
    #[error("missing value for {param}")]
    MissingValue {
        /// The parameter missing its value.
        param: String,
    },

    /// A parameter value could not be parsed.
    #[error("invalid value for {param}: {value}")]
    InvalidValue {
        /// The parameter being parsed.
        param: String,
        /// The offending value.
        value: String,
    },

    /// `setoption` without `name ... value ...`.
    #[error("malformed setoption command")]
    MalformedOption,

    #[error("unknown option: {name}")]
    UnknownOption { name: String },

    #[error("invalid value for option {name}: {value}")]
    InvalidOptionValue { name: String, value: String },

    /// The engine rejected a position or setting.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// An I/O error occurred while reading from stdin.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
