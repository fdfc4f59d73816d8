//! Standard error and result types for the library

use crate::script::ScriptError;
use hex::FromHexError;
use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Standard error type used in the library
#[derive(Debug)]
pub enum Error {
    /// An argument provided is invalid
    BadArgument(String),
    /// The data given is not valid
    BadData(String),
    /// Script evaluation failed
    ScriptError(ScriptError),
    /// Error parsing a hex string
    FromHexError(FromHexError),
    /// Standard library IO error
    IOError(io::Error),
    /// Error in the secp256k1 library while signing
    Secp256k1Error(secp256k1::Error),
}

impl Error {
    /// Returns the script failure classification, if this is a script error
    pub fn script_error(&self) -> Option<ScriptError> {
        match self {
            Error::ScriptError(e) => Some(*e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::BadArgument(s) => f.write_str(&format!("Bad argument: {}", s)),
            Error::BadData(s) => f.write_str(&format!("Bad data: {}", s)),
            Error::ScriptError(e) => f.write_str(&format!("Script error: {}", e)),
            Error::FromHexError(e) => f.write_str(&format!("Hex decoding error: {}", e)),
            Error::IOError(e) => f.write_str(&format!("IO error: {}", e)),
            Error::Secp256k1Error(e) => f.write_str(&format!("Secp256k1 error: {}", e)),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::FromHexError(e) => Some(e),
            Error::IOError(e) => Some(e),
            Error::Secp256k1Error(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ScriptError> for Error {
    fn from(e: ScriptError) -> Self {
        Error::ScriptError(e)
    }
}

impl From<FromHexError> for Error {
    fn from(e: FromHexError) -> Self {
        Error::FromHexError(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IOError(e)
    }
}

impl From<secp256k1::Error> for Error {
    fn from(e: secp256k1::Error) -> Self {
        Error::Secp256k1Error(e)
    }
}

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;
