use std::fmt;

#[derive(Debug)]
pub enum MatchError {
    InvalidLineup(String),
    InvalidUnitSize { unit: &'static str, expected: usize, found: usize },
    NoPendingDecision,
    MatchFinished,
    SerializationError(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchError::InvalidLineup(msg) => {
                write!(f, "Invalid lineup: {}", msg)
            }
            MatchError::InvalidUnitSize { unit, expected, found } => {
                write!(f, "Invalid {} unit size: expected {}, found {}", unit, expected, found)
            }
            MatchError::NoPendingDecision => {
                write!(f, "No zone entry decision is pending")
            }
            MatchError::MatchFinished => {
                write!(f, "Match already finished")
            }
            MatchError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MatchError {}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        MatchError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
