use std::fmt::Display;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid coordinate value {value}: {reason}.")]
    Format { value: String, reason: String },

    #[error("Invalid geometry document: expected {expected}, found {found}.")]
    Schema { expected: String, found: String },

    #[error("Unsupported geometry type '{0}'.")]
    UnsupportedType(String),

    #[error("Attempted to write non-finite value {value} on the {axis} axis.")]
    InvariantViolation { axis: char, value: f64 },

    #[error("Serde error.")]
    Json(#[from] serde_json::error::Error),

    #[error("Error while processing the geozero source.")]
    Geozero(#[from] geozero::error::GeozeroError),

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn schema(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::Schema {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl serde::de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Message(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Message(msg.to_string())
    }
}
