//! Error types for CoT (Cursor on Target) conversion.
//!
//! `CotError` covers XML-level parse/write failures. `DetailError` covers the
//! detail-tree/flatten/stable-key transforms. `ConversionError` is the public
//! façade error from §4.6/§6 of the external interface: `ParseError`,
//! `ValidationError`, `CoordinateError`, `ReconstructionError`, `DetailKeyError`.
//! `ClassificationError` has no variant here because the type classifier is
//! total (§4.4, §8 property 7) and never fails.

use quick_xml;
use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Low-level XML parsing/writing errors.
#[derive(Error, Debug)]
pub enum CotError {
    /// An error occurred during XML processing.
    #[error("XML error: {0}")]
    XmlError(String),

    /// Failed to parse XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required field was missing from the input.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// The input format was invalid.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Failed to parse a numeric value.
    #[error("Invalid numeric value for field '{field}': '{value}' - {source}")]
    InvalidNumeric {
        /// The field name that failed to parse.
        field: String,
        /// The value that failed to parse.
        value: String,
        /// The underlying parse error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse a datetime value.
    #[error("Invalid datetime format for field '{field}': '{value}' - expected RFC 3339 format")]
    InvalidDateTime {
        /// The field name that failed to parse.
        field: String,
        /// The value that failed to parse.
        value: String,
    },

    /// An error occurred during JSON serialization/deserialization.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for CotError {
    fn from(err: quick_xml::Error) -> Self {
        CotError::XmlError(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for CotError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CotError::XmlError(err.to_string())
    }
}

impl From<AttrError> for CotError {
    fn from(err: AttrError) -> Self {
        CotError::XmlError(err.to_string())
    }
}

/// Errors from the detail tree / flatten / stable-key transforms.
#[derive(Error, Debug)]
pub enum DetailError {
    /// A `r_*` key could not be split into a non-empty `detailType`/`attribute` pair.
    #[error("malformed flat detail key: '{0}'")]
    MalformedKey(String),

    /// A key matched the stable-key shape but its value carried no `_tag` metadata.
    #[error("stable key '{0}' is missing its _tag metadata")]
    MissingTag(String),

    /// The detail subtree could not be rebuilt from its encoded form.
    #[error("failed to reconstruct detail subtree: {0}")]
    Reconstruction(String),
}

/// Public façade error (§4.6, §6, §7).
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Malformed XML; no partial document is produced.
    #[error("parse error: {0}")]
    Parse(#[from] CotError),

    /// A required header attribute (`uid`, `type`, `time`) was missing or empty.
    #[error("validation error: missing or empty required field '{0}'")]
    Validation(String),

    /// A point coordinate was out of range under strict policy.
    #[error("coordinate error: field '{field}' value {value} is out of range")]
    Coordinate {
        /// The offending field (`lat` or `lon`).
        field: &'static str,
        /// The out-of-range value.
        value: f64,
    },

    /// The detail subtree could not be rebuilt into XML.
    #[error("reconstruction error: {0}")]
    Reconstruction(String),

    /// A flattened `r_*` key was malformed or its stable-key metadata was missing.
    #[error("detail key error: {0}")]
    DetailKey(#[from] DetailError),
}
