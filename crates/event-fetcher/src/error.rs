//! Error types for the event fetch pipeline.
//!
//! Callers get a typed result for every fetch: [`FetchEventsError::kind`]
//! collapses the variants into the two failure classes a map view cares
//! about, a host that could not be reached and a payload that could not be
//! decoded.

use thiserror::Error;

/// Failure class of a fetch, as presented to the map view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or transport failure, or a non-success HTTP status
    Fetch,
    /// Response body is not a valid events payload
    Parse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Fetch => "fetch",
            ErrorKind::Parse => "parse",
        }
    }
}

/// Errors produced while fetching events from the events host.
#[derive(Debug, Error)]
pub enum FetchEventsError {
    /// Connection, timeout, or body read failure
    #[error("Failed to fetch events from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The host answered with a non-2xx status
    #[error("Events host {url} responded with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The HTTP client itself could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl FetchEventsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchEventsError::Transport { .. }
            | FetchEventsError::Status { .. }
            | FetchEventsError::Client(_) => ErrorKind::Fetch,
            FetchEventsError::Parse(_) => ErrorKind::Parse,
        }
    }
}

/// Errors decoding an events payload. Any of these rejects the whole batch.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON array of events")]
    NotAnArray,

    #[error("Element {index} is not an object with an \"event\" object")]
    MissingEvent { index: usize },

    #[error("Element {index}: missing field \"{field}\"")]
    MissingField { index: usize, field: &'static str },

    #[error("Element {index}: field \"{field}\" is not a text value")]
    NotText { index: usize, field: &'static str },

    #[error("Element {index}: field \"{field}\" is not a number: {value:?}")]
    InvalidCoordinate {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("Element {index}: field \"{field}\" is out of range: {value}")]
    CoordinateOutOfRange {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// Errors decoding a bounding query back out of a URL.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("Missing query parameter \"{0}\"")]
    MissingParameter(&'static str),

    #[error("Query parameter \"{name}\" is not a number: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid events endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Events endpoint {0:?} cannot carry query parameters")]
    UnsupportedEndpoint(String),
}
