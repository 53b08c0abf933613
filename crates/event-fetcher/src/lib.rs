//! Fetches geotagged events for the visible area of a map.
//!
//! The pipeline is: [`Viewport`] → [`EventQuery`] → HTTP GET against the
//! events host → [`parse_events`] → `Vec<Event>`, reported back as a typed
//! result. [`RefreshSession`] runs it off the caller's task with
//! cancellation of superseded requests.

pub mod client;
pub mod config;
pub mod error;
pub mod parser;
pub mod query;
pub mod session;

pub use client::{EventSource, HttpEventSource};
pub use config::EventsConfig;
pub use error::{ConfigError, ErrorKind, FetchEventsError, ParseError, QueryError};
pub use parser::parse_events;
pub use query::EventQuery;
pub use session::{MapState, RefreshFailure, RefreshOutcome, RefreshSession};
pub use shared_types::{Event, GeoPoint, Marker, MarkerLayer, Viewport};
