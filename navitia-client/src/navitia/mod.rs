//! Navitia API client.
//!
//! This module provides an HTTP client for the Navitia public-transit API.
//!
//! Key characteristics of Navitia:
//! - Authentication is HTTP basic auth with the API key as username and an
//!   empty password
//! - Date-times are local to the coverage, in `YYYYMMDDThhmmss` form
//! - Departures and arrivals share one reply shape; which list field is
//!   present tells them apart
//! - Paged replies carry their navigation in a `links` field

mod body;
mod config;
mod connections;
mod error;
mod lifecycle;
mod polymorphic;
mod query;
mod remote;
mod session;
mod types;

pub use config::{DEFAULT_BASE_URL, DEFAULT_MAX_BODY_SIZE, DEFAULT_TIMEOUT_SECS, NavitiaConfig};
pub use connections::{Connection, ConnectionKind, ConnectionsResults, Scope};
pub use error::{DecodeError, EncodingError, NavitiaError, Stage};
pub use lifecycle::Lifecycle;
pub use polymorphic::{Discriminated, Selection, deserialize as deserialize_discriminated, resolve};
pub use query::{ConnectionsRequest, Query, QueryParams};
pub use remote::RemoteError;
pub use session::Session;
pub use types::{Coord, Display, Line, Link, Paging, Route, StopArea, StopDateTime, StopPoint};
