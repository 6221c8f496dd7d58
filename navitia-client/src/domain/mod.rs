//! Domain types for the Navitia client.
//!
//! Validated identifiers and value types shared by requests and results.
//! All types enforce their invariants at construction time.

mod coords;
mod freshness;
mod id;
mod time;

pub use coords::{Coordinates, InvalidCoordinates};
pub use freshness::{DataFreshness, InvalidFreshness};
pub use id::{Id, InvalidId};
pub use time::{DATE_TIME_FORMAT, DateTimeError, format_datetime, parse_datetime, serde_datetime_opt};
