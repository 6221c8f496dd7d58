//! Data freshness selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown freshness level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown data freshness: {0}")]
pub struct InvalidFreshness(String);

/// Which flavour of timetable data the server should answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFreshness {
    /// The theoretical timetable only.
    BaseSchedule,
    /// The timetable including planned disruptions.
    AdaptedSchedule,
    /// Real-time data where available.
    Realtime,
}

impl DataFreshness {
    /// The literal sent as `data_freshness`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFreshness::BaseSchedule => "base_schedule",
            DataFreshness::AdaptedSchedule => "adapted_schedule",
            DataFreshness::Realtime => "realtime",
        }
    }
}

impl fmt::Display for DataFreshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFreshness {
    type Err = InvalidFreshness;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base_schedule" => Ok(DataFreshness::BaseSchedule),
            "adapted_schedule" => Ok(DataFreshness::AdaptedSchedule),
            "realtime" => Ok(DataFreshness::Realtime),
            other => Err(InvalidFreshness(other.to_string())),
        }
    }
}
