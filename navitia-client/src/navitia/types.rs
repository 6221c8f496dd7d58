//! Navitia API response DTOs.
//!
//! These types map directly to the Navitia JSON replies. Text fields the API
//! sometimes leaves out default to empty strings; linked entities the API may
//! omit (a stop point's stop area, a route's line) are `Option`s.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

use crate::domain::{Coordinates, DataFreshness, Id, InvalidCoordinates, serde_datetime_opt};

/// How a vehicle is presented to travellers (`display_informations`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Display {
    /// Headsign shown on the vehicle.
    pub headsign: String,
    /// Direction text (usually the terminus).
    pub direction: String,
    /// Line code, e.g. "C".
    pub code: String,
    /// Network name, e.g. "RER".
    pub network: String,
    /// Line label.
    pub label: String,
    /// Full name, e.g. "RER C".
    pub name: String,
    /// Commercial mode, e.g. "RER", "Bus".
    pub commercial_mode: String,
    /// Physical mode, e.g. "Train".
    pub physical_mode: String,
    /// Line colour as hex without `#`.
    pub color: String,
    /// Text colour as hex without `#`.
    pub text_color: String,
    /// Trip short name (train number).
    pub trip_short_name: String,
    /// Free-form description.
    pub description: String,
}

/// A position as sent by Navitia.
///
/// Navitia encodes the numbers as JSON strings; plain numbers are accepted
/// too.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coord {
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub lon: f64,
}

impl Coord {
    /// Validate into domain coordinates.
    pub fn to_coordinates(&self) -> Result<Coordinates, InvalidCoordinates> {
        Coordinates::new(self.lat, self.lon)
    }
}

/// A stop area: a group of stop points (e.g. a station).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StopArea {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub coord: Option<Coord>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// A stop point: where a vehicle actually stops (e.g. a platform).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StopPoint {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub coord: Option<Coord>,
    /// The enclosing stop area, when the API links it.
    #[serde(default)]
    pub stop_area: Option<StopArea>,
}

/// A transit line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Line {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A route: one direction of a line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Route {
    pub id: Id,
    pub name: String,
    /// "forward" or "backward", when known.
    #[serde(default)]
    pub direction_type: Option<String>,
    /// The line this route belongs to, when the API links it.
    #[serde(default)]
    pub line: Option<Line>,
}

/// Scheduled and actual times at a stop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StopDateTime {
    #[serde(with = "serde_datetime_opt")]
    pub departure_date_time: Option<NaiveDateTime>,
    #[serde(with = "serde_datetime_opt")]
    pub arrival_date_time: Option<NaiveDateTime>,
    #[serde(with = "serde_datetime_opt")]
    pub base_departure_date_time: Option<NaiveDateTime>,
    #[serde(with = "serde_datetime_opt")]
    pub base_arrival_date_time: Option<NaiveDateTime>,
    pub data_freshness: Option<DataFreshness>,
}

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub href: String,
    /// Link type, e.g. "next", "previous", "first", "last".
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub templated: bool,
}

/// Navigation links attached to a paged reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "PagingWire")]
pub struct Paging {
    links: Vec<Link>,
}

impl Paging {
    /// Build paging from a list of links.
    pub fn new(links: Vec<Link>) -> Self {
        Self { links }
    }

    /// First link of the given type.
    pub fn get(&self, kind: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.kind == kind)
    }

    /// Link to the next page.
    pub fn next(&self) -> Option<&Link> {
        self.get("next")
    }

    /// Link to the previous page.
    pub fn previous(&self) -> Option<&Link> {
        self.get("previous").or_else(|| self.get("prev"))
    }

    /// Link to the first page.
    pub fn first(&self) -> Option<&Link> {
        self.get("first")
    }

    /// Link to the last page.
    pub fn last(&self) -> Option<&Link> {
        self.get("last")
    }

    /// Link to the current page.
    pub fn current(&self) -> Option<&Link> {
        self.get("self")
    }

    /// All links, in reply order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Navitia sends `links` as an array; some proxies reshape it into an
/// object keyed by link type.
#[derive(Deserialize)]
#[serde(untagged)]
enum PagingWire {
    List(Vec<Link>),
    Map(BTreeMap<String, MapLink>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MapLink {
    Href(String),
    Full {
        href: String,
        #[serde(default)]
        rel: Option<String>,
        #[serde(default)]
        templated: bool,
    },
}

impl From<PagingWire> for Paging {
    fn from(wire: PagingWire) -> Self {
        match wire {
            PagingWire::List(links) => Paging { links },
            PagingWire::Map(map) => Paging {
                links: map
                    .into_iter()
                    .map(|(kind, link)| match link {
                        MapLink::Href(href) => Link {
                            href,
                            kind,
                            rel: None,
                            templated: false,
                        },
                        MapLink::Full {
                            href,
                            rel,
                            templated,
                        } => Link {
                            href,
                            kind,
                            rel,
                            templated,
                        },
                    })
                    .collect(),
            },
        }
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }

    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
