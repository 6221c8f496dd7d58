//! Departures and arrivals.
//!
//! Both endpoints answer with the same envelope; only the name of the list
//! field differs (`departures` or `arrivals`). The endpoints differ only by
//! how the URL is scoped: a stop area, a stop point, or a coordinate pair.

use serde::{Deserialize, Deserializer};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::domain::{Coordinates, Id};

use super::error::NavitiaError;
use super::lifecycle::Lifecycle;
use super::polymorphic::{self, Discriminated, Selection};
use super::query::ConnectionsRequest;
use super::session::Session;
use super::types::{Display, Link, Paging, Route, StopDateTime, StopPoint};

const DEPARTURES: &str = "departures";
const ARRIVALS: &str = "arrivals";

/// A departure or an arrival.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Connection {
    #[serde(rename = "display_informations")]
    pub display: Display,
    pub stop_point: StopPoint,
    pub route: Route,
    #[serde(default)]
    pub stop_date_time: Option<StopDateTime>,
}

/// Which list a [`ConnectionsResults`] was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    Departures,
    Arrivals,
}

impl ConnectionKind {
    /// The endpoint path segment, also the reply's list field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Departures => DEPARTURES,
            ConnectionKind::Arrivals => ARRIVALS,
        }
    }

    fn from_field(field: &str) -> Option<Self> {
        match field {
            DEPARTURES => Some(ConnectionKind::Departures),
            ARRIVALS => Some(ConnectionKind::Arrivals),
            _ => None,
        }
    }
}

/// The results of a departures or arrivals request.
#[derive(Debug, Clone, Default)]
pub struct ConnectionsResults {
    /// The connections, in reply order. Empty is a valid result.
    pub connections: Vec<Connection>,
    /// Navigation links.
    pub paging: Paging,
    /// The list field the connections came from, if any was present.
    pub kind: Option<ConnectionKind>,
    /// When the call was created, sent and parsed.
    pub lifecycle: Lifecycle,
}

impl ConnectionsResults {
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Discriminated for ConnectionsResults {
    type Item = Connection;

    // Departures win when a malformed reply carries both
    const DISCRIMINANTS: &'static [&'static str] = &[DEPARTURES, ARRIVALS];

    fn assemble(selection: Selection<Connection>, paging: Paging) -> Self {
        Self {
            connections: selection.items,
            paging,
            kind: selection.field.and_then(ConnectionKind::from_field),
            lifecycle: Lifecycle::default(),
        }
    }
}

impl<'de> Deserialize<'de> for ConnectionsResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        polymorphic::deserialize(deserializer)
    }
}

impl Session {
    async fn connections(
        &self,
        cancel: &CancellationToken,
        url: Url,
        req: &ConnectionsRequest,
    ) -> Result<ConnectionsResults, NavitiaError> {
        let mut lifecycle = Lifecycle::default();
        let mut results: ConnectionsResults =
            self.request(cancel, url.as_str(), req, &mut lifecycle).await?;
        results.lifecycle = lifecycle;
        debug!(
            %url,
            count = results.len(),
            kind = ?results.kind,
            "connections fetched"
        );
        Ok(results)
    }

    fn coords_url(&self, coords: &Coordinates, kind: ConnectionKind) -> Result<Url, NavitiaError> {
        let id = coords.id();
        self.endpoint(&["coverage", id.as_str(), "coords", id.as_str(), kind.as_str()])
    }

    /// Departures around a position.
    pub async fn departures_coords(
        &self,
        cancel: &CancellationToken,
        req: &ConnectionsRequest,
        coords: &Coordinates,
    ) -> Result<ConnectionsResults, NavitiaError> {
        let url = self.coords_url(coords, ConnectionKind::Departures)?;
        self.connections(cancel, url, req).await
    }

    /// Arrivals around a position.
    pub async fn arrivals_coords(
        &self,
        cancel: &CancellationToken,
        req: &ConnectionsRequest,
        coords: &Coordinates,
    ) -> Result<ConnectionsResults, NavitiaError> {
        let url = self.coords_url(coords, ConnectionKind::Arrivals)?;
        self.connections(cancel, url, req).await
    }

    /// Fetch another page of connections from a paging link.
    ///
    /// The link's query is used as is.
    pub async fn connections_page(
        &self,
        cancel: &CancellationToken,
        link: &Link,
    ) -> Result<ConnectionsResults, NavitiaError> {
        let mut lifecycle = Lifecycle::default();
        let mut results: ConnectionsResults =
            self.request_url(cancel, &link.href, &mut lifecycle).await?;
        results.lifecycle = lifecycle;
        Ok(results)
    }

    /// Scope requests to a coverage region.
    pub fn scope(&self, region: Id) -> Scope<'_> {
        Scope {
            session: self,
            region,
        }
    }
}

/// A session scoped to one coverage region (e.g. `fr-idf`).
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    session: &'a Session,
    region: Id,
}

impl Scope<'_> {
    /// The coverage region.
    pub fn region(&self) -> &Id {
        &self.region
    }

    fn url(&self, collection: &str, resource: &Id, kind: ConnectionKind) -> Result<Url, NavitiaError> {
        self.session.endpoint(&[
            "coverage",
            self.region.as_str(),
            collection,
            resource.as_str(),
            kind.as_str(),
        ])
    }

    /// Departures from a stop area.
    pub async fn departures_stop_area(
        &self,
        cancel: &CancellationToken,
        req: &ConnectionsRequest,
        stop_area: &Id,
    ) -> Result<ConnectionsResults, NavitiaError> {
        let url = self.url("stop_areas", stop_area, ConnectionKind::Departures)?;
        self.session.connections(cancel, url, req).await
    }

    /// Departures from a stop point.
    pub async fn departures_stop_point(
        &self,
        cancel: &CancellationToken,
        req: &ConnectionsRequest,
        stop_point: &Id,
    ) -> Result<ConnectionsResults, NavitiaError> {
        let url = self.url("stop_points", stop_point, ConnectionKind::Departures)?;
        self.session.connections(cancel, url, req).await
    }

    /// Arrivals at a stop area.
    pub async fn arrivals_stop_area(
        &self,
        cancel: &CancellationToken,
        req: &ConnectionsRequest,
        stop_area: &Id,
    ) -> Result<ConnectionsResults, NavitiaError> {
        let url = self.url("stop_areas", stop_area, ConnectionKind::Arrivals)?;
        self.session.connections(cancel, url, req).await
    }

    /// Arrivals at a stop point.
    pub async fn arrivals_stop_point(
        &self,
        cancel: &CancellationToken,
        req: &ConnectionsRequest,
        stop_point: &Id,
    ) -> Result<ConnectionsResults, NavitiaError> {
        let url = self.url("stop_points", stop_point, ConnectionKind::Arrivals)?;
        self.session.connections(cancel, url, req).await
    }
}
