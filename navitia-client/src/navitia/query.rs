//! Request options and their encoding into query parameters.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::domain::{DataFreshness, Id, format_datetime};

use super::error::EncodingError;

/// Query parameters for one call.
///
/// Maps a parameter name to its values. Names iterate in sorted order;
/// values keep the order they were added in, and a name may carry several
/// values (e.g. `forbidden_uris[]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `name`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values for `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `name` has at least one value.
    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of distinct parameter names.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs, repeating names with several values.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Encode as an `application/x-www-form-urlencoded` query string.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

/// Request options that can be turned into query parameters.
pub trait Query {
    /// Encode the options.
    ///
    /// Fails only for option values the wire format cannot express.
    fn to_params(&self) -> Result<QueryParams, EncodingError>;
}

/// Parameters that are already encoded pass through unchanged.
impl Query for QueryParams {
    fn to_params(&self) -> Result<QueryParams, EncodingError> {
        Ok(self.clone())
    }
}

/// Optional parameters for a departures or arrivals request.
///
/// Every field defaults to "let the server decide", except `geo`: GeoJSON
/// payloads are disabled unless explicitly requested.
///
/// # Examples
///
/// ```
/// use navitia_client::domain::Id;
/// use navitia_client::navitia::{ConnectionsRequest, Query};
///
/// let req = ConnectionsRequest::new()
///     .count(5)
///     .forbid(Id::new("line:OIF:C01742").unwrap());
///
/// let params = req.to_params().unwrap();
/// assert_eq!(params.get("count"), Some("5"));
/// assert_eq!(params.get("disable_geojson"), Some("true"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionsRequest {
    /// From what time on results are wanted (`None` = now)
    pub from: Option<NaiveDateTime>,

    /// Maximum duration between `from` and the retrieved results.
    ///
    /// The server default is 24 hours.
    pub duration: Option<Duration>,

    /// The maximum number of results (0 = server default, 10)
    pub count: u32,

    /// Resources the results must not go through
    pub forbidden: Vec<Id>,

    /// Freshness of the data
    pub freshness: Option<DataFreshness>,

    /// Include GeoJSON objects in the reply. They can be VERY large (>1MB).
    pub geo: bool,
}

impl ConnectionsRequest {
    /// Create a request with every option left to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for results from `datetime` on.
    pub fn since(mut self, datetime: NaiveDateTime) -> Self {
        self.from = Some(datetime);
        self
    }

    /// Limit how far after `from` results may be.
    ///
    /// Sent as whole seconds; zero is not sent. A negative duration is the
    /// only option value that makes [`Query::to_params`] fail, with
    /// [`EncodingError::NegativeDuration`].
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Cap the number of results.
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Forbid one more resource.
    pub fn forbid(mut self, id: Id) -> Self {
        self.forbidden.push(id);
        self
    }

    /// Forbid several resources, after any already forbidden.
    pub fn forbidden(mut self, ids: impl IntoIterator<Item = Id>) -> Self {
        self.forbidden.extend(ids);
        self
    }

    /// Select the data freshness.
    pub fn freshness(mut self, freshness: DataFreshness) -> Self {
        self.freshness = Some(freshness);
        self
    }

    /// Enable or disable GeoJSON payloads.
    pub fn with_geo(mut self, geo: bool) -> Self {
        self.geo = geo;
        self
    }
}

impl Query for ConnectionsRequest {
    fn to_params(&self) -> Result<QueryParams, EncodingError> {
        let mut params = QueryParams::new();

        if let Some(from) = &self.from {
            params.add("datetime", format_datetime(from));
        }

        if let Some(duration) = self.duration {
            if duration < Duration::zero() {
                return Err(EncodingError::NegativeDuration { field: "duration" });
            }
            let secs = duration.num_seconds();
            if secs > 0 {
                params.add("duration", secs.to_string());
            }
        }

        // Zero leaves the cap to the server
        if self.count != 0 {
            params.add("count", self.count.to_string());
        }

        for id in &self.forbidden {
            params.add("forbidden_uris[]", id.as_str().to_owned());
        }

        if let Some(freshness) = self.freshness {
            params.add("data_freshness", freshness.as_str());
        }

        // The wire flag has the opposite polarity to the option
        if !self.geo {
            params.add("disable_geojson", "true");
        }

        Ok(params)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn ids() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[a-zA-Z0-9:_]{1,12}", 0..8)
    }

    proptest! {
        /// Forbidden identifiers come out in input order, one value each
        #[test]
        fn forbidden_order_preserved(raw in ids()) {
            let req = ConnectionsRequest::new()
                .forbidden(raw.iter().map(|s| Id::new(s.clone()).unwrap()));
            let params = req.to_params().unwrap();

            prop_assert_eq!(params.get_all("forbidden_uris[]"), raw.as_slice());
            prop_assert_eq!(params.contains_key("forbidden_uris[]"), !raw.is_empty());
        }

        /// A zero count is never sent, a non-zero one always is
        #[test]
        fn count_omitted_only_when_zero(count in 0u32..1000) {
            let params = ConnectionsRequest::new().count(count).to_params().unwrap();
            if count == 0 {
                prop_assert!(!params.contains_key("count"));
            } else {
                let expected = count.to_string();
                prop_assert_eq!(params.get("count"), Some(expected.as_str()));
            }
        }

        /// disable_geojson is present exactly when geo is off
        #[test]
        fn geo_polarity(geo in any::<bool>(), count in 0u32..50) {
            let params = ConnectionsRequest::new().count(count).with_geo(geo).to_params().unwrap();
            prop_assert_eq!(params.contains_key("disable_geojson"), !geo);
        }
    }
}
