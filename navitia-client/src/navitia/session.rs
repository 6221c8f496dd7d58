//! Navitia HTTP session and the shared request pipeline.
//!
//! Every endpoint goes through [`Session::request`]: encode the options,
//! build the URL, authenticate, make one round trip, then either decode the
//! reply or translate the error. Nothing is retried.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use super::body::read_limited;
use super::config::NavitiaConfig;
use super::error::{DecodeError, NavitiaError};
use super::lifecycle::Lifecycle;
use super::query::{Query, QueryParams};
use super::remote;

/// Navitia API client.
///
/// Holds only read-only configuration and a transport handle, so it can be
/// cloned and shared by any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_body_size: usize,
}

impl Session {
    /// Create a new session with the given configuration.
    pub fn new(config: NavitiaConfig) -> Result<Self, NavitiaError> {
        config.validate().map_err(NavitiaError::Config)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(NavitiaError::client)?;

        Ok(Self::from_parts(config, http))
    }

    /// Create a session on top of an existing HTTP client.
    ///
    /// The client's own timeout and pooling settings apply; `timeout_secs`
    /// from the config is ignored.
    pub fn with_client(config: NavitiaConfig, http: reqwest::Client) -> Result<Self, NavitiaError> {
        config.validate().map_err(NavitiaError::Config)?;
        Ok(Self::from_parts(config, http))
    }

    fn from_parts(config: NavitiaConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
            max_body_size: config.max_body_size,
        }
    }

    /// Base URL of the API, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ceiling on the number of bytes read from a reply body.
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// An endpoint URL: the base URL followed by `segments`.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` in an
    /// identifier stay inside its segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, NavitiaError> {
        endpoint_url(&self.base_url, segments)
    }

    /// Run one call: encode `query` onto `base_url`, send it, decode the reply.
    ///
    /// `lifecycle` receives the created/sent/parsed instants as they happen,
    /// so it is meaningful even when the call fails.
    pub async fn request<Q, T>(
        &self,
        cancel: &CancellationToken,
        base_url: &str,
        query: &Q,
        lifecycle: &mut Lifecycle,
    ) -> Result<T, NavitiaError>
    where
        Q: Query + ?Sized,
        T: DeserializeOwned,
    {
        lifecycle.mark_created();
        trace!(url = base_url, "request created");

        let params = query.to_params()?;
        let url = build_url(base_url, &params)?;

        self.execute(cancel, url, lifecycle).await
    }

    /// Run one call against a URL whose query is already encoded.
    ///
    /// Used to follow paging links.
    pub async fn request_url<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        url: &str,
        lifecycle: &mut Lifecycle,
    ) -> Result<T, NavitiaError> {
        self.request(cancel, url, &QueryParams::new(), lifecycle)
            .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        url: Url,
        lifecycle: &mut Lifecycle,
    ) -> Result<T, NavitiaError> {
        if cancel.is_cancelled() {
            debug!(%url, "cancelled before sending");
            return Err(NavitiaError::Cancelled);
        }

        let sent = self
            .http
            .get(url.clone())
            .basic_auth(&self.api_key, Some(""))
            .send()
            .await;
        lifecycle.mark_sent();

        let mut response = sent.map_err(|e| {
            debug!(%url, error = %e, "request failed");
            NavitiaError::transport("executing request", e)
        })?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(remote::translate(response, self.max_body_size).await.into());
        }

        // An in-flight round trip is never aborted; only the decode is skipped
        if cancel.is_cancelled() {
            debug!(%url, "cancelled before decoding");
            return Err(NavitiaError::Cancelled);
        }

        let body = read_limited(&mut response, self.max_body_size)
            .await
            .map_err(|e| NavitiaError::transport("reading response body", e))?;
        drop(response);

        if body.truncated {
            debug!(%url, limit = self.max_body_size, "reply body over ceiling");
            return Err(DecodeError::TooLarge {
                limit: self.max_body_size,
            }
            .into());
        }

        let value = decode_json(&body.bytes)?;
        lifecycle.mark_parsed();
        trace!(%url, bytes = body.bytes.len(), "response parsed");

        Ok(value)
    }
}

/// Append the encoded parameters to `base` as its query string.
pub(crate) fn build_url(base: &str, params: &QueryParams) -> Result<Url, NavitiaError> {
    let mut url = Url::parse(base).map_err(|source| NavitiaError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.pairs());
    }
    Ok(url)
}

/// Append path segments to `base`.
pub(crate) fn endpoint_url(base: &str, segments: &[&str]) -> Result<Url, NavitiaError> {
    let mut url = Url::parse(base).map_err(|source| NavitiaError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;

    // The url crate silently drops dot segments instead of encoding them
    if let Some(dots) = segments.iter().find(|s| matches!(**s, "." | "..")) {
        return Err(NavitiaError::InvalidSegment {
            segment: dots.to_string(),
        });
    }

    url.path_segments_mut()
        .map_err(|()| NavitiaError::Config(format!("base URL {base:?} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Decode a JSON body, reporting the path of the first offending field.
pub(crate) fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut *de).map_err(|e| DecodeError::Json {
        path: e.path().to_string(),
        source: e.into_inner(),
    })?;
    de.end().map_err(|source| DecodeError::Json {
        path: ".".to_string(),
        source,
    })?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn session_creation() {
        let session = Session::new(NavitiaConfig::new("test-key")).unwrap();
        assert_eq!(session.base_url(), crate::navitia::DEFAULT_BASE_URL);
    }

    #[test]
    fn session_rejects_invalid_config() {
        let err = Session::new(NavitiaConfig::new("k").with_timeout(0)).unwrap_err();
        assert!(matches!(err, NavitiaError::Config(_)));
    }

    #[test]
    fn build_url_appends_query() {
        let mut params = QueryParams::new();
        params.add("count", "5");
        params.add("forbidden_uris[]", "A");

        let url = build_url("https://api.navitia.io/v1/coverage/fr-idf/departures", &params)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.navitia.io/v1/coverage/fr-idf/departures?count=5&forbidden_uris%5B%5D=A"
        );
    }

    #[test]
    fn build_url_without_params_keeps_existing_query() {
        let url = build_url("https://api/x?start_page=2", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "https://api/x?start_page=2");
    }

    #[test]
    fn build_url_rejects_relative() {
        let err = build_url("/coverage/fr-idf", &QueryParams::new()).unwrap_err();
        assert!(matches!(err, NavitiaError::InvalidUrl { .. }));
    }

    #[test]
    fn endpoint_url_appends_segments() {
        let url = endpoint_url(
            "https://api.navitia.io/v1",
            &["coverage", "fr-idf", "stop_areas", "stop_area:OIF:SA:8768600", "departures"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.navitia.io/v1/coverage/fr-idf/stop_areas/stop_area:OIF:SA:8768600/departures"
        );
    }

    #[test]
    fn endpoint_url_keeps_reserved_characters_inside_segment() {
        let url = endpoint_url(
            "https://api.navitia.io/v1",
            &["coverage", "fr-idf", "stop_areas", "sa?count=999#x", "departures"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.navitia.io/v1/coverage/fr-idf/stop_areas/sa%3Fcount=999%23x/departures"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let url = endpoint_url("https://api.navitia.io/v1", &["stop_areas", "../../other", "arrivals"])
            .unwrap();
        assert_eq!(url.path(), "/v1/stop_areas/..%2F..%2Fother/arrivals");
    }

    #[test]
    fn endpoint_url_rejects_dot_segments() {
        for dots in [".", ".."] {
            let err = endpoint_url("https://api.navitia.io/v1", &["stop_areas", dots]).unwrap_err();
            assert!(matches!(err, NavitiaError::InvalidSegment { .. }));
        }
    }

    #[test]
    fn endpoint_url_tolerates_trailing_slash() {
        let url = endpoint_url("https://api.navitia.io/v1/", &["coverage"]).unwrap();
        assert_eq!(url.path(), "/v1/coverage");
    }

    #[derive(Debug, Deserialize)]
    struct Outer {
        #[allow(dead_code)]
        inner: Inner,
    }

    #[derive(Debug, Deserialize)]
    struct Inner {
        #[allow(dead_code)]
        name: String,
    }

    #[test]
    fn decode_json_reports_path() {
        let err = decode_json::<Outer>(br#"{"inner":{"name":3}}"#).unwrap_err();
        match err {
            DecodeError::Json { path, .. } => assert_eq!(path, "inner.name"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_json_rejects_trailing_data() {
        assert!(decode_json::<Outer>(br#"{"inner":{"name":"a"}} x"#).is_err());
    }

    #[test]
    fn decode_json_rejects_truncated() {
        assert!(decode_json::<Outer>(br#"{"inner":{"na"#).is_err());
    }
}
