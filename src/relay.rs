//! Header-injecting pass-through for provider audio assets.
//!
//! The provider CDN refuses requests without a browser user agent and a
//! referer from its own site, and a browser audio element cannot set either.
//! Bytes are streamed through as they arrive.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;

pub static DEFAULT_CONTENT_TYPE: &str = "audio/mp4";
pub static CACHE_CONTROL: &str = "public, max-age=3600";

/// Upstream headers copied onto the relayed response
static PASSTHROUGH_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::CONTENT_RANGE,
    header::ACCEPT_RANGES,
];

#[derive(Debug)]
pub enum RelayError {
    MissingUrl,
    /// Upstream answered with a non-success status
    Upstream(u16),
    Request(String),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingUrl => write!(f, "Missing url parameter"),
            Self::Upstream(status) => write!(f, "Failed to fetch audio: {status}"),
            Self::Request(reason) => write!(f, "Stream error: {reason}"),
        }
    }
}

impl std::error::Error for RelayError {}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingUrl => StatusCode::BAD_REQUEST,
            Self::Upstream(status) => {
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Request(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

pub struct Relay {
    http: Client,
    user_agent: String,
    referer: String,
    origin: String,
}

impl Relay {
    pub fn new(config: &Config, http: Client) -> Self {
        let origin = config.bandlab.site_origin.origin().ascii_serialization();
        Self {
            http,
            user_agent: config.user_agent.clone(),
            referer: format!("{origin}/"),
            origin,
        }
    }

    /// Fetch `asset_url` as a browser on the provider's site would and stream it back.
    /// A `Range` from the client is forwarded so players can seek.
    pub async fn relay(
        &self,
        asset_url: &str,
        range: Option<&HeaderValue>,
    ) -> Result<Response, RelayError> {
        let mut request = self
            .http
            .get(asset_url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::REFERER, &self.referer)
            .header(reqwest::header::ORIGIN, &self.origin);
        if let Some(range) = range {
            request = request.header(reqwest::header::RANGE, range.as_bytes());
        }

        let upstream = request.send().await.map_err(|e| {
            warn!("Relay request to {} failed: {}", asset_url, e);
            RelayError::Request(e.to_string())
        })?;
        let status = upstream.status();
        if !status.is_success() {
            debug!("Relay upstream {} returned {}", asset_url, status);
            return Err(RelayError::Upstream(status.as_u16()));
        }

        let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::OK);
        let headers = relay_headers(upstream.headers());
        let mut response = Body::from_stream(upstream.bytes_stream()).into_response();
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

fn relay_headers(upstream: &reqwest::header::HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in PASSTHROUGH_HEADERS.iter() {
        let value = upstream
            .get(name.as_str())
            .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok());
        if let Some(value) = value {
            headers.insert(name.clone(), value);
        }
    }
    headers
        .entry(header::CONTENT_TYPE)
        .or_insert(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));
    headers
}
