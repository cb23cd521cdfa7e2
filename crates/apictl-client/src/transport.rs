//! HTTP transport shared by every operation.
//!
//! # Design
//! - One `reqwest::Client` per invocation, carrying the static headers
//!   (media type, bearer token, request id) as defaults.
//! - Request bodies are encoded here rather than with `RequestBuilder::json`,
//!   which would replace the JSON:API content type.
//! - Responses are read fully and classified: 2xx bodies are returned as text,
//!   404 becomes `NotFound`, every other status becomes `Status` with the
//!   decoded error objects.

use std::time::Duration;

use apictl_config::ClientConfig;
use apictl_models::{ErrorObject, MEDIA_TYPE};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult, excerpt};

/// Header carrying the per-invocation trace id.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Client for one JSON:API server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    api_prefix: Vec<String>,
}

/// Successful response with its body read to completion.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) body: String,
}

impl RawResponse {
    pub(crate) fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Decode the body as `T`; `context` names the payload in error messages.
    pub(crate) fn decode<T: DeserializeOwned>(&self, context: &str) -> ClientResult<T> {
        serde_json::from_str(&self.body).map_err(|source| ClientError::Decode {
            context: context.to_string(),
            body: excerpt(&self.body),
            source,
        })
    }
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorObject>,
}

impl ApiClient {
    /// Build a client for `config` with a per-request `timeout`.
    ///
    /// `trace_id` is sent as `x-request-id` on every request.
    pub fn new(config: &ClientConfig, timeout: Duration, trace_id: &str) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        let media_type = HeaderValue::from_static(MEDIA_TYPE);
        headers.insert(CONTENT_TYPE, media_type.clone());
        headers.insert(ACCEPT, media_type);
        if let Some(key) = &config.api_key {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| ClientError::validation("API key contains invalid characters"))?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
        }
        let request_id = HeaderValue::from_str(trace_id)
            .map_err(|_| ClientError::validation("trace identifier contains invalid characters"))?;
        headers.insert(HEADER_REQUEST_ID, request_id);

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ClientError::validation(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_prefix: config
                .api_prefix
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    /// Server root every path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL under the JSON:API prefix, one percent-encoded segment per item.
    pub(crate) fn api_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let prefix = self.api_prefix.iter().map(String::as_str);
        self.join_segments(prefix.chain(segments.iter().copied()))
    }

    /// URL directly under the server root.
    pub(crate) fn root_url(&self, segments: &[&str]) -> ClientResult<Url> {
        self.join_segments(segments.iter().copied())
    }

    fn join_segments<'a>(&self, segments: impl Iterator<Item = &'a str>) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::validation(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and classify the response.
    pub(crate) async fn send<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> ClientResult<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(|err| {
                ClientError::validation(format!("failed to encode request body: {err}"))
            })?;
            request = request.body(encoded);
        }

        debug!(%method, %url, "sending request");
        let transport = |source| ClientError::Transport {
            method: method.clone(),
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if status.is_success() {
            Ok(RawResponse { status, body })
        } else {
            Err(classify_failure(status, &url, &body))
        }
    }

    pub(crate) async fn get(&self, url: Url) -> ClientResult<RawResponse> {
        self.send::<()>(Method::GET, url, None).await
    }
}

fn classify_failure(status: StatusCode, url: &Url, body: &str) -> ClientError {
    let errors = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.errors)
        .unwrap_or_default();
    debug!(status = status.as_u16(), errors = errors.len(), "request failed");

    if status == StatusCode::NOT_FOUND {
        ClientError::NotFound {
            url: url.to_string(),
            errors,
        }
    } else {
        ClientError::Status {
            status,
            url: url.to_string(),
            errors,
            body: excerpt(body),
        }
    }
}

/// Reject empty ids before any request is built.
pub(crate) fn require_id(resource_type: &str, id: &str) -> ClientResult<()> {
    if id.trim().is_empty() {
        return Err(ClientError::MissingId {
            resource_type: resource_type.to_string(),
        });
    }
    Ok(())
}

/// Reject empty resource types and relation names.
pub(crate) fn require_name(what: &str, value: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(format!("{what} is required")));
    }
    Ok(())
}
