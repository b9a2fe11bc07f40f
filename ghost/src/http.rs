//! HTTP client implementation for the Ghost API.

use std::time::Duration;

use reqwest::{
    Client as ReqwestClient, RequestBuilder, Response,
    header::{AUTHORIZATION, HeaderValue, USER_AGENT},
    multipart, redirect,
};
use serde_json::Value;
use tracing::debug;

use super::{
    auth::{AUTH_SCHEME, AdminKey, Credential, Surface},
    error::{Error, Result},
    types::Query,
};

/// Header selecting the Ghost API version.
pub const ACCEPT_VERSION: &str = "Accept-Version";

const USER_AGENT_VALUE: &str = "ghostkit-rust/0.1";

/// Connection settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub content_key: Option<String>,
    pub admin_key: Option<AdminKey>,
    pub accept_version: String,
    pub timeout: Duration,
}

/// HTTP client for the Ghost API.
///
/// Holds only immutable credentials. Admin tokens are minted per request.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    content_key: Option<String>,
    admin_key: Option<AdminKey>,
    accept_version: String,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(config: HttpConfig) -> Result<Self> {
        // Redirects are surfaced as errors: reqwest would replay a redirected
        // write as a GET and report the read as success.
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            content_key: config.content_key,
            admin_key: config.admin_key,
            accept_version: config.accept_version,
        })
    }

    /// Returns the absolute URL for an API path such as `admin/posts/`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/ghost/api/{}", self.base_url, path)
    }

    /// Returns the underlying reqwest client.
    pub(crate) fn inner(&self) -> &ReqwestClient {
        &self.client
    }

    /// Selects the credential for a surface. Admin tokens are never reused.
    pub(crate) fn credential(&self, surface: Surface) -> Result<Credential> {
        match surface {
            Surface::Content => self
                .content_key
                .clone()
                .map(Credential::ContentKey)
                .ok_or_else(|| Error::Config("content API key is not set".to_string())),
            Surface::Admin => {
                let key = self
                    .admin_key
                    .as_ref()
                    .ok_or_else(|| Error::Config("admin API key is not set".to_string()))?;
                Ok(Credential::AdminToken(key.fresh_token()?))
            }
        }
    }

    /// Builds an authenticated request without sending it.
    fn prepare(&self, method: &str, path: &str, query: &Query) -> Result<RequestBuilder> {
        let surface = Surface::from_path(path)?;
        let credential = self.credential(surface)?;
        let url = self.api_url(path);

        let mut request = match method {
            "GET" => self.client.get(&url),
            "POST" => self.client.post(&url),
            "PUT" => self.client.put(&url),
            "DELETE" => self.client.delete(&url),
            _ => return Err(Error::Other(format!("unsupported method: {}", method))),
        };

        request = request
            .header(ACCEPT_VERSION, self.accept_version.as_str())
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        if !query.is_empty() {
            request = request.query(query.pairs());
        }

        request = match credential {
            Credential::ContentKey(key) => request.query(&[("key", key)]),
            Credential::AdminToken(token) => {
                request.header(AUTHORIZATION, format!("{} {}", AUTH_SCHEME, token))
            }
        };

        debug!(method, path, surface = surface.as_str(), "ghost request");
        Ok(request)
    }

    /// Performs a single HTTP request and decodes the JSON response.
    ///
    /// An empty response body (e.g. `204 No Content`) decodes to `Value::Null`.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut request = self.prepare(method, path, query)?;

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        handle_response(response).await
    }

    /// Uploads a multipart form to an Admin path.
    pub async fn upload(&self, path: &str, form: multipart::Form) -> Result<Value> {
        let request = self.prepare("POST", path, &Query::new())?;
        let response = request.multipart(form).send().await?;
        handle_response(response).await
    }
}

/// Checks that an id or slug can stand as a single path segment.
///
/// Ghost ids are hex and slugs are lowercase words joined by dashes, so
/// anything that would be reinterpreted by URL resolution is rejected.
pub(crate) fn path_segment(value: &str) -> Result<&str> {
    let reserved = |c: char| {
        matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    };
    if value.is_empty() || value == "." || value == ".." || value.contains(reserved) {
        return Err(Error::InvalidSegment(value.to_string()));
    }
    Ok(value)
}

/// Converts a response into decoded JSON, or an API error for non-2xx.
pub(crate) async fn handle_response(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(parse_error(&body, status.as_u16()));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&body).map_err(Error::from)
}

/// Parses an error response body.
///
/// Ghost reports `{"errors": [{"message": ...}]}`; Unsplash reports
/// `{"errors": ["..."]}`. Anything else keeps the raw body as the message.
pub(crate) fn parse_error(body: &[u8], http_status: u16) -> Error {
    let raw = String::from_utf8_lossy(body).to_string();

    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            let first = v.get("errors")?.get(0)?;
            match first {
                Value::String(s) => Some(s.clone()),
                other => other.get("message")?.as_str().map(str::to_string),
            }
        })
        .unwrap_or_else(|| raw.clone());

    Error::api(http_status, message, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN_KEY: &str =
        "6489a1b2c3d4e5f601234567:a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90";

    fn client(content: Option<&str>, admin: Option<&str>) -> HttpClient {
        HttpClient::new(HttpConfig {
            base_url: "https://blog.example.com/".to_string(),
            content_key: content.map(str::to_string),
            admin_key: admin.map(|k| AdminKey::parse(k).unwrap()),
            accept_version: "v5.0".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_api_url_strips_trailing_slash() {
        let c = client(Some("k"), None);
        assert_eq!(
            c.api_url("content/posts/"),
            "https://blog.example.com/ghost/api/content/posts/"
        );
    }

    #[test]
    fn test_credential_per_surface() {
        let c = client(Some("content-key"), Some(ADMIN_KEY));
        assert_eq!(
            c.credential(Surface::Content).unwrap(),
            Credential::ContentKey("content-key".to_string())
        );
        assert!(matches!(
            c.credential(Surface::Admin).unwrap(),
            Credential::AdminToken(_)
        ));
    }

    #[test]
    fn test_missing_key_for_surface() {
        let c = client(None, Some(ADMIN_KEY));
        assert!(matches!(
            c.credential(Surface::Content),
            Err(Error::Config(_))
        ));

        let c = client(Some("k"), None);
        assert!(matches!(c.credential(Surface::Admin), Err(Error::Config(_))));
    }

    #[test]
    fn test_prepare_rejects_unknown_prefix() {
        let c = client(Some("k"), Some(ADMIN_KEY));
        assert!(matches!(
            c.prepare("GET", "posts/", &Query::new()),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_prepare_content_request_carries_key_only() {
        let c = client(Some("content-key"), Some(ADMIN_KEY));
        let request = c
            .prepare("GET", "content/posts/", &Query::new().limit(2))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            request.url().query(),
            Some("limit=2&key=content-key")
        );
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(request.headers().get(ACCEPT_VERSION).unwrap(), "v5.0");
    }

    #[test]
    fn test_prepare_admin_request_carries_token_only() {
        let c = client(Some("content-key"), Some(ADMIN_KEY));
        let request = c
            .prepare("DELETE", "admin/posts/abc/", &Query::new())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.url().query(), None);
        let auth = request.headers().get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert!(auth.starts_with("Ghost "));
        assert_eq!(auth.trim_start_matches("Ghost ").split('.').count(), 3);
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("6489a1b2c3d4e5f601234567").unwrap(), "6489a1b2c3d4e5f601234567");
        assert_eq!(path_segment("welcome-to-ghost").unwrap(), "welcome-to-ghost");
        assert_eq!(path_segment("Xy_9-Abc").unwrap(), "Xy_9-Abc");

        for bad in ["", ".", "..", "../settings", "a/b", "a?b=1", "a#b", "a%2Fb", "a b", "a\\b", "a\nb"] {
            assert!(
                matches!(path_segment(bad), Err(Error::InvalidSegment(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_error_ghost_shape() {
        let body = br#"{"errors":[{"message":"Resource not found error, cannot read post.","type":"NotFoundError"}]}"#;
        match parse_error(body, 404) {
            Error::Api { status, message, body: raw } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Resource not found error, cannot read post.");
                assert!(raw.contains("NotFoundError"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_unsplash_shape() {
        let err = parse_error(br#"{"errors":["OAuth error: The access token is invalid"]}"#, 401);
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("The access token is invalid"));
    }

    #[test]
    fn test_parse_error_plain_text() {
        let err = parse_error(b"Too Many Requests", 429);
        assert!(err.is_rate_limit());
        assert_eq!(err.to_string(), "ghost: HTTP 429: Too Many Requests");
    }
}
