//! Ghost API client.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use super::{
    auth::AdminKey,
    content::ContentService,
    error::{Error, Result},
    http::{HttpClient, HttpConfig},
    image::ImageService,
    resource::{ResourceKind, ResourceService},
    types::{Query, Resource},
    unsplash::{Orientation, UNSPLASH_BASE_URL, UnsplashConfig, UnsplashPhoto, UnsplashService},
};

/// Environment variable holding the site URL.
pub const ENV_API_URL: &str = "GHOST_API_URL";
/// Environment variable holding the Content API key.
pub const ENV_CONTENT_API_KEY: &str = "GHOST_CONTENT_API_KEY";
/// Environment variable holding the `id:secret` Admin API key.
pub const ENV_ADMIN_API_KEY: &str = "GHOST_ADMIN_API_KEY";
/// Environment variable holding the Unsplash access key.
pub const ENV_UNSPLASH_ACCESS_KEY: &str = "UNSPLASH_ACCESS_KEY";

/// Default `Accept-Version` sent to Ghost.
pub const DEFAULT_ACCEPT_VERSION: &str = "v5.0";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Ghost API client.
///
/// Holds immutable credentials only; reuse one instance for sequential calls.
/// No call is retried: a 429 surfaces as an ordinary [`Error::Api`].
///
/// # Example
///
/// ```rust,ignore
/// use ghostkit::{Client, Query};
///
/// let client = Client::from_env()?;
/// let posts = client.get("admin/posts/", &Query::new().limit(5)).await?;
/// ```
pub struct Client {
    http: Arc<HttpClient>,
    config: ClientConfig,
}

/// Client configuration.
#[derive(Clone)]
struct ClientConfig {
    base_url: String,
    unsplash: UnsplashConfig,
}

impl Client {
    /// Creates a client from `GHOST_API_URL`, `GHOST_CONTENT_API_KEY`,
    /// `GHOST_ADMIN_API_KEY` and `UNSPLASH_ACCESS_KEY`.
    pub fn from_env() -> Result<Self> {
        ClientBuilder::from_vars(|name| std::env::var(name).ok()).build()
    }

    /// Creates a new client builder for a site URL.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Returns the configured site URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // ==================== Raw requests ====================

    /// Issues a GET and returns the decoded body.
    pub async fn get(&self, path: &str, query: &Query) -> Result<Value> {
        self.http.request("GET", path, query, None).await
    }

    /// Issues a POST. The body must already be wrapped in its envelope.
    pub async fn post(&self, path: &str, body: &Value, query: &Query) -> Result<Value> {
        self.http.request("POST", path, query, Some(body)).await
    }

    /// Issues a PUT. The body must carry the resource's current `updated_at`.
    pub async fn put(&self, path: &str, body: &Value, query: &Query) -> Result<Value> {
        self.http.request("PUT", path, query, Some(body)).await
    }

    /// Issues a DELETE.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.http.request("DELETE", path, &Query::new(), None).await?;
        Ok(())
    }

    /// Uploads an image and returns its public URL.
    pub async fn upload(&self, file_path: &str, reference: Option<&str>) -> Result<String> {
        self.images().upload(file_path, reference).await
    }

    // ==================== Posts ====================

    /// Creates a post, adding `source=html` when an `html` field is present.
    pub async fn create_post(&self, fields: Resource) -> Result<Resource> {
        self.posts().add(fields).await
    }

    /// Updates a post.
    ///
    /// Without `updated_at`, the current value is read first (one extra round trip).
    pub async fn update_post(
        &self,
        post_id: &str,
        fields: Resource,
        updated_at: Option<&str>,
    ) -> Result<Resource> {
        self.posts().edit(post_id, fields, updated_at).await
    }

    // ==================== Unsplash ====================

    /// Searches Unsplash photos.
    pub async fn unsplash_search(
        &self,
        query: &str,
        orientation: Option<Orientation>,
        per_page: u32,
    ) -> Result<Vec<UnsplashPhoto>> {
        self.unsplash().search(query, orientation, per_page).await
    }

    /// Looks up one Unsplash photo.
    pub async fn unsplash_photo(&self, photo_id: &str) -> Result<UnsplashPhoto> {
        self.unsplash().photo(photo_id).await
    }

    /// Builds an Unsplash attribution caption.
    pub async fn unsplash_caption(
        &self,
        photo_id: Option<&str>,
        user_name: Option<&str>,
        user_username: Option<&str>,
    ) -> Result<String> {
        self.unsplash()
            .caption(photo_id, user_name, user_username)
            .await
    }

    /// Sets a post's feature image and caption from an Unsplash photo.
    ///
    /// Best-effort: the photo lookup and the post update are separate calls,
    /// and a failed update is returned as-is with nothing rolled back.
    pub async fn set_unsplash_feature_image(
        &self,
        post_id: &str,
        photo_id: &str,
    ) -> Result<Resource> {
        let photo = self.unsplash_photo(photo_id).await?;

        let mut fields = Resource::new();
        fields.insert("feature_image".to_string(), Value::String(photo.download_url.clone()));
        fields.insert("feature_image_caption".to_string(), Value::String(photo.caption()));
        if let Some(alt) = &photo.alt_description {
            fields.insert("feature_image_alt".to_string(), Value::String(alt.clone()));
        }

        self.update_post(post_id, fields, None)
            .await
            .inspect_err(|e| warn!(post_id, photo_id, error = %e, "feature image update failed"))
    }

    // ==================== Services ====================

    /// Returns the posts service.
    pub fn posts(&self) -> ResourceService {
        ResourceService::new(self.http.clone(), ResourceKind::Posts)
    }

    /// Returns the pages service.
    pub fn pages(&self) -> ResourceService {
        ResourceService::new(self.http.clone(), ResourceKind::Pages)
    }

    /// Returns the tags service.
    pub fn tags(&self) -> ResourceService {
        ResourceService::new(self.http.clone(), ResourceKind::Tags)
    }

    /// Returns the members service.
    pub fn members(&self) -> ResourceService {
        ResourceService::new(self.http.clone(), ResourceKind::Members)
    }

    /// Returns the newsletters service.
    pub fn newsletters(&self) -> ResourceService {
        ResourceService::new(self.http.clone(), ResourceKind::Newsletters)
    }

    /// Returns the service for any admin collection.
    pub fn resource(&self, kind: ResourceKind) -> ResourceService {
        ResourceService::new(self.http.clone(), kind)
    }

    /// Returns the read-only Content API service.
    pub fn content(&self) -> ContentService {
        ContentService::new(self.http.clone())
    }

    /// Returns the image upload service.
    pub fn images(&self) -> ImageService {
        ImageService::new(self.http.clone())
    }

    /// Returns the Unsplash service.
    pub fn unsplash(&self) -> UnsplashService {
        UnsplashService::new(self.http.clone(), self.config.unsplash.clone())
    }

    /// Returns a reference to the internal HTTP client.
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }
}

/// Builder for creating a Ghost API client.
pub struct ClientBuilder {
    base_url: String,
    content_key: Option<String>,
    admin_key: Option<String>,
    unsplash_access_key: Option<String>,
    unsplash_base_url: String,
    accept_version: String,
    timeout: Duration,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            content_key: None,
            admin_key: None,
            unsplash_access_key: None,
            unsplash_base_url: UNSPLASH_BASE_URL.to_string(),
            accept_version: DEFAULT_ACCEPT_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a builder from variables resolved by `lookup`.
    ///
    /// Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut builder = Self::new(var(ENV_API_URL).unwrap_or_default());
        builder.content_key = var(ENV_CONTENT_API_KEY);
        builder.admin_key = var(ENV_ADMIN_API_KEY);
        builder.unsplash_access_key = var(ENV_UNSPLASH_ACCESS_KEY);
        builder
    }

    /// Sets the Content API key.
    pub fn content_key(mut self, key: impl Into<String>) -> Self {
        self.content_key = Some(key.into());
        self
    }

    /// Sets the Admin API key (`id:secret`).
    pub fn admin_key(mut self, key: impl Into<String>) -> Self {
        self.admin_key = Some(key.into());
        self
    }

    /// Sets the Unsplash access key.
    pub fn unsplash_access_key(mut self, key: impl Into<String>) -> Self {
        self.unsplash_access_key = Some(key.into());
        self
    }

    /// Sets a custom Unsplash API base URL.
    pub fn unsplash_base_url(mut self, url: impl Into<String>) -> Self {
        self.unsplash_base_url = url.into();
        self
    }

    /// Sets the `Accept-Version` header sent to Ghost.
    pub fn accept_version(mut self, version: impl Into<String>) -> Self {
        self.accept_version = version.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client. No network activity happens here.
    pub fn build(self) -> Result<Client> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config(format!("{} is not set", ENV_API_URL)));
        }
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("invalid site URL {}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "site URL must be http or https: {}",
                base_url
            )));
        }

        if self.content_key.is_none() && self.admin_key.is_none() {
            return Err(Error::Config(format!(
                "neither {} nor {} is set",
                ENV_CONTENT_API_KEY, ENV_ADMIN_API_KEY
            )));
        }

        let admin_key = self.admin_key.as_deref().map(AdminKey::parse).transpose()?;

        let http = HttpClient::new(HttpConfig {
            base_url: base_url.clone(),
            content_key: self.content_key,
            admin_key,
            accept_version: self.accept_version,
            timeout: self.timeout,
        })?;

        Ok(Client {
            http: Arc::new(http),
            config: ClientConfig {
                base_url,
                unsplash: UnsplashConfig {
                    base_url: self.unsplash_base_url,
                    access_key: self.unsplash_access_key,
                },
            },
        })
    }
}
