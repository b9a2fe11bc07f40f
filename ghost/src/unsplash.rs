//! Unsplash photo search and attribution.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    error::{Error, Result},
    http::{ACCEPT_VERSION, HttpClient, handle_response, path_segment},
};

/// Default Unsplash API base URL.
pub const UNSPLASH_BASE_URL: &str = "https://api.unsplash.com";

/// Referral parameters Unsplash requires on attribution links.
pub const UTM_PARAMS: &str = "utm_source=ghost&utm_medium=referral&utm_campaign=api-credit";

/// Photo orientation filter for search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Squarish => "squarish",
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "landscape" => Ok(Orientation::Landscape),
            "portrait" => Ok(Orientation::Portrait),
            "squarish" | "square" => Ok(Orientation::Squarish),
            _ => Err(Error::Other(format!("unknown orientation: {}", s))),
        }
    }
}

/// Normalized Unsplash photo record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnsplashPhoto {
    pub id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_description: Option<String>,
    /// Display-sized image URL.
    pub url: String,
    /// URL used as a Ghost feature image.
    pub download_url: String,
    /// Photo page on unsplash.com.
    pub html_url: String,
    pub user_name: String,
    pub user_username: String,
    /// Unsplash+ photo, licensed under the paid attribution tier.
    pub plus: bool,
}

impl UnsplashPhoto {
    /// Attribution caption for this photo.
    pub fn caption(&self) -> String {
        attribution_html(&self.user_name, &self.user_username)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawPhoto {
    id: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    alt_description: Option<String>,
    #[serde(default)]
    urls: RawUrls,
    #[serde(default)]
    links: RawLinks,
    #[serde(default)]
    user: RawUser,
    #[serde(default)]
    premium: Option<bool>,
    #[serde(default)]
    plus: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUrls {
    #[serde(default)]
    regular: String,
    #[serde(default)]
    full: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawLinks {
    #[serde(default)]
    html: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawUser {
    #[serde(default)]
    name: String,
    #[serde(default)]
    username: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawPhoto>,
}

impl From<RawPhoto> for UnsplashPhoto {
    fn from(raw: RawPhoto) -> Self {
        Self {
            id: raw.id,
            width: raw.width,
            height: raw.height,
            description: raw.description,
            alt_description: raw.alt_description,
            url: raw.urls.regular,
            download_url: raw.urls.full,
            html_url: raw.links.html,
            user_name: raw.user.name,
            user_username: raw.user.username,
            plus: raw.plus.or(raw.premium).unwrap_or(false),
        }
    }
}

/// Builds the attribution caption for a photo by `user_name` (`@user_username`).
pub fn attribution_html(user_name: &str, user_username: &str) -> String {
    format!(
        "Photo by <a href=\"https://unsplash.com/@{}?{}\">{}</a> / <a href=\"https://unsplash.com/?{}\">Unsplash</a>",
        escape_html(user_username),
        UTM_PARAMS,
        escape_html(user_name),
        UTM_PARAMS
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Unsplash API settings.
#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    pub base_url: String,
    pub access_key: Option<String>,
}

/// Unsplash service.
pub struct UnsplashService {
    http: Arc<HttpClient>,
    config: UnsplashConfig,
}

impl UnsplashService {
    pub(crate) fn new(http: Arc<HttpClient>, config: UnsplashConfig) -> Self {
        Self { http, config }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
        let key = self
            .config
            .access_key
            .as_deref()
            .ok_or_else(|| Error::Config("unsplash access key is not set".to_string()))?;
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        debug!(path, "unsplash request");
        let response = self
            .http
            .inner()
            .get(&url)
            .query(query)
            .header(AUTHORIZATION, format!("Client-ID {}", key))
            .header(ACCEPT_VERSION, "v1")
            .send()
            .await?;

        handle_response(response).await
    }

    /// Searches photos.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let photos = client.unsplash()
    ///     .search("mountain lake", Some(Orientation::Landscape), 10)
    ///     .await?;
    /// for photo in &photos {
    ///     println!("{} by {}", photo.id, photo.user_name);
    /// }
    /// ```
    pub async fn search(
        &self,
        query: &str,
        orientation: Option<Orientation>,
        per_page: u32,
    ) -> Result<Vec<UnsplashPhoto>> {
        let mut params = vec![("query", query.to_string()), ("per_page", per_page.to_string())];
        if let Some(orientation) = orientation {
            params.push(("orientation", orientation.as_str().to_string()));
        }

        let body = self.get("/search/photos", &params).await?;
        let resp: SearchResponse = serde_json::from_value(body)?;
        Ok(resp.results.into_iter().map(UnsplashPhoto::from).collect())
    }

    /// Looks up a single photo.
    pub async fn photo(&self, photo_id: &str) -> Result<UnsplashPhoto> {
        let body = self
            .get(&format!("/photos/{}", path_segment(photo_id)?), &[])
            .await?;
        let raw: RawPhoto = serde_json::from_value(body)?;
        Ok(raw.into())
    }

    /// Builds an attribution caption.
    ///
    /// With both user fields given this is pure string construction;
    /// otherwise the photo is looked up by id first.
    pub async fn caption(
        &self,
        photo_id: Option<&str>,
        user_name: Option<&str>,
        user_username: Option<&str>,
    ) -> Result<String> {
        if let (Some(name), Some(username)) = (user_name, user_username) {
            return Ok(attribution_html(name, username));
        }

        let photo_id = photo_id.ok_or_else(|| {
            Error::Config("caption needs a photo id or both user name and username".to_string())
        })?;
        Ok(self.photo(photo_id).await?.caption())
    }
}
