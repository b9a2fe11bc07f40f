//! Read-only Content API service.

use std::sync::Arc;

use super::{
    envelope,
    error::Result,
    http::{HttpClient, path_segment},
    types::{ListPage, Query, Resource},
};

/// Collections readable through the Content API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Posts,
    Pages,
    Tags,
    Authors,
    Tiers,
}

impl ContentKind {
    pub fn plural(&self) -> &'static str {
        match self {
            ContentKind::Posts => "posts",
            ContentKind::Pages => "pages",
            ContentKind::Tags => "tags",
            ContentKind::Authors => "authors",
            ContentKind::Tiers => "tiers",
        }
    }
}

/// Content API service. Requests carry the Content key, never a token.
pub struct ContentService {
    http: Arc<HttpClient>,
}

impl ContentService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches one page of a public collection.
    pub async fn browse(&self, kind: ContentKind, query: &Query) -> Result<ListPage> {
        let path = format!("content/{}/", kind.plural());
        let body = self.http.request("GET", &path, query, None).await?;
        envelope::unwrap_list(kind.plural(), body)
    }

    /// Reads a public resource by id.
    pub async fn read(&self, kind: ContentKind, id: &str, query: &Query) -> Result<Resource> {
        let path = format!("content/{}/{}/", kind.plural(), path_segment(id)?);
        let body = self.http.request("GET", &path, query, None).await?;
        envelope::unwrap_one(kind.plural(), body)
    }

    /// Reads a public resource by slug.
    pub async fn read_by_slug(
        &self,
        kind: ContentKind,
        slug: &str,
        query: &Query,
    ) -> Result<Resource> {
        let path = format!("content/{}/slug/{}/", kind.plural(), path_segment(slug)?);
        let body = self.http.request("GET", &path, query, None).await?;
        envelope::unwrap_one(kind.plural(), body)
    }
}
