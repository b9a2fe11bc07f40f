//! Admin API resource services (posts, pages, tags, members, newsletters).

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{
    envelope,
    error::{Error, Result},
    http::{HttpClient, path_segment},
    types::{HTML_FIELD, ListPage, Query, Resource, UPDATED_AT_FIELD},
};

/// Admin resource collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Posts,
    Pages,
    Tags,
    Members,
    Newsletters,
}

impl ResourceKind {
    /// Plural name used in paths and envelopes.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Posts => "posts",
            ResourceKind::Pages => "pages",
            ResourceKind::Tags => "tags",
            ResourceKind::Members => "members",
            ResourceKind::Newsletters => "newsletters",
        }
    }

    /// Whether writes may carry an `html` body that needs `source=html`.
    pub fn accepts_html(&self) -> bool {
        matches!(self, ResourceKind::Posts | ResourceKind::Pages)
    }

    /// Whether edits must echo the current `updated_at`.
    pub fn requires_updated_at(&self) -> bool {
        matches!(self, ResourceKind::Posts | ResourceKind::Pages)
    }
}

/// Returns the write query for `fields`: `source=html` iff an `html` field is present.
pub fn write_query(kind: ResourceKind, fields: &Resource) -> Query {
    let mut query = Query::new();
    if kind.accepts_html() && fields.contains_key(HTML_FIELD) {
        query.insert("source", "html");
    }
    query
}

/// Service over one Admin API collection.
pub struct ResourceService {
    http: Arc<HttpClient>,
    kind: ResourceKind,
}

impl ResourceService {
    pub(crate) fn new(http: Arc<HttpClient>, kind: ResourceKind) -> Self {
        Self { http, kind }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn collection_path(&self) -> String {
        format!("admin/{}/", self.kind.plural())
    }

    fn item_path(&self, id: &str) -> Result<String> {
        Ok(format!("admin/{}/{}/", self.kind.plural(), path_segment(id)?))
    }

    /// Fetches one page of the collection.
    pub async fn browse(&self, query: &Query) -> Result<ListPage> {
        let body = self
            .http
            .request("GET", &self.collection_path(), query, None)
            .await?;
        envelope::unwrap_list(self.kind.plural(), body)
    }

    /// Fetches every page, following `meta.pagination.next` until exhausted.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let drafts = client.posts()
    ///     .browse_all(&Query::new().filter("status:draft").limit(15))
    ///     .await?;
    /// ```
    pub async fn browse_all(&self, query: &Query) -> Result<Vec<Resource>> {
        let mut page = query
            .get("page")
            .and_then(|p| p.parse::<u32>().ok())
            .unwrap_or(1);
        let mut items = Vec::new();

        loop {
            let list = self.browse(&query.clone().page(page)).await?;
            items.extend(list.items);

            match list.pagination.and_then(|p| p.next) {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(items)
    }

    /// Reads a single resource by id.
    pub async fn read(&self, id: &str, query: &Query) -> Result<Resource> {
        let body = self.http.request("GET", &self.item_path(id)?, query, None).await?;
        envelope::unwrap_one(self.kind.plural(), body)
    }

    /// Reads a single resource by slug.
    pub async fn read_by_slug(&self, slug: &str, query: &Query) -> Result<Resource> {
        let path = format!("admin/{}/slug/{}/", self.kind.plural(), path_segment(slug)?);
        let body = self.http.request("GET", &path, query, None).await?;
        envelope::unwrap_one(self.kind.plural(), body)
    }

    /// Creates a resource and returns it unwrapped from the envelope.
    pub async fn add(&self, fields: Resource) -> Result<Resource> {
        let query = write_query(self.kind, &fields);
        let body = envelope::wrap(self.kind.plural(), fields);
        let resp = self
            .http
            .request("POST", &self.collection_path(), &query, Some(&body))
            .await?;
        envelope::unwrap_one(self.kind.plural(), resp)
    }

    /// Updates a resource and returns it unwrapped from the envelope.
    ///
    /// For posts and pages, a missing `updated_at` costs one extra read to
    /// fetch the current value, which is then echoed in the update.
    pub async fn edit(
        &self,
        id: &str,
        mut fields: Resource,
        updated_at: Option<&str>,
    ) -> Result<Resource> {
        let path = self.item_path(id)?;
        if self.kind.requires_updated_at() {
            let token = match updated_at {
                Some(ts) => ts.to_string(),
                None => self.current_updated_at(id).await?,
            };
            fields.insert(UPDATED_AT_FIELD.to_string(), Value::String(token));
        }

        let query = write_query(self.kind, &fields);
        let body = envelope::wrap(self.kind.plural(), fields);
        let resp = self
            .http
            .request("PUT", &path, &query, Some(&body))
            .await?;
        envelope::unwrap_one(self.kind.plural(), resp)
    }

    /// Deletes a resource. Unknown ids surface as a 404 error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.http
            .request("DELETE", &self.item_path(id)?, &Query::new(), None)
            .await?;
        Ok(())
    }

    async fn current_updated_at(&self, id: &str) -> Result<String> {
        debug!(kind = self.kind.plural(), id, "fetching updated_at before edit");
        let current = self.read(id, &Query::new()).await?;
        current
            .get(UPDATED_AT_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::Envelope(format!("{} {} has no updated_at", self.kind.plural(), id))
            })
    }
}
