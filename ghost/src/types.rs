//! Common types for the Ghost API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Ghost resource object (post, page, tag, member, ...) as decoded JSON.
pub type Resource = Map<String, Value>;

/// Field carrying a resource's HTML body.
pub const HTML_FIELD: &str = "html";

/// Field carrying a resource's concurrency token.
pub const UPDATED_AT_FIELD: &str = "updated_at";

// ==================== Query ====================

/// Ordered query-string parameters for a Ghost request.
///
/// `filter` takes an NQL expression, which is forwarded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any earlier value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// In-place variant of [`Query::set`].
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn limit(self, limit: u32) -> Self {
        self.set("limit", limit.to_string())
    }

    /// Requests every item in one response (`limit=all`).
    pub fn limit_all(self) -> Self {
        self.set("limit", "all")
    }

    pub fn page(self, page: u32) -> Self {
        self.set("page", page.to_string())
    }

    /// NQL filter, e.g. `status:published+tag:news`.
    pub fn filter(self, nql: impl Into<String>) -> Self {
        self.set("filter", nql)
    }

    /// Related data to include, e.g. `tags,authors`.
    pub fn include(self, include: impl Into<String>) -> Self {
        self.set("include", include)
    }

    pub fn fields(self, fields: impl Into<String>) -> Self {
        self.set("fields", fields)
    }

    /// Content formats to return, e.g. `html` or `html,lexical`.
    pub fn formats(self, formats: impl Into<String>) -> Self {
        self.set("formats", formats)
    }

    pub fn order(self, order: impl Into<String>) -> Self {
        self.set("order", order)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (k, v) in iter {
            query.insert(k, v);
        }
        query
    }
}

// ==================== Pagination ====================

/// Page size as reported by Ghost: a number, or `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Limit {
    Count(u32),
    All(AllLimit),
}

/// The literal `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllLimit {
    All,
}

/// `meta.pagination` block of a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: Limit,
    pub pages: u32,
    pub total: u64,
    #[serde(default)]
    pub next: Option<u32>,
    #[serde(default)]
    pub prev: Option<u32>,
}

impl Pagination {
    /// Returns true if there is no further page to fetch.
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// One page of a list response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPage {
    pub items: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

// ==================== Content Format ====================

/// Wire representation of a resource body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// HTML. Needs `source=html` on write and `formats=html` on read.
    Html,
    /// Ghost's structured rich-document JSON, written and read verbatim.
    Lexical,
    /// Legacy structured document format.
    Mobiledoc,
}

impl ContentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFormat::Html => "html",
            ContentFormat::Lexical => "lexical",
            ContentFormat::Mobiledoc => "mobiledoc",
        }
    }
}
