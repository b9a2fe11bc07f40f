//! Ghost API SDK for Rust.
//!
//! This crate provides a client for Ghost's Content API (public, read-only,
//! key authenticated) and Admin API (read/write, signed token per request),
//! plus Unsplash search and attribution for feature images.

mod auth;
mod client;
mod content;
pub mod envelope;
mod error;
pub mod http;
mod image;
mod resource;
mod types;
mod unsplash;

pub use auth::{
    ADMIN_AUDIENCE, AdminKey, Claims, Surface, TOKEN_TTL_SECS, decode_claims, mint_token,
    sign_claims,
};
pub use client::{
    Client, ClientBuilder, DEFAULT_ACCEPT_VERSION, DEFAULT_TIMEOUT, ENV_ADMIN_API_KEY,
    ENV_API_URL, ENV_CONTENT_API_KEY, ENV_UNSPLASH_ACCESS_KEY,
};
pub use content::{ContentKind, ContentService};
pub use error::{Error, Result, status_code};
pub use image::{ImageService, SUPPORTED_IMAGE_TYPES, UPLOAD_PATH, image_content_type};
pub use resource::{ResourceKind, ResourceService, write_query};
pub use types::{
    AllLimit, ContentFormat, HTML_FIELD, Limit, ListPage, Pagination, Query, Resource,
    UPDATED_AT_FIELD,
};
pub use unsplash::{
    Orientation, UNSPLASH_BASE_URL, UnsplashPhoto, UnsplashService, attribution_html,
};
