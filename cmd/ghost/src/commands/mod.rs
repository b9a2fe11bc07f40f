//! CLI commands module.

mod api;
mod collection;
mod config;
mod image;
mod post;
mod unsplash;
mod util;

pub use api::ApiCommand;
pub use collection::{MemberCommand, NewsletterCommand, PageCommand, TagCommand};
pub use config::ConfigCommand;
pub use image::ImageCommand;
pub use post::PostCommand;
pub use unsplash::UnsplashCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
