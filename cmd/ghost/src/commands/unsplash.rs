//! Unsplash commands.

use clap::{Args, Subcommand};
use serde_json::Value;

use ghostkit::Orientation;

use super::{create_client, output_result, print_success, print_verbose};
use crate::Cli;

/// Unsplash search and feature images.
///
/// Needs an Unsplash access key in the context or in UNSPLASH_ACCESS_KEY.
#[derive(Args)]
pub struct UnsplashCommand {
    #[command(subcommand)]
    command: UnsplashSubcommand,
}

#[derive(Subcommand)]
enum UnsplashSubcommand {
    /// Search photos
    Search {
        /// Search terms
        query: String,
        /// landscape, portrait or squarish
        #[arg(long)]
        orientation: Option<Orientation>,
        /// Results per page
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
    /// Print the attribution caption for a photo
    Caption {
        /// Photo id (looked up when names are not given)
        #[arg(long)]
        photo_id: Option<String>,
        /// Photographer display name
        #[arg(long)]
        name: Option<String>,
        /// Photographer username
        #[arg(long)]
        username: Option<String>,
    },
    /// Set a post's feature image from a photo
    Feature {
        /// Post id
        post_id: String,
        /// Photo id
        photo_id: String,
    },
}

impl UnsplashCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let client = create_client(cli)?;

        match &self.command {
            UnsplashSubcommand::Search {
                query,
                orientation,
                per_page,
            } => {
                print_verbose(cli, &format!("Searching Unsplash: {}", query));
                let photos = client.unsplash_search(query, *orientation, *per_page).await?;
                print_verbose(cli, &format!("Found {} photos", photos.len()));
                output_result(cli, &photos)
            }
            UnsplashSubcommand::Caption {
                photo_id,
                name,
                username,
            } => {
                let caption = client
                    .unsplash_caption(photo_id.as_deref(), name.as_deref(), username.as_deref())
                    .await?;
                println!("{}", caption);
                Ok(())
            }
            UnsplashSubcommand::Feature { post_id, photo_id } => {
                let post = client.set_unsplash_feature_image(post_id, photo_id).await?;
                print_success(&format!("Feature image set on post {}", post_id));
                let image = post.get("feature_image").cloned().unwrap_or(Value::Null);
                output_result(cli, &image)
            }
        }
    }
}
