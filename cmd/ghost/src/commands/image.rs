//! Image upload commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use super::{create_client, output_result, print_verbose};
use crate::Cli;

/// Image uploads.
///
/// Supported types: jpg, jpeg, png, gif, webp, svg, ico.
#[derive(Args)]
pub struct ImageCommand {
    #[command(subcommand)]
    command: ImageSubcommand,
}

#[derive(Subcommand)]
enum ImageSubcommand {
    /// Upload an image and print its URL
    Upload {
        /// Path to the image
        file: String,
        /// Reference echoed back by Ghost, e.g. the original filename
        #[arg(long = "ref")]
        reference: Option<String>,
    },
}

#[derive(Serialize)]
struct UploadResult<'a> {
    file: &'a str,
    url: String,
}

impl ImageCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ImageSubcommand::Upload { file, reference } => {
                let client = create_client(cli)?;
                print_verbose(cli, &format!("Uploading image: {}", file));

                let url = client.upload(file, reference.as_deref()).await?;
                output_result(cli, &UploadResult { file, url })
            }
        }
    }
}
