//! Raw API request commands.

use clap::{Args, Subcommand};
use serde_json::Value;

use super::{create_client, load_body, output_result, parse_query, print_success, print_verbose};
use crate::Cli;

/// Raw API requests.
///
/// Paths are relative to /ghost/api/ and must start with content/ or admin/,
/// e.g. `ghost api get admin/posts/ -q limit=5`.
#[derive(Args)]
pub struct ApiCommand {
    #[command(subcommand)]
    command: ApiSubcommand,
}

#[derive(Subcommand)]
enum ApiSubcommand {
    /// GET a path
    Get {
        /// API path, e.g. content/posts/
        path: String,
        /// Query parameter (key=value), repeatable
        #[arg(short = 'q', long = "query")]
        query: Vec<String>,
    },
    /// POST a body (from -f or stdin) to a path
    Post {
        /// API path, e.g. admin/posts/
        path: String,
        /// Query parameter (key=value), repeatable
        #[arg(short = 'q', long = "query")]
        query: Vec<String>,
    },
    /// PUT a body (from -f or stdin) to a path
    Put {
        /// API path, e.g. admin/posts/{id}/
        path: String,
        /// Query parameter (key=value), repeatable
        #[arg(short = 'q', long = "query")]
        query: Vec<String>,
    },
    /// DELETE a path
    Delete {
        /// API path, e.g. admin/posts/{id}/
        path: String,
    },
}

impl ApiCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let client = create_client(cli)?;

        match &self.command {
            ApiSubcommand::Get { path, query } => {
                print_verbose(cli, &format!("GET {}", path));
                let resp = client.get(path, &parse_query(query)?).await?;
                output_result(cli, &resp)
            }
            ApiSubcommand::Post { path, query } => {
                let body = load_body(cli)?;
                print_verbose(cli, &format!("POST {}", path));
                let resp = client.post(path, &body, &parse_query(query)?).await?;
                output_result(cli, &resp)
            }
            ApiSubcommand::Put { path, query } => {
                let body: Value = load_body(cli)?;
                print_verbose(cli, &format!("PUT {}", path));
                let resp = client.put(path, &body, &parse_query(query)?).await?;
                output_result(cli, &resp)
            }
            ApiSubcommand::Delete { path } => {
                print_verbose(cli, &format!("DELETE {}", path));
                client.delete(path).await?;
                print_success(&format!("Deleted {}", path));
                Ok(())
            }
        }
    }
}
