//! Post commands.
//!
//! `pull` and `push` move a post's HTML body between the site and a local file.

use clap::{Args, Subcommand};
use serde_json::Value;

use ghostkit::{ContentFormat, HTML_FIELD, Query, Resource, ResourceKind, UPDATED_AT_FIELD};

use super::{
    collection::{ListArgs, get, list},
    create_client, into_fields, load_body, output, output_result, print_success, print_verbose,
};
use crate::Cli;

/// Post management.
#[derive(Args)]
pub struct PostCommand {
    #[command(subcommand)]
    command: PostSubcommand,
}

/// Field flags layered over a body loaded with -f.
#[derive(Args, Debug, Clone, Default)]
struct FieldArgs {
    /// Post title
    #[arg(long)]
    title: Option<String>,
    /// Read the HTML body from this file
    #[arg(long = "html-file")]
    html_file: Option<String>,
    /// Post status (draft, published, scheduled)
    #[arg(long)]
    status: Option<String>,
}

impl FieldArgs {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.html_file.is_none() && self.status.is_none()
    }

    fn apply(&self, fields: &mut Resource) -> anyhow::Result<()> {
        if let Some(title) = &self.title {
            fields.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(path) = &self.html_file {
            let html = std::fs::read_to_string(path)?;
            fields.insert(HTML_FIELD.to_string(), Value::String(html));
        }
        if let Some(status) = &self.status {
            fields.insert("status".to_string(), Value::String(status.clone()));
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum PostSubcommand {
    /// List posts
    List(ListArgs),
    /// Get a post
    Get {
        /// Post id (or slug with --slug)
        id: String,
        /// Treat the argument as a slug
        #[arg(long)]
        slug: bool,
    },
    /// Create a post from -f/stdin and/or field flags
    Create {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Update a post from -f/stdin and/or field flags
    Update {
        /// Post id
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
        /// Concurrency token; read from the server when omitted
        #[arg(long)]
        updated_at: Option<String>,
    },
    /// Delete a post
    Delete {
        /// Post id
        id: String,
    },
    /// Write a post's HTML body to a file (or -o, or stdout)
    Pull {
        /// Post id (or slug with --slug)
        id: String,
        /// Destination file
        file: Option<String>,
        /// Treat the argument as a slug
        #[arg(long)]
        slug: bool,
    },
    /// Replace a post's body with the HTML in a local file
    Push {
        /// Post id
        id: String,
        /// HTML file
        html_file: String,
        /// Concurrency token; read from the server when omitted
        #[arg(long)]
        updated_at: Option<String>,
    },
}

impl PostCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            PostSubcommand::List(args) => {
                let client = create_client(cli)?;
                list(cli, &client, ResourceKind::Posts, args).await
            }
            PostSubcommand::Get { id, slug } => {
                let client = create_client(cli)?;
                let query = Query::new().formats(ContentFormat::Html.as_str());
                get(cli, &client, ResourceKind::Posts, id, *slug, &query).await
            }
            PostSubcommand::Create { fields } => self.create(cli, fields).await,
            PostSubcommand::Update {
                id,
                fields,
                updated_at,
            } => self.update(cli, id, fields, updated_at.as_deref()).await,
            PostSubcommand::Delete { id } => {
                let client = create_client(cli)?;
                client.posts().delete(id).await?;
                print_success(&format!("Post {} deleted", id));
                Ok(())
            }
            PostSubcommand::Pull { id, file, slug } => {
                self.pull(cli, id, file.as_deref(), *slug).await
            }
            PostSubcommand::Push {
                id,
                html_file,
                updated_at,
            } => self.push(cli, id, html_file, updated_at.as_deref()).await,
        }
    }

    fn collect_fields(cli: &Cli, flags: &FieldArgs) -> anyhow::Result<Resource> {
        let mut fields = if cli.input.is_some() || flags.is_empty() {
            into_fields(load_body(cli)?, ResourceKind::Posts.plural())?
        } else {
            Resource::new()
        };
        flags.apply(&mut fields)?;
        Ok(fields)
    }

    async fn create(&self, cli: &Cli, flags: &FieldArgs) -> anyhow::Result<()> {
        let fields = Self::collect_fields(cli, flags)?;
        if !fields.contains_key("title") {
            anyhow::bail!("a post needs a title");
        }

        let client = create_client(cli)?;
        print_verbose(
            cli,
            &format!("Creating post (html: {})", fields.contains_key(HTML_FIELD)),
        );
        let post = client.create_post(fields).await?;
        print_success(&format!(
            "Post {} created",
            post.get("id").and_then(Value::as_str).unwrap_or_default()
        ));
        output_result(cli, &post)
    }

    async fn update(
        &self,
        cli: &Cli,
        id: &str,
        flags: &FieldArgs,
        updated_at: Option<&str>,
    ) -> anyhow::Result<()> {
        let mut fields = Self::collect_fields(cli, flags)?;

        // A token in the body counts as if passed with --updated-at.
        let body_token = fields
            .remove(UPDATED_AT_FIELD)
            .and_then(|v| v.as_str().map(str::to_string));
        let token = updated_at.map(str::to_string).or(body_token);

        let client = create_client(cli)?;
        let post = client.update_post(id, fields, token.as_deref()).await?;
        print_success(&format!("Post {} updated", id));
        output_result(cli, &post)
    }

    async fn pull(
        &self,
        cli: &Cli,
        id: &str,
        file: Option<&str>,
        by_slug: bool,
    ) -> anyhow::Result<()> {
        let client = create_client(cli)?;
        let query = Query::new().formats(ContentFormat::Html.as_str());
        let post = if by_slug {
            client.posts().read_by_slug(id, &query).await?
        } else {
            client.posts().read(id, &query).await?
        };

        let html = post.get(HTML_FIELD).and_then(Value::as_str).unwrap_or_default();
        print_verbose(
            cli,
            &format!(
                "Pulled \"{}\" (updated_at {})",
                post.get("title").and_then(Value::as_str).unwrap_or_default(),
                post.get(UPDATED_AT_FIELD).and_then(Value::as_str).unwrap_or_default()
            ),
        );
        let mut sink = output(cli);
        if let Some(file) = file {
            sink.file = Some(file.to_string());
        }
        sink.write_text(html)
    }

    async fn push(
        &self,
        cli: &Cli,
        id: &str,
        html_file: &str,
        updated_at: Option<&str>,
    ) -> anyhow::Result<()> {
        let html = std::fs::read_to_string(html_file)?;
        let mut fields = Resource::new();
        fields.insert(HTML_FIELD.to_string(), Value::String(html));

        let client = create_client(cli)?;
        print_verbose(cli, &format!("Pushing {} to post {}", html_file, id));
        let post = client.update_post(id, fields, updated_at).await?;
        print_success(&format!(
            "Post {} updated (updated_at {})",
            id,
            post.get(UPDATED_AT_FIELD).and_then(Value::as_str).unwrap_or_default()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_args_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.html");
        std::fs::write(&path, "<p>Hi</p>").unwrap();

        let flags = FieldArgs {
            title: Some("Hello".to_string()),
            html_file: Some(path.to_string_lossy().to_string()),
            status: None,
        };
        assert!(!flags.is_empty());

        let mut fields = Resource::new();
        fields.insert("status".to_string(), Value::String("draft".to_string()));
        flags.apply(&mut fields).unwrap();

        assert_eq!(fields["title"], "Hello");
        assert_eq!(fields[HTML_FIELD], "<p>Hi</p>");
        assert_eq!(fields["status"], "draft");
        assert!(FieldArgs::default().is_empty());
    }
}
