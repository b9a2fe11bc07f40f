//! Listing and reading admin collections (pages, tags, members, newsletters).

use clap::{Args, Subcommand};

use ghostkit::{Client, ContentFormat, ContentKind, Query, ResourceKind};

use super::{create_client, output_result, print_verbose};
use crate::Cli;

/// Shared list flags.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page size
    #[arg(long, default_value_t = 15)]
    pub limit: u32,
    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
    /// NQL filter, e.g. status:published+tag:news
    #[arg(long)]
    pub filter: Option<String>,
    /// Related data to include, e.g. tags,authors
    #[arg(long)]
    pub include: Option<String>,
    /// Sort order, e.g. "published_at desc"
    #[arg(long)]
    pub order: Option<String>,
    /// Fetch every page
    #[arg(long)]
    pub all: bool,
    /// Read through the Content API (published items only)
    #[arg(long)]
    pub public: bool,
}

impl ListArgs {
    pub fn to_query(&self) -> Query {
        let mut query = Query::new().limit(self.limit);
        if let Some(page) = self.page {
            query = query.page(page);
        }
        if let Some(filter) = &self.filter {
            query = query.filter(filter);
        }
        if let Some(include) = &self.include {
            query = query.include(include);
        }
        if let Some(order) = &self.order {
            query = query.order(order);
        }
        query
    }
}

fn content_kind(kind: ResourceKind) -> Option<ContentKind> {
    match kind {
        ResourceKind::Posts => Some(ContentKind::Posts),
        ResourceKind::Pages => Some(ContentKind::Pages),
        ResourceKind::Tags => Some(ContentKind::Tags),
        ResourceKind::Members | ResourceKind::Newsletters => None,
    }
}

/// Lists a collection and prints it.
pub async fn list(cli: &Cli, client: &Client, kind: ResourceKind, args: &ListArgs) -> anyhow::Result<()> {
    let query = args.to_query();
    print_verbose(cli, &format!("Listing {}", kind.plural()));

    if args.public {
        let Some(content) = content_kind(kind) else {
            anyhow::bail!("{} are not available through the Content API", kind.plural());
        };
        let page = client.content().browse(content, &query).await?;
        return output_result(cli, &page);
    }

    let service = client.resource(kind);
    if args.all {
        let items = service.browse_all(&query).await?;
        print_verbose(cli, &format!("Fetched {} {}", items.len(), kind.plural()));
        output_result(cli, &items)
    } else {
        let page = service.browse(&query).await?;
        output_result(cli, &page)
    }
}

/// Reads one item by id, or by slug when `by_slug` is set.
pub async fn get(
    cli: &Cli,
    client: &Client,
    kind: ResourceKind,
    id: &str,
    by_slug: bool,
    query: &Query,
) -> anyhow::Result<()> {
    let service = client.resource(kind);
    let item = if by_slug {
        service.read_by_slug(id, query).await?
    } else {
        service.read(id, query).await?
    };
    output_result(cli, &item)
}

// ==================== Pages ====================

/// Page management.
#[derive(Args)]
pub struct PageCommand {
    #[command(subcommand)]
    command: PageSubcommand,
}

#[derive(Subcommand)]
enum PageSubcommand {
    /// List pages
    List(ListArgs),
    /// Get a page
    Get {
        /// Page id (or slug with --slug)
        id: String,
        /// Treat the argument as a slug
        #[arg(long)]
        slug: bool,
    },
}

impl PageCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let client = create_client(cli)?;
        match &self.command {
            PageSubcommand::List(args) => list(cli, &client, ResourceKind::Pages, args).await,
            PageSubcommand::Get { id, slug } => {
                let query = Query::new().formats(ContentFormat::Html.as_str());
                get(cli, &client, ResourceKind::Pages, id, *slug, &query).await
            }
        }
    }
}

// ==================== Tags, members, newsletters ====================

/// Tag management.
#[derive(Args)]
pub struct TagCommand {
    #[command(subcommand)]
    command: ListOnly,
}

/// Member management.
#[derive(Args)]
pub struct MemberCommand {
    #[command(subcommand)]
    command: ListOnly,
}

/// Newsletter management.
#[derive(Args)]
pub struct NewsletterCommand {
    #[command(subcommand)]
    command: ListOnly,
}

#[derive(Subcommand)]
enum ListOnly {
    /// List items
    List(ListArgs),
}

async fn run_list_only(cli: &Cli, kind: ResourceKind, command: &ListOnly) -> anyhow::Result<()> {
    let client = create_client(cli)?;
    match command {
        ListOnly::List(args) => list(cli, &client, kind, args).await,
    }
}

impl TagCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        run_list_only(cli, ResourceKind::Tags, &self.command).await
    }
}

impl MemberCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        run_list_only(cli, ResourceKind::Members, &self.command).await
    }
}

impl NewsletterCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        run_list_only(cli, ResourceKind::Newsletters, &self.command).await
    }
}
