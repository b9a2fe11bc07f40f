//! Ghost CLI - A command line interface for the Ghost Content and Admin APIs.

use clap::{Parser, Subcommand};

mod commands;

use commands::{
    ApiCommand, ConfigCommand, ImageCommand, MemberCommand, NewsletterCommand, PageCommand,
    PostCommand, TagCommand, UnsplashCommand,
};

/// Ghost CLI - A command line interface for Ghost sites.
///
/// This tool allows you to work with a Ghost site including:
///   - Raw Content and Admin API requests
///   - Posts (create, update, pull and push HTML bodies)
///   - Pages, tags, members and newsletters
///   - Image uploads
///   - Unsplash feature images
///
/// Configuration is stored in ~/.ghostkit/ghost/ and supports multiple contexts,
/// similar to kubectl's context management. Without a context the
/// GHOST_API_URL, GHOST_CONTENT_API_KEY, GHOST_ADMIN_API_KEY and
/// UNSPLASH_ACCESS_KEY environment variables are used.
#[derive(Parser)]
#[command(name = "ghost")]
#[command(about = "Ghost API CLI tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.ghostkit/ghost/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Input request file (YAML or JSON)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// Raw API requests
    Api(ApiCommand),
    /// Post management
    Post(PostCommand),
    /// Page management
    Page(PageCommand),
    /// Tag management
    Tag(TagCommand),
    /// Member management
    Member(MemberCommand),
    /// Newsletter management
    Newsletter(NewsletterCommand),
    /// Image uploads
    Image(ImageCommand),
    /// Unsplash search and feature images
    Unsplash(UnsplashCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Api(cmd) => cmd.run(&cli).await,
        Commands::Post(cmd) => cmd.run(&cli).await,
        Commands::Page(cmd) => cmd.run(&cli).await,
        Commands::Tag(cmd) => cmd.run(&cli).await,
        Commands::Member(cmd) => cmd.run(&cli).await,
        Commands::Newsletter(cmd) => cmd.run(&cli).await,
        Commands::Image(cmd) => cmd.run(&cli).await,
        Commands::Unsplash(cmd) => cmd.run(&cli).await,
    }
}
