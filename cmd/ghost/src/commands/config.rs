//! Configuration management commands.

use clap::{Args, Subcommand};

use ghostkit_cli::config::{Context as CliContext, mask_api_key};

use super::{UNSPLASH_BASE_URL_KEY, get_config, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Contexts allow you to manage multiple Ghost sites,
/// similar to kubectl's context management.
///
/// Configuration is stored in ~/.ghostkit/ghost/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

/// Flags for `config add-context`.
#[derive(Args, Debug, Clone, Default)]
struct AddContextArgs {
    /// Context name
    name: String,
    /// Site URL, e.g. https://blog.example.com
    #[arg(long)]
    base_url: String,
    /// Content API key
    #[arg(long)]
    content_api_key: Option<String>,
    /// Admin API key (id:secret)
    #[arg(long)]
    admin_api_key: Option<String>,
    /// Unsplash access key
    #[arg(long)]
    unsplash_access_key: Option<String>,
    /// Unsplash API base URL, for proxies and self-hosted mirrors
    #[arg(long)]
    unsplash_base_url: Option<String>,
    /// Accept-Version header
    #[arg(long)]
    accept_version: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<i32>,
}

impl AddContextArgs {
    fn to_context(&self) -> anyhow::Result<CliContext> {
        if self.content_api_key.is_none() && self.admin_api_key.is_none() {
            anyhow::bail!("at least one of --content-api-key or --admin-api-key is required");
        }

        let mut ctx = CliContext {
            base_url: self.base_url.clone(),
            content_api_key: self.content_api_key.clone().unwrap_or_default(),
            admin_api_key: self.admin_api_key.clone().unwrap_or_default(),
            unsplash_access_key: self.unsplash_access_key.clone().unwrap_or_default(),
            accept_version: self.accept_version.clone().unwrap_or_default(),
            timeout: self.timeout.unwrap_or(0),
            ..Default::default()
        };
        if let Some(url) = &self.unsplash_base_url {
            ctx.set_extra(UNSPLASH_BASE_URL_KEY, url.clone());
        }
        Ok(ctx)
    }
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a new context
    #[command(name = "add-context")]
    AddContext(AddContextArgs),
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Display the current context
    #[command(name = "get-context")]
    GetContext,
    /// List all contexts
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// View the current configuration
    View,
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddContext(args) => {
                let ctx = args.to_context()?;
                let name = &args.name;

                let mut cfg = get_config(cli)?;
                cfg.add_context(name, ctx)?;
                if cfg.current_context.is_empty() {
                    cfg.use_context(name)?;
                }
                print_success(&format!("Context \"{}\" added successfully", name));
                Ok(())
            }

            ConfigSubcommand::DeleteContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::GetContext => {
                let cfg = get_config(cli)?;
                if cfg.current_context.is_empty() {
                    println!("No current context set");
                } else {
                    println!("{}", cfg.current_context);
                }
                Ok(())
            }

            ConfigSubcommand::ListContexts => {
                let cfg = get_config(cli)?;

                if cfg.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!("{:<8} {:<20} {:<40} {}", "CURRENT", "NAME", "BASE_URL", "KEYS");

                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.get_context(name) else {
                        continue;
                    };
                    let current = if name == cfg.current_context { "*" } else { "" };
                    let mut keys = Vec::new();
                    if !ctx.content_api_key.is_empty() {
                        keys.push("content");
                    }
                    if !ctx.admin_api_key.is_empty() {
                        keys.push("admin");
                    }
                    if !ctx.unsplash_access_key.is_empty() {
                        keys.push("unsplash");
                    }
                    println!("{:<8} {:<20} {:<40} {}", current, name, ctx.base_url, keys.join(","));
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                println!("Config file: {}", cfg.path().display());
                println!("Current context: {}", cfg.current_context);
                println!("Contexts: {}", cfg.contexts.len());

                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.get_context(name) else {
                        continue;
                    };
                    println!("\n  {}:", name);
                    println!("    Base URL: {}", ctx.base_url);
                    if !ctx.content_api_key.is_empty() {
                        println!("    Content API Key: {}", mask_api_key(&ctx.content_api_key));
                    }
                    if !ctx.admin_api_key.is_empty() {
                        println!("    Admin API Key: {}", mask_api_key(&ctx.admin_api_key));
                    }
                    if !ctx.unsplash_access_key.is_empty() {
                        println!(
                            "    Unsplash Access Key: {}",
                            mask_api_key(&ctx.unsplash_access_key)
                        );
                    }
                    if let Some(url) = ctx.get_extra(UNSPLASH_BASE_URL_KEY) {
                        println!("    Unsplash Base URL: {}", url);
                    }
                    if !ctx.accept_version.is_empty() {
                        println!("    Accept-Version: {}", ctx.accept_version);
                    }
                    if ctx.timeout > 0 {
                        println!("    Timeout: {}s", ctx.timeout);
                    }
                }

                Ok(())
            }
        }
    }
}
