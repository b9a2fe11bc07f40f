//! Utility functions for CLI commands.

use std::io::IsTerminal;
use std::time::Duration;

use ghostkit::{Client, ENV_UNSPLASH_ACCESS_KEY, Query, Resource};
use ghostkit_cli::{
    Output, OutputFormat,
    config::{Config, Context, load_config},
    request::{load_request, load_request_from_stdin},
};
use serde_json::Value;

use crate::Cli;

const APP_NAME: &str = "ghost";

/// Context extra holding an Unsplash API base URL override.
pub const UNSPLASH_BASE_URL_KEY: &str = "unsplash_base_url";

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref())
}

/// Gets the context to use.
///
/// Returns `None` when no context was asked for and none is current, in which
/// case the client falls back to the environment.
pub fn get_context(cli: &Cli) -> anyhow::Result<Option<Context>> {
    let cfg = get_config(cli)?;

    match (cfg.resolve_context(cli.context.as_deref()), cli.context.as_deref()) {
        (Some(ctx), _) => Ok(Some(ctx.clone())),
        (None, Some(name)) => anyhow::bail!("context '{}' not found", name),
        (None, None) => Ok(None),
    }
}

/// Creates a Ghost client from the selected context, or from the environment.
pub fn create_client(cli: &Cli) -> anyhow::Result<Client> {
    match get_context(cli)? {
        Some(ctx) => {
            print_verbose(cli, &format!("Using context: {}", ctx.name));
            client_from_context(&ctx, |name| std::env::var(name).ok())
        }
        None => {
            print_verbose(cli, "No context configured, using environment");
            Ok(Client::from_env()?)
        }
    }
}

/// Builds a client from a context. A missing Unsplash key falls back to `env`.
pub fn client_from_context<F>(ctx: &Context, env: F) -> anyhow::Result<Client>
where
    F: Fn(&str) -> Option<String>,
{
    if ctx.base_url.is_empty() {
        anyhow::bail!("base_url not set in context '{}'", ctx.name);
    }
    if !ctx.has_ghost_key() {
        anyhow::bail!(
            "neither content_api_key nor admin_api_key is set in context '{}'",
            ctx.name
        );
    }

    let mut builder = Client::builder(&ctx.base_url);
    if !ctx.content_api_key.is_empty() {
        builder = builder.content_key(&ctx.content_api_key);
    }
    if !ctx.admin_api_key.is_empty() {
        builder = builder.admin_key(&ctx.admin_api_key);
    }

    let unsplash_key = if ctx.unsplash_access_key.is_empty() {
        env(ENV_UNSPLASH_ACCESS_KEY).filter(|k| !k.is_empty())
    } else {
        Some(ctx.unsplash_access_key.clone())
    };
    if let Some(key) = unsplash_key {
        builder = builder.unsplash_access_key(key);
    }

    if let Some(url) = ctx.get_extra(UNSPLASH_BASE_URL_KEY) {
        builder = builder.unsplash_base_url(url);
    }
    if !ctx.accept_version.is_empty() {
        builder = builder.accept_version(&ctx.accept_version);
    }
    if ctx.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(ctx.timeout as u64));
    }

    Ok(builder.build()?)
}

/// Parses repeated `key=value` arguments into a query.
pub fn parse_query(pairs: &[String]) -> anyhow::Result<Query> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| anyhow::anyhow!("invalid query parameter '{}', expected key=value", pair))
        })
        .collect()
}

/// Loads a request body from `-f` or from piped stdin.
pub fn load_body(cli: &Cli) -> anyhow::Result<Value> {
    if let Some(path) = cli.input.as_deref() {
        print_verbose(cli, &format!("Loading request from: {}", path));
        return Ok(load_request(path)?);
    }
    if std::io::stdin().is_terminal() {
        anyhow::bail!("request body is required, use -f flag or pipe JSON to stdin");
    }
    Ok(load_request_from_stdin()?)
}

/// Converts a loaded body into resource fields.
///
/// Accepts either a bare object or a single-element envelope keyed by `plural`.
pub fn into_fields(value: Value, plural: &str) -> anyhow::Result<Resource> {
    let value = match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(plural) => {
            match map.remove(plural) {
                Some(Value::Array(mut items)) if items.len() == 1 => items.remove(0),
                _ => anyhow::bail!("'{}' must hold exactly one object", plural),
            }
        }
        other => other,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("request body must be an object"),
    }
}

/// Builds the output sink from the global flags.
pub fn output(cli: &Cli) -> Output {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Yaml
    };
    Output::new(format, cli.output.clone())
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(cli: &Cli, result: &T) -> anyhow::Result<()> {
    output(cli).write(result)
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    ghostkit_cli::print_verbose(cli.verbose, msg);
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}
