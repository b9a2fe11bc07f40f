//! CLI utilities for ghostkit.
//!
//! Context-based configuration, output formatting and request loading
//! shared by the `ghost` command.

pub mod config;
pub mod output;
pub mod request;

pub use config::{Config, Context, load_config, mask_api_key};
pub use output::{Output, OutputFormat, print_verbose};
pub use request::{RequestError, load_request, load_request_from_stdin, parse_request};
