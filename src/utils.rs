//! Utils

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{
    EnvFilter,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Arguments for the catalog example
#[derive(Debug, Parser)]
pub struct ExampleCatalogArgs {
    /// Fixture set to price
    #[clap(short, long, default_value = "storefront")]
    pub fixture: String,

    /// Directory holding the `offers/` and `products/` fixture files
    #[clap(short = 'd', long, env = "CATALOG_FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Only price the product with this key (slug, id or name)
    #[clap(short, long)]
    pub product: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[clap(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[clap(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Install a global tracing subscriber writing to stderr.
///
/// `RUST_LOG` directives take precedence over `level` when set.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_tracing(level: &str, format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn example_args_have_defaults() {
        let args = ExampleCatalogArgs::parse_from(["catalog"]);

        assert_eq!(args.fixture, "storefront");
        assert!(args.product.is_none());
    }

    #[test]
    fn example_args_parse_flags() {
        let args = ExampleCatalogArgs::parse_from([
            "catalog",
            "-f",
            "clearance",
            "-p",
            "led-mirror",
            "--log-format",
            "json",
        ]);

        assert_eq!(args.fixture, "clearance");
        assert_eq!(args.product.as_deref(), Some("led-mirror"));
        assert_eq!(args.log_format, LogFormat::Json);
    }
}
