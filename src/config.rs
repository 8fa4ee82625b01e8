use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Mount point of the bootcamp routes, normalized by `normalize_base_path`.
    pub base_path: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Bootcamp directory REST API")]
pub struct Args {
    /// Host to bind to (overrides BOOTCAMP_API_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides BOOTCAMP_API_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides BOOTCAMP_API_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Base path for bootcamp routes (overrides BOOTCAMP_API_BASE_PATH)
    #[arg(long)]
    pub base_path: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

const DEFAULT_PORT: u16 = 5000;

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        let cfg = Self::merge(args, |key| env::var(key))?;
        Ok((cfg, migrate))
    }

    /// CLI values win over environment values, which win over defaults.
    fn merge<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let env_host = lookup("BOOTCAMP_API_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match lookup("BOOTCAMP_API_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing BOOTCAMP_API_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => DEFAULT_PORT,
            Err(err) => return Err(err).context("reading BOOTCAMP_API_PORT"),
        };
        let env_db = lookup("BOOTCAMP_API_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/bootcamps.db".into());
        let env_base =
            lookup("BOOTCAMP_API_BASE_PATH").unwrap_or_else(|_| "/api/v1/bootcamps".into());

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            base_path: normalize_base_path(&args.base_path.unwrap_or(env_base)),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Leading slash, no trailing slash; the root becomes the empty string.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
