use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
///
/// The variable names (`GO_ENV`, `AWS_ACCESS_KEY`, ...) are the deployment
/// interface of the service and keep their historical spellings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// True when `GO_ENV=development`: a `.env` file is loaded and the
    /// listener binds to localhost only.
    pub dev_mode: bool,
    pub port: u16,
    /// Shared secret compared verbatim against the `Authorization` header
    /// on uploads.
    pub auth_key: String,
    pub aws_access_key: String,
    pub aws_secret_key: String,
    pub aws_region: String,
    pub aws_bucket: String,
    /// Custom S3-compatible endpoint (MinIO, R2, ...). Unset means AWS.
    pub aws_endpoint: Option<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Image hosting service backed by an S3-compatible bucket")]
pub struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Load environment from this dotenv file instead of `.env`
    #[arg(long)]
    pub env_file: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    ///
    /// `GO_ENV` is read before any dotenv file so the file itself cannot
    /// toggle development mode. Missing required variables fail here, which
    /// fails startup.
    pub fn from_env_and_args() -> Result<Self> {
        // Parse CLI once
        let args = Args::parse();

        let dev_mode = env::var("GO_ENV").is_ok_and(|value| value == "development");

        // --- Optional dotenv layer ---
        if let Some(path) = &args.env_file {
            dotenvy::from_path(path).with_context(|| format!("loading env file `{path}`"))?;
        } else if dev_mode {
            dotenvy::dotenv().context("loading .env (required when GO_ENV=development)")?;
        }

        let port = match args.port {
            Some(port) => port,
            None => {
                let value = required("PORT")?;
                value
                    .parse::<u16>()
                    .with_context(|| format!("parsing PORT value `{}`", value))?
            }
        };

        Ok(Self {
            dev_mode,
            port,
            auth_key: required("AUTH_KEY")?,
            aws_access_key: required("AWS_ACCESS_KEY")?,
            aws_secret_key: required("AWS_SECRET_KEY")?,
            aws_region: required("AWS_REGION")?,
            aws_bucket: required("AWS_BUCKET")?,
            aws_endpoint: env::var("AWS_ENDPOINT").ok().filter(|value| !value.is_empty()),
        })
    }

    /// Address the listener binds to. Development stays on localhost.
    pub fn bind_addr(&self) -> String {
        if self.dev_mode {
            format!("localhost:{}", self.port)
        } else {
            format!("0.0.0.0:{}", self.port)
        }
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} must be set"))
}
