use anyhow::{bail, Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration, resolved once at startup and
/// passed explicitly into the blob-store adapter constructor.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_region: String,
    pub s3_bucket_name: String,
    pub s3_endpoint: Option<String>,
    pub app_env: String,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Video library API backed by an S3-compatible object store")]
pub struct Args {
    /// Host to bind to (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

impl Config {
    /// Parse environment variables + CLI args into a Config.
    ///
    /// Explicit AWS credentials are required unless APP_ENV=production,
    /// where the ambient provider chain is assumed to supply them.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();

        let env_host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading PORT"),
        };

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let aws_access_key_id = env::var("AWS_ACCESS_KEY_ID").ok();
        let aws_secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok();

        if app_env != "production"
            && (aws_access_key_id.is_none() || aws_secret_access_key.is_none())
        {
            bail!(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set \
                 (only APP_ENV=production may rely on ambient credentials)"
            );
        }

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            aws_access_key_id,
            aws_secret_access_key,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".into()),
            s3_bucket_name: env::var("S3_BUCKET_NAME").context("S3_BUCKET_NAME must be set")?,
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            app_env,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
