use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_CORS_ORIGINS, ENV_DATA_DIR, ENV_DATABASE_URL, ENV_HOST, ENV_JWT_SECRET,
    ENV_MAX_UPLOAD_BYTES, ENV_PORT, ENV_PUBLIC_URL, ENV_TOKEN_TTL_HOURS,
};

#[derive(Parser)]
#[command(name = "docshare")]
#[command(version, about = "Document sharing server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Public base URL used when building document file links
    #[arg(long, global = true, env = ENV_PUBLIC_URL)]
    pub public_url: Option<String>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Data directory (database and uploaded files)
    #[arg(long, global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// SQLite database URL (defaults to a file in the data directory)
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,

    /// Secret used to sign access tokens
    #[arg(long, global = true, env = ENV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Access token lifetime in hours
    #[arg(long, global = true, env = ENV_TOKEN_TTL_HOURS)]
    pub token_ttl_hours: Option<u32>,

    /// Maximum accepted upload size in bytes
    #[arg(long, global = true, env = ENV_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: Option<u64>,

    /// Allowed CORS origins, comma separated
    #[arg(long, global = true, env = ENV_CORS_ORIGINS, value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Serve,
    /// Create an administrator account and exit
    SeedAdmin {
        /// Administrator email
        #[arg(long)]
        email: String,

        /// Administrator password
        #[arg(long)]
        password: String,

        /// Display name
        #[arg(long, default_value = "Administrator")]
        full_name: String,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub public_url: Option<String>,
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: Option<u32>,
    pub max_upload_bytes: Option<u64>,
    pub cors_origins: Option<Vec<String>>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        public_url: cli.public_url,
        config: cli.config,
        data_dir: cli.data_dir,
        database_url: cli.database_url,
        jwt_secret: cli.jwt_secret,
        token_ttl_hours: cli.token_ttl_hours,
        max_upload_bytes: cli.max_upload_bytes,
        cors_origins: cli.cors_origins,
    };
    (config, cli.command)
}
