use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_CORS_ORIGIN, DEFAULT_DATA_DIR, DEFAULT_HOST,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, DEFAULT_TOKEN_TTL_HOURS, ENV_JWT_SECRET,
    MAX_TOKEN_TTL_HOURS, MIN_JWT_SECRET_BYTES,
};

// =============================================================================
// File Config Structs (deserialized from JSON, every field optional)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub public_url: Option<String>,
}

/// Authentication configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: Option<u32>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub url: Option<String>,
}

/// Storage configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StorageFileConfig {
    pub data_dir: Option<String>,
    pub max_upload_bytes: Option<u64>,
}

/// CORS configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CorsFileConfig {
    pub origins: Option<Vec<String>>,
}

/// Root config file structure
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub storage: Option<StorageFileConfig>,
    pub cors: Option<CorsFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                current.host = server.host;
            }
            if server.port.is_some() {
                current.port = server.port;
            }
            if server.public_url.is_some() {
                current.public_url = server.public_url;
            }
        }

        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.jwt_secret.is_some() {
                current.jwt_secret = auth.jwt_secret;
            }
            if auth.token_ttl_hours.is_some() {
                current.token_ttl_hours = auth.token_ttl_hours;
            }
        }

        if let Some(database) = other.database
            && database.url.is_some()
        {
            self.database
                .get_or_insert_with(DatabaseFileConfig::default)
                .url = database.url;
        }

        if let Some(storage) = other.storage {
            let current = self.storage.get_or_insert_with(StorageFileConfig::default);
            if storage.data_dir.is_some() {
                current.data_dir = storage.data_dir;
            }
            if storage.max_upload_bytes.is_some() {
                current.max_upload_bytes = storage.max_upload_bytes;
            }
        }

        if let Some(cors) = other.cors
            && cors.origins.is_some()
        {
            self.cors.get_or_insert_with(CorsFileConfig::default).origins = cors.origins;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL prefixed to document download links (no trailing slash)
    pub public_url: String,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Configured signing secret; a random key is generated when absent
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: u32,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Explicit SQLite URL; defaults to a file inside the data directory
    pub url: Option<String>,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub max_upload_bytes: u64,
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub origins: Vec<String>,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.docshare/docshare.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::from_layers(cli, file_config);
        config.validate()?;
        Ok(config)
    }

    /// Layer CLI/env overrides on top of file values and defaults
    fn from_layers(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_storage = file_config.storage.unwrap_or_default();
        let file_cors = file_config.cors.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let public_url = cli
            .public_url
            .clone()
            .or(file_server.public_url)
            .unwrap_or_else(|| format!("http://{}:{}", host, port));
        let public_url = public_url.trim_end_matches('/').to_string();

        let auth = AuthConfig {
            jwt_secret: cli
                .jwt_secret
                .clone()
                .or(file_auth.jwt_secret)
                .filter(|s| !s.is_empty()),
            token_ttl_hours: cli
                .token_ttl_hours
                .or(file_auth.token_ttl_hours)
                .unwrap_or(DEFAULT_TOKEN_TTL_HOURS),
        };

        let data_dir = cli
            .data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .or(file_storage.data_dir)
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

        let storage = StorageConfig {
            data_dir: expand_path(&data_dir),
            max_upload_bytes: cli
                .max_upload_bytes
                .or(file_storage.max_upload_bytes)
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        let origins = cli
            .cors_origins
            .clone()
            .or(file_cors.origins)
            .unwrap_or_else(|| vec![DEFAULT_CORS_ORIGIN.to_string()])
            .into_iter()
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Self {
            server: ServerConfig {
                host,
                port,
                public_url,
            },
            auth,
            database: DatabaseConfig {
                url: cli.database_url.clone().or(file_database.url),
            },
            storage,
            cors: CorsConfig { origins },
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.auth.token_ttl_hours) {
            anyhow::bail!(
                "Configuration error: auth.token_ttl_hours must be between 1 and {} (got {})",
                MAX_TOKEN_TTL_HOURS,
                self.auth.token_ttl_hours
            );
        }

        if let Some(ref secret) = self.auth.jwt_secret
            && secret.len() < MIN_JWT_SECRET_BYTES
        {
            anyhow::bail!(
                "Configuration error: auth.jwt_secret must be at least {} bytes. \
                 Set via {} env var or auth.jwt_secret in config file.",
                MIN_JWT_SECRET_BYTES,
                ENV_JWT_SECRET
            );
        }

        if self.storage.max_upload_bytes == 0 {
            anyhow::bail!("Configuration error: storage.max_upload_bytes must be greater than 0");
        }

        if let Some(ref url) = self.database.url
            && !url.starts_with("sqlite:")
        {
            anyhow::bail!(
                "Configuration error: database.url must be a sqlite: URL (got {})",
                url
            );
        }

        if self.cors.origins.is_empty() {
            tracing::warn!("cors.origins is empty, browsers will reject cross-origin requests");
        }

        Ok(())
    }
}

/// Get the profile config path (~/.docshare/docshare.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layered(cli: CliConfig) -> AppConfig {
        AppConfig::from_layers(&cli, FileConfig::default())
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080, "public_url": "https://docs.example.com" },
            "auth": { "jwt_secret": "0123456789abcdef0123", "token_ttl_hours": 12 },
            "storage": { "data_dir": "/var/lib/docshare", "max_upload_bytes": 1024 },
            "cors": { "origins": ["https://app.example.com"] }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host, Some("0.0.0.0".to_string()));
        assert_eq!(server.port, Some(8080));
        assert_eq!(config.auth.as_ref().unwrap().token_ttl_hours, Some(12));
        assert_eq!(
            config.storage.as_ref().unwrap().max_upload_bytes,
            Some(1024)
        );
        assert_eq!(
            config.cors.as_ref().unwrap().origins,
            Some(vec!["https://app.example.com".to_string()])
        );
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "port": 9000 }, "unknown_section": true }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        let extra = config.extra.as_object().unwrap();
        assert!(extra.contains_key("unknown_section"));
        assert!(!extra.contains_key("server"));
    }

    #[test]
    fn test_file_config_merge() {
        let mut base: FileConfig =
            serde_json::from_str(r#"{ "server": { "host": "a", "port": 1 } }"#).unwrap();
        let overlay: FileConfig = serde_json::from_str(
            r#"{ "server": { "port": 2 }, "database": { "url": "sqlite::memory:" } }"#,
        )
        .unwrap();
        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host, Some("a".to_string()));
        assert_eq!(server.port, Some(2));
        assert_eq!(
            base.database.unwrap().url,
            Some("sqlite::memory:".to_string())
        );
    }

    #[test]
    fn test_app_config_defaults() {
        let config = layered(CliConfig::default());

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.public_url, "http://127.0.0.1:8000");
        assert_eq!(config.auth.token_ttl_hours, DEFAULT_TOKEN_TTL_HOURS);
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.storage.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.cors.origins, vec![DEFAULT_CORS_ORIGIN.to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_cli_override() {
        let file: FileConfig = serde_json::from_str(
            r#"{ "server": { "host": "file.host", "port": 7000 }, "auth": { "token_ttl_hours": 2 } }"#,
        )
        .unwrap();
        let cli = CliConfig {
            port: Some(3000),
            public_url: Some("https://docs.example.com/".to_string()),
            ..Default::default()
        };
        let config = AppConfig::from_layers(&cli, file);

        assert_eq!(config.server.host, "file.host");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.public_url, "https://docs.example.com");
        assert_eq!(config.auth.token_ttl_hours, 2);
    }

    #[test]
    fn test_app_config_validation_short_secret() {
        let config = layered(CliConfig {
            jwt_secret: Some("short".to_string()),
            ..Default::default()
        });
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("jwt_secret"));
    }

    #[test]
    fn test_app_config_validation_token_ttl_range() {
        let config = layered(CliConfig {
            token_ttl_hours: Some(0),
            ..Default::default()
        });
        assert!(config.validate().is_err());

        let config = layered(CliConfig {
            token_ttl_hours: Some(MAX_TOKEN_TTL_HOURS + 1),
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_app_config_validation_database_url_scheme() {
        let config = layered(CliConfig {
            database_url: Some("postgres://localhost/db".to_string()),
            ..Default::default()
        });
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("sqlite:"));
    }

    #[test]
    fn test_app_config_validation_server_port_zero() {
        let config = layered(CliConfig {
            port: Some(0),
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_app_config_cors_origins_trimmed() {
        let config = layered(CliConfig {
            cors_origins: Some(vec![
                " http://a.test/ ".to_string(),
                String::new(),
                "http://b.test".to_string(),
            ]),
            ..Default::default()
        });
        assert_eq!(
            config.cors.origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
