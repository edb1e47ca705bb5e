// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "DocShare";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".docshare";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "docshare.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "DOCSHARE_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "DOCSHARE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "DOCSHARE_PORT";

/// Environment variable for the public base URL used in file links
pub const ENV_PUBLIC_URL: &str = "DOCSHARE_PUBLIC_URL";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "DOCSHARE_LOG";

/// Environment variable for allowed CORS origins (comma separated)
pub const ENV_CORS_ORIGINS: &str = "DOCSHARE_CORS_ORIGINS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

/// Default allowed CORS origin (the web client dev server)
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Default log filter when neither DOCSHARE_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info,docshare_server=info";

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "DOCSHARE_DATA_DIR";

/// Environment variable for the maximum accepted upload size
pub const ENV_MAX_UPLOAD_BYTES: &str = "DOCSHARE_MAX_UPLOAD_BYTES";

/// Default data directory (relative to the working directory)
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default maximum upload size (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Extra room granted to the multipart body above the file limit
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Body limit for JSON endpoints
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

// =============================================================================
// Authentication
// =============================================================================

/// Environment variable for the JWT signing secret
pub const ENV_JWT_SECRET: &str = "DOCSHARE_JWT_SECRET";

/// Environment variable for access token lifetime in hours
pub const ENV_TOKEN_TTL_HOURS: &str = "DOCSHARE_TOKEN_TTL_HOURS";

/// Default access token lifetime in hours
pub const DEFAULT_TOKEN_TTL_HOURS: u32 = 24;

/// Upper bound for access token lifetime (one year)
pub const MAX_TOKEN_TTL_HOURS: u32 = 8760;

/// Minimum length of a configured JWT secret
pub const MIN_JWT_SECRET_BYTES: usize = 16;

/// bcrypt work factor for password hashes
pub const PASSWORD_HASH_COST: u32 = 10;

/// Password assigned by the admin reset action
pub const RESET_PASSWORD_VALUE: &str = "123456";

// =============================================================================
// SQLite Database
// =============================================================================

/// Environment variable for the database URL
pub const ENV_DATABASE_URL: &str = "DOCSHARE_DATABASE_URL";

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "docshare.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Pagination
// =============================================================================

/// Default page size for list endpoints
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Default page size for the audit log listing
pub const DEFAULT_LOG_PAGE_LIMIT: u32 = 20;

/// Maximum page size for list endpoints
pub const MAX_PAGE_LIMIT: u32 = 100;

// =============================================================================
// Statistics
// =============================================================================

/// Default window for the uploads-over-time histogram
pub const DEFAULT_UPLOAD_HISTORY_DAYS: u32 = 30;

/// Largest window for the uploads-over-time histogram
pub const MAX_UPLOAD_HISTORY_DAYS: u32 = 365;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
