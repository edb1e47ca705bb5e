//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ApiServer, AuthManager};
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::TransactionalService;
use crate::data::files::FileService;
use crate::data::types::UserRole;
use crate::domain::{AccountError, accounts};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub database: Arc<TransactionalService>,
    pub auth: Arc<AuthManager>,
    pub files: Arc<FileService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config).await?;
        match command {
            Some(Commands::SeedAdmin {
                email,
                password,
                full_name,
            }) => app.seed_admin(&email, &password, &full_name).await,
            Some(Commands::Serve) | None => Self::start_server(app).await,
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init(&config).await?;

        let database_url = config
            .database
            .url
            .clone()
            .unwrap_or_else(|| storage.default_database_url());
        let database = Arc::new(
            TransactionalService::init(&database_url)
                .await
                .context("Failed to initialize database")?,
        );

        let auth = Arc::new(AuthManager::init(&config.auth));
        let files = Arc::new(FileService::new(&config.storage, &storage));
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            database,
            auth,
            files,
        })
    }

    /// Create an ACTIVE administrator account, then close the database
    async fn seed_admin(self, email: &str, password: &str, full_name: &str) -> Result<()> {
        let repo = self.database.repository();
        let result =
            accounts::register(repo.as_ref(), email, password, full_name, UserRole::Admin).await;

        let outcome = match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, email = %user.email, "Administrator created");
                println!("Created administrator {}", user.email);
                Ok(())
            }
            Err(AccountError::EmailExists) => {
                println!("An account with email {} already exists", email.trim());
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to create administrator")),
        };

        self.shutdown.shutdown().await;
        outcome
    }

    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            &app.config.server.public_url,
            &app.storage.data_dir().display().to_string(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
