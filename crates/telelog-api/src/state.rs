//! Application state wiring the service to its SQLite implementations.
//!
//! The ledger service is generic over repository traits; AppState pins it
//! to the concrete infra types used by both the bot loop and the CLI.

use std::path::PathBuf;
use std::sync::Arc;

use telelog_core::service::ledger::LedgerService;
use telelog_infra::sqlite::message::SqliteMessageRepository;
use telelog_infra::sqlite::pool::DatabasePool;
use telelog_infra::sqlite::session::SqliteSessionRepository;
use telelog_infra::sqlite::user::SqliteUserRepository;
use telelog_types::config::BotConfig;

/// The service generics pinned to the SQLite implementations.
pub type ConcreteLedgerService =
    LedgerService<SqliteUserRepository, SqliteMessageRepository, SqliteSessionRepository>;

/// Shared application state for the bot loop and CLI commands.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConcreteLedgerService>,
    pub config: BotConfig,
}

impl AppState {
    /// Initialize the application state: connect to the DB, load config,
    /// wire the service.
    ///
    /// `database_url` overrides the default `{data_dir}/telelog.db` location.
    pub async fn init(database_url: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = database_url.unwrap_or_else(|| {
            format!("sqlite://{}?mode=rwc", data_dir.join("telelog.db").display())
        });
        let db_pool = DatabasePool::new(&db_url).await?;

        let config = load_config(&data_dir).await?;

        let service = Arc::new(LedgerService::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool.clone()),
            SqliteSessionRepository::new(db_pool.clone()),
        ));

        Ok(Self { service, config })
    }
}

/// Resolve the data directory: `TELELOG_DATA_DIR` env var, else `~/.telelog`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TELELOG_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".telelog")
}

/// Load `config.toml` from the data directory; a missing file means defaults.
async fn load_config(data_dir: &std::path::Path) -> anyhow::Result<BotConfig> {
    let path = data_dir.join("config.toml");
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => {
            let config = toml::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BotConfig::default()),
        Err(e) => Err(anyhow::anyhow!("cannot read {}: {e}", path.display())),
    }
}
