//! Persistence.
//!
//! Everything is stored in SQLite through a [`sqlx`] connection pool. The
//! schema lives in `migrations/` and is applied on startup.

pub use self::{
	error::{DatabaseError, DatabaseResult},
	seed::{SeedError, seed},
};
use {
	crate::config::DatabaseConfig,
	sqlx::{
		migrate::MigrateError,
		pool::PoolOptions,
		sqlite::{SqliteConnectOptions, SqliteJournalMode},
	},
	std::str::FromStr,
};

mod error;
mod seed;

pub type ConnectionPool = sqlx::SqlitePool;

/// The maximum number of pooled connections if none is configured.
pub const MAX_CONNECTIONS: u32 = 16;

/// Opens a connection pool according to `config`.
///
/// The database file is created if it does not exist yet. In-memory databases
/// are limited to a single connection that is never recycled, since every
/// connection would otherwise see its own empty database.
#[tracing::instrument(skip(config), fields(url = %config.url), err)]
pub async fn connect(config: &DatabaseConfig) -> DatabaseResult<ConnectionPool>
{
	let in_memory = config.url.contains(":memory:");
	let mut options = SqliteConnectOptions::from_str(&config.url)?
		.create_if_missing(true)
		.foreign_keys(true);

	if !in_memory {
		options = options.journal_mode(SqliteJournalMode::Wal);
	}

	let mut pool_options = PoolOptions::<sqlx::Sqlite>::new();

	if in_memory {
		pool_options = pool_options
			.min_connections(1)
			.max_connections(1)
			.idle_timeout(None)
			.max_lifetime(None);
	} else {
		pool_options = pool_options
			.min_connections(config.min_connections.map_or(1, |n| n.get()))
			.max_connections(config.max_connections.map_or(MAX_CONNECTIONS, |n| n.get()));
	}

	let pool = pool_options.connect_with(options).await?;

	debug!(in_memory, "connected to database");

	Ok(pool)
}

/// Applies all pending migrations.
#[tracing::instrument(skip(pool), err)]
pub async fn migrate(pool: &ConnectionPool) -> Result<(), MigrateError>
{
	sqlx::migrate!("./migrations").run(pool).await?;
	debug!("applied migrations");

	Ok(())
}

/// A migrated in-memory database.
#[cfg(test)]
pub(crate) async fn in_memory() -> color_eyre::Result<ConnectionPool>
{
	let config = DatabaseConfig { url: String::from("sqlite::memory:"), ..Default::default() };
	let pool = connect(&config).await?;
	migrate(&pool).await?;

	Ok(pool)
}
