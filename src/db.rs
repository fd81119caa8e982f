//! SQLite connection pool.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::define_sql_function;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

define_sql_function! {
    /// Unicode-aware lowercase. SQLite's builtin `lower` and `LIKE` only fold
    /// ASCII letters.
    fn fold_case(text: Text) -> Text;
}

/// Registers [`fold_case`] on `conn`.
pub fn register_functions(conn: &mut SqliteConnection) -> diesel::QueryResult<()> {
    fold_case_utils::register_impl(conn, |text: String| text.to_lowercase())
}

/// Pragmas applied to every connection handed out by the pool.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    /// Time a writer waits for the database lock before giving up.
    pub busy_timeout: Duration,
    pub enable_wal: bool,
    pub enable_foreign_keys: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            enable_wal: true,
            enable_foreign_keys: true,
        }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        // busy_timeout must come first so that switching the journal mode
        // waits for concurrent openers.
        let mut pragmas = format!(
            "PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        );
        if self.enable_wal {
            pragmas.push_str("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        if self.enable_foreign_keys {
            pragmas.push_str("PRAGMA foreign_keys = ON;");
        }
        conn.batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)?;
        register_functions(conn).map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds a pool with the default [`ConnectionOptions`].
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    establish_connection_pool_with(database_url, ConnectionOptions::default(), 10)
}

pub fn establish_connection_pool_with(
    database_url: &str,
    options: ConnectionOptions,
    max_size: u32,
) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size.max(1))
        .connection_customizer(Box::new(options))
        .build(manager)
}
