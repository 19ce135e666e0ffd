//! Database connection utilities.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use whisker_error::{DatabaseError, DatabaseErrorKind};

/// Connection pool shared by the store.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Establish a single connection to the PostgreSQL database.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub fn establish_connection(database_url: &str) -> DatabaseResult<PgConnection> {
    PgConnection::establish(database_url)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Build a connection pool with at most `max_size` connections.
///
/// Connections are opened lazily so the service can start while the
/// database is still coming up.
pub fn create_pool(database_url: &str, max_size: u32) -> PgPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size.max(1))
        .connection_timeout(std::time::Duration::from_secs(5))
        .test_on_check_out(true)
        .build_unchecked(manager)
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub fn run_migrations(conn: &mut PgConnection) -> DatabaseResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;
    tracing::info!(count = applied.len(), "Applied database migrations");
    Ok(())
}
