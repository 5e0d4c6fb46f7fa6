use crate::error::CommonError;
use crate::libsql::{Connection, Migrations, apply_migrations};

/// In-memory database with the given migrations applied, for tests.
pub async fn setup_in_memory_database<'a>(
    migrations: Migrations<'a>,
) -> Result<(libsql::Database, Connection), CommonError> {
    let db = libsql::Builder::new_local(":memory:").build().await?;
    let conn = Connection(db.connect()?);

    conn.execute("PRAGMA foreign_keys = ON", ()).await?;

    apply_migrations(&conn, &migrations).await?;

    Ok((db, conn))
}
