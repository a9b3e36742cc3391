use rusqlite::{Connection, OpenFlags, Result};
use tracing::debug;

/// Handle on the organization pipeline's store. One connection is opened
/// at the start of an aggregation run and reused for every query in it;
/// dropping the handle closes the connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open an existing store read-only. The schema is owned by the
    /// upstream pipeline and never touched from here.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let db = Database { conn };
        db.configure_pragmas()?;
        debug!("Opened store {} read-only", path);
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.configure_pragmas()?;
        db.create_schema()?;
        Ok(db)
    }

    fn configure_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Create the pipeline's schema in an in-memory database.
    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        debug!("In-memory schema initialized");
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
