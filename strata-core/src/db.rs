use crate::config::Config;
use crate::error::Result;
use crate::migration::MigrationRecord;
use postgres::types::ToSql;
use postgres::{Client, NoTls};
use tracing::debug;

static CREATE_MIGRATIONS_TABLE: &str = r#"
  CREATE TABLE IF NOT EXISTS migrations (
      id SERIAL PRIMARY KEY,
      migration VARCHAR(191) NOT NULL UNIQUE,
      batch INTEGER NOT NULL
  );
"#;

/// Storage contract for migration history. `Db` is the postgres
/// implementation; the executor is generic over this trait so tests can
/// drive it with an in-memory double.
pub trait MigrationStore {
    /// Every record, oldest first.
    fn list_all(&mut self) -> Result<Vec<MigrationRecord>>;

    /// The highest batch number on record, 0 for an empty store.
    fn latest_batch(&mut self) -> Result<i32>;

    /// Records with a batch at or above the given one, newest first.
    fn records_since(&mut self, batch: i32) -> Result<Vec<MigrationRecord>>;

    /// Execute a unit's up script and insert its record in one transaction.
    /// A duplicate name violates the store's UNIQUE constraint and fails
    /// the whole transaction.
    fn apply_and_record(&mut self, name: &str, up_sql: &str, batch: i32) -> Result<()>;

    /// Record several units under one batch with a single multi-row insert.
    fn insert_batch(&mut self, names: &[String], batch: i32) -> Result<()>;

    /// Execute a script without touching the history.
    fn execute_script(&mut self, sql: &str) -> Result<()>;

    /// Delete every record with a batch at or above the given one.
    fn delete_since(&mut self, batch: i32) -> Result<()>;

    /// Wipe the history entirely.
    fn delete_all(&mut self) -> Result<()>;
}

pub struct Db {
    client: Client,
}

impl Db {
    pub fn connect(config: &Config) -> Result<Db> {
        let client = Client::connect(&config.connection_string, NoTls)?;
        Ok(Db { client })
    }

    pub fn ensure_migrations_table(&mut self) -> Result<()> {
        self.client.batch_execute(CREATE_MIGRATIONS_TABLE)?;
        Ok(())
    }
}

impl MigrationStore for Db {
    fn list_all(&mut self) -> Result<Vec<MigrationRecord>> {
        let rows = self.client.query(
            "SELECT id, migration, batch FROM migrations ORDER BY id",
            &[],
        )?;
        let records = rows
            .iter()
            .map(MigrationRecord::try_from)
            .collect::<Result<_>>()?;
        Ok(records)
    }

    fn latest_batch(&mut self) -> Result<i32> {
        let row = self
            .client
            .query_one("SELECT COALESCE(MAX(batch), 0) FROM migrations", &[])?;
        Ok(row.get(0))
    }

    fn records_since(&mut self, batch: i32) -> Result<Vec<MigrationRecord>> {
        let rows = self.client.query(
            "SELECT id, migration, batch FROM migrations \
             WHERE batch >= $1 ORDER BY batch DESC, id DESC",
            &[&batch],
        )?;
        let records = rows
            .iter()
            .map(MigrationRecord::try_from)
            .collect::<Result<_>>()?;
        Ok(records)
    }

    fn apply_and_record(&mut self, name: &str, up_sql: &str, batch: i32) -> Result<()> {
        debug!("applying {} in batch {}", name, batch);
        let mut transaction = self.client.transaction()?;
        transaction.batch_execute(up_sql)?;
        transaction.execute(
            "INSERT INTO migrations (migration, batch) VALUES ($1, $2)",
            &[&name, &batch],
        )?;
        transaction.commit()?;
        Ok(())
    }

    fn insert_batch(&mut self, names: &[String], batch: i32) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        let mut rows = Vec::with_capacity(names.len());
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(names.len() + 1);
        params.push(&batch);
        for (i, name) in names.iter().enumerate() {
            rows.push(format!("(${}, $1)", i + 2));
            params.push(name);
        }
        let sql = format!(
            "INSERT INTO migrations (migration, batch) VALUES {}",
            rows.join(", ")
        );
        debug!("recording {} migrations in batch {}", names.len(), batch);
        self.client.execute(sql.as_str(), &params)?;
        Ok(())
    }

    fn execute_script(&mut self, sql: &str) -> Result<()> {
        self.client.batch_execute(sql)?;
        Ok(())
    }

    fn delete_since(&mut self, batch: i32) -> Result<()> {
        debug!("deleting records with batch >= {}", batch);
        self.client
            .execute("DELETE FROM migrations WHERE batch >= $1", &[&batch])?;
        Ok(())
    }

    fn delete_all(&mut self) -> Result<()> {
        self.client.execute("DELETE FROM migrations", &[])?;
        Ok(())
    }
}
