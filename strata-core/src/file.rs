use crate::error::{Error, Result};
use crate::migration::{Direction, Migration};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Labels like `create_users_table` get CREATE/DROP TABLE templates for the
/// captured entity; everything else scaffolds empty scripts.
static CREATE_TABLE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^create_(\w+)_table$").expect("create-table label pattern"));

/// The migrations directory: one subdirectory per unit, holding the unit's
/// `up.sql` and `down.sql`.
pub struct MigrationDir {
    root: PathBuf,
}

impl MigrationDir {
    pub fn new(root: impl AsRef<Path>) -> MigrationDir {
        MigrationDir {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Enumerate units in lexical name order. Names are timestamp-prefixed,
    /// so this is also creation order. Entries that are not directories are
    /// ignored.
    pub fn list(&self) -> Result<Vec<Migration>> {
        let mut migrations = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                migrations.push(Migration::new(name));
            }
        }
        migrations.sort();
        Ok(migrations)
    }

    /// Read one of a unit's scripts. A missing file is reported as
    /// `ScriptNotFound` so callers can tell it apart from other I/O trouble.
    pub fn read_script(&self, name: &str, direction: Direction) -> Result<String> {
        let path = self.root.join(name).join(direction.script_file());
        match fs::read_to_string(&path) {
            Ok(sql) => Ok(sql),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(Error::ScriptNotFound {
                name: name.to_string(),
                direction,
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Create a new unit directory named `<timestamp>_<label>` with its two
    /// scripts, and return the generated name.
    pub fn scaffold(&self, label: &str) -> Result<String> {
        if label.trim().is_empty() {
            return Err(Error::EmptyLabel);
        }

        let timestamp = Utc::now().format("%Y%m%d%H%M%S");
        let name = format!("{}_{}", timestamp, label);
        let dir = self.root.join(&name);
        fs::create_dir(&dir)?;

        let (up_sql, down_sql) = match CREATE_TABLE_LABEL.captures(label) {
            Some(captures) => {
                let table = &captures[1];
                (create_table_sql(table), drop_table_sql(table))
            }
            None => (String::new(), String::new()),
        };
        fs::write(dir.join(Direction::Up.script_file()), up_sql)?;
        fs::write(dir.join(Direction::Down.script_file()), down_sql)?;

        Ok(name)
    }
}

fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE {} (\n    id SERIAL PRIMARY KEY,\n    created_at TIMESTAMP,\n    updated_at TIMESTAMP\n);\n",
        table
    )
}

fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {};\n", table)
}
