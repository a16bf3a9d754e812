use std::collections::HashMap;
use std::env;
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{ensure, Result};

static DB_N: AtomicUsize = AtomicUsize::new(1);

pub struct TestDatabase {
    pub database: String,
    pub host: String,
    pub port: String,
    pub user: String,
}

impl TestDatabase {
    /// Creates a scratch database with `createdb`. Returns `None` when the
    /// TEST_PG_* variables are unset so callers can skip instead of fail.
    pub fn create() -> Result<Option<TestDatabase>> {
        let env_vars = env::vars().collect::<HashMap<String, String>>();
        let (Some(host), Some(port), Some(user)) = (
            env_vars.get("TEST_PG_HOST"),
            env_vars.get("TEST_PG_PORT"),
            env_vars.get("TEST_PG_USER"),
        ) else {
            eprintln!("TEST_PG_HOST/TEST_PG_PORT/TEST_PG_USER not set, skipping");
            return Ok(None);
        };

        let db_n = DB_N.fetch_add(1, Ordering::SeqCst);
        let name = format!("strata-test-{}", db_n);
        eprintln!("Creating database {}", &name);
        let mut command = Command::new("createdb");
        command.arg("-h");
        command.arg(host);
        command.arg("-p");
        command.arg(port);
        command.arg("-U");
        command.arg(user);
        command.arg(&name);
        let result = command.output()?;
        ensure!(
            result.status.success(),
            "createdb failed: {}",
            String::from_utf8_lossy(&result.stderr)
        );
        Ok(Some(TestDatabase {
            database: name,
            host: host.to_owned(),
            port: port.to_owned(),
            user: user.to_owned(),
        }))
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        eprintln!("Dropping {}", &self.database);
        let mut command = Command::new("dropdb");
        command.arg("-h");
        command.arg(&self.host);
        command.arg("-p");
        command.arg(&self.port);
        command.arg("-U");
        command.arg(&self.user);
        command.arg(&self.database);
        if let Ok(result) = command.output() {
            if !result.status.success() {
                eprintln!("problem dropping database {}", self.database);
            }
        } else {
            eprintln!("problem dropping database {}", self.database);
        }
    }
}
