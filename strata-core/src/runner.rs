use crate::db::MigrationStore;
use crate::error::{Error, Result};
use crate::file::MigrationDir;
use crate::migration::Direction;
use crate::planner::{self, MigrationState};
use std::collections::HashSet;
use tracing::info;

/// Result of a `migrate` run. An empty pending set is reported, not raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrateOutcome {
    NothingToDo,
    Applied { batch: i32, migrations: Vec<String> },
}

/// What a successful rollback removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackReport {
    /// Records with `batch >= target_batch` were reverted and deleted.
    pub target_batch: i32,
    pub reverted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    NothingToDo,
    Refreshed { migrations: Vec<String> },
}

/// Apply every pending unit, all under one fresh batch number.
///
/// Units are applied in on-disk (creation) order. Each unit's script runs
/// and its record lands in the same transaction, and a failure halts the
/// run: earlier units stay applied and recorded, the failing unit and
/// everything after it stay pending for the next run.
pub fn migrate<S: MigrationStore>(store: &mut S, dir: &MigrationDir) -> Result<MigrateOutcome> {
    let applied = store
        .list_all()?
        .into_iter()
        .map(|record| record.migration)
        .collect::<HashSet<_>>();
    let pending = planner::pending(dir.list()?, &applied);
    if pending.is_empty() {
        return Ok(MigrateOutcome::NothingToDo);
    }

    let batch = store.latest_batch()? + 1;
    let mut migrations = Vec::with_capacity(pending.len());
    for migration in &pending {
        let up_sql = dir.read_script(&migration.name, Direction::Up)?;
        store.apply_and_record(&migration.name, &up_sql, batch)?;
        info!("migrated: {}", migration.name);
        migrations.push(migration.name.clone());
    }

    Ok(MigrateOutcome::Applied { batch, migrations })
}

/// Reverse the last `steps` batches.
///
/// Down scripts run newest-first; records are deleted only after every
/// reversal succeeded, so a failing script leaves recorded state intact
/// and the rollback can be retried once the script is fixed.
pub fn rollback<S: MigrationStore>(
    store: &mut S,
    dir: &MigrationDir,
    steps: i32,
) -> Result<RollbackReport> {
    let last_batch = store.latest_batch()?;
    if steps > last_batch {
        return Err(Error::RollbackTooFar {
            steps,
            applied: last_batch,
        });
    }

    let target_batch = last_batch - steps + 1;
    let records = store.records_since(target_batch)?;
    let mut reverted = Vec::with_capacity(records.len());
    for record in &records {
        let down_sql = dir.read_script(&record.migration, Direction::Down)?;
        store.execute_script(&down_sql)?;
        info!("rolled back: {}", record.migration);
        reverted.push(record.migration.clone());
    }
    store.delete_since(target_batch)?;

    Ok(RollbackReport {
        target_batch,
        reverted,
    })
}

/// Reverse every recorded unit, reapply them all, and rewrite the history
/// as a single batch 1.
///
/// Reversal runs newest-first, reapplication oldest-first. The record swap
/// happens only after every script succeeded; until then the store still
/// describes the pre-refresh state.
pub fn refresh<S: MigrationStore>(store: &mut S, dir: &MigrationDir) -> Result<RefreshOutcome> {
    let records = store.list_all()?;
    if records.is_empty() {
        return Ok(RefreshOutcome::NothingToDo);
    }

    for record in records.iter().rev() {
        let down_sql = dir.read_script(&record.migration, Direction::Down)?;
        store.execute_script(&down_sql)?;
        info!("rolled back: {}", record.migration);
    }

    let names = records
        .into_iter()
        .map(|record| record.migration)
        .collect::<Vec<_>>();
    for name in &names {
        let up_sql = dir.read_script(name, Direction::Up)?;
        store.execute_script(&up_sql)?;
        info!("migrated: {}", name);
    }

    store.delete_all()?;
    store.insert_batch(&names, 1)?;

    Ok(RefreshOutcome::Refreshed { migrations: names })
}

/// One state line per unit known to either the disk or the store.
pub fn status<S: MigrationStore>(
    store: &mut S,
    dir: &MigrationDir,
) -> Result<Vec<MigrationState>> {
    Ok(planner::full_state(dir.list()?, store.list_all()?))
}
