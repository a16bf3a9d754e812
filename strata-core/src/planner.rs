use crate::migration::{Migration, MigrationRecord};
use std::collections::{HashMap, HashSet};
use std::fmt::Display;

/// What the store and the disk together say about one unit name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationState {
    Pending {
        definition: Migration,
    },
    Applied {
        definition: Migration,
        record: MigrationRecord,
    },
    /// A record whose unit directory no longer exists on disk. Executing
    /// it in any direction would fail; surfaced so the operator can see it.
    Missing {
        record: MigrationRecord,
    },
}

impl Display for MigrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationState::Pending { definition } => write!(f, "{} [pending]", definition.name),
            MigrationState::Applied { definition, record } => {
                write!(f, "{} [applied in batch {}]", definition.name, record.batch)
            }
            MigrationState::Missing { record } => {
                write!(f, "{} ** NO FILE **", record.migration)
            }
        }
    }
}

/// The units on disk that have no record in the store, in on-disk order.
/// Names are timestamp-prefixed, so on-disk order is creation order and
/// pending units are applied oldest-first no matter how the store scans.
pub fn pending(on_disk: Vec<Migration>, applied: &HashSet<String>) -> Vec<Migration> {
    if applied.is_empty() {
        // Fresh database: everything on disk is pending.
        return on_disk;
    }
    on_disk
        .into_iter()
        .filter(|migration| !applied.contains(&migration.name))
        .collect()
}

/// Merge disk and store into one state per known unit name, sorted by name.
pub fn full_state(
    on_disk: Vec<Migration>,
    records: Vec<MigrationRecord>,
) -> Vec<MigrationState> {
    let definitions = on_disk
        .into_iter()
        .map(|m| (m.name.clone(), m))
        .collect::<HashMap<String, Migration>>();
    let records = records
        .into_iter()
        .map(|r| (r.migration.clone(), r))
        .collect::<HashMap<String, MigrationRecord>>();

    let mut all_names = definitions
        .keys()
        .chain(records.keys())
        .cloned()
        .collect::<Vec<String>>();
    all_names.sort();
    all_names.dedup();

    all_names
        .iter()
        .map(|name| {
            match (definitions.get(name), records.get(name)) {
                (Some(definition), None) => MigrationState::Pending {
                    definition: definition.clone(),
                },
                (Some(definition), Some(record)) => MigrationState::Applied {
                    definition: definition.clone(),
                    record: record.clone(),
                },
                (None, Some(record)) => MigrationState::Missing {
                    record: record.clone(),
                },
                (None, None) => unreachable!(),
            }
        })
        .collect::<Vec<_>>()
}
