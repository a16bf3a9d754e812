use crate::error::Error;
use postgres::Row;
use std::{cmp::Ordering, fmt};

/// One versioned unit of schema change: a directory on disk holding an
/// `up.sql` and a `down.sql`. Names are timestamp-prefixed, so ordering by
/// name is ordering by creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub name: String,
}

impl Migration {
    pub fn new(name: impl Into<String>) -> Migration {
        Migration { name: name.into() }
    }
}

impl PartialOrd for Migration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Migration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// The script file a unit directory holds for this direction.
    pub fn script_file(self) -> &'static str {
        match self {
            Direction::Up => "up.sql",
            Direction::Down => "down.sql",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A row of the `migrations` table: proof that the named unit was applied,
/// and in which batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub id: i32,
    pub migration: String,
    pub batch: i32,
}

impl TryFrom<&Row> for MigrationRecord {
    type Error = Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        let id = row.try_get::<_, i32>("id")?;
        let migration = row.try_get::<_, String>("migration")?;
        let batch = row.try_get::<_, i32>("batch")?;

        Ok(MigrationRecord {
            id,
            migration,
            batch,
        })
    }
}
