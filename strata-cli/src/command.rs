use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "strata",
    about = "strata: batch-grouped postgresql schema migrations."
)]
pub enum Command {
    /// Creates a new migration with empty up and down scripts.
    ///
    /// A label of the form `create_<entity>_table` pre-fills the scripts
    /// with matching CREATE TABLE / DROP TABLE statements.
    Make {
        /// The label for the new migration, e.g., "create_users_table".
        label: String,
    },

    /// Applies all pending migrations as one new batch.
    Migrate,

    /// Rolls back the most recent batches of migrations.
    Rollback {
        /// How many batches to roll back.
        #[clap(default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..))]
        steps: i32,
    },

    /// Rolls back every migration, then applies them all again.
    Refresh,

    /// Prints the current status of each known migration.
    Status,

    /// Creates a new seeder script.
    #[command(name = "make:seeder")]
    MakeSeeder {
        /// The name for the seeder; the file is written as its lowercase
        /// form with a .sql extension.
        name: String,
    },
}
