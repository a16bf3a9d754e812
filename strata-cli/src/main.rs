use clap::Parser;
use command::Command;
use std::process::ExitCode;
use strata::config::Config;
use strata::db::Db;
use strata::file::MigrationDir;
use strata::runner::{self, MigrateOutcome, RefreshOutcome};
use strata::seed::SeedDir;
use strata::{Error, ErrorKind};
use tracing::{debug, info, Level};

mod command;

/// Commands that did work exit 0; commands with nothing to act on exit 2,
/// so scripts can tell "done" from "no-op" without parsing output.
enum CliOutcome {
    Done,
    NothingToDo,
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let command = Command::parse();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => return fail(&err),
    };

    let level = if config.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .without_time()
        .with_target(false)
        .with_max_level(level)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("error: could not install the log subscriber");
        return ExitCode::FAILURE;
    }

    debug!(
        "migrations directory: {}",
        config.migrations_dir.display()
    );

    match run(command, &config) {
        Ok(CliOutcome::Done) => ExitCode::SUCCESS,
        Ok(CliOutcome::NothingToDo) => ExitCode::from(2),
        Err(err) => fail(&err),
    }
}

/// The one place errors become exit codes: bad arguments exit 2, every
/// other failure exits 1.
fn fail(err: &Error) -> ExitCode {
    eprintln!("error: {err}");
    match err.kind() {
        ErrorKind::InvalidArgument => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

/// Connections are opened here, per command, so `make` and `make:seeder`
/// work without a reachable database.
fn connect(config: &Config) -> Result<Db, Error> {
    let mut db = Db::connect(config)?;
    db.ensure_migrations_table()?;
    Ok(db)
}

fn run(command: Command, config: &Config) -> Result<CliOutcome, Error> {
    let dir = MigrationDir::new(&config.migrations_dir);

    match command {
        Command::Make { label } => {
            dir.ensure_exists()?;
            let name = dir.scaffold(&label)?;
            println!("{name}");
            Ok(CliOutcome::Done)
        }
        Command::Migrate => {
            dir.ensure_exists()?;
            let mut db = connect(config)?;
            match runner::migrate(&mut db, &dir)? {
                MigrateOutcome::NothingToDo => {
                    info!("nothing to migrate");
                    Ok(CliOutcome::NothingToDo)
                }
                MigrateOutcome::Applied { batch, migrations } => {
                    info!("applied batch {} ({} migrations)", batch, migrations.len());
                    Ok(CliOutcome::Done)
                }
            }
        }
        Command::Rollback { steps } => {
            dir.ensure_exists()?;
            let mut db = connect(config)?;
            let report = runner::rollback(&mut db, &dir, steps)?;
            info!(
                "rolled back {} migrations, down to batch {}",
                report.reverted.len(),
                report.target_batch
            );
            Ok(CliOutcome::Done)
        }
        Command::Refresh => {
            dir.ensure_exists()?;
            let mut db = connect(config)?;
            match runner::refresh(&mut db, &dir)? {
                RefreshOutcome::NothingToDo => {
                    info!("nothing to refresh");
                    Ok(CliOutcome::NothingToDo)
                }
                RefreshOutcome::Refreshed { migrations } => {
                    info!("refreshed {} migrations", migrations.len());
                    Ok(CliOutcome::Done)
                }
            }
        }
        Command::Status => {
            dir.ensure_exists()?;
            let mut db = connect(config)?;
            let states = runner::status(&mut db, &dir)?;
            if states.is_empty() {
                info!("no migrations defined or applied");
            }
            for state in &states {
                println!("{state}");
            }
            Ok(CliOutcome::Done)
        }
        Command::MakeSeeder { name } => {
            let seeds = SeedDir::new(&config.seeds_dir);
            seeds.ensure_exists()?;
            let file = seeds.scaffold(&name)?;
            println!("{file}");
            Ok(CliOutcome::Done)
        }
    }
}
