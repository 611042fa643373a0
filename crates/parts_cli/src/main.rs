//! `parts` service entry point.
//!
//! # Responsibility
//! - Load configuration and initialize logging.
//! - Open and migrate the store, then hand a ready service to the transport.

mod config;
mod transport;

use clap::Parser;
use config::{Cli, Command};
use log::{error, info, warn};
use parts_core::db::migrations::{apply_migrations, current_version};
use parts_core::db::open_db_unmigrated;
use parts_core::{init_logging, PartService, SqlitePartRepository};
use std::error::Error;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli.log_config()) {
        eprintln!("parts: {err}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            eprintln!("parts: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut conn = open_db_unmigrated(&cli.db_path)?;

    match cli.command() {
        Command::Migrate => {
            apply_migrations(&mut conn)?;
            println!("parts schema_version={}", current_version(&conn)?);
        }
        Command::Serve => {
            // A failed migration is logged only; the repository schema check
            // below decides whether the store is usable.
            if let Err(err) = apply_migrations(&mut conn) {
                warn!("event=db_migrate module=cli status=error error={err}");
            }

            let repo = SqlitePartRepository::try_new(&conn)?;
            let service = PartService::new(repo);
            info!(
                "event=serve module=cli status=start db_path={} call_timeout_ms={:?} core_version={}",
                cli.db_path.display(),
                cli.call_timeout_ms,
                parts_core::core_version()
            );

            let stdin = io::stdin();
            transport::serve(
                &service,
                stdin.lock(),
                io::stdout().lock(),
                cli.call_timeout(),
            )?;
        }
    }

    Ok(())
}
