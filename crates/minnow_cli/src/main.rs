//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `minnow_core` linkage and open the configured blob store.
//! - Print a deterministic `key=value` summary of items and checkups.

use clap::Parser;
use minnow_core::db::open_db;
use minnow_core::{
    core_version, init_logging, ping, CheckupKind, CoreConfig, ItemStatus, ItemStore,
    SqliteBlobRepository,
};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "minnow_cli", version, about = "Min-Now core smoke probe")]
struct Args {
    /// Load the demo items into an empty store before printing the summary.
    #[arg(long)]
    seed: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    println!("minnow_core ping={}", ping());
    println!("minnow_core version={}", core_version());

    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{}`: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };
    let mut store = ItemStore::open(SqliteBlobRepository::new(&conn));

    if args.seed {
        println!("seeded={}", store.load_sample_data());
    }

    for status in ItemStatus::ALL {
        println!(
            "items status={status} count={}",
            store.items_with_status(status).len()
        );
    }
    for kind in CheckupKind::ALL {
        let checkup = store.checkup(kind);
        println!(
            "checkup kind={kind} interval_months={} due={} last={} next={}",
            checkup.interval_months(),
            store.is_checkup_due(kind),
            checkup.last_checkup_date().to_rfc3339(),
            checkup.next_due_date().to_rfc3339()
        );
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn seed_flag_is_opt_in() {
        assert!(!Args::try_parse_from(["minnow_cli"]).unwrap().seed);
        assert!(Args::try_parse_from(["minnow_cli", "--seed"]).unwrap().seed);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Args::try_parse_from(["minnow_cli", "--sed"]).is_err());
    }
}
