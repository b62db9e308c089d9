//! # oakdb Shell Entry Point
//!
//! ```bash
//! # Open or create a database file
//! oakdb ./users.db
//!
//! # Show version / help
//! oakdb --version
//! oakdb --help
//! ```
//!
//! Set `RUST_LOG=oakdb=debug` to see engine events (page reads, splits,
//! root replacement) on stderr.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use eyre::{bail, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use oakdb::cli::Repl;
use oakdb::Table;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let args: Vec<String> = env::args().collect();
    let mut db_path: Option<PathBuf> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("oakdb {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other if other.starts_with('-') => {
                bail!("Unknown option: {}", other);
            }
            path => {
                if db_path.is_some() {
                    bail!("Multiple database paths specified");
                }
                db_path = Some(PathBuf::from(path));
            }
        }
    }

    let Some(db_path) = db_path else {
        print_usage();
        bail!("Must supply a database filename");
    };

    let table = Table::open(&db_path)
        .wrap_err_with(|| format!("failed to open database at {:?}", db_path))?;

    let mut repl = Repl::new(table)?;
    repl.run()
}

fn print_usage() {
    println!("oakdb - single-file embedded B+ tree table store");
    println!();
    println!("USAGE:");
    println!("    oakdb [OPTIONS] <DATABASE_PATH>");
    println!();
    println!("ARGS:");
    println!("    <DATABASE_PATH>    Path to the database file (created if missing)");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help         Print help information");
    println!("    -v, --version      Print version information");
    println!();
    println!("Inside the shell, type .help for available commands.");
}
