//! Command-line front end for the user registry.
//!
//! # Responsibility
//! - Map `register` and `lookup` subcommands onto the core service.
//! - Print the same messages a form UI would show.

use clap::{Parser, Subcommand};
use log::debug;
use registry_core::db::open_db;
use registry_core::model::user::{FIELD_AGE, FIELD_DOB, FIELD_EMAIL, FIELD_NAME, FIELD_PHONE};
use registry_core::{
    default_log_level, init_logging, resolve_db_path, LookupOutcome, RawUserFields,
    RegistrationError, RegistrationService, SqliteUserRepository,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "user-registry", version)]
#[command(about = "Register users and look them up by name", long_about = None)]
struct Cli {
    /// SQLite database file (falls back to REGISTRY_DB_PATH, then ./user_data.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and store a new user
    Register {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        age: String,
        /// Date of birth as YYYY-MM-DD
        #[arg(long, default_value = "")]
        dob: String,
    },
    /// Show the stored details for an exact name
    Lookup { name: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("Logging Error: {err}");
            return ExitCode::FAILURE;
        }
    }

    let db_path = resolve_db_path(cli.db.as_deref());
    debug!("event=cli_start module=cli status=ok");

    let result = match cli.command {
        Commands::Register {
            name,
            email,
            phone,
            age,
            dob,
        } => {
            let raw = form_fields(name, email, phone, age, dob);
            run(&db_path, |service| service.register(&raw)).map(|record| {
                println!("User '{}' registered successfully!", record.name);
            })
        }
        Commands::Lookup { name } => {
            run(&db_path, |service| service.lookup(&name)).map(|outcome| match outcome {
                LookupOutcome::Found(stored) => {
                    for (label, value) in stored.display_fields() {
                        println!("{label}: {value}");
                    }
                }
                LookupOutcome::NotFound => println!("{}", LookupOutcome::NOT_FOUND_MESSAGE),
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", error_title(&err));
            ExitCode::FAILURE
        }
    }
}

fn form_fields(
    name: String,
    email: String,
    phone: String,
    age: String,
    dob: String,
) -> RawUserFields {
    let fields = HashMap::from([
        (FIELD_NAME.to_string(), name),
        (FIELD_EMAIL.to_string(), email),
        (FIELD_PHONE.to_string(), phone),
        (FIELD_AGE.to_string(), age),
        (FIELD_DOB.to_string(), dob),
    ]);
    RawUserFields::from_field_map(&fields)
}

fn run<T>(
    db_path: &std::path::Path,
    f: impl FnOnce(&RegistrationService<SqliteUserRepository<'_>>) -> Result<T, RegistrationError>,
) -> Result<T, RegistrationError> {
    let conn = open_db(db_path).map_err(|err| RegistrationError::Storage(err.into()))?;
    let service = RegistrationService::new(SqliteUserRepository::new(&conn));
    f(&service)
}

fn error_title(err: &RegistrationError) -> &'static str {
    match err {
        RegistrationError::Validation(_) => "Validation Error",
        RegistrationError::MissingName => "Input Error",
        RegistrationError::Storage(_) => "Database Error",
    }
}
