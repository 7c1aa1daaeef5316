//! Coach studio command-line tool.
//!
//! Provides the `caa` binary for reading a studio database without running
//! the HTTP server: listing programs, showing a program's plan rows,
//! printing the program sheet, and printing a trainee's measurement history.
//!
//! Reads go through the same `StudioStore` and core views the server uses,
//! so the output matches what the API returns.

use std::process;

use clap::{Parser, Subcommand};

use caa_core::id::{PersonId, ProgramId};
use caa_core::labels::StaticLabels;
use caa_core::report;
use caa_core::selection::ExerciseSelectionList;
use caa_storage::{SqliteStore, StorageError, StudioStore};

/// Coach studio tools.
#[derive(Parser)]
#[command(name = "caa", about = "Coach studio tools")]
struct Cli {
    /// Path to the studio database file.
    #[arg(short, long, global = true, default_value = "caa.db")]
    db: String,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List all programs.
    Programs,

    /// Show a program's plan, one line per row.
    Show {
        /// Program ID.
        #[arg(short, long)]
        program: i64,

        /// Repeat-unit labels: en or fa.
        #[arg(short, long, default_value = "en")]
        labels: String,
    },

    /// Print the program sheet.
    Sheet {
        /// Program ID.
        #[arg(short, long)]
        program: i64,
    },

    /// Print a trainee's measurements across programs.
    History {
        /// Person ID.
        #[arg(short = 'P', long)]
        person: i64,
    },
}

/// Exit codes: 0 = success, 1 = bad arguments, 2 = not found, 3 = storage error.
fn main() {
    let cli = Cli::parse();

    let store = match SqliteStore::new(&cli.db) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", cli.db, e);
            process::exit(3);
        }
    };

    let result = match cli.command {
        Commands::Programs => run_programs(&store, cli.json),
        Commands::Show { program, labels } => match StaticLabels::for_locale(&labels) {
            Some(labels) => run_show(&store, ProgramId(program), &labels, cli.json),
            None => {
                eprintln!("Error: invalid labels '{}', expected en/fa", labels);
                process::exit(1);
            }
        },
        Commands::Sheet { program } => run_sheet(&store, ProgramId(program), cli.json),
        Commands::History { person } => run_history(&store, PersonId(person), cli.json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(exit_code(&e));
    }
}

fn exit_code(err: &StorageError) -> i32 {
    match err {
        StorageError::PersonNotFound(_)
        | StorageError::ExerciseNotFound(_)
        | StorageError::ProgramNotFound(_) => 2,
        _ => 3,
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), StorageError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_programs(store: &impl StudioStore, json: bool) -> Result<(), StorageError> {
    let programs = store.list_programs()?;
    if json {
        return print_json(&programs);
    }
    for p in &programs {
        println!("{:>5}  {}  {:<24} {}", p.id, p.date, p.name, p.person_name);
    }
    Ok(())
}

fn run_show(
    store: &impl StudioStore,
    program: ProgramId,
    labels: &StaticLabels,
    json: bool,
) -> Result<(), StorageError> {
    store.get_program(program)?;
    let list = ExerciseSelectionList::from_persisted(&store.load_items(program)?);
    let rows = list.display_strings(labels);
    if json {
        return print_json(&rows);
    }
    for row in &rows {
        println!("{:>3}.{}", row.row_number, row.label);
    }
    Ok(())
}

fn run_sheet(store: &impl StudioStore, program: ProgramId, json: bool) -> Result<(), StorageError> {
    let found = store.get_program(program)?;
    let person = store.get_person(found.person_id)?;
    let exercises = store.list_exercises()?;
    let items = store.load_items(program)?;
    let sheet = report::program_sheet(&found, &person, &exercises, &items);
    if json {
        return print_json(&sheet);
    }
    print!("{}", sheet.render_text());
    Ok(())
}

fn run_history(store: &impl StudioStore, person: PersonId, json: bool) -> Result<(), StorageError> {
    let programs = store.list_programs_for_person(person)?;
    let rows = report::measurement_history(&programs);
    if json {
        return print_json(&rows);
    }
    let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    for row in &rows {
        let pad = width - row.label.chars().count();
        println!("{}{}  {}", row.label, " ".repeat(pad), row.values.join("  "));
    }
    Ok(())
}
