//! sqlcanvas CLI - Generate T-SQL from canvas model files
//!
//! Usage:
//!   sqlcanvas select <query.json>
//!   sqlcanvas grouped <query.json> --group-by <colId>... --aggregate FUNC:colId[:alias]...
//!   sqlcanvas insert <table.json> <values.json>
//!   sqlcanvas update <table.json> <values.json> [--where <where.json>]
//!   sqlcanvas delete <table.json> [--where <where.json>]
//!   sqlcanvas create-table <table.json>
//!
//! Generated SQL, including `--` comments explaining why nothing could be
//! generated, goes to stdout. I/O and parse errors go to stderr.

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use sqlcanvas::config::Settings;
use sqlcanvas::generator::QueryGenerator;
use sqlcanvas::model::{Aggregate, QueryModel, Table, ValueMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sqlcanvas")]
#[command(about = "sqlcanvas - Generate T-SQL from a canvas of tables and relationships")]
#[command(version)]
struct Cli {
    /// Config file (default: $SQLCANVAS_CONFIG, ./sqlcanvas.toml, user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fail when a relevant table cannot be joined
    #[arg(long, global = true)]
    strict: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// SELECT over the selected columns of a query model
    Select {
        /// Path to the query model JSON
        file: PathBuf,
    },

    /// Grouped SELECT with aggregates
    Grouped {
        /// Path to the query model JSON
        file: PathBuf,

        /// Column id to group by (repeatable)
        #[arg(long = "group-by")]
        group_by: Vec<String>,

        /// Aggregate as FUNC:columnId[:alias], e.g. SUM:c7:Revenue (repeatable)
        #[arg(long = "aggregate", value_parser = parse_aggregate)]
        aggregates: Vec<Aggregate>,
    },

    /// INSERT one row
    Insert {
        /// Path to the table JSON
        table: PathBuf,
        /// Path to a JSON object of column values
        values: PathBuf,
    },

    /// UPDATE rows
    Update {
        /// Path to the table JSON
        table: PathBuf,
        /// Path to a JSON object of column values
        values: PathBuf,
        /// Path to a JSON object of match values
        #[arg(long = "where")]
        where_values: Option<PathBuf>,
    },

    /// DELETE rows
    Delete {
        /// Path to the table JSON
        table: PathBuf,
        /// Path to a JSON object of match values
        #[arg(long = "where")]
        where_values: Option<PathBuf>,
    },

    /// CREATE TABLE script for a table
    CreateTable {
        /// Path to the table JSON
        table: PathBuf,
    },
}

fn parse_aggregate(s: &str) -> Result<Aggregate, String> {
    let mut parts = s.splitn(3, ':');
    let function = parts.next().unwrap_or_default().parse()?;
    let column_id = match parts.next() {
        Some(id) if !id.trim().is_empty() => id.trim(),
        _ => return Err(format!("expected FUNC:columnId[:alias], got '{s}'")),
    };
    let aggregate = Aggregate::new(function, column_id);
    Ok(match parts.next() {
        Some(alias) if !alias.trim().is_empty() => aggregate.with_alias(alias.trim()),
        _ => aggregate,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut options = settings.generator_options();
    if cli.strict {
        options.strict_connectivity = true;
    }
    let mut generator = QueryGenerator::new(options);

    match run(&mut generator, cli.command) {
        Ok(sql) => {
            println!("{}", sql);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(generator: &mut QueryGenerator, command: Commands) -> Result<String, String> {
    let sql = match command {
        Commands::Select { file } => {
            let model: QueryModel = read_json(&file)?;
            generator.generate_select(&model)
        }
        Commands::Grouped {
            file,
            group_by,
            aggregates,
        } => {
            let model: QueryModel = read_json(&file)?;
            generator.generate_grouped_select(&model, &group_by, &aggregates)
        }
        Commands::Insert { table, values } => {
            let table: Table = read_json(&table)?;
            let values: ValueMap = read_json(&values)?;
            generator.generate_insert(&table, &values)
        }
        Commands::Update {
            table,
            values,
            where_values,
        } => {
            let table: Table = read_json(&table)?;
            let values: ValueMap = read_json(&values)?;
            let where_values = read_optional(where_values.as_deref())?;
            generator.generate_update(&table, &values, &where_values)
        }
        Commands::Delete {
            table,
            where_values,
        } => {
            let table: Table = read_json(&table)?;
            let where_values = read_optional(where_values.as_deref())?;
            generator.generate_delete(&table, &where_values)
        }
        Commands::CreateTable { table } => {
            let table: Table = read_json(&table)?;
            generator.generate_create_table(&table)
        }
    };
    Ok(sql)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let source = fs::read_to_string(path)
        .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))?;
    serde_json::from_str(&source)
        .map_err(|e| format!("Error parsing '{}': {}", path.display(), e))
}

fn read_optional(path: Option<&Path>) -> Result<ValueMap, String> {
    match path {
        Some(path) => read_json(path),
        None => Ok(ValueMap::new()),
    }
}
