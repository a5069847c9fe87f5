//! # Tariff Import
//!
//! Loads a tariff document straight into the database, bypassing the HTTP
//! service. The service picks the rows up on its next start.
//!
//! ## Usage
//! ```bash
//! # Merge a document into ./tariffs.db
//! cargo run -p tariff-db --bin import -- --file tariffs.json
//!
//! # Replace every stored tariff with the document's contents
//! cargo run -p tariff-db --bin import -- --file tariffs.json --replace
//!
//! # Specify database path
//! cargo run -p tariff-db --bin import -- --file tariffs.json --db ./data/tariffs.db
//! ```
//!
//! The document is fully validated before the database is opened; a bad
//! record writes nothing.

use std::env;
use tariff_core::{parse_document, IngestMode, TariffBatch};
use tariff_db::migrations::migration_status;
use tariff_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut file: Option<String> = None;
    let mut db_path = String::from("./tariffs.db");
    let mut mode = IngestMode::Merge;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--file" | "-f" => {
                if i + 1 < args.len() {
                    file = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--replace" => mode = IngestMode::Replace,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let Some(file) = file else {
        eprintln!("Missing --file");
        print_usage();
        std::process::exit(2);
    };

    println!("Tariff Import");
    println!("=============");
    println!("File:     {}", file);
    println!("Database: {}", db_path);
    println!("Mode:     {}", mode);
    println!();

    let bytes = std::fs::read(&file)?;
    let records = parse_document(&bytes)?;
    let batch = TariffBatch::from_raw(&records)?;

    println!("✓ Validated {} tariffs", batch.len());

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (total, applied) = migration_status(db.pool()).await?;
    println!("✓ Connected to database ({}/{} migrations applied)", applied, total);

    let written = db.tariffs().save_batch(&batch, mode).await?;
    let stored = db.tariffs().count().await?;

    println!("✓ Wrote {} rows (batch {})", written, batch.id());
    println!("  Database now holds {} tariffs", stored);

    db.close().await;
    Ok(())
}

fn print_usage() {
    println!("Tariff Import");
    println!();
    println!("Usage: import --file <PATH> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -f, --file <PATH>  Tariff document (JSON) to import");
    println!("  -d, --db <PATH>    Database file path (default: ./tariffs.db)");
    println!("      --replace      Replace all stored tariffs instead of merging");
    println!("  -h, --help         Show this help message");
}
