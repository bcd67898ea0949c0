//! CLI smoke entry point.
//!
//! Creates a todo, round-trips it through an in-memory cache and prints the
//! result, to verify `cloudtodo_core` wiring without a sync host.

use cloudtodo_core::db::open_db_in_memory;
use cloudtodo_core::{core_version, CloudSchema, SqliteTodoCache, TodoCache, TodoItem};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cloudtodo_core probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("cloudtodo_core version={}", core_version());

    let mut item = TodoItem::new();
    item.title = Some("smoke probe".to_string());

    let conn = open_db_in_memory()?;
    let cache = SqliteTodoCache::new(&conn);
    cache.put(&item)?;
    let cached = cache
        .get(item.id())?
        .ok_or("cached todo missing after put")?;
    println!("cached {cached}");

    let record = cached.to_remote_record(&CloudSchema::todo());
    println!(
        "record type={} name={} attributes={}",
        record.record_type,
        record.record_name,
        record.fields.len()
    );
    Ok(())
}
