//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `perftrack_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use perftrack_core::db::migrations::latest_version;
use perftrack_core::db::open_db_in_memory;

fn main() {
    println!("perftrack_core version={}", perftrack_core::core_version());

    match open_db_in_memory() {
        Ok(_) => println!("storage schema_version={}", latest_version()),
        Err(err) => {
            eprintln!("storage bootstrap failed: {err}");
            std::process::exit(1);
        }
    }
}
