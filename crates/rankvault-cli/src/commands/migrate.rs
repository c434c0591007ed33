//! Schema migration command

use rankvault_core::Config;
use rankvault_store::migrations::applied_migrations;

pub fn execute(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let conn = rankvault_store::db::open_and_migrate(&config.database_path)?;
    println!("Database: {}", config.database_path.display());
    for id in applied_migrations(&conn)? {
        println!("  applied {}", id);
    }
    Ok(())
}
