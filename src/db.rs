use std::{
    io::{BufRead, Write},
    path::Path,
};

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::{
    models::{schema, Entry, US_STATES},
    store::SqliteStore,
};

/// Install database schema and seed the catalog.
pub async fn install_schema(db_path: &str, prompt: bool) -> Result<(), Box<dyn std::error::Error>> {
    if prompt && !confirm(&format!("\n** Initialize new database at '{}'? **\n", db_path))? {
        println!("install cancelled");
        return Ok(());
    }

    let db = init(db_path, 1).await?;
    create_schema(&db).await?;

    log::info!("successfully installed schema");
    Ok(())
}

/// Create tables and seed them with the U.S. states at zero frequency.
async fn create_schema(db: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    sqlx::raw_sql(&schema.schema.query).execute(db).await?;

    let store = SqliteStore::new(db.clone());
    let seed: Vec<Entry> = US_STATES
        .iter()
        .map(|(name, code)| Entry::new(*name, *code, 0))
        .collect();
    store.upsert_all(&seed).await?;
    log::info!("seeded {} states", store.count().await?);

    Ok(())
}

/// Check if the DB file exists and exit with error message if not.
pub fn exists(path: &Path) {
    if !path.exists() {
        log::error!(
            "database '{}' not found. Run `install` to create a new one.",
            path.display()
        );
        std::process::exit(1);
    }
}

/// Print a message and ask for y/n on stdin.
fn confirm(msg: &str) -> Result<bool, std::io::Error> {
    println!("{}", msg);
    print!("continue (y/n)?  ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Create a read-write SQLite connection pool, creating the file if needed.
pub async fn init(db_path: &str, max_conns: u32) -> Result<SqlitePool, sqlx::Error> {
    let db = SqlitePoolOptions::new()
        .max_connections(max_conns.max(1))
        .connect(&format!("sqlite://{}?mode=rwc", db_path))
        .await?;

    // Apply SQLite DB pragmas.
    sqlx::query(&schema.pragma.query).execute(&db).await?;

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CatalogStore;

    async fn memory_db() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn schema_seeds_all_states() {
        let db = memory_db().await;
        create_schema(&db).await.unwrap();

        let store = SqliteStore::new(db);
        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 50);
        assert!(all.iter().all(|e| e.frequency == 0));
        assert!(all.contains(&Entry::new("New Hampshire", "NH", 0)));
    }

    #[tokio::test]
    async fn schema_install_is_repeatable() {
        let db = memory_db().await;
        create_schema(&db).await.unwrap();
        create_schema(&db).await.unwrap();

        assert_eq!(SqliteStore::new(db).count().await.unwrap(), 50);
    }
}
