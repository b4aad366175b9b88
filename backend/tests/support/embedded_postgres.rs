//! Per-test databases cloned from a migrated template.
//!
//! The template is named after a hash of `migrations/`, so a schema change
//! provisions a fresh template instead of reusing a stale one. Every test then
//! gets its own database cloned from it and dropped when the handle goes.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use shareit::domain::ports::UserPersistenceError;
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "shareit_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, UserPersistenceError> {
    let hash = hash_directory(migrations_dir())
        .map_err(|err| UserPersistenceError::query(format!("hash migrations: {err}")))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Create the template on first use and return its name.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, UserPersistenceError> {
    let template = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template.as_str())
        .map_err(|err| UserPersistenceError::query(format!("template check: {err:?}")))?;
    if !exists {
        cluster
            .create_database(template.as_str())
            .map_err(|err| UserPersistenceError::query(format!("create template: {err:?}")))?;
        migrate_schema(&cluster.connection().database_url(&template))?;
    }
    Ok(template)
}

fn clone_template(
    cluster: &ClusterHandle,
    attempt: usize,
) -> Result<TemporaryDatabase, UserPersistenceError> {
    let template = ensure_template_database(cluster).map_err(|err| {
        UserPersistenceError::query(format!("attempt {attempt}/{PROVISION_RETRIES}: {err}"))
    })?;
    let name = format!("test_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(name.as_str(), template.as_str())
        .map_err(|err| {
            UserPersistenceError::query(format!(
                "clone template: attempt {attempt}/{PROVISION_RETRIES}: {err:?}"
            ))
        })
}

/// Provision a migrated database for one test.
pub fn provision_template_database(
    cluster: &ClusterHandle,
) -> Result<TemporaryDatabase, UserPersistenceError> {
    let mut last_error = None;
    for attempt in 1..=PROVISION_RETRIES {
        match clone_template(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(err) => last_error = Some(err),
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error
        .unwrap_or_else(|| UserPersistenceError::query("clone template: exhausted retries")))
}

/// Apply every embedded migration to the database at `url`.
pub fn migrate_schema(url: &str) -> Result<(), UserPersistenceError> {
    let mut conn = PgConnection::establish(url)
        .map_err(|err| UserPersistenceError::connection(format!("{err:?}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| UserPersistenceError::query(format!("migration: {err:?}")))?;
    Ok(())
}
