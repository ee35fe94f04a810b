//! Embedded, versioned SQL migrations for the control-plane database
//! (spec.md §2 item 1, §4.12): table DDL, row-level access policies, and
//! the trigger-based enforcement layer (soft-delete guard, deletion
//! protection, preset protection, spec validation).
//!
//! Applied with [`refinery`] against Postgres over [`tokio_postgres`],
//! mirroring how the corpus's `ipad_rust_core` crate embeds versioned,
//! checksummed migrations for the same purpose against SQLite — we keep
//! the crate and swap the backend feature.
//!
//! This crate has no relationship to [`neutree_store`] beyond sharing a
//! target schema: the store façade talks to the database through the
//! PostgREST-style HTTP front door, never directly, so nothing here is
//! linked into the reconcilers. It exists purely so the schema the
//! triggers enforce is checked into the workspace and applied the same way
//! in every environment (spec.md §4.12 is "not a passive store").

use thiserror::Error;

refinery::embed_migrations!("migrations");

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] tokio_postgres::Error),
    #[error("migration failed: {0}")]
    Migrate(#[source] refinery::Error),
}

/// Connects to `database_url` and applies every migration not yet recorded
/// in the `refinery_schema_history` table, in version order.
pub async fn migrate(database_url: &str) -> Result<(), MigrationError> {
    let (mut client, connection) = tokio_postgres::connect(database_url, tokio_postgres::NoTls)
        .await
        .map_err(MigrationError::Connect)?;

    tokio::spawn(async move {
        if let Err(err) = connection.await {
            tracing::error!(%err, "database connection closed with error");
        }
    });

    migrations::runner()
        .run_async(&mut client)
        .await
        .map_err(MigrationError::Migrate)?;
    Ok(())
}
