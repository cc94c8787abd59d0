pub mod kv;
pub mod pool;
pub mod schema;

use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Apply pending embedded migrations before the server starts taking
/// traffic, so a fresh database comes up with schema and seed listings in
/// place.
///
/// Diesel migrations run over a blocking connection, so this hops onto the
/// blocking thread pool.
pub async fn run_migrations(database_url: &str) {
    let database_url = database_url.to_string();
    tokio::task::spawn_blocking(move || {
        let mut conn =
            PgConnection::establish(&database_url).expect("failed to connect to database");
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .expect("failed to run migrations");
        for migration in &applied {
            tracing::info!(%migration, "applied migration");
        }
    })
    .await
    .expect("migration task panicked");
}
