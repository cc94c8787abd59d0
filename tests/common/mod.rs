use std::sync::{Arc, Once};

use axum::Router;
use axum_test::TestServer;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use listings_api::auth::password::hash_password;
use listings_api::config::Config;
use listings_api::db::kv::MemoryStore;
use listings_api::db::pool::DbPool;
use listings_api::db::schema::{apartments, users};
use listings_api::AppState;

static MIGRATE: Once = Once::new();

/// Bring the test database up to schema exactly once per test binary.
fn ensure_migrated(database_url: &str) {
    MIGRATE.call_once(|| {
        use diesel::Connection;
        use diesel_migrations::MigrationHarness;

        let mut conn = diesel::pg::PgConnection::establish(database_url)
            .expect("failed to connect to test database");
        conn.run_pending_migrations(listings_api::db::MIGRATIONS)
            .expect("failed to run migrations");
    });
}

/// Build an [`AppState`] against the database from `.env`, with sessions
/// held in an in-memory store.
pub async fn test_state() -> AppState {
    // Load .env from the crate root so tests work from any cwd.
    let env_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(env_path);

    let config = Config::from_env();
    ensure_migrated(&config.database_url);

    let db = listings_api::db::pool::connect(&config.database_url).await;

    AppState {
        db,
        kv: Arc::new(MemoryStore::new()),
        config: Arc::new(config),
    }
}

/// Build the full application [`Router`] wired to the test state.
pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    let app = listings_api::routes::router().with_state(state.clone());
    (app, state)
}

/// Cookie-preserving test server over the app router.
pub fn test_server(app: Router) -> TestServer {
    TestServer::builder()
        .save_cookies()
        .build(app)
        .expect("failed to build test server")
}

pub struct TestUser {
    pub id: i32,
    pub username: String,
    pub password: String,
}

/// Create a user row with a hashed password.
///
/// Uses a random username suffix so tests don't clash.
pub async fn create_test_user(db: &DbPool, password: &str, is_dev: bool) -> TestUser {
    let suffix: u32 = rand::random();
    let username = format!("testuser_{suffix}");
    let password_hash = hash_password(password).expect("argon2 hash");

    let mut conn = db.get().await.expect("pool");
    let id: i32 = diesel::insert_into(users::table)
        .values((
            users::username.eq(&username),
            users::password_hash.eq(&password_hash),
            users::is_dev.eq(is_dev),
        ))
        .returning(users::id)
        .get_result(&mut conn)
        .await
        .expect("insert test user");

    TestUser {
        id,
        username,
        password: password.to_string(),
    }
}

/// Clean up a test user.
pub async fn cleanup_test_user(db: &DbPool, user_id: i32) {
    let mut conn = db.get().await.expect("pool");
    diesel::delete(users::table.filter(users::id.eq(user_id)))
        .execute(&mut conn)
        .await
        .ok();
}

/// Insert an apartment row directly, returning its id.
pub async fn create_test_apartment(db: &DbPool, name: &str, price: Option<f64>) -> i32 {
    let mut conn = db.get().await.expect("pool");
    diesel::insert_into(apartments::table)
        .values((
            apartments::name.eq(name),
            apartments::price.eq(price),
            apartments::square_footage.eq(800.0_f64),
            apartments::bedrooms.eq(2.0_f64),
            apartments::bathrooms.eq(1.0_f64),
            apartments::distance1.eq(Some(4.2_f64)),
            apartments::distance2.eq(Some(9.9_f64)),
        ))
        .returning(apartments::id)
        .get_result(&mut conn)
        .await
        .expect("insert test apartment")
}

/// Clean up a test apartment.
pub async fn cleanup_test_apartment(db: &DbPool, id: i32) {
    let mut conn = db.get().await.expect("pool");
    diesel::delete(apartments::table.filter(apartments::id.eq(id)))
        .execute(&mut conn)
        .await
        .ok();
}

/// Log `user` in through the real endpoint; the server keeps the session
/// cookie for subsequent requests.
pub async fn login_as(server: &TestServer, user: &TestUser) {
    let resp = server
        .post("/login")
        .json(&serde_json::json!({
            "username": user.username,
            "password": user.password,
        }))
        .await;
    resp.assert_status_ok();
}
