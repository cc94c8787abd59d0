//! Operator tool for creating login users.
//!
//! Usage:
//!   cargo run --bin create-user -- <username> <password> [--dev]
//!
//! The password is hashed with Argon2id before it touches the database;
//! there is no path that stores a plaintext credential.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use std::path::Path;

use listings_api::auth::password::hash_password;
use listings_api::db::schema::users;
use listings_api::models::user::NewUser;

fn main() {
    if dotenvy::dotenv().is_err() {
        let env_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(env_path);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (username, password, is_dev) = match args.as_slice() {
        [username, password] => (username.as_str(), password.as_str(), false),
        [username, password, flag] if flag == "--dev" => (username.as_str(), password.as_str(), true),
        _ => {
            eprintln!("usage: create-user <username> <password> [--dev]");
            std::process::exit(2);
        }
    };

    let password_hash = hash_password(password).expect("failed to hash password");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL env var is required");
    let mut conn = PgConnection::establish(&database_url).expect("failed to connect to database");

    diesel::insert_into(users::table)
        .values(NewUser {
            username,
            password_hash: &password_hash,
            is_dev,
        })
        .execute(&mut conn)
        .expect("failed to insert user");

    println!("Created user {username} (dev: {is_dev})");
}
