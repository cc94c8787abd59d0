use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::schema::users;

/// Full user row from the database.
///
/// `password_hash` is an Argon2id PHC string; plaintext passwords are never
/// stored or compared.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub is_dev: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating a new user.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_dev: bool,
}
