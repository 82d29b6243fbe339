pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod service;
pub mod session;

use sqlx::{postgres::Postgres, Pool};

pub type PGPool = Pool<Postgres>;

/// Access token lifetime, seconds.
pub const ACCESS_TOKEN_EXP: usize = 60 * 60;
/// Refresh token lifetime, seconds.
pub const REFRESH_TOKEN_EXP: usize = 5 * 24 * 60 * 60;
