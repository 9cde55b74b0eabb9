use std::sync::Arc;

use stocklink_core::db::{self, DbPool};

/// Creates a throwaway SQLite database under tests/output and returns a pool
/// with migrations applied.
pub fn setup_test_db() -> Arc<DbPool> {
    let data_dir = format!("./tests/output/{}", uuid::Uuid::new_v4());

    let db_path = db::init(&data_dir).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    pool
}
