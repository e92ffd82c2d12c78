use std::sync::Arc;

use sea_orm::Database as SeaDatabase;

use crate::database::Database;

pub async fn test_db() -> Arc<Database> {
    let conn = SeaDatabase::connect("sqlite::memory:?mode=rwc")
        .await
        .unwrap();

    let db = Database { conn };
    db.migrate()
        .await
        .unwrap_or_else(|e| panic!("Failed to migrate test database: {e:?}"));

    Arc::new(db)
}
