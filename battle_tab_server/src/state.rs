use axum::extract::FromRef;
use db::DatabaseConfig;

use crate::config::Config;
use crate::db;
use sea_orm::prelude::*;


#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<AppState, DbErr> {
        let db = db::set_up_db(DatabaseConfig::new(config.db_url.clone())).await?;
        Self::new_with_db(db).await
    }

    pub async fn new_with_db(db: DatabaseConnection) -> Result<AppState, DbErr> {
        db::migrate(&db).await?;
        Ok(AppState { db })
    }

    pub async fn new_test_app() -> AppState {
        let db = db::set_up_db(
            DatabaseConfig::new(
                "sqlite::memory:".into(),
            )
        ).await.expect("Failed to set up database");
        Self::new_with_db(db).await.expect("Failed to migrate database")
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(app_state: &AppState) -> DatabaseConnection {
        app_state.db.clone()
    }
}
