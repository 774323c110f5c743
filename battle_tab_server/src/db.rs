use migration::MigratorTrait;
use sea_orm::{prelude::*, Database, DbBackend, Statement};
use tracing::info;


pub struct DatabaseConfig {
    url: String,
}


impl DatabaseConfig {
    pub fn new(url: String) -> DatabaseConfig {
        DatabaseConfig { url }
    }
}


pub async fn set_up_db(config: DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.url.clone()).await?;

    match db.get_database_backend() {
        DbBackend::Sqlite => {
            db.execute(Statement::from_string(
                db.get_database_backend(),
                "PRAGMA foreign_keys = ON;",
            ))
            .await?;
        }
        DbBackend::MySql | DbBackend::Postgres => {}
    };

    Ok(db)
}

pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    migration::Migrator::up(db, None).await?;
    info!("Database schema is up to date");
    Ok(())
}
