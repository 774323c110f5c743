#![allow(dead_code)]

use battle_tab_entities::mock::{self, MockCompetition, MockOption};
use migration::MigratorTrait;
use sea_orm::{prelude::*, Database, Statement};


pub async fn set_up_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON;",
        vec![])
    ).await?;
    Ok(db)
}

pub async fn set_up_mock_db(options: MockOption) -> Result<(DatabaseConnection, MockCompetition), anyhow::Error> {
    let db = set_up_db().await?;
    let competition = mock::make_mock_competition_with_options(&db, options).await?;
    Ok((db, competition))
}
