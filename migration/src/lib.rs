use sea_orm_migration::prelude::*;
pub use sea_orm_migration::prelude::{MigrationTrait, MigratorTrait};

mod m20250601_000001_create_table;
mod m20250612_093412_add_score_uniqueness;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_table::Migration),
            Box::new(m20250612_093412_add_score_uniqueness::Migration),
        ]
    }
}
