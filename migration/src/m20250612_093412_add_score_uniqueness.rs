use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Score {
    Table,
    BattleId,
    JudgeId,
    CompetitorId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One score per judge and competitor in a battle. Score submission relies
        // on this index for its ON CONFLICT target.
        manager.create_index(
            Index::create()
                .table(Score::Table)
                .name("score_battle_judge_competitor")
                .col(Score::BattleId)
                .col(Score::JudgeId)
                .col(Score::CompetitorId)
                .unique()
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(
            Index::drop()
                .table(Score::Table)
                .name("score_battle_judge_competitor")
                .to_owned(),
        ).await?;

        Ok(())
    }
}
