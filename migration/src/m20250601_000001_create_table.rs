use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250601_000001_create_table"
    }
}


#[derive(Iden)]
pub enum Competition {
    Table,
    Id,
    Name,
    Description,
    StartDate,
    EndDate,
    Location,
    MaxParticipants,
    RegistrationDeadline,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum CompetitionStage {
    Table,
    Id,
    CompetitionId,
    Name,
    Description,
    StageType,
    StageOrder,
    StartTime,
    EndTime,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Competitor {
    Table,
    Id,
    CompetitionId,
    RegistrationNumber,
    BboyName,
    RealName,
    Gender,
    BirthDate,
    Nationality,
    Team,
    PhotoUrl,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Judge {
    Table,
    Id,
    CompetitionId,
    Name,
    CreatedAt,
}

#[derive(Iden)]
pub enum Battle {
    Table,
    Id,
    CompetitionId,
    StageId,
    Competitor1Id,
    Competitor2Id,
    WinnerId,
    BattleOrder,
    Status,
    StartTime,
    EndTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Score {
    Table,
    Id,
    BattleId,
    JudgeId,
    CompetitorId,
    TechniqueScore,
    OriginalityScore,
    MusicalityScore,
    ExecutionScore,
    Comments,
    CreatedAt,
    UpdatedAt,
}


#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
        .create_table(
            sea_query::Table::create()
                .table(Competition::Table)
                .if_not_exists()
                .col(ColumnDef::new(Competition::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Competition::Name).string().not_null())
                .col(ColumnDef::new(Competition::Description).string())
                .col(ColumnDef::new(Competition::StartDate).date().not_null())
                .col(ColumnDef::new(Competition::EndDate).date().not_null())
                .col(ColumnDef::new(Competition::Location).string())
                .col(ColumnDef::new(Competition::MaxParticipants).integer())
                .col(ColumnDef::new(Competition::RegistrationDeadline).date())
                .col(ColumnDef::new(Competition::Status).string().not_null().default("draft"))
                .col(ColumnDef::new(Competition::CreatedAt).date_time().not_null())
                .col(ColumnDef::new(Competition::UpdatedAt).date_time().not_null())
                .to_owned()
        ).await?;

        manager
        .create_table(
            sea_query::Table::create()
                .table(CompetitionStage::Table)
                .if_not_exists()
                .col(ColumnDef::new(CompetitionStage::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(CompetitionStage::CompetitionId).integer().not_null())
                .col(ColumnDef::new(CompetitionStage::Name).string().not_null())
                .col(ColumnDef::new(CompetitionStage::Description).string())
                .col(ColumnDef::new(CompetitionStage::StageType).string().not_null())
                .col(ColumnDef::new(CompetitionStage::StageOrder).integer().not_null().default(0))
                .col(ColumnDef::new(CompetitionStage::StartTime).date_time())
                .col(ColumnDef::new(CompetitionStage::EndTime).date_time())
                .col(ColumnDef::new(CompetitionStage::Status).string().not_null().default("pending"))
                .col(ColumnDef::new(CompetitionStage::CreatedAt).date_time().not_null())
                .col(ColumnDef::new(CompetitionStage::UpdatedAt).date_time().not_null())
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-competition_stage-competition")
                        .from_tbl(CompetitionStage::Table)
                        .from_col(CompetitionStage::CompetitionId)
                        .to_tbl(Competition::Table)
                        .to_col(Competition::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            IndexCreateStatement::new()
            .name("idx-competition_stage-competition-id")
            .table(CompetitionStage::Table)
            .col(CompetitionStage::CompetitionId)
            .to_owned()
        ).await?;

        manager
        .create_table(
            sea_query::Table::create()
                .table(Competitor::Table)
                .if_not_exists()
                .col(ColumnDef::new(Competitor::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Competitor::CompetitionId).integer().not_null())
                .col(ColumnDef::new(Competitor::RegistrationNumber).string().unique_key())
                .col(ColumnDef::new(Competitor::BboyName).string())
                .col(ColumnDef::new(Competitor::RealName).string().not_null())
                .col(ColumnDef::new(Competitor::Gender).string().not_null())
                .col(ColumnDef::new(Competitor::BirthDate).date())
                .col(ColumnDef::new(Competitor::Nationality).string())
                .col(ColumnDef::new(Competitor::Team).string())
                .col(ColumnDef::new(Competitor::PhotoUrl).string())
                .col(ColumnDef::new(Competitor::Status).string().not_null().default("registered"))
                .col(ColumnDef::new(Competitor::CreatedAt).date_time().not_null())
                .col(ColumnDef::new(Competitor::UpdatedAt).date_time().not_null())
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-competitor-competition")
                        .from_tbl(Competitor::Table)
                        .from_col(Competitor::CompetitionId)
                        .to_tbl(Competition::Table)
                        .to_col(Competition::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            IndexCreateStatement::new()
            .name("idx-competitor-competition-id")
            .table(Competitor::Table)
            .col(Competitor::CompetitionId)
            .to_owned()
        ).await?;

        manager
        .create_table(
            sea_query::Table::create()
                .table(Judge::Table)
                .if_not_exists()
                .col(ColumnDef::new(Judge::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Judge::CompetitionId).integer().not_null())
                .col(ColumnDef::new(Judge::Name).string().not_null())
                .col(ColumnDef::new(Judge::CreatedAt).date_time().not_null())
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-judge-competition")
                        .from_tbl(Judge::Table)
                        .from_col(Judge::CompetitionId)
                        .to_tbl(Competition::Table)
                        .to_col(Competition::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager
        .create_table(
            sea_query::Table::create()
                .table(Battle::Table)
                .if_not_exists()
                .col(ColumnDef::new(Battle::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Battle::CompetitionId).integer().not_null())
                .col(ColumnDef::new(Battle::StageId).integer().not_null())
                .col(ColumnDef::new(Battle::Competitor1Id).integer())
                .col(ColumnDef::new(Battle::Competitor2Id).integer())
                .col(ColumnDef::new(Battle::WinnerId).integer())
                .col(ColumnDef::new(Battle::BattleOrder).integer().not_null())
                .col(ColumnDef::new(Battle::Status).string().not_null().default("scheduled"))
                .col(ColumnDef::new(Battle::StartTime).date_time())
                .col(ColumnDef::new(Battle::EndTime).date_time())
                .col(ColumnDef::new(Battle::CreatedAt).date_time().not_null())
                .col(ColumnDef::new(Battle::UpdatedAt).date_time().not_null())
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-battle-competition")
                        .from_tbl(Battle::Table)
                        .from_col(Battle::CompetitionId)
                        .to_tbl(Competition::Table)
                        .to_col(Competition::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-battle-stage")
                        .from_tbl(Battle::Table)
                        .from_col(Battle::StageId)
                        .to_tbl(CompetitionStage::Table)
                        .to_col(CompetitionStage::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-battle-competitor1")
                        .from_tbl(Battle::Table)
                        .from_col(Battle::Competitor1Id)
                        .to_tbl(Competitor::Table)
                        .to_col(Competitor::Id)
                        .on_delete(ForeignKeyAction::SetNull)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-battle-competitor2")
                        .from_tbl(Battle::Table)
                        .from_col(Battle::Competitor2Id)
                        .to_tbl(Competitor::Table)
                        .to_col(Competitor::Id)
                        .on_delete(ForeignKeyAction::SetNull)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-battle-winner")
                        .from_tbl(Battle::Table)
                        .from_col(Battle::WinnerId)
                        .to_tbl(Competitor::Table)
                        .to_col(Competitor::Id)
                        .on_delete(ForeignKeyAction::SetNull)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            IndexCreateStatement::new()
            .name("idx-battle-stage-order")
            .table(Battle::Table)
            .col(Battle::StageId)
            .col(Battle::BattleOrder)
            .to_owned()
        ).await?;

        manager
        .create_table(
            sea_query::Table::create()
                .table(Score::Table)
                .if_not_exists()
                .col(ColumnDef::new(Score::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Score::BattleId).integer().not_null())
                .col(ColumnDef::new(Score::JudgeId).integer().not_null())
                .col(ColumnDef::new(Score::CompetitorId).integer().not_null())
                .col(ColumnDef::new(Score::TechniqueScore).double())
                .col(ColumnDef::new(Score::OriginalityScore).double())
                .col(ColumnDef::new(Score::MusicalityScore).double())
                .col(ColumnDef::new(Score::ExecutionScore).double())
                .col(ColumnDef::new(Score::Comments).string())
                .col(ColumnDef::new(Score::CreatedAt).date_time().not_null())
                .col(ColumnDef::new(Score::UpdatedAt).date_time().not_null())
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-score-battle")
                        .from_tbl(Score::Table)
                        .from_col(Score::BattleId)
                        .to_tbl(Battle::Table)
                        .to_col(Battle::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-score-judge")
                        .from_tbl(Score::Table)
                        .from_col(Score::JudgeId)
                        .to_tbl(Judge::Table)
                        .to_col(Judge::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-score-competitor")
                        .from_tbl(Score::Table)
                        .from_col(Score::CompetitorId)
                        .to_tbl(Competitor::Table)
                        .to_col(Competitor::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            IndexCreateStatement::new()
            .name("idx-score-battle-id")
            .table(Score::Table)
            .col(Score::BattleId)
            .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Score::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Battle::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Judge::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Competitor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CompetitionStage::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Competition::Table).to_owned()).await?;

        Ok(())
    }
}
