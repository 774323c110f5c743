use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "battle")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub competition_id: i32,
    pub stage_id: i32,
    pub competitor1_id: Option<i32>,
    pub competitor2_id: Option<i32>,
    pub winner_id: Option<i32>,
    pub battle_order: i32,
    pub status: String,
    pub start_time: Option<DateTime>,
    pub end_time: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

// The three competitor references are not exposed through `Related`,
// since sea-orm can not pick between them. Join them explicitly.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::competition::Entity",
        from = "Column::CompetitionId",
        to = "super::competition::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Competition,
    #[sea_orm(
        belongs_to = "super::competition_stage::Entity",
        from = "Column::StageId",
        to = "super::competition_stage::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Stage,
    #[sea_orm(
        belongs_to = "super::competitor::Entity",
        from = "Column::Competitor1Id",
        to = "super::competitor::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Competitor1,
    #[sea_orm(
        belongs_to = "super::competitor::Entity",
        from = "Column::Competitor2Id",
        to = "super::competitor::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Competitor2,
    #[sea_orm(
        belongs_to = "super::competitor::Entity",
        from = "Column::WinnerId",
        to = "super::competitor::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Winner,
    #[sea_orm(has_many = "super::score::Entity")]
    Score,
}

impl Related<super::competition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Competition.def()
    }
}

impl Related<super::competition_stage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stage.def()
    }
}

impl Related<super::score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Score.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
