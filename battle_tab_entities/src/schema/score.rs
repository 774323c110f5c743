use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "score")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub battle_id: i32,
    pub judge_id: i32,
    pub competitor_id: i32,
    pub technique_score: Option<f64>,
    pub originality_score: Option<f64>,
    pub musicality_score: Option<f64>,
    pub execution_score: Option<f64>,
    pub comments: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::battle::Entity",
        from = "Column::BattleId",
        to = "super::battle::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Battle,
    #[sea_orm(
        belongs_to = "super::judge::Entity",
        from = "Column::JudgeId",
        to = "super::judge::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Judge,
    #[sea_orm(
        belongs_to = "super::competitor::Entity",
        from = "Column::CompetitorId",
        to = "super::competitor::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Competitor,
}

impl Related<super::battle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Battle.def()
    }
}

impl Related<super::judge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Judge.def()
    }
}

impl Related<super::competitor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Competitor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
