use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "competition")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<Date>,
    pub status: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::competition_stage::Entity")]
    CompetitionStage,
    #[sea_orm(has_many = "super::competitor::Entity")]
    Competitor,
    #[sea_orm(has_many = "super::judge::Entity")]
    Judge,
    #[sea_orm(has_many = "super::battle::Entity")]
    Battle,
}

impl Related<super::competition_stage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetitionStage.def()
    }
}

impl Related<super::competitor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Competitor.def()
    }
}

impl Related<super::judge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Judge.def()
    }
}

impl Related<super::battle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Battle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
