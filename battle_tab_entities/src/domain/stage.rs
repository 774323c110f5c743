use sea_orm::prelude::*;
use sea_orm::{ActiveValue, IntoActiveModel, QueryOrder};
use serde::{Serialize, Deserialize};

use crate::error::{EntityError, found};
use crate::schema;

use super::competition::Competition;
use super::{now, parse_column, require_non_empty};


string_enum!(StageType {
    Qualification => "qualification",
    Top16 => "top_16",
    Top8 => "top_8",
    Top4 => "top_4",
    Final => "final",
});

string_enum!(StageStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
});

impl Default for StageStatus {
    fn default() -> Self {
        StageStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionStage {
    pub id: i32,
    pub competition_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub stage_type: StageType,
    pub stage_order: i32,
    pub start_time: Option<DateTime>,
    pub end_time: Option<DateTime>,
    pub status: StageStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub id: i32,
    pub name: String,
    pub stage_type: String,
}

impl From<&schema::competition_stage::Model> for StageSummary {
    fn from(model: &schema::competition_stage::Model) -> Self {
        StageSummary {
            id: model.id,
            name: model.name.clone(),
            stage_type: model.stage_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStage {
    pub name: String,
    pub description: Option<String>,
    #[serde(alias = "type")]
    pub stage_type: StageType,
    #[serde(alias = "startDate")]
    pub start_time: Option<DateTime>,
    #[serde(alias = "endDate")]
    pub end_time: Option<DateTime>,
    pub status: Option<StageStatus>,
    pub stage_order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "type")]
    pub stage_type: Option<StageType>,
    #[serde(alias = "startDate")]
    pub start_time: Option<DateTime>,
    #[serde(alias = "endDate")]
    pub end_time: Option<DateTime>,
    pub status: Option<StageStatus>,
    pub stage_order: Option<i32>,
}

fn check_stage_order(stage_order: Option<i32>) -> Result<(), EntityError> {
    match stage_order {
        Some(order) if order < 0 => Err(EntityError::invalid("stageOrder must not be negative")),
        _ => Ok(())
    }
}

impl CompetitionStage {
    pub fn from_model(model: schema::competition_stage::Model) -> Result<Self, EntityError> {
        Ok(CompetitionStage {
            stage_type: parse_column(&model.stage_type, "competition_stage.stage_type")?,
            status: parse_column(&model.status, "competition_stage.status")?,
            id: model.id,
            competition_id: model.competition_id,
            name: model.name,
            description: model.description,
            stage_order: model.stage_order,
            start_time: model.start_time,
            end_time: model.end_time,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    pub async fn try_get<C>(db: &C, id: i32) -> Result<Option<Self>, EntityError> where C: ConnectionTrait {
        schema::competition_stage::Entity::find_by_id(id).one(db).await?.map(Self::from_model).transpose()
    }

    /// Stages of a competition in stage order.
    pub async fn list_for_competition<C>(db: &C, competition_id: i32) -> Result<Vec<Self>, EntityError> where C: ConnectionTrait {
        schema::competition_stage::Entity::find()
            .filter(schema::competition_stage::Column::CompetitionId.eq(competition_id))
            .order_by_asc(schema::competition_stage::Column::StageOrder)
            .order_by_asc(schema::competition_stage::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Self::from_model)
            .collect()
    }

    async fn get_in_competition<C>(db: &C, competition_id: i32, stage_id: i32) -> Result<schema::competition_stage::Model, EntityError> where C: ConnectionTrait {
        let stage = schema::competition_stage::Entity::find_by_id(stage_id)
            .filter(schema::competition_stage::Column::CompetitionId.eq(competition_id))
            .one(db)
            .await?;
        found(stage, "Stage", stage_id)
    }

    pub async fn create<C>(db: &C, competition_id: i32, new: NewStage) -> Result<Self, EntityError> where C: ConnectionTrait {
        require_non_empty(&new.name, "name")?;
        check_stage_order(new.stage_order)?;
        Competition::ensure_exists(db, competition_id).await?;

        let now = now();
        let model = schema::competition_stage::ActiveModel {
            id: ActiveValue::NotSet,
            competition_id: ActiveValue::Set(competition_id),
            name: ActiveValue::Set(new.name),
            description: ActiveValue::Set(new.description),
            stage_type: ActiveValue::Set(new.stage_type.as_str().to_string()),
            stage_order: ActiveValue::Set(new.stage_order.unwrap_or(0)),
            start_time: ActiveValue::Set(new.start_time),
            end_time: ActiveValue::Set(new.end_time),
            status: ActiveValue::Set(new.status.unwrap_or_default().as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }.insert(db).await?;

        tracing::info!("Created stage {} in competition {}", model.id, competition_id);
        Self::from_model(model)
    }

    pub async fn update<C>(db: &C, competition_id: i32, stage_id: i32, update: StageUpdate) -> Result<Self, EntityError> where C: ConnectionTrait {
        if let Some(name) = &update.name {
            require_non_empty(name, "name")?;
        }
        check_stage_order(update.stage_order)?;

        let mut model = Self::get_in_competition(db, competition_id, stage_id).await?.into_active_model();
        if let Some(name) = update.name {
            model.name = ActiveValue::Set(name);
        }
        if let Some(description) = update.description {
            model.description = ActiveValue::Set(Some(description));
        }
        if let Some(stage_type) = update.stage_type {
            model.stage_type = ActiveValue::Set(stage_type.as_str().to_string());
        }
        if let Some(start_time) = update.start_time {
            model.start_time = ActiveValue::Set(Some(start_time));
        }
        if let Some(end_time) = update.end_time {
            model.end_time = ActiveValue::Set(Some(end_time));
        }
        if let Some(status) = update.status {
            model.status = ActiveValue::Set(status.as_str().to_string());
        }
        if let Some(stage_order) = update.stage_order {
            model.stage_order = ActiveValue::Set(stage_order);
        }
        model.updated_at = ActiveValue::Set(now());

        let model = model.update(db).await?;
        tracing::info!("Updated stage {} of competition {}", stage_id, competition_id);
        Self::from_model(model)
    }

    /// Deletes the stage and every battle scheduled in it.
    pub async fn delete<C>(db: &C, competition_id: i32, stage_id: i32) -> Result<(), EntityError> where C: ConnectionTrait {
        let stage = Self::get_in_competition(db, competition_id, stage_id).await?;
        schema::competition_stage::Entity::delete_by_id(stage.id).exec(db).await?;
        tracing::info!("Deleted stage {} of competition {}", stage_id, competition_id);
        Ok(())
    }
}
