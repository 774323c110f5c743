use sea_orm::prelude::*;
use sea_orm::{ActiveValue, QueryOrder};
use serde::{Serialize, Deserialize};

use crate::error::{EntityError, found};
use crate::schema;

use super::competition::Competition;
use super::{now, require_non_empty};


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judge {
    pub id: i32,
    pub competition_id: i32,
    pub name: String,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JudgeSummary {
    pub id: i32,
    pub name: String,
}

impl From<&schema::judge::Model> for JudgeSummary {
    fn from(model: &schema::judge::Model) -> Self {
        JudgeSummary { id: model.id, name: model.name.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJudge {
    pub competition_id: i32,
    pub name: String,
}

impl From<schema::judge::Model> for Judge {
    fn from(model: schema::judge::Model) -> Self {
        Judge {
            id: model.id,
            competition_id: model.competition_id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

impl Judge {
    pub async fn try_get<C>(db: &C, id: i32) -> Result<Option<Self>, EntityError> where C: ConnectionTrait {
        Ok(schema::judge::Entity::find_by_id(id).one(db).await?.map(Judge::from))
    }

    pub async fn get<C>(db: &C, id: i32) -> Result<Self, EntityError> where C: ConnectionTrait {
        found(Self::try_get(db, id).await?, "Judge", id)
    }

    pub async fn list_for_competition<C>(db: &C, competition_id: i32) -> Result<Vec<Self>, EntityError> where C: ConnectionTrait {
        Competition::ensure_exists(db, competition_id).await?;
        let rows = schema::judge::Entity::find()
            .filter(schema::judge::Column::CompetitionId.eq(competition_id))
            .order_by_asc(schema::judge::Column::Id)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(Judge::from).collect())
    }

    pub async fn create<C>(db: &C, new: NewJudge) -> Result<Self, EntityError> where C: ConnectionTrait {
        require_non_empty(&new.name, "name")?;
        Competition::ensure_exists(db, new.competition_id).await?;

        let model = schema::judge::ActiveModel {
            id: ActiveValue::NotSet,
            competition_id: ActiveValue::Set(new.competition_id),
            name: ActiveValue::Set(new.name),
            created_at: ActiveValue::Set(now()),
        }.insert(db).await?;

        tracing::info!("Added judge {} to competition {}", model.id, model.competition_id);
        Ok(model.into())
    }

    /// Deletes the judge together with every score they submitted.
    pub async fn delete<C>(db: &C, id: i32) -> Result<(), EntityError> where C: ConnectionTrait {
        let result = schema::judge::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(EntityError::not_found("Judge", id));
        }
        tracing::info!("Deleted judge {}", id);
        Ok(())
    }
}
