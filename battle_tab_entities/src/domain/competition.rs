use sea_orm::prelude::*;
use sea_orm::{ActiveValue, IntoActiveModel, PaginatorTrait, QueryOrder};
use serde::{Serialize, Deserialize};

use crate::error::{EntityError, found};
use crate::schema;

use super::competitor::Competitor;
use super::stage::CompetitionStage;
use super::{now, parse_column, require_non_empty};


string_enum!(CompetitionStatus {
    Draft => "draft",
    Registration => "registration",
    InProgress => "in_progress",
    Completed => "completed",
});

impl Default for CompetitionStatus {
    fn default() -> Self {
        CompetitionStatus::Draft
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<Date>,
    pub status: CompetitionStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionSummary {
    pub id: i32,
    pub name: String,
}

impl From<&schema::competition::Model> for CompetitionSummary {
    fn from(model: &schema::competition::Model) -> Self {
        CompetitionSummary { id: model.id, name: model.name.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompetition {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<Date>,
    pub status: Option<CompetitionStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<Date>,
    pub status: Option<CompetitionStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionDetails {
    #[serde(flatten)]
    pub competition: Competition,
    pub stages: Vec<CompetitionStage>,
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionStats {
    pub id: i32,
    pub name: String,
    pub status: CompetitionStatus,
    pub start_date: Date,
    pub end_date: Date,
    pub competitors_count: u64,
    pub battles_count: u64,
    pub judges_count: u64,
}

fn check_dates(start_date: Date, end_date: Date) -> Result<(), EntityError> {
    if end_date < start_date {
        return Err(EntityError::invalid("endDate must not be before startDate"));
    }
    Ok(())
}

fn check_max_participants(max_participants: Option<i32>) -> Result<(), EntityError> {
    match max_participants {
        Some(value) if value < 1 => Err(EntityError::invalid("maxParticipants must be at least 1")),
        _ => Ok(())
    }
}

impl Competition {
    pub fn from_model(model: schema::competition::Model) -> Result<Self, EntityError> {
        Ok(Competition {
            status: parse_column(&model.status, "competition.status")?,
            id: model.id,
            name: model.name,
            description: model.description,
            start_date: model.start_date,
            end_date: model.end_date,
            location: model.location,
            max_participants: model.max_participants,
            registration_deadline: model.registration_deadline,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    pub async fn try_get<C>(db: &C, id: i32) -> Result<Option<Self>, EntityError> where C: ConnectionTrait {
        schema::competition::Entity::find_by_id(id).one(db).await?.map(Self::from_model).transpose()
    }

    pub async fn get<C>(db: &C, id: i32) -> Result<Self, EntityError> where C: ConnectionTrait {
        found(Self::try_get(db, id).await?, "Competition", id)
    }

    pub(crate) async fn ensure_exists<C>(db: &C, id: i32) -> Result<schema::competition::Model, EntityError> where C: ConnectionTrait {
        found(schema::competition::Entity::find_by_id(id).one(db).await?, "Competition", id)
    }

    /// All competitions, latest start date first.
    pub async fn list<C>(db: &C) -> Result<Vec<Self>, EntityError> where C: ConnectionTrait {
        schema::competition::Entity::find()
            .order_by_desc(schema::competition::Column::StartDate)
            .order_by_asc(schema::competition::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Self::from_model)
            .collect()
    }

    pub async fn create<C>(db: &C, new: NewCompetition) -> Result<Self, EntityError> where C: ConnectionTrait {
        require_non_empty(&new.name, "name")?;
        check_dates(new.start_date, new.end_date)?;
        check_max_participants(new.max_participants)?;

        let now = now();
        let model = schema::competition::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(new.name),
            description: ActiveValue::Set(new.description),
            start_date: ActiveValue::Set(new.start_date),
            end_date: ActiveValue::Set(new.end_date),
            location: ActiveValue::Set(new.location),
            max_participants: ActiveValue::Set(new.max_participants),
            registration_deadline: ActiveValue::Set(new.registration_deadline),
            status: ActiveValue::Set(new.status.unwrap_or_default().as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }.insert(db).await?;

        tracing::info!("Created competition {} ({})", model.id, model.name);
        Self::from_model(model)
    }

    pub async fn update<C>(db: &C, id: i32, update: CompetitionUpdate) -> Result<Self, EntityError> where C: ConnectionTrait {
        let existing = Self::ensure_exists(db, id).await?;

        if let Some(name) = &update.name {
            require_non_empty(name, "name")?;
        }
        check_dates(
            update.start_date.unwrap_or(existing.start_date),
            update.end_date.unwrap_or(existing.end_date)
        )?;
        check_max_participants(update.max_participants)?;

        let mut model = existing.into_active_model();
        if let Some(name) = update.name {
            model.name = ActiveValue::Set(name);
        }
        if let Some(description) = update.description {
            model.description = ActiveValue::Set(Some(description));
        }
        if let Some(start_date) = update.start_date {
            model.start_date = ActiveValue::Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            model.end_date = ActiveValue::Set(end_date);
        }
        if let Some(location) = update.location {
            model.location = ActiveValue::Set(Some(location));
        }
        if let Some(max_participants) = update.max_participants {
            model.max_participants = ActiveValue::Set(Some(max_participants));
        }
        if let Some(registration_deadline) = update.registration_deadline {
            model.registration_deadline = ActiveValue::Set(Some(registration_deadline));
        }
        if let Some(status) = update.status {
            model.status = ActiveValue::Set(status.as_str().to_string());
        }
        model.updated_at = ActiveValue::Set(now());

        let model = model.update(db).await?;
        tracing::info!("Updated competition {}", id);
        Self::from_model(model)
    }

    /// Deletes the competition together with its stages, competitors, judges
    /// and battles.
    pub async fn delete<C>(db: &C, id: i32) -> Result<(), EntityError> where C: ConnectionTrait {
        let result = schema::competition::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(EntityError::not_found("Competition", id));
        }
        tracing::info!("Deleted competition {}", id);
        Ok(())
    }

    pub async fn details<C>(db: &C, id: i32) -> Result<CompetitionDetails, EntityError> where C: ConnectionTrait {
        let competition = Self::get(db, id).await?;
        let stages = CompetitionStage::list_for_competition(db, id).await?;
        let competitors = Competitor::list_for_competition(db, id).await?;

        Ok(CompetitionDetails {
            competition,
            stages,
            competitors,
        })
    }

    pub async fn stats<C>(db: &C, id: i32) -> Result<CompetitionStats, EntityError> where C: ConnectionTrait {
        let competition = Self::get(db, id).await?;

        let competitors_count = schema::competitor::Entity::find()
            .filter(schema::competitor::Column::CompetitionId.eq(id))
            .count(db)
            .await?;
        let battles_count = schema::battle::Entity::find()
            .filter(schema::battle::Column::CompetitionId.eq(id))
            .count(db)
            .await?;
        let judges_count = schema::judge::Entity::find()
            .filter(schema::judge::Column::CompetitionId.eq(id))
            .count(db)
            .await?;

        Ok(CompetitionStats {
            id: competition.id,
            name: competition.name,
            status: competition.status,
            start_date: competition.start_date,
            end_date: competition.end_date,
            competitors_count,
            battles_count,
            judges_count,
        })
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_end_date_before_start_is_rejected() {
        let start = Date::from_ymd_opt(2025, 6, 2).unwrap();
        let end = Date::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(check_dates(start, end).is_err());
        assert!(check_dates(end, start).is_ok());
        assert!(check_dates(start, start).is_ok());
    }

    #[test]
    fn test_max_participants_must_be_positive() {
        assert!(check_max_participants(Some(0)).is_err());
        assert!(check_max_participants(Some(1)).is_ok());
        assert!(check_max_participants(None).is_ok());
    }

    #[test]
    fn test_new_competition_reads_camel_case() {
        let new: NewCompetition = serde_json::from_value(serde_json::json!({
            "name": "Outbreak",
            "startDate": "2025-08-01",
            "endDate": "2025-08-03",
            "maxParticipants": 64,
            "registrationDeadline": "2025-07-15",
            "status": "registration"
        })).unwrap();

        assert_eq!(new.max_participants, Some(64));
        assert_eq!(new.status, Some(CompetitionStatus::Registration));
        assert_eq!(new.description, None);
    }
}
