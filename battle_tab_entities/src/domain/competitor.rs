use sea_orm::prelude::*;
use sea_orm::{ActiveValue, Condition, IntoActiveModel, PaginatorTrait, QueryOrder};
use serde::{Serialize, Deserialize};

use crate::error::{EntityError, found};
use crate::schema;

use super::battle::{Battle, BattleListing};
use super::competition::{Competition, CompetitionSummary};
use super::{now, parse_column, require_non_empty};


const DUPLICATE_REGISTRATION: &str = "Registration number already exists";

string_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

string_enum!(CompetitorStatus {
    Registered => "registered",
    Qualified => "qualified",
    Eliminated => "eliminated",
});

impl Default for CompetitorStatus {
    fn default() -> Self {
        CompetitorStatus::Registered
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub id: i32,
    pub competition_id: i32,
    pub registration_number: Option<String>,
    #[serde(rename = "bBoyName")]
    pub bboy_name: Option<String>,
    pub real_name: String,
    pub gender: Gender,
    pub birth_date: Option<Date>,
    pub nationality: Option<String>,
    pub team: Option<String>,
    pub photo_url: Option<String>,
    pub status: CompetitorStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// The fields needed to show a competitor next to a score or battle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorSummary {
    pub id: i32,
    #[serde(rename = "bBoyName")]
    pub bboy_name: Option<String>,
    pub real_name: String,
}

impl CompetitorSummary {
    /// The stage name if there is one, the real name otherwise.
    pub fn display_name(&self) -> &str {
        self.bboy_name.as_deref().unwrap_or(&self.real_name)
    }
}

impl From<&schema::competitor::Model> for CompetitorSummary {
    fn from(model: &schema::competitor::Model) -> Self {
        CompetitorSummary {
            id: model.id,
            bboy_name: model.bboy_name.clone(),
            real_name: model.real_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorWithCompetition {
    #[serde(flatten)]
    pub competitor: Competitor,
    pub competition: Option<CompetitionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompetitor {
    pub competition_id: i32,
    pub registration_number: Option<String>,
    #[serde(rename = "bBoyName")]
    pub bboy_name: Option<String>,
    pub real_name: String,
    pub gender: Gender,
    pub birth_date: Option<Date>,
    pub nationality: Option<String>,
    pub team: Option<String>,
    pub photo_url: Option<String>,
    pub status: Option<CompetitorStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorUpdate {
    pub competition_id: Option<i32>,
    pub registration_number: Option<String>,
    #[serde(rename = "bBoyName")]
    pub bboy_name: Option<String>,
    pub real_name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<Date>,
    pub nationality: Option<String>,
    pub team: Option<String>,
    pub photo_url: Option<String>,
    pub status: Option<CompetitorStatus>,
}

impl Competitor {
    pub fn from_model(model: schema::competitor::Model) -> Result<Self, EntityError> {
        Ok(Competitor {
            gender: parse_column(&model.gender, "competitor.gender")?,
            status: parse_column(&model.status, "competitor.status")?,
            id: model.id,
            competition_id: model.competition_id,
            registration_number: model.registration_number,
            bboy_name: model.bboy_name,
            real_name: model.real_name,
            birth_date: model.birth_date,
            nationality: model.nationality,
            team: model.team,
            photo_url: model.photo_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    pub fn summary(&self) -> CompetitorSummary {
        CompetitorSummary {
            id: self.id,
            bboy_name: self.bboy_name.clone(),
            real_name: self.real_name.clone(),
        }
    }

    pub async fn try_get<C>(db: &C, id: i32) -> Result<Option<Self>, EntityError> where C: ConnectionTrait {
        schema::competitor::Entity::find_by_id(id).one(db).await?.map(Self::from_model).transpose()
    }

    pub async fn get<C>(db: &C, id: i32) -> Result<Self, EntityError> where C: ConnectionTrait {
        found(Self::try_get(db, id).await?, "Competitor", id)
    }

    /// Competitors together with the competition they are registered in,
    /// optionally restricted to one competition.
    pub async fn list<C>(db: &C, competition_id: Option<i32>) -> Result<Vec<CompetitorWithCompetition>, EntityError> where C: ConnectionTrait {
        let mut query = schema::competitor::Entity::find();
        if let Some(competition_id) = competition_id {
            query = query.filter(schema::competitor::Column::CompetitionId.eq(competition_id));
        }
        query
            .find_also_related(schema::competition::Entity)
            .order_by_asc(schema::competitor::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|(competitor, competition)| {
                Ok(CompetitorWithCompetition {
                    competition: competition.as_ref().map(CompetitionSummary::from),
                    competitor: Self::from_model(competitor)?,
                })
            })
            .collect()
    }

    pub async fn list_for_competition<C>(db: &C, competition_id: i32) -> Result<Vec<Self>, EntityError> where C: ConnectionTrait {
        schema::competitor::Entity::find()
            .filter(schema::competitor::Column::CompetitionId.eq(competition_id))
            .order_by_asc(schema::competitor::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Self::from_model)
            .collect()
    }

    pub async fn create<C>(db: &C, new: NewCompetitor) -> Result<Self, EntityError> where C: ConnectionTrait {
        require_non_empty(&new.real_name, "realName")?;
        Competition::ensure_exists(db, new.competition_id).await?;

        let now = now();
        let model = schema::competitor::ActiveModel {
            id: ActiveValue::NotSet,
            competition_id: ActiveValue::Set(new.competition_id),
            registration_number: ActiveValue::Set(new.registration_number),
            bboy_name: ActiveValue::Set(new.bboy_name),
            real_name: ActiveValue::Set(new.real_name),
            gender: ActiveValue::Set(new.gender.as_str().to_string()),
            birth_date: ActiveValue::Set(new.birth_date),
            nationality: ActiveValue::Set(new.nationality),
            team: ActiveValue::Set(new.team),
            photo_url: ActiveValue::Set(new.photo_url),
            status: ActiveValue::Set(new.status.unwrap_or_default().as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| EntityError::from_db_with_conflict(e, DUPLICATE_REGISTRATION))?;

        tracing::info!("Registered competitor {} in competition {}", model.id, model.competition_id);
        Self::from_model(model)
    }

    pub async fn update<C>(db: &C, id: i32, update: CompetitorUpdate) -> Result<Self, EntityError> where C: ConnectionTrait {
        let existing = found(schema::competitor::Entity::find_by_id(id).one(db).await?, "Competitor", id)?;

        if let Some(real_name) = &update.real_name {
            require_non_empty(real_name, "realName")?;
        }
        if let Some(competition_id) = update.competition_id {
            Competition::ensure_exists(db, competition_id).await?;
            if competition_id != existing.competition_id {
                let drawn = schema::battle::Entity::find()
                    .filter(Self::slot_condition(id))
                    .count(db)
                    .await?;
                if drawn > 0 {
                    return Err(EntityError::invalid(format!(
                        "Competitor {} is drawn into {} battle(s) and can not change competition", id, drawn
                    )));
                }
            }
        }

        let mut model = existing.into_active_model();
        if let Some(competition_id) = update.competition_id {
            model.competition_id = ActiveValue::Set(competition_id);
        }
        if let Some(registration_number) = update.registration_number {
            model.registration_number = ActiveValue::Set(Some(registration_number));
        }
        if let Some(bboy_name) = update.bboy_name {
            model.bboy_name = ActiveValue::Set(Some(bboy_name));
        }
        if let Some(real_name) = update.real_name {
            model.real_name = ActiveValue::Set(real_name);
        }
        if let Some(gender) = update.gender {
            model.gender = ActiveValue::Set(gender.as_str().to_string());
        }
        if let Some(birth_date) = update.birth_date {
            model.birth_date = ActiveValue::Set(Some(birth_date));
        }
        if let Some(nationality) = update.nationality {
            model.nationality = ActiveValue::Set(Some(nationality));
        }
        if let Some(team) = update.team {
            model.team = ActiveValue::Set(Some(team));
        }
        if let Some(photo_url) = update.photo_url {
            model.photo_url = ActiveValue::Set(Some(photo_url));
        }
        if let Some(status) = update.status {
            model.status = ActiveValue::Set(status.as_str().to_string());
        }
        model.updated_at = ActiveValue::Set(now());

        let model = model.update(db)
            .await
            .map_err(|e| EntityError::from_db_with_conflict(e, DUPLICATE_REGISTRATION))?;
        tracing::info!("Updated competitor {}", id);
        Self::from_model(model)
    }

    /// Deletes the competitor with their scores. Battle slots that referenced
    /// them are cleared.
    pub async fn delete<C>(db: &C, id: i32) -> Result<(), EntityError> where C: ConnectionTrait {
        let result = schema::competitor::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(EntityError::not_found("Competitor", id));
        }
        tracing::info!("Deleted competitor {}", id);
        Ok(())
    }

    pub async fn competition<C>(db: &C, id: i32) -> Result<Competition, EntityError> where C: ConnectionTrait {
        let competitor = Self::get(db, id).await?;
        Competition::get(db, competitor.competition_id).await
    }

    fn slot_condition(id: i32) -> Condition {
        Condition::any()
            .add(schema::battle::Column::Competitor1Id.eq(id))
            .add(schema::battle::Column::Competitor2Id.eq(id))
            .add(schema::battle::Column::WinnerId.eq(id))
    }

    /// Battles the competitor is drawn into, most recently created first.
    pub async fn battles<C>(db: &C, id: i32) -> Result<Vec<BattleListing>, EntityError> where C: ConnectionTrait {
        Self::get(db, id).await?;

        let battles = schema::battle::Entity::find()
            .filter(Self::slot_condition(id))
            .order_by_desc(schema::battle::Column::CreatedAt)
            .order_by_desc(schema::battle::Column::Id)
            .all(db)
            .await?;

        Battle::listings(db, battles).await
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_name_prefers_stage_name() {
        let mut summary = CompetitorSummary {
            id: 1,
            bboy_name: Some("Lil Zoo".into()),
            real_name: "Zoubair Ait".into(),
        };
        assert_eq!(summary.display_name(), "Lil Zoo");

        summary.bboy_name = None;
        assert_eq!(summary.display_name(), "Zoubair Ait");
    }

    #[test]
    fn test_summary_uses_legacy_stage_name_key() {
        let summary = CompetitorSummary {
            id: 3,
            bboy_name: Some("Phil Wizard".into()),
            real_name: "Philip Kim".into(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["bBoyName"], "Phil Wizard");
        assert_eq!(value["realName"], "Philip Kim");
    }

    #[test]
    fn test_new_competitor_requires_known_gender() {
        let result = serde_json::from_value::<NewCompetitor>(serde_json::json!({
            "competitionId": 1,
            "realName": "Ami Yuasa",
            "gender": "unknown"
        }));
        assert!(result.is_err());
    }
}
