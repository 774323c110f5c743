use sea_orm::prelude::*;
use sea_orm::{ActiveValue, IntoActiveModel, QueryOrder, TransactionTrait};
use serde::{Serialize, Deserialize};

use itertools::Itertools;

use crate::error::{EntityError, found};
use crate::schema;
use crate::scoring::{aggregate_battle_scores, CompetitorScoreResult};
use crate::utilities::BatchLoad;

use super::competition::{Competition, CompetitionSummary};
use super::competitor::{Competitor, CompetitorSummary};
use super::score::{Score, ScoreWithDisplay};
use super::stage::{CompetitionStage, StageSummary};
use super::{now, parse_column};


string_enum!(BattleStatus {
    Scheduled => "scheduled",
    InProgress => "in_progress",
    Completed => "completed",
});

impl Default for BattleStatus {
    fn default() -> Self {
        BattleStatus::Scheduled
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battle {
    pub id: i32,
    pub competition_id: i32,
    pub stage_id: i32,
    pub competitor1_id: Option<i32>,
    pub competitor2_id: Option<i32>,
    pub winner_id: Option<i32>,
    pub battle_order: i32,
    pub status: BattleStatus,
    pub start_time: Option<DateTime>,
    pub end_time: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBattle {
    pub competition_id: i32,
    pub stage_id: i32,
    pub competitor1_id: Option<i32>,
    pub competitor2_id: Option<i32>,
    pub battle_order: i32,
    pub winner_id: Option<i32>,
    pub status: Option<BattleStatus>,
    pub start_time: Option<DateTime>,
    pub end_time: Option<DateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleUpdate {
    pub competition_id: Option<i32>,
    pub stage_id: Option<i32>,
    pub competitor1_id: Option<i32>,
    pub competitor2_id: Option<i32>,
    pub battle_order: Option<i32>,
    pub winner_id: Option<i32>,
    pub status: Option<BattleStatus>,
    pub start_time: Option<DateTime>,
    pub end_time: Option<DateTime>,
}

/// A battle with display information for everything it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleListing {
    #[serde(flatten)]
    pub battle: Battle,
    pub competition: Option<CompetitionSummary>,
    pub stage: Option<StageSummary>,
    pub competitor1: Option<CompetitorSummary>,
    pub competitor2: Option<CompetitorSummary>,
    pub winner: Option<CompetitorSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleDetail {
    #[serde(flatten)]
    pub battle: Battle,
    pub competition: Competition,
    pub stage: CompetitionStage,
    pub competitor1: Option<Competitor>,
    pub competitor2: Option<Competitor>,
    pub winner: Option<Competitor>,
    pub scores: Vec<ScoreWithDisplay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResults {
    pub battle: Battle,
    pub scores: Vec<CompetitorScoreResult>,
}

/// The references of a battle that have to agree with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lineup {
    competition_id: i32,
    stage_id: i32,
    competitor1_id: Option<i32>,
    competitor2_id: Option<i32>,
    winner_id: Option<i32>,
}

impl Lineup {
    fn check_slots(&self) -> Result<(), EntityError> {
        if let (Some(c1), Some(c2)) = (self.competitor1_id, self.competitor2_id) {
            if c1 == c2 {
                return Err(EntityError::invalid("A competitor can not battle themselves"));
            }
        }

        if let Some(winner_id) = self.winner_id {
            if self.competitor1_id != Some(winner_id) && self.competitor2_id != Some(winner_id) {
                return Err(EntityError::invalid(format!("Winner {} is not a competitor of this battle", winner_id)));
            }
        }

        Ok(())
    }

    async fn validate<C>(&self, db: &C) -> Result<(), EntityError> where C: ConnectionTrait {
        for competitor_id in [self.competitor1_id, self.competitor2_id].into_iter().flatten() {
            let competitor = found(
                schema::competitor::Entity::find_by_id(competitor_id).one(db).await?,
                "Competitor",
                competitor_id
            )?;
            if competitor.competition_id != self.competition_id {
                return Err(EntityError::invalid(format!("Competitor {} is not registered in competition {}", competitor_id, self.competition_id)));
            }
        }

        let stage = found(
            schema::competition_stage::Entity::find_by_id(self.stage_id).one(db).await?,
            "Stage",
            self.stage_id
        )?;
        if stage.competition_id != self.competition_id {
            return Err(EntityError::invalid(format!("Stage {} does not belong to competition {}", self.stage_id, self.competition_id)));
        }

        self.check_slots()
    }
}

async fn load_slot<C>(db: &C, competitor_id: Option<i32>) -> Result<Option<Competitor>, EntityError> where C: ConnectionTrait {
    match competitor_id {
        Some(competitor_id) => Competitor::try_get(db, competitor_id).await,
        None => Ok(None)
    }
}

/// An explicitly requested status always wins. Otherwise naming a winner
/// completes the battle.
pub fn resolve_status(requested: Option<BattleStatus>, winner_given: bool, current: BattleStatus) -> BattleStatus {
    match requested {
        Some(status) => status,
        None if winner_given => BattleStatus::Completed,
        None => current
    }
}

impl Battle {
    pub fn from_model(model: schema::battle::Model) -> Result<Self, EntityError> {
        Ok(Battle {
            status: parse_column(&model.status, "battle.status")?,
            id: model.id,
            competition_id: model.competition_id,
            stage_id: model.stage_id,
            competitor1_id: model.competitor1_id,
            competitor2_id: model.competitor2_id,
            winner_id: model.winner_id,
            battle_order: model.battle_order,
            start_time: model.start_time,
            end_time: model.end_time,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    /// Whether the competitor occupies one of the two slots.
    pub fn has_competitor(&self, competitor_id: i32) -> bool {
        self.competitor1_id == Some(competitor_id) || self.competitor2_id == Some(competitor_id)
    }

    pub async fn try_get<C>(db: &C, id: i32) -> Result<Option<Self>, EntityError> where C: ConnectionTrait {
        schema::battle::Entity::find_by_id(id).one(db).await?.map(Self::from_model).transpose()
    }

    pub async fn get<C>(db: &C, id: i32) -> Result<Self, EntityError> where C: ConnectionTrait {
        found(Self::try_get(db, id).await?, "Battle", id)
    }

    pub async fn create<C>(db: &C, new: NewBattle) -> Result<Self, EntityError> where C: ConnectionTrait + TransactionTrait {
        let lineup = Lineup {
            competition_id: new.competition_id,
            stage_id: new.stage_id,
            competitor1_id: new.competitor1_id,
            competitor2_id: new.competitor2_id,
            winner_id: new.winner_id,
        };
        let status = resolve_status(new.status, new.winner_id.is_some(), BattleStatus::default());

        let txn = db.begin().await?;
        lineup.validate(&txn).await?;

        let now = now();
        let model = schema::battle::ActiveModel {
            id: ActiveValue::NotSet,
            competition_id: ActiveValue::Set(new.competition_id),
            stage_id: ActiveValue::Set(new.stage_id),
            competitor1_id: ActiveValue::Set(new.competitor1_id),
            competitor2_id: ActiveValue::Set(new.competitor2_id),
            winner_id: ActiveValue::Set(new.winner_id),
            battle_order: ActiveValue::Set(new.battle_order),
            status: ActiveValue::Set(status.as_str().to_string()),
            start_time: ActiveValue::Set(new.start_time),
            end_time: ActiveValue::Set(new.end_time),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!("Created battle {} in stage {} with status {}", model.id, model.stage_id, status);
        Self::from_model(model)
    }

    pub async fn update<C>(db: &C, id: i32, update: BattleUpdate) -> Result<Self, EntityError> where C: ConnectionTrait + TransactionTrait {
        let txn = db.begin().await?;
        let existing = found(schema::battle::Entity::find_by_id(id).one(&txn).await?, "Battle", id)?;

        let lineup = Lineup {
            competition_id: update.competition_id.unwrap_or(existing.competition_id),
            stage_id: update.stage_id.unwrap_or(existing.stage_id),
            competitor1_id: update.competitor1_id.or(existing.competitor1_id),
            competitor2_id: update.competitor2_id.or(existing.competitor2_id),
            winner_id: update.winner_id.or(existing.winner_id),
        };
        lineup.validate(&txn).await?;

        let current_status = parse_column(&existing.status, "battle.status")?;
        let status = resolve_status(update.status, update.winner_id.is_some(), current_status);

        let mut model = existing.into_active_model();
        model.competition_id = ActiveValue::Set(lineup.competition_id);
        model.stage_id = ActiveValue::Set(lineup.stage_id);
        model.competitor1_id = ActiveValue::Set(lineup.competitor1_id);
        model.competitor2_id = ActiveValue::Set(lineup.competitor2_id);
        model.winner_id = ActiveValue::Set(lineup.winner_id);
        model.status = ActiveValue::Set(status.as_str().to_string());
        if let Some(battle_order) = update.battle_order {
            model.battle_order = ActiveValue::Set(battle_order);
        }
        if let Some(start_time) = update.start_time {
            model.start_time = ActiveValue::Set(Some(start_time));
        }
        if let Some(end_time) = update.end_time {
            model.end_time = ActiveValue::Set(Some(end_time));
        }
        model.updated_at = ActiveValue::Set(now());

        let model = model.update(&txn).await?;
        txn.commit().await?;

        tracing::info!("Updated battle {} (status {})", id, status);
        Self::from_model(model)
    }

    /// Deletes the battle and its scores.
    pub async fn delete<C>(db: &C, id: i32) -> Result<(), EntityError> where C: ConnectionTrait {
        let result = schema::battle::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(EntityError::not_found("Battle", id));
        }
        tracing::info!("Deleted battle {}", id);
        Ok(())
    }

    pub async fn list<C>(db: &C) -> Result<Vec<BattleListing>, EntityError> where C: ConnectionTrait {
        let battles = schema::battle::Entity::find()
            .order_by_asc(schema::battle::Column::CompetitionId)
            .order_by_asc(schema::battle::Column::StageId)
            .order_by_asc(schema::battle::Column::BattleOrder)
            .all(db)
            .await?;
        Self::listings(db, battles).await
    }

    pub async fn list_for_competition<C>(db: &C, competition_id: i32) -> Result<Vec<BattleListing>, EntityError> where C: ConnectionTrait {
        Competition::ensure_exists(db, competition_id).await?;
        let battles = schema::battle::Entity::find()
            .filter(schema::battle::Column::CompetitionId.eq(competition_id))
            .order_by_asc(schema::battle::Column::StageId)
            .order_by_asc(schema::battle::Column::BattleOrder)
            .all(db)
            .await?;
        Self::listings(db, battles).await
    }

    pub async fn list_for_stage<C>(db: &C, stage_id: i32) -> Result<Vec<BattleListing>, EntityError> where C: ConnectionTrait {
        found(schema::competition_stage::Entity::find_by_id(stage_id).one(db).await?, "Stage", stage_id)?;
        let battles = schema::battle::Entity::find()
            .filter(schema::battle::Column::StageId.eq(stage_id))
            .order_by_asc(schema::battle::Column::BattleOrder)
            .all(db)
            .await?;
        Self::listings(db, battles).await
    }

    /// Attaches display summaries to the battles, keeping their order.
    pub(crate) async fn listings<C>(db: &C, battles: Vec<schema::battle::Model>) -> Result<Vec<BattleListing>, EntityError> where C: ConnectionTrait {
        let competitor_ids = battles.iter()
            .flat_map(|b| [b.competitor1_id, b.competitor2_id, b.winner_id])
            .flatten()
            .collect_vec();
        let competitors = schema::competitor::Entity::batch_load_map(db, competitor_ids).await?;
        let stages = schema::competition_stage::Entity::batch_load_map(db, battles.iter().map(|b| b.stage_id).collect()).await?;
        let competitions = schema::competition::Entity::batch_load_map(db, battles.iter().map(|b| b.competition_id).collect()).await?;

        let summary = |id: Option<i32>| id.and_then(|id| competitors.get(&id)).map(CompetitorSummary::from);

        battles.into_iter().map(|model| {
            Ok(BattleListing {
                competition: competitions.get(&model.competition_id).map(CompetitionSummary::from),
                stage: stages.get(&model.stage_id).map(StageSummary::from),
                competitor1: summary(model.competitor1_id),
                competitor2: summary(model.competitor2_id),
                winner: summary(model.winner_id),
                battle: Self::from_model(model)?,
            })
        }).collect()
    }

    pub async fn detail<C>(db: &C, id: i32) -> Result<BattleDetail, EntityError> where C: ConnectionTrait {
        let battle = Self::get(db, id).await?;
        let competition = Competition::get(db, battle.competition_id).await?;
        let stage = found(CompetitionStage::try_get(db, battle.stage_id).await?, "Stage", battle.stage_id)?;

        let competitor1 = load_slot(db, battle.competitor1_id).await?;
        let competitor2 = load_slot(db, battle.competitor2_id).await?;
        let winner = load_slot(db, battle.winner_id).await?;
        let scores = Score::list_for_battle_with_display(db, id).await?;

        Ok(BattleDetail {
            battle,
            competition,
            stage,
            competitor1,
            competitor2,
            winner,
            scores,
        })
    }

    /// The battle together with the aggregated scores of each competitor,
    /// in the order in which competitors were first scored.
    pub async fn results<C>(db: &C, id: i32) -> Result<BattleResults, EntityError> where C: ConnectionTrait {
        let battle = Self::get(db, id).await?;
        let rows = Score::list_for_battle_with_display(db, id).await?;
        let aggregation = aggregate_battle_scores(rows.into_iter().map(ScoreWithDisplay::into_row));

        Ok(BattleResults {
            battle,
            scores: aggregation.into_results(),
        })
    }
}
