use sea_orm::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, IntoActiveModel, QueryOrder, TransactionTrait};
use serde::{Serialize, Deserialize};

use itertools::Itertools;

use crate::error::{EntityError, found};
use crate::schema;
use crate::scoring::{competitor_total, BattleScoreRow, CompetitorTotal, CriteriaScores};
use crate::utilities::BatchLoad;

use super::battle::Battle;
use super::competitor::{Competitor, CompetitorSummary};
use super::judge::{Judge, JudgeSummary};
use super::now;


pub const MIN_CRITERION_SCORE: f64 = 1.0;
pub const MAX_CRITERION_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
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

impl From<schema::score::Model> for Score {
    fn from(model: schema::score::Model) -> Self {
        Score {
            id: model.id,
            battle_id: model.battle_id,
            judge_id: model.judge_id,
            competitor_id: model.competitor_id,
            technique_score: model.technique_score,
            originality_score: model.originality_score,
            musicality_score: model.musicality_score,
            execution_score: model.execution_score,
            comments: model.comments,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A full set of scores from one judge for one competitor in a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub battle_id: i32,
    pub judge_id: i32,
    pub competitor_id: i32,
    pub technique_score: f64,
    pub originality_score: f64,
    pub musicality_score: f64,
    pub execution_score: f64,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub technique_score: Option<f64>,
    pub originality_score: Option<f64>,
    pub musicality_score: Option<f64>,
    pub execution_score: Option<f64>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWithDisplay {
    #[serde(flatten)]
    pub score: Score,
    pub judge: JudgeSummary,
    pub competitor: CompetitorSummary,
}

impl Score {
    pub fn criteria(&self) -> CriteriaScores {
        CriteriaScores {
            technique_score: self.technique_score,
            originality_score: self.originality_score,
            musicality_score: self.musicality_score,
            execution_score: self.execution_score,
        }
    }
}

impl ScoreWithDisplay {
    pub fn into_row(self) -> BattleScoreRow {
        BattleScoreRow {
            scores: self.score.criteria(),
            judge: self.judge,
            competitor: self.competitor,
            comments: self.score.comments,
        }
    }
}

fn check_criterion(field: &str, value: f64) -> Result<(), EntityError> {
    // NaN fails the range check as well
    if !(MIN_CRITERION_SCORE..=MAX_CRITERION_SCORE).contains(&value) {
        return Err(EntityError::invalid(format!("{} must be between {} and {}", field, MIN_CRITERION_SCORE, MAX_CRITERION_SCORE)));
    }
    Ok(())
}

impl ScoreSubmission {
    pub fn check_ranges(&self) -> Result<(), EntityError> {
        check_criterion("techniqueScore", self.technique_score)?;
        check_criterion("originalityScore", self.originality_score)?;
        check_criterion("musicalityScore", self.musicality_score)?;
        check_criterion("executionScore", self.execution_score)?;
        Ok(())
    }
}

impl ScoreUpdate {
    pub fn check_ranges(&self) -> Result<(), EntityError> {
        let fields = [
            ("techniqueScore", self.technique_score),
            ("originalityScore", self.originality_score),
            ("musicalityScore", self.musicality_score),
            ("executionScore", self.execution_score),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                check_criterion(field, value)?;
            }
        }
        Ok(())
    }
}

impl Score {
    pub async fn try_get<C>(db: &C, id: i32) -> Result<Option<Self>, EntityError> where C: ConnectionTrait {
        Ok(schema::score::Entity::find_by_id(id).one(db).await?.map(Score::from))
    }

    async fn find_model_for_triple<C>(db: &C, battle_id: i32, judge_id: i32, competitor_id: i32) -> Result<Option<schema::score::Model>, DbErr> where C: ConnectionTrait {
        schema::score::Entity::find()
            .filter(schema::score::Column::BattleId.eq(battle_id))
            .filter(schema::score::Column::JudgeId.eq(judge_id))
            .filter(schema::score::Column::CompetitorId.eq(competitor_id))
            .one(db)
            .await
    }

    pub async fn find_for_triple<C>(db: &C, battle_id: i32, judge_id: i32, competitor_id: i32) -> Result<Option<Self>, EntityError> where C: ConnectionTrait {
        Ok(Self::find_model_for_triple(db, battle_id, judge_id, competitor_id).await?.map(Score::from))
    }

    /// Records the scores of a judge for a competitor in a battle. A second
    /// submission for the same battle, judge and competitor replaces the
    /// scores of the first one, and its comments if it carries any.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// score ranges, battle, judge, competitor, then whether the competitor
    /// takes part in the battle.
    pub async fn upsert<C>(db: &C, submission: ScoreSubmission) -> Result<Self, EntityError> where C: ConnectionTrait + TransactionTrait {
        submission.check_ranges()?;

        let txn = db.begin().await?;

        let battle = found(Battle::try_get(&txn, submission.battle_id).await?, "Battle", submission.battle_id)?;
        found(Judge::try_get(&txn, submission.judge_id).await?, "Judge", submission.judge_id)?;
        found(Competitor::try_get(&txn, submission.competitor_id).await?, "Competitor", submission.competitor_id)?;
        if !battle.has_competitor(submission.competitor_id) {
            return Err(EntityError::invalid(format!("Competitor {} is not part of battle {}", submission.competitor_id, battle.id)));
        }

        // A resubmission without comments keeps the stored ones
        let mut update_columns = vec![
            schema::score::Column::TechniqueScore,
            schema::score::Column::OriginalityScore,
            schema::score::Column::MusicalityScore,
            schema::score::Column::ExecutionScore,
            schema::score::Column::UpdatedAt,
        ];
        if submission.comments.is_some() {
            update_columns.push(schema::score::Column::Comments);
        }

        let now = now();
        let model = schema::score::ActiveModel {
            id: ActiveValue::NotSet,
            battle_id: ActiveValue::Set(submission.battle_id),
            judge_id: ActiveValue::Set(submission.judge_id),
            competitor_id: ActiveValue::Set(submission.competitor_id),
            technique_score: ActiveValue::Set(Some(submission.technique_score)),
            originality_score: ActiveValue::Set(Some(submission.originality_score)),
            musicality_score: ActiveValue::Set(Some(submission.musicality_score)),
            execution_score: ActiveValue::Set(Some(submission.execution_score)),
            comments: ActiveValue::Set(submission.comments),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        schema::score::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    schema::score::Column::BattleId,
                    schema::score::Column::JudgeId,
                    schema::score::Column::CompetitorId,
                ])
                .update_columns(update_columns)
                .to_owned()
            )
            .exec_without_returning(&txn)
            .await?;

        let stored = Self::find_model_for_triple(&txn, submission.battle_id, submission.judge_id, submission.competitor_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Score vanished after upsert".into()))?;
        txn.commit().await?;

        tracing::info!(
            "Judge {} scored competitor {} in battle {} (score {})",
            stored.judge_id,
            stored.competitor_id,
            stored.battle_id,
            stored.id
        );
        Ok(stored.into())
    }

    pub async fn update<C>(db: &C, id: i32, update: ScoreUpdate) -> Result<Self, EntityError> where C: ConnectionTrait {
        update.check_ranges()?;

        let existing = found(schema::score::Entity::find_by_id(id).one(db).await?, "Score", id)?;
        let mut model = existing.into_active_model();
        if let Some(value) = update.technique_score {
            model.technique_score = ActiveValue::Set(Some(value));
        }
        if let Some(value) = update.originality_score {
            model.originality_score = ActiveValue::Set(Some(value));
        }
        if let Some(value) = update.musicality_score {
            model.musicality_score = ActiveValue::Set(Some(value));
        }
        if let Some(value) = update.execution_score {
            model.execution_score = ActiveValue::Set(Some(value));
        }
        if let Some(comments) = update.comments {
            model.comments = ActiveValue::Set(Some(comments));
        }
        model.updated_at = ActiveValue::Set(now());

        let model = model.update(db).await?;
        tracing::info!("Updated score {}", id);
        Ok(model.into())
    }

    pub async fn delete<C>(db: &C, id: i32) -> Result<(), EntityError> where C: ConnectionTrait {
        let result = schema::score::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(EntityError::not_found("Score", id));
        }
        tracing::info!("Deleted score {}", id);
        Ok(())
    }

    async fn with_display<C>(db: &C, rows: Vec<schema::score::Model>) -> Result<Vec<ScoreWithDisplay>, EntityError> where C: ConnectionTrait {
        let judges = schema::judge::Entity::batch_load_map(db, rows.iter().map(|r| r.judge_id).collect_vec()).await?;
        let competitors = schema::competitor::Entity::batch_load_map(db, rows.iter().map(|r| r.competitor_id).collect_vec()).await?;

        rows.into_iter().map(|row| {
            let judge = judges.get(&row.judge_id).map(JudgeSummary::from).ok_or_else(|| EntityError::not_found("Judge", row.judge_id))?;
            let competitor = competitors.get(&row.competitor_id).map(CompetitorSummary::from).ok_or_else(|| EntityError::not_found("Competitor", row.competitor_id))?;
            Ok(ScoreWithDisplay {
                score: row.into(),
                judge,
                competitor,
            })
        }).collect()
    }

    /// Every score of a battle in submission order, with judge and competitor
    /// display fields. Does not check that the battle exists.
    pub async fn list_for_battle_with_display<C>(db: &C, battle_id: i32) -> Result<Vec<ScoreWithDisplay>, EntityError> where C: ConnectionTrait {
        let rows = schema::score::Entity::find()
            .filter(schema::score::Column::BattleId.eq(battle_id))
            .order_by_asc(schema::score::Column::Id)
            .all(db)
            .await?;
        Self::with_display(db, rows).await
    }

    pub async fn list_all<C>(db: &C) -> Result<Vec<ScoreWithDisplay>, EntityError> where C: ConnectionTrait {
        let rows = schema::score::Entity::find()
            .order_by_asc(schema::score::Column::Id)
            .all(db)
            .await?;
        Self::with_display(db, rows).await
    }

    pub async fn list_for_battle<C>(db: &C, battle_id: i32) -> Result<Vec<ScoreWithDisplay>, EntityError> where C: ConnectionTrait {
        Battle::get(db, battle_id).await?;
        Self::list_for_battle_with_display(db, battle_id).await
    }

    pub async fn list_for_battle_and_competitor<C>(db: &C, battle_id: i32, competitor_id: i32) -> Result<Vec<ScoreWithDisplay>, EntityError> where C: ConnectionTrait {
        Battle::get(db, battle_id).await?;
        Competitor::get(db, competitor_id).await?;

        let rows = schema::score::Entity::find()
            .filter(schema::score::Column::BattleId.eq(battle_id))
            .filter(schema::score::Column::CompetitorId.eq(competitor_id))
            .order_by_asc(schema::score::Column::Id)
            .all(db)
            .await?;
        Self::with_display(db, rows).await
    }

    /// Averages of one competitor in a battle, counted over the judges that
    /// submitted all four criteria. A missing battle or competitor is
    /// `NotFound`; an unscored one gets an all-zero total.
    pub async fn total_for_competitor<C>(db: &C, battle_id: i32, competitor_id: i32) -> Result<CompetitorTotal, EntityError> where C: ConnectionTrait {
        Battle::get(db, battle_id).await?;
        Competitor::get(db, competitor_id).await?;

        let rows = schema::score::Entity::find()
            .filter(schema::score::Column::BattleId.eq(battle_id))
            .order_by_asc(schema::score::Column::Id)
            .all(db)
            .await?;

        Ok(competitor_total(
            battle_id,
            competitor_id,
            rows.into_iter().map(|row| {
                let score = Score::from(row);
                (score.competitor_id, score.criteria())
            })
        ))
    }
}
