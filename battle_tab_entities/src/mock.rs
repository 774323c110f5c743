use sea_orm::{ConnectionTrait, TransactionTrait};

use crate::domain::battle::{Battle, NewBattle};
use crate::domain::competition::{Competition, CompetitionStatus, NewCompetition};
use crate::domain::competitor::{Competitor, Gender, NewCompetitor};
use crate::domain::judge::{Judge, NewJudge};
use crate::domain::score::{Score, ScoreSubmission};
use crate::domain::stage::{CompetitionStage, NewStage, StageType};
use crate::error::EntityError;


#[derive(Debug)]
pub struct MockOption {
    pub num_competitors: u32,
    pub num_judges: u32,
    /// Let every judge score both competitors of the first battle.
    pub score_first_battle: bool,
}

impl Default for MockOption {
    fn default() -> Self {
        Self {
            num_competitors: 4,
            num_judges: 3,
            score_first_battle: false,
        }
    }
}

/// Ids of everything created by [`make_mock_competition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCompetition {
    pub competition_id: i32,
    pub top_stage_id: i32,
    pub final_stage_id: i32,
    pub competitor_ids: Vec<i32>,
    pub judge_ids: Vec<i32>,
    /// One battle per pair of consecutive competitors, in the top stage.
    pub battle_ids: Vec<i32>,
}

pub async fn make_mock_competition<C>(db: &C) -> Result<MockCompetition, EntityError> where C: ConnectionTrait + TransactionTrait {
    make_mock_competition_with_options(db, Default::default()).await
}

pub async fn make_mock_competition_with_options<C>(db: &C, options: MockOption) -> Result<MockCompetition, EntityError> where C: ConnectionTrait + TransactionTrait {
    let start_date = chrono::NaiveDate::from_ymd_opt(2025, 8, 1).ok_or_else(|| EntityError::invalid("Invalid mock date"))?;
    let end_date = chrono::NaiveDate::from_ymd_opt(2025, 8, 2).ok_or_else(|| EntityError::invalid("Invalid mock date"))?;

    let competition = Competition::create(db, NewCompetition {
        name: "Mock Jam".into(),
        description: None,
        start_date,
        end_date,
        location: Some("Mock Hall".into()),
        max_participants: Some(16),
        registration_deadline: None,
        status: Some(CompetitionStatus::InProgress),
    }).await?;

    let mut stage_ids = vec![];
    for (order, (name, stage_type)) in [("Top 8", StageType::Top8), ("Final", StageType::Final)].into_iter().enumerate() {
        let stage = CompetitionStage::create(db, competition.id, NewStage {
            name: name.into(),
            description: None,
            stage_type,
            start_time: None,
            end_time: None,
            status: None,
            stage_order: Some(order as i32),
        }).await?;
        stage_ids.push(stage.id);
    }

    let mut competitor_ids = vec![];
    for i in 0..options.num_competitors {
        let competitor = Competitor::create(db, NewCompetitor {
            competition_id: competition.id,
            registration_number: Some(format!("MOCK-{:03}", i + 1)),
            bboy_name: Some(format!("B-Boy {}", i + 1)),
            real_name: format!("Competitor {}", i + 1),
            gender: Gender::Male,
            birth_date: None,
            nationality: None,
            team: None,
            photo_url: None,
            status: None,
        }).await?;
        competitor_ids.push(competitor.id);
    }

    let mut judge_ids = vec![];
    for i in 0..options.num_judges {
        let judge = Judge::create(db, NewJudge {
            competition_id: competition.id,
            name: format!("Judge {}", i + 1),
        }).await?;
        judge_ids.push(judge.id);
    }

    let mut battle_ids = vec![];
    for (order, pair) in competitor_ids.chunks(2).enumerate() {
        let battle = Battle::create(db, NewBattle {
            competition_id: competition.id,
            stage_id: stage_ids[0],
            competitor1_id: pair.first().copied(),
            competitor2_id: pair.get(1).copied(),
            battle_order: order as i32 + 1,
            winner_id: None,
            status: None,
            start_time: None,
            end_time: None,
        }).await?;
        battle_ids.push(battle.id);
    }

    if options.score_first_battle {
        if let Some(battle_id) = battle_ids.first().copied() {
            let battle = Battle::get(db, battle_id).await?;
            for (j, judge_id) in judge_ids.iter().enumerate() {
                for competitor_id in [battle.competitor1_id, battle.competitor2_id].into_iter().flatten() {
                    let base = 6.0 + ((j as i32 + competitor_id) % 4) as f64;
                    Score::upsert(db, ScoreSubmission {
                        battle_id,
                        judge_id: *judge_id,
                        competitor_id,
                        technique_score: base,
                        originality_score: base,
                        musicality_score: base,
                        execution_score: base,
                        comments: None,
                    }).await?;
                }
            }
        }
    }

    tracing::debug!("Created mock competition {}", competition.id);

    Ok(MockCompetition {
        competition_id: competition.id,
        top_stage_id: stage_ids[0],
        final_stage_id: stage_ids[1],
        competitor_ids,
        judge_ids,
        battle_ids,
    })
}
