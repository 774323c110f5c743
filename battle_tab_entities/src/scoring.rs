//! Aggregation of judge scores into per-competitor averages.
//!
//! Everything in here is pure. Callers load the score rows of a battle and
//! hand them to [`aggregate_battle_scores`] or [`competitor_total`].
//!
//! A row only counts towards an average if all four criteria carry a truthy
//! value, i.e. are present, non-zero and not NaN. Rows that fail this check
//! are still listed in the judge scores of their competitor.
//!
//! Rounding happens in two steps: every criterion average is rounded to two
//! decimals first, and the total is the rounded mean of those rounded values.
//! Totals published by earlier versions were computed this way, so this must
//! not be collapsed into a single rounding of the raw sums.

use std::collections::HashMap;

use serde::{Serialize, Deserialize};

use crate::domain::competitor::CompetitorSummary;
use crate::domain::judge::JudgeSummary;


/// Rounds half away from zero at the second decimal.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaScores {
    pub technique_score: Option<f64>,
    pub originality_score: Option<f64>,
    pub musicality_score: Option<f64>,
    pub execution_score: Option<f64>,
}

impl CriteriaScores {
    pub fn new(technique: f64, originality: f64, musicality: f64, execution: f64) -> Self {
        CriteriaScores {
            technique_score: Some(technique),
            originality_score: Some(originality),
            musicality_score: Some(musicality),
            execution_score: Some(execution),
        }
    }

    /// The four values in technique, originality, musicality, execution order,
    /// if every one of them is truthy.
    pub fn complete(&self) -> Option<[f64; 4]> {
        Some([
            truthy(self.technique_score)?,
            truthy(self.originality_score)?,
            truthy(self.musicality_score)?,
            truthy(self.execution_score)?,
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreAverages {
    pub technique: f64,
    pub originality: f64,
    pub musicality: f64,
    pub execution: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CriteriaAccumulator {
    sums: [f64; 4],
    count: u32,
}

impl CriteriaAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the scores if they qualify. Returns whether they did.
    pub fn add(&mut self, scores: &CriteriaScores) -> bool {
        match scores.complete() {
            Some(values) => {
                for (sum, value) in self.sums.iter_mut().zip(values) {
                    *sum += value;
                }
                self.count += 1;
                true
            },
            None => false
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn averages(&self) -> ScoreAverages {
        if self.count == 0 {
            return ScoreAverages::default();
        }

        let count = self.count as f64;
        let [technique, originality, musicality, execution] = self.sums.map(|sum| round2(sum / count));

        ScoreAverages {
            technique,
            originality,
            musicality,
            execution,
            total: round2((technique + originality + musicality + execution) / 4.0),
        }
    }
}

/// One score row of a battle, joined with the display fields of its judge
/// and competitor.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleScoreRow {
    pub judge: JudgeSummary,
    pub competitor: CompetitorSummary,
    pub scores: CriteriaScores,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeScoreEntry {
    pub judge: JudgeSummary,
    #[serde(flatten)]
    pub scores: CriteriaScores,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorScoreResult {
    pub competitor: CompetitorSummary,
    pub judge_scores: Vec<JudgeScoreEntry>,
    pub averages: ScoreAverages,
}

/// Aggregated results keyed by competitor id, in the order in which the
/// competitors first appeared in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreAggregation {
    results: Vec<CompetitorScoreResult>,
    positions: HashMap<i32, usize>,
}

impl ScoreAggregation {
    pub fn get(&self, competitor_id: i32) -> Option<&CompetitorScoreResult> {
        self.positions.get(&competitor_id).map(|pos| &self.results[*pos])
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn competitor_ids(&self) -> Vec<i32> {
        self.results.iter().map(|r| r.competitor.id).collect()
    }

    pub fn into_results(self) -> Vec<CompetitorScoreResult> {
        self.results
    }
}

pub fn aggregate_battle_scores<I>(rows: I) -> ScoreAggregation where I: IntoIterator<Item = BattleScoreRow> {
    let mut aggregation = ScoreAggregation::default();
    let mut accumulators: Vec<CriteriaAccumulator> = vec![];

    for row in rows {
        let pos = match aggregation.positions.get(&row.competitor.id) {
            Some(pos) => *pos,
            None => {
                let pos = aggregation.results.len();
                aggregation.positions.insert(row.competitor.id, pos);
                aggregation.results.push(CompetitorScoreResult {
                    competitor: row.competitor.clone(),
                    judge_scores: vec![],
                    averages: ScoreAverages::default(),
                });
                accumulators.push(CriteriaAccumulator::new());
                pos
            }
        };

        accumulators[pos].add(&row.scores);
        aggregation.results[pos].judge_scores.push(JudgeScoreEntry {
            judge: row.judge,
            scores: row.scores,
            comments: row.comments,
        });
    }

    for (result, accumulator) in aggregation.results.iter_mut().zip(accumulators.iter()) {
        result.averages = accumulator.averages();
        tracing::debug!(
            "Competitor {} averaged {} over {} of {} judge scores",
            result.competitor.id,
            result.averages.total,
            accumulator.count(),
            result.judge_scores.len()
        );
    }

    aggregation
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorTotal {
    pub battle_id: i32,
    pub competitor_id: i32,
    pub technique_avg: f64,
    pub originality_avg: f64,
    pub musicality_avg: f64,
    pub execution_avg: f64,
    pub total_avg: f64,
    /// Number of judges whose scores qualified for the average.
    pub judge_count: u32,
}

/// Averages for a single competitor. `rows` may contain scores of other
/// competitors, they are filtered out before anything is summed.
pub fn competitor_total<I>(battle_id: i32, competitor_id: i32, rows: I) -> CompetitorTotal where I: IntoIterator<Item = (i32, CriteriaScores)> {
    let mut accumulator = CriteriaAccumulator::new();
    for (_, scores) in rows.into_iter().filter(|(id, _)| *id == competitor_id) {
        accumulator.add(&scores);
    }

    let averages = accumulator.averages();
    CompetitorTotal {
        battle_id,
        competitor_id,
        technique_avg: averages.technique,
        originality_avg: averages.originality,
        musicality_avg: averages.musicality,
        execution_avg: averages.execution,
        total_avg: averages.total,
        judge_count: accumulator.count(),
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn judge(id: i32) -> JudgeSummary {
        JudgeSummary { id, name: format!("Judge {}", id) }
    }

    fn competitor(id: i32) -> CompetitorSummary {
        CompetitorSummary { id, bboy_name: Some(format!("B-Boy {}", id)), real_name: format!("Dancer {}", id) }
    }

    fn row(judge_id: i32, competitor_id: i32, scores: CriteriaScores) -> BattleScoreRow {
        BattleScoreRow {
            judge: judge(judge_id),
            competitor: competitor(competitor_id),
            scores,
            comments: None,
        }
    }

    #[test]
    fn test_two_judges_average() {
        let aggregation = aggregate_battle_scores(vec![
            row(1, 10, CriteriaScores::new(8.0, 7.0, 9.0, 6.0)),
            row(2, 10, CriteriaScores::new(6.0, 9.0, 7.0, 8.0)),
        ]);

        let result = aggregation.get(10).unwrap();
        assert_eq!(result.averages, ScoreAverages {
            technique: 7.0,
            originality: 8.0,
            musicality: 8.0,
            execution: 7.0,
            total: 7.5,
        });
        assert_eq!(result.judge_scores.len(), 2);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let aggregation = aggregate_battle_scores(vec![
            row(1, 20, CriteriaScores::new(5.0, 5.0, 5.0, 5.0)),
            row(1, 10, CriteriaScores::new(6.0, 6.0, 6.0, 6.0)),
            row(2, 20, CriteriaScores::new(7.0, 7.0, 7.0, 7.0)),
            row(2, 10, CriteriaScores::new(8.0, 8.0, 8.0, 8.0)),
        ]);

        assert_eq!(aggregation.competitor_ids(), vec![20, 10]);
        let results = aggregation.into_results();
        assert_eq!(results[0].judge_scores.iter().map(|s| s.judge.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(results[0].averages.total, 6.0);
        assert_eq!(results[1].averages.total, 7.0);
    }

    #[test]
    fn test_partial_scores_are_listed_but_not_averaged() {
        let partial = CriteriaScores {
            execution_score: None,
            ..CriteriaScores::new(1.0, 1.0, 1.0, 1.0)
        };
        let aggregation = aggregate_battle_scores(vec![
            row(1, 10, CriteriaScores::new(8.0, 8.0, 8.0, 8.0)),
            row(2, 10, partial),
        ]);

        let result = aggregation.get(10).unwrap();
        assert_eq!(result.judge_scores.len(), 2);
        assert_eq!(result.judge_scores[1].scores, partial);
        assert_eq!(result.averages.technique, 8.0);
        assert_eq!(result.averages.total, 8.0);
    }

    #[test]
    fn test_zero_and_nan_scores_do_not_qualify() {
        let mut accumulator = CriteriaAccumulator::new();
        assert!(!accumulator.add(&CriteriaScores::new(0.0, 5.0, 5.0, 5.0)));
        assert!(!accumulator.add(&CriteriaScores::new(5.0, f64::NAN, 5.0, 5.0)));
        assert!(accumulator.add(&CriteriaScores::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(accumulator.count(), 1);
    }

    #[test]
    fn test_no_qualifying_rows_give_zero_averages() {
        let aggregation = aggregate_battle_scores(vec![
            row(1, 10, CriteriaScores { technique_score: Some(9.0), ..Default::default() }),
        ]);

        let result = aggregation.get(10).unwrap();
        assert_eq!(result.averages, ScoreAverages {
            technique: 0.0,
            originality: 0.0,
            musicality: 0.0,
            execution: 0.0,
            total: 0.0,
        });
        assert!(!result.averages.total.is_nan());
    }

    #[test]
    fn test_empty_battle_has_no_results() {
        let aggregation = aggregate_battle_scores(vec![]);
        assert!(aggregation.is_empty());
        assert_eq!(aggregation.get(10), None);
    }

    #[test]
    fn test_repeating_decimals_round_to_two_places() {
        let aggregation = aggregate_battle_scores(vec![
            row(1, 10, CriteriaScores::new(7.0, 8.0, 6.0, 9.0)),
            row(2, 10, CriteriaScores::new(7.0, 8.0, 7.0, 8.0)),
            row(3, 10, CriteriaScores::new(8.0, 8.0, 7.0, 8.0)),
        ]);

        let averages = aggregation.get(10).unwrap().averages;
        assert_eq!(averages.technique, 7.33);
        assert_eq!(averages.originality, 8.0);
        assert_eq!(averages.musicality, 6.67);
        assert_eq!(averages.execution, 8.33);
        assert_eq!(averages.total, 7.58);
    }

    #[test]
    fn test_total_is_computed_from_rounded_averages() {
        // Seven judges: technique sums to 42, every other criterion to 44.
        // 44 / 7 = 6.2857 rounds to 6.29, so the total becomes
        // (6.00 + 3 * 6.29) / 4 = 6.2175 -> 6.22, where rounding the raw
        // sums once would give 174 / 28 = 6.2143 -> 6.21.
        let rows = (0..7).map(|i| {
            let other = if i < 2 { 7.0 } else { 6.0 };
            row(i, 10, CriteriaScores::new(6.0, other, other, other))
        }).collect::<Vec<_>>();

        let averages = aggregate_battle_scores(rows).get(10).unwrap().averages;
        assert_eq!(averages.technique, 6.0);
        assert_eq!(averages.originality, 6.29);
        assert_eq!(averages.total, 6.22);
    }

    #[test]
    fn test_round2_rounds_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(7.0), 7.0);
    }

    #[test]
    fn test_competitor_total_filters_other_competitors() {
        let total = competitor_total(5, 10, vec![
            (10, CriteriaScores::new(8.0, 7.0, 9.0, 6.0)),
            (11, CriteriaScores::new(1.0, 1.0, 1.0, 1.0)),
            (10, CriteriaScores::new(6.0, 9.0, 7.0, 8.0)),
            (10, CriteriaScores { musicality_score: None, ..CriteriaScores::new(2.0, 2.0, 2.0, 2.0) }),
        ]);

        assert_eq!(total, CompetitorTotal {
            battle_id: 5,
            competitor_id: 10,
            technique_avg: 7.0,
            originality_avg: 8.0,
            musicality_avg: 8.0,
            execution_avg: 7.0,
            total_avg: 7.5,
            judge_count: 2,
        });
    }

    #[test]
    fn test_competitor_total_without_scores() {
        let total = competitor_total(5, 10, vec![]);
        assert_eq!(total.judge_count, 0);
        assert_eq!(total.total_avg, 0.0);
        assert_eq!(total.technique_avg, 0.0);
    }

    #[test]
    fn test_judge_entry_serializes_flat() {
        let entry = JudgeScoreEntry {
            judge: judge(1),
            scores: CriteriaScores::new(8.0, 7.0, 9.0, 6.0),
            comments: Some("Clean footwork".into()),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["techniqueScore"], 8.0);
        assert_eq!(value["judge"]["name"], "Judge 1");
        assert_eq!(value["comments"], "Clean footwork");
    }
}
