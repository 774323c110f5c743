mod common;

use battle_tab_entities::domain::battle::{Battle, BattleDetail, BattleListing, BattleStatus};
use battle_tab_entities::domain::score::ScoreWithDisplay;
use battle_tab_entities::mock::{MockCompetition, MockOption};
use serde_json::json;
use tracing_test::traced_test;


fn battle_body(mock: &MockCompetition, competitor1: i32, competitor2: i32) -> serde_json::Value {
    json!({
        "competitionId": mock.competition_id,
        "stageId": mock.final_stage_id,
        "competitor1Id": competitor1,
        "competitor2Id": competitor2,
        "battleOrder": 1,
    })
}

#[tokio::test]
#[traced_test]
async fn test_create_battle_defaults_to_scheduled() {
    let mut fixture = common::Fixture::with_mock(MockOption::default()).await;
    let mock = fixture.mock().clone();

    let mut response = fixture.post_json("/api/battles", battle_body(&mock, mock.competitor_ids[0], mock.competitor_ids[2])).await;
    assert_eq!(response.status(), 201);
    let battle: Battle = response.json().await;
    assert_eq!(battle.status, BattleStatus::Scheduled);
    assert_eq!(battle.stage_id, mock.final_stage_id);
}

#[tokio::test]
#[traced_test]
async fn test_winner_completes_battle_unless_status_given() {
    let mut fixture = common::Fixture::with_mock(MockOption::default()).await;
    let mock = fixture.mock().clone();

    let mut body = battle_body(&mock, mock.competitor_ids[0], mock.competitor_ids[2]);
    body["winnerId"] = json!(mock.competitor_ids[2]);
    let mut response = fixture.post_json("/api/battles", body.clone()).await;
    assert_eq!(response.status(), 201);
    let battle: Battle = response.json().await;
    assert_eq!(battle.status, BattleStatus::Completed);

    body["status"] = json!("in_progress");
    let mut response = fixture.post_json("/api/battles", body).await;
    let battle: Battle = response.json().await;
    assert_eq!(battle.status, BattleStatus::InProgress);
    assert_eq!(battle.winner_id, Some(mock.competitor_ids[2]));
}

#[tokio::test]
#[traced_test]
async fn test_patch_battle_winner() {
    let mut fixture = common::Fixture::with_mock(MockOption::default()).await;
    let mock = fixture.mock().clone();
    let path = format!("/api/battles/{}", mock.battle_ids[0]);

    let mut response = fixture.patch_json(&path, json!({"winnerId": mock.competitor_ids[0]})).await;
    assert_eq!(response.status(), 200);
    let battle: Battle = response.json().await;
    assert_eq!(battle.status, BattleStatus::Completed);

    let response = fixture.patch_json(&path, json!({"winnerId": mock.competitor_ids[3]})).await;
    assert_eq!(response.status(), 400);

    let response = fixture.patch_json("/api/battles/999", json!({"battleOrder": 3})).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_invalid_battles_are_rejected() {
    let mut fixture = common::Fixture::with_mock(MockOption::default()).await;
    let mock = fixture.mock().clone();

    let response = fixture.post_json("/api/battles", battle_body(&mock, mock.competitor_ids[0], mock.competitor_ids[0])).await;
    assert_eq!(response.status(), 400);

    let response = fixture.post_json("/api/battles", battle_body(&mock, mock.competitor_ids[0], 999)).await;
    assert_eq!(response.status(), 404);

    let mut body = battle_body(&mock, mock.competitor_ids[0], mock.competitor_ids[1]);
    body["status"] = json!("postponed");
    let response = fixture.post_json("/api/battles", body).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[traced_test]
async fn test_battle_listings() {
    let mut fixture = common::Fixture::with_mock(MockOption { num_competitors: 6, ..Default::default() }).await;
    let mock = fixture.mock().clone();

    let mut response = fixture.get(&format!("/api/battles/stage/{}", mock.top_stage_id)).await;
    assert_eq!(response.status(), 200);
    let listings: Vec<BattleListing> = response.json().await;
    assert_eq!(listings.len(), 3);
    assert_eq!(listings[0].competitor1.as_ref().map(|c| c.display_name()), Some("B-Boy 1"));
    assert_eq!(listings[0].stage.as_ref().map(|s| s.name.as_str()), Some("Top 8"));

    let mut response = fixture.get(&format!("/api/battles/competition/{}", mock.competition_id)).await;
    let listings: Vec<BattleListing> = response.json().await;
    assert_eq!(listings.len(), 3);

    let mut response = fixture.get("/api/battles").await;
    let listings: Vec<BattleListing> = response.json().await;
    assert_eq!(listings.len(), 3);
}

#[tokio::test]
#[traced_test]
async fn test_battle_detail_and_delete() {
    let mut fixture = common::Fixture::with_mock(MockOption { score_first_battle: true, ..Default::default() }).await;
    let mock = fixture.mock().clone();
    let path = format!("/api/battles/{}", mock.battle_ids[0]);

    let mut response = fixture.get(&path).await;
    assert_eq!(response.status(), 200);
    let detail: BattleDetail = response.json().await;
    assert_eq!(detail.competition.name, "Mock Jam");
    assert_eq!(detail.scores.len(), 2 * mock.judge_ids.len());

    let response = fixture.delete(&path).await;
    assert_eq!(response.status(), 204);

    let response = fixture.get(&path).await;
    assert_eq!(response.status(), 404);

    let mut response = fixture.get("/api/scores").await;
    let scores: Vec<ScoreWithDisplay> = response.json().await;
    assert!(scores.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_battle_mutations_are_logged_once() {
    let mut fixture = common::Fixture::with_mock(MockOption::default()).await;
    let mock = fixture.mock().clone();

    let mut response = fixture.post_json("/api/battles", battle_body(&mock, mock.competitor_ids[0], mock.competitor_ids[2])).await;
    let battle: Battle = response.json().await;
    fixture.patch_json(&format!("/api/battles/{}", battle.id), json!({"battleOrder": 2})).await;
    fixture.delete(&format!("/api/battles/{}", battle.id)).await;

    let created = format!("Created battle {} ", battle.id);
    let updated = format!("Updated battle {} ", battle.id);
    let deleted = format!("Deleted battle {}", battle.id);
    logs_assert(|lines: &[&str]| {
        for needle in [&created, &updated, &deleted] {
            let count = lines.iter().filter(|line| line.contains(needle.as_str())).count();
            if count != 1 {
                return Err(format!("expected one log line containing '{}', found {}", needle, count));
            }
        }
        Ok(())
    });
}
