mod common;

use battle_tab_entities::domain::battle::BattleListing;
use battle_tab_entities::domain::competition::{Competition, CompetitionDetails, CompetitionStats, CompetitionStatus};
use battle_tab_entities::domain::competitor::{Competitor, CompetitorWithCompetition};
use battle_tab_entities::domain::judge::Judge;
use battle_tab_entities::domain::stage::{CompetitionStage, StageStatus, StageType};
use battle_tab_entities::mock::MockOption;
use battle_tab_server::response::APIErrorResponse;
use battle_tab_server::HealthResponse;
use serde_json::json;
use tracing_test::traced_test;


#[tokio::test]
#[traced_test]
async fn test_health() {
    let mut fixture = common::Fixture::default().await;
    let mut response = fixture.get("/api/health").await;
    assert_eq!(response.status(), 200);
    let health: HealthResponse = response.json().await;
    assert_eq!(health.status, "ok");
}

#[tokio::test]
#[traced_test]
async fn test_create_and_list_competitions() {
    let mut fixture = common::Fixture::default().await;

    let mut response = fixture.post_json("/api/competitions", json!({
        "name": "Spring Cypher",
        "startDate": "2025-04-01",
        "endDate": "2025-04-02",
    })).await;
    assert_eq!(response.status(), 201);
    let spring: Competition = response.json().await;
    assert_eq!(spring.status, CompetitionStatus::Draft);

    fixture.post_json("/api/competitions", json!({
        "name": "Autumn Cypher",
        "startDate": "2025-10-01",
        "endDate": "2025-10-01",
    })).await;

    let mut response = fixture.get("/api/competitions").await;
    let competitions: Vec<Competition> = response.json().await;
    assert_eq!(competitions.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["Autumn Cypher", "Spring Cypher"]);

    let response = fixture.post_json("/api/competitions", json!({
        "name": "Backwards",
        "startDate": "2025-04-02",
        "endDate": "2025-04-01",
    })).await;
    assert_eq!(response.status(), 400);

    let mut response = fixture.patch_json(&format!("/api/competitions/{}", spring.id), json!({"status": "registration"})).await;
    assert_eq!(response.status(), 200);
    let spring: Competition = response.json().await;
    assert_eq!(spring.status, CompetitionStatus::Registration);

    let response = fixture.delete(&format!("/api/competitions/{}", spring.id)).await;
    assert_eq!(response.status(), 204);
    let mut response = fixture.get(&format!("/api/competitions/{}", spring.id)).await;
    assert_eq!(response.status(), 404);
    let error: APIErrorResponse = response.json().await;
    assert_eq!(error.message, format!("Competition with id {} does not exist", spring.id));
}

#[tokio::test]
#[traced_test]
async fn test_competition_details_and_stats() {
    let mut fixture = common::Fixture::with_mock(MockOption::default()).await;
    let mock = fixture.mock().clone();

    let mut response = fixture.get(&format!("/api/competitions/{}/details", mock.competition_id)).await;
    assert_eq!(response.status(), 200);
    let details: CompetitionDetails = response.json().await;
    assert_eq!(details.competition.name, "Mock Jam");
    assert_eq!(details.stages.iter().map(|s| s.id).collect::<Vec<_>>(), vec![mock.top_stage_id, mock.final_stage_id]);
    assert_eq!(details.competitors.len(), 4);

    let mut response = fixture.get(&format!("/api/competitions/{}/stats", mock.competition_id)).await;
    let stats: CompetitionStats = response.json().await;
    assert_eq!(stats.competitors_count, 4);
    assert_eq!(stats.battles_count, 2);
    assert_eq!(stats.judges_count, 3);

    let response = fixture.get("/api/competitions/999/stats").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_stage_routes() {
    let mut fixture = common::Fixture::with_mock(MockOption::default()).await;
    let mock = fixture.mock().clone();
    let stages_path = format!("/api/competitions/{}/stages", mock.competition_id);

    let mut response = fixture.post_json(&stages_path, json!({
        "name": "Top 16",
        "type": "top_16",
        "stageOrder": 0,
    })).await;
    assert_eq!(response.status(), 201);
    let stage: CompetitionStage = response.json().await;
    assert_eq!(stage.stage_type, StageType::Top16);
    assert_eq!(stage.status, StageStatus::Pending);

    let mut response = fixture.patch_json(&format!("{}/{}", stages_path, stage.id), json!({"status": "completed"})).await;
    assert_eq!(response.status(), 200);
    let stage: CompetitionStage = response.json().await;
    assert_eq!(stage.status, StageStatus::Completed);

    let response = fixture.patch_json(&format!("/api/competitions/999/stages/{}", stage.id), json!({"status": "pending"})).await;
    assert_eq!(response.status(), 404);

    let mut response = fixture.get(&stages_path).await;
    let stages: Vec<CompetitionStage> = response.json().await;
    assert_eq!(stages.len(), 3);

    let response = fixture.delete(&format!("{}/{}", stages_path, stage.id)).await;
    assert_eq!(response.status(), 204);
    let response = fixture.delete(&format!("{}/{}", stages_path, stage.id)).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_competitor_routes() {
    let mut fixture = common::Fixture::with_mock(MockOption::default()).await;
    let mock = fixture.mock().clone();

    let body = json!({
        "competitionId": mock.competition_id,
        "registrationNumber": "NEW-001",
        "bBoyName": "Lil Spin",
        "realName": "Sam Spin",
        "gender": "other",
    });
    let mut response = fixture.post_json("/api/competitors", body.clone()).await;
    assert_eq!(response.status(), 201);
    let competitor: Competitor = response.json().await;
    assert_eq!(competitor.bboy_name.as_deref(), Some("Lil Spin"));

    let mut response = fixture.post_json("/api/competitors", body).await;
    assert_eq!(response.status(), 409);
    let error: APIErrorResponse = response.json().await;
    assert_eq!(error.message, "Registration number already exists");

    let response = fixture.patch_json(&format!("/api/competitors/{}", competitor.id), json!({"registrationNumber": "MOCK-001"})).await;
    assert_eq!(response.status(), 409);

    let mut response = fixture.get("/api/competitors").await;
    let all: Vec<CompetitorWithCompetition> = response.json().await;
    assert_eq!(all.len(), 5);

    let mut response = fixture.get(&format!("/api/competitors/competition/{}", mock.competition_id)).await;
    let in_competition: Vec<Competitor> = response.json().await;
    assert_eq!(in_competition.len(), 5);

    let mut response = fixture.get(&format!("/api/competitors/{}/competition", competitor.id)).await;
    let competition: Competition = response.json().await;
    assert_eq!(competition.id, mock.competition_id);

    let mut response = fixture.get(&format!("/api/competitors/{}/battles", mock.competitor_ids[0])).await;
    let battles: Vec<BattleListing> = response.json().await;
    assert_eq!(battles.iter().map(|b| b.battle.id).collect::<Vec<_>>(), vec![mock.battle_ids[0]]);

    let response = fixture.delete(&format!("/api/competitors/{}", competitor.id)).await;
    assert_eq!(response.status(), 204);
    let response = fixture.get(&format!("/api/competitors/{}", competitor.id)).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_judge_routes() {
    let mut fixture = common::Fixture::with_mock(MockOption::default()).await;
    let mock = fixture.mock().clone();

    let mut response = fixture.post_json("/api/judges", json!({"competitionId": mock.competition_id, "name": "Judge Storm"})).await;
    assert_eq!(response.status(), 201);
    let judge: Judge = response.json().await;

    let mut response = fixture.get(&format!("/api/judges/competition/{}", mock.competition_id)).await;
    let judges: Vec<Judge> = response.json().await;
    assert_eq!(judges.len(), 4);

    let mut response = fixture.get(&format!("/api/judges/{}", judge.id)).await;
    let fetched: Judge = response.json().await;
    assert_eq!(fetched.name, "Judge Storm");

    let response = fixture.post_json("/api/judges", json!({"competitionId": 999, "name": "Nobody"})).await;
    assert_eq!(response.status(), 404);

    let response = fixture.delete(&format!("/api/judges/{}", judge.id)).await;
    assert_eq!(response.status(), 204);
    let response = fixture.get(&format!("/api/judges/{}", judge.id)).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_competitor_listing_accepts_competition_query() {
    let mut fixture = common::Fixture::with_mock(MockOption::default()).await;
    let mock = fixture.mock().clone();

    let mut response = fixture.post_json("/api/competitions", json!({
        "name": "Other Jam",
        "startDate": "2025-09-01",
        "endDate": "2025-09-01",
    })).await;
    let other: Competition = response.json().await;
    fixture.post_json("/api/competitors", json!({
        "competitionId": other.id,
        "realName": "Outsider",
        "gender": "female",
    })).await;

    let mut response = fixture.get(&format!("/api/competitors?competitionId={}", mock.competition_id)).await;
    assert_eq!(response.status(), 200);
    let filtered: Vec<CompetitorWithCompetition> = response.json().await;
    assert_eq!(filtered.iter().map(|c| c.competitor.id).collect::<Vec<_>>(), mock.competitor_ids);
    assert!(filtered.iter().all(|c| c.competition.as_ref().map(|c| c.id) == Some(mock.competition_id)));

    let mut response = fixture.get("/api/competitors").await;
    let all: Vec<CompetitorWithCompetition> = response.json().await;
    assert_eq!(all.len(), mock.competitor_ids.len() + 1);

    let response = fixture.get("/api/competitors?competitionId=abc").await;
    assert_eq!(response.status(), 400);
}
