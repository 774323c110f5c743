use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::patch};
use battle_tab_entities::domain::competition::{Competition, CompetitionDetails, CompetitionStats, CompetitionUpdate, NewCompetition};
use battle_tab_entities::domain::stage::{CompetitionStage, NewStage, StageUpdate};
use sea_orm::DatabaseConnection;

use crate::response::{APIError, ApiJson};
use crate::state::AppState;


async fn create_competition(State(db): State<DatabaseConnection>, ApiJson(request): ApiJson<NewCompetition>) -> Result<(StatusCode, Json<Competition>), APIError> {
    let competition = Competition::create(&db, request).await?;
    Ok((StatusCode::CREATED, Json(competition)))
}

async fn list_competitions(State(db): State<DatabaseConnection>) -> Result<Json<Vec<Competition>>, APIError> {
    Ok(Json(Competition::list(&db).await?))
}

async fn get_competition(State(db): State<DatabaseConnection>, Path(competition_id): Path<i32>) -> Result<Json<Competition>, APIError> {
    Ok(Json(Competition::get(&db, competition_id).await?))
}

async fn update_competition(State(db): State<DatabaseConnection>, Path(competition_id): Path<i32>, ApiJson(request): ApiJson<CompetitionUpdate>) -> Result<Json<Competition>, APIError> {
    let competition = Competition::update(&db, competition_id, request).await?;
    Ok(Json(competition))
}

async fn delete_competition(State(db): State<DatabaseConnection>, Path(competition_id): Path<i32>) -> Result<StatusCode, APIError> {
    Competition::delete(&db, competition_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_competition_details(State(db): State<DatabaseConnection>, Path(competition_id): Path<i32>) -> Result<Json<CompetitionDetails>, APIError> {
    Ok(Json(Competition::details(&db, competition_id).await?))
}

async fn get_competition_stats(State(db): State<DatabaseConnection>, Path(competition_id): Path<i32>) -> Result<Json<CompetitionStats>, APIError> {
    Ok(Json(Competition::stats(&db, competition_id).await?))
}

async fn list_stages(State(db): State<DatabaseConnection>, Path(competition_id): Path<i32>) -> Result<Json<Vec<CompetitionStage>>, APIError> {
    Ok(Json(CompetitionStage::list_for_competition(&db, competition_id).await?))
}

async fn create_stage(State(db): State<DatabaseConnection>, Path(competition_id): Path<i32>, ApiJson(request): ApiJson<NewStage>) -> Result<(StatusCode, Json<CompetitionStage>), APIError> {
    let stage = CompetitionStage::create(&db, competition_id, request).await?;
    Ok((StatusCode::CREATED, Json(stage)))
}

async fn update_stage(State(db): State<DatabaseConnection>, Path((competition_id, stage_id)): Path<(i32, i32)>, ApiJson(request): ApiJson<StageUpdate>) -> Result<Json<CompetitionStage>, APIError> {
    let stage = CompetitionStage::update(&db, competition_id, stage_id, request).await?;
    Ok(Json(stage))
}

async fn delete_stage(State(db): State<DatabaseConnection>, Path((competition_id, stage_id)): Path<(i32, i32)>) -> Result<StatusCode, APIError> {
    CompetitionStage::delete(&db, competition_id, stage_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
    .route("/competitions", get(list_competitions).post(create_competition))
    .route("/competitions/:competition_id", get(get_competition).patch(update_competition).delete(delete_competition))
    .route("/competitions/:competition_id/details", get(get_competition_details))
    .route("/competitions/:competition_id/stats", get(get_competition_stats))
    .route("/competitions/:competition_id/stages", get(list_stages).post(create_stage))
    .route("/competitions/:competition_id/stages/:stage_id", patch(update_stage).delete(delete_stage))
}
