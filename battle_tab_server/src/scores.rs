use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::patch};
use battle_tab_entities::domain::score::{Score, ScoreSubmission, ScoreUpdate, ScoreWithDisplay};
use battle_tab_entities::scoring::CompetitorTotal;
use sea_orm::DatabaseConnection;

use crate::response::{APIError, ApiJson};
use crate::state::AppState;


async fn submit_score(State(db): State<DatabaseConnection>, ApiJson(request): ApiJson<ScoreSubmission>) -> Result<(StatusCode, Json<Score>), APIError> {
    let score = Score::upsert(&db, request).await?;
    Ok((StatusCode::CREATED, Json(score)))
}

async fn list_scores(State(db): State<DatabaseConnection>) -> Result<Json<Vec<ScoreWithDisplay>>, APIError> {
    Ok(Json(Score::list_all(&db).await?))
}

async fn list_scores_in_battle(State(db): State<DatabaseConnection>, Path(battle_id): Path<i32>) -> Result<Json<Vec<ScoreWithDisplay>>, APIError> {
    Ok(Json(Score::list_for_battle(&db, battle_id).await?))
}

async fn list_scores_of_competitor(State(db): State<DatabaseConnection>, Path((battle_id, competitor_id)): Path<(i32, i32)>) -> Result<Json<Vec<ScoreWithDisplay>>, APIError> {
    Ok(Json(Score::list_for_battle_and_competitor(&db, battle_id, competitor_id).await?))
}

async fn get_judge_score(State(db): State<DatabaseConnection>, Path((battle_id, judge_id, competitor_id)): Path<(i32, i32, i32)>) -> Result<Json<Score>, APIError> {
    match Score::find_for_triple(&db, battle_id, judge_id, competitor_id).await? {
        Some(score) => Ok(Json(score)),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("Judge {} has not scored competitor {} in battle {}", judge_id, competitor_id, battle_id)
        ).into()),
    }
}

async fn get_competitor_total(State(db): State<DatabaseConnection>, Path((battle_id, competitor_id)): Path<(i32, i32)>) -> Result<Json<CompetitorTotal>, APIError> {
    Ok(Json(Score::total_for_competitor(&db, battle_id, competitor_id).await?))
}

async fn update_score(State(db): State<DatabaseConnection>, Path(score_id): Path<i32>, ApiJson(request): ApiJson<ScoreUpdate>) -> Result<Json<Score>, APIError> {
    let score = Score::update(&db, score_id, request).await?;
    Ok(Json(score))
}

async fn delete_score(State(db): State<DatabaseConnection>, Path(score_id): Path<i32>) -> Result<StatusCode, APIError> {
    Score::delete(&db, score_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
    .route("/scores", get(list_scores).post(submit_score))
    .route("/scores/battle/:battle_id", get(list_scores_in_battle))
    .route("/scores/battle/:battle_id/competitor/:competitor_id", get(list_scores_of_competitor))
    .route("/scores/battle/:battle_id/competitor/:competitor_id/total", get(get_competitor_total))
    .route("/scores/battle/:battle_id/judge/:judge_id/competitor/:competitor_id", get(get_judge_score))
    .route("/scores/:score_id", patch(update_score).delete(delete_score))
}
