use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use battle_tab_entities::domain::judge::{Judge, NewJudge};
use sea_orm::DatabaseConnection;

use crate::response::{APIError, ApiJson};
use crate::state::AppState;


async fn create_judge(State(db): State<DatabaseConnection>, ApiJson(request): ApiJson<NewJudge>) -> Result<(StatusCode, Json<Judge>), APIError> {
    let judge = Judge::create(&db, request).await?;
    Ok((StatusCode::CREATED, Json(judge)))
}

async fn list_judges_in_competition(State(db): State<DatabaseConnection>, Path(competition_id): Path<i32>) -> Result<Json<Vec<Judge>>, APIError> {
    Ok(Json(Judge::list_for_competition(&db, competition_id).await?))
}

async fn get_judge(State(db): State<DatabaseConnection>, Path(judge_id): Path<i32>) -> Result<Json<Judge>, APIError> {
    Ok(Json(Judge::get(&db, judge_id).await?))
}

async fn delete_judge(State(db): State<DatabaseConnection>, Path(judge_id): Path<i32>) -> Result<StatusCode, APIError> {
    Judge::delete(&db, judge_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
    .route("/judges", post(create_judge))
    .route("/judges/competition/:competition_id", get(list_judges_in_competition))
    .route("/judges/:judge_id", get(get_judge).delete(delete_judge))
}
