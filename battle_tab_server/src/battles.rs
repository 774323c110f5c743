use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use battle_tab_entities::domain::battle::{Battle, BattleDetail, BattleListing, BattleResults, BattleUpdate, NewBattle};
use sea_orm::DatabaseConnection;

use crate::response::{APIError, ApiJson};
use crate::state::AppState;


async fn create_battle(State(db): State<DatabaseConnection>, ApiJson(request): ApiJson<NewBattle>) -> Result<(StatusCode, Json<Battle>), APIError> {
    let battle = Battle::create(&db, request).await?;
    Ok((StatusCode::CREATED, Json(battle)))
}

async fn list_battles(State(db): State<DatabaseConnection>) -> Result<Json<Vec<BattleListing>>, APIError> {
    Ok(Json(Battle::list(&db).await?))
}

async fn list_battles_in_competition(State(db): State<DatabaseConnection>, Path(competition_id): Path<i32>) -> Result<Json<Vec<BattleListing>>, APIError> {
    Ok(Json(Battle::list_for_competition(&db, competition_id).await?))
}

async fn list_battles_in_stage(State(db): State<DatabaseConnection>, Path(stage_id): Path<i32>) -> Result<Json<Vec<BattleListing>>, APIError> {
    Ok(Json(Battle::list_for_stage(&db, stage_id).await?))
}

async fn get_battle(State(db): State<DatabaseConnection>, Path(battle_id): Path<i32>) -> Result<Json<BattleDetail>, APIError> {
    Ok(Json(Battle::detail(&db, battle_id).await?))
}

async fn get_battle_results(State(db): State<DatabaseConnection>, Path(battle_id): Path<i32>) -> Result<Json<BattleResults>, APIError> {
    Ok(Json(Battle::results(&db, battle_id).await?))
}

async fn update_battle(State(db): State<DatabaseConnection>, Path(battle_id): Path<i32>, ApiJson(request): ApiJson<BattleUpdate>) -> Result<Json<Battle>, APIError> {
    let battle = Battle::update(&db, battle_id, request).await?;
    Ok(Json(battle))
}

async fn delete_battle(State(db): State<DatabaseConnection>, Path(battle_id): Path<i32>) -> Result<StatusCode, APIError> {
    Battle::delete(&db, battle_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
    .route("/battles", get(list_battles).post(create_battle))
    .route("/battles/competition/:competition_id", get(list_battles_in_competition))
    .route("/battles/stage/:stage_id", get(list_battles_in_stage))
    .route("/battles/:battle_id", get(get_battle).patch(update_battle).delete(delete_battle))
    .route("/battles/:battle_id/scores", get(get_battle_results))
}
