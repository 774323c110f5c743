use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use battle_tab_entities::domain::battle::BattleListing;
use battle_tab_entities::domain::competition::Competition;
use battle_tab_entities::domain::competitor::{Competitor, CompetitorUpdate, CompetitorWithCompetition, NewCompetitor};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::response::{APIError, ApiJson};
use crate::state::AppState;


async fn create_competitor(State(db): State<DatabaseConnection>, ApiJson(request): ApiJson<NewCompetitor>) -> Result<(StatusCode, Json<Competitor>), APIError> {
    let competitor = Competitor::create(&db, request).await?;
    Ok((StatusCode::CREATED, Json(competitor)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorFilter {
    pub competition_id: Option<i32>,
}

async fn list_competitors(State(db): State<DatabaseConnection>, Query(filter): Query<CompetitorFilter>) -> Result<Json<Vec<CompetitorWithCompetition>>, APIError> {
    Ok(Json(Competitor::list(&db, filter.competition_id).await?))
}

async fn list_competitors_in_competition(State(db): State<DatabaseConnection>, Path(competition_id): Path<i32>) -> Result<Json<Vec<Competitor>>, APIError> {
    Ok(Json(Competitor::list_for_competition(&db, competition_id).await?))
}

async fn get_competitor(State(db): State<DatabaseConnection>, Path(competitor_id): Path<i32>) -> Result<Json<Competitor>, APIError> {
    Ok(Json(Competitor::get(&db, competitor_id).await?))
}

async fn update_competitor(State(db): State<DatabaseConnection>, Path(competitor_id): Path<i32>, ApiJson(request): ApiJson<CompetitorUpdate>) -> Result<Json<Competitor>, APIError> {
    let competitor = Competitor::update(&db, competitor_id, request).await?;
    Ok(Json(competitor))
}

async fn delete_competitor(State(db): State<DatabaseConnection>, Path(competitor_id): Path<i32>) -> Result<StatusCode, APIError> {
    Competitor::delete(&db, competitor_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_competitor_competition(State(db): State<DatabaseConnection>, Path(competitor_id): Path<i32>) -> Result<Json<Competition>, APIError> {
    Ok(Json(Competitor::competition(&db, competitor_id).await?))
}

async fn get_competitor_battles(State(db): State<DatabaseConnection>, Path(competitor_id): Path<i32>) -> Result<Json<Vec<BattleListing>>, APIError> {
    Ok(Json(Competitor::battles(&db, competitor_id).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
    .route("/competitors", get(list_competitors).post(create_competitor))
    .route("/competitors/competition/:competition_id", get(list_competitors_in_competition))
    .route("/competitors/:competitor_id", get(get_competitor).patch(update_competitor).delete(delete_competitor))
    .route("/competitors/:competitor_id/competition", get(get_competitor_competition))
    .route("/competitors/:competitor_id/battles", get(get_competitor_battles))
}
