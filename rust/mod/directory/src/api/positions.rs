use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use filial_core::ServiceError;

use crate::api::AppState;
use crate::model::{CreatePosition, Position};

pub fn routes() -> Router<AppState> {
    Router::new().route("/positions", get(list_positions).post(create_position))
}

async fn list_positions(State(svc): State<AppState>) -> Result<Json<Vec<Position>>, ServiceError> {
    Ok(Json(svc.list_positions()?))
}

async fn create_position(
    State(svc): State<AppState>,
    Json(input): Json<CreatePosition>,
) -> Result<(StatusCode, Json<Position>), ServiceError> {
    let position = svc.create_position(input)?;
    Ok((StatusCode::CREATED, Json(position)))
}
