use axum::async_trait;
use axum::extract::{FromRequest, rejection::JsonRejection};
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use axum::Json;
use battle_tab_entities::EntityError;
use hyper::StatusCode;
use sea_orm::DbErr;
use serde::{Serialize, Deserialize};
use tracing::{error, warn};


#[derive(Debug, Clone)]
pub struct APIError {
    pub message: String,
    pub code: StatusCode
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct APIErrorResponse {
    pub message: String
}

impl APIError {
    pub fn new(message: String) -> Self {
        APIError {
            message,
            code: StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<EntityError> for APIError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::NotFound { .. } => {
                warn!("{}", err);
                APIError { message: err.to_string(), code: StatusCode::NOT_FOUND }
            },
            EntityError::InvalidArgument(message) => {
                warn!("Rejected request: {}", message);
                APIError { message, code: StatusCode::BAD_REQUEST }
            },
            EntityError::Conflict(message) => {
                warn!("Rejected request: {}", message);
                APIError { message, code: StatusCode::CONFLICT }
            },
            EntityError::Database(err) => err.into(),
        }
    }
}

impl From<DbErr> for APIError {
    fn from(err: DbErr) -> Self {
        error!("Database error while handling request {}", err);
        APIError::new("Internal database error".into())
    }
}

impl From<anyhow::Error> for APIError {
    fn from(err: anyhow::Error) -> Self {
        error!("Error while handling request {}", err);
        APIError { message: err.to_string(), code: StatusCode::INTERNAL_SERVER_ERROR }
    }
}

impl IntoResponse for APIError
{
    fn into_response(self) -> Response {
        let mut res = Json(APIErrorResponse {message: self.message}).into_response();
        *res.status_mut() = self.code;
        res
    }
}


impl From<(StatusCode, &str)> for APIError {
    fn from((code, message): (StatusCode, &str)) -> Self {
        error!("Error while handling request {}", message);
        APIError { message: message.to_string(), code }
    }
}

impl From<(StatusCode, String)> for APIError {
    fn from((code, message): (StatusCode, String)) -> Self {
        error!("Error while handling request {}", message);
        APIError { message, code }
    }
}

/// `Json` extractor that reports malformed bodies as 400 with the usual
/// error payload instead of axum's plain text rejection.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ApiJson<T>
where
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
    S: Send + Sync,
    B: Send + 'static,
{
    type Rejection = APIError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err((StatusCode::BAD_REQUEST, rejection.body_text()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_errors_map_to_status_codes() {
        assert_eq!(APIError::from(EntityError::not_found("Battle", 3)).code, StatusCode::NOT_FOUND);
        assert_eq!(APIError::from(EntityError::invalid("bad")).code, StatusCode::BAD_REQUEST);
        assert_eq!(APIError::from(EntityError::Conflict("taken".into())).code, StatusCode::CONFLICT);
        assert_eq!(
            APIError::from(EntityError::Database(DbErr::Custom("disk full".into()))).code,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_details_are_not_exposed() {
        let error = APIError::from(DbErr::Custom("secret table layout".into()));
        assert!(!error.message.contains("secret"));
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let error = APIError::from(EntityError::not_found("Judge", 12));
        assert_eq!(error.message, "Judge with id 12 does not exist");
    }
}
