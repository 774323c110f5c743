use std::borrow::BorrowMut;

use axum::{response::Response, http::{Request, request::Builder}, body::Body};
use battle_tab_entities::mock::{self, MockCompetition, MockOption};
use battle_tab_server::state::AppState;
use http_body::{combinators::UnsyncBoxBody, Body as _};
use sea_orm::DatabaseConnection;
use tower::Service;


#[derive(Default)]
pub struct FixtureOptions {
    pub mock_competition: Option<MockOption>,
}

pub struct Fixture {
    pub app: axum::Router,
    pub db: DatabaseConnection,
    pub mock: Option<MockCompetition>,
}

pub struct APIResponse {
    response: Response<UnsyncBoxBody<axum::body::Bytes, axum::Error>>,
}

impl APIResponse {
    pub fn status(&self) -> axum::http::StatusCode {
        self.response.status()
    }

    async fn bytes(&mut self) -> Vec<u8> {
        let mut buf = Vec::new();

        let body = self.response.body_mut();

        while let Some(next) = body.data().await {
            buf.extend_from_slice(&next.unwrap());
        }
        buf
    }

    pub async fn json<T: serde::de::DeserializeOwned>(&mut self) -> T {
        let buf = self.bytes().await;
        serde_json::from_slice(&buf).unwrap()
    }

    #[allow(dead_code)]
    pub async fn text(&mut self) -> String {
        String::from_utf8(self.bytes().await).unwrap()
    }
}

impl From<Response<UnsyncBoxBody<axum::body::Bytes, axum::Error>>> for APIResponse {
    fn from(response: Response<UnsyncBoxBody<hyper::body::Bytes, axum::Error>>) -> Self {
        Self {
            response,
        }
    }
}

impl Fixture {
    pub async fn new(options: FixtureOptions) -> Self {
        let state = AppState::new_test_app().await;
        let mock = match options.mock_competition {
            Some(mock_options) => Some(
                mock::make_mock_competition_with_options(&state.db, mock_options).await.unwrap()
            ),
            None => None,
        };
        let db = state.db.clone();

        Self {
            app: battle_tab_server::app_with_state(state).await,
            db,
            mock,
        }
    }

    #[allow(dead_code)]
    pub async fn default() -> Self {
        Self::new(FixtureOptions::default()).await
    }

    #[allow(dead_code)]
    pub async fn with_mock(options: MockOption) -> Self {
        Self::new(FixtureOptions { mock_competition: Some(options) }).await
    }

    #[allow(dead_code)]
    pub fn mock(&self) -> &MockCompetition {
        self.mock.as_ref().expect("Fixture was created without a mock competition")
    }

    async fn send(&mut self, request: Request<Body>) -> APIResponse {
        self.app.borrow_mut()
            .call(request)
            .await
            .unwrap().into()
    }

    fn json_request<T>(method: &str, path: &str, body: T) -> Request<Body> where T: serde::Serialize {
        Request::builder()
            .method(method)
            .header("Content-Type", "application/json")
            .uri(path)
            .body(
                Body::from(
                    serde_json::to_string(&body).unwrap()
                )
            )
            .unwrap()
    }

    fn get_base_request(&self) -> Builder {
        Request::builder()
    }

    #[allow(dead_code)]
    pub async fn get(&mut self, path: &str) -> APIResponse {
        let request = self.get_base_request()
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    #[allow(dead_code)]
    pub async fn delete(&mut self, path: &str) -> APIResponse {
        let request = self.get_base_request()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    #[allow(dead_code)]
    pub async fn post_json<T>(&mut self, path: &str, body: T) -> APIResponse where T: serde::Serialize {
        self.send(Self::json_request("POST", path, body)).await
    }

    #[allow(dead_code)]
    pub async fn patch_json<T>(&mut self, path: &str, body: T) -> APIResponse where T: serde::Serialize {
        self.send(Self::json_request("PATCH", path, body)).await
    }

    #[allow(dead_code)]
    pub async fn post_raw(&mut self, path: &str, body: &'static str) -> APIResponse {
        let request = self.get_base_request()
            .method("POST")
            .header("Content-Type", "application/json")
            .uri(path)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}
