use axum::{body::Body, response::Response, routing::get, Router};

use crate::RestStateDef;

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new().route("/ping", get(ping))
}

pub async fn ping() -> Response {
    Response::builder()
        .status(200)
        .body(Body::new(
            r#"{"status":"ok","message":"pong"}"#.to_string(),
        ))
        .unwrap()
}
