//! Local HTTP stand-ins for the forecast provider, SwitchBot and Discord.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Binds `router` on an ephemeral localhost port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Requests seen by a mock, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<RecordedRequest>>>);

impl RequestLog {
    pub fn take(&self) -> Vec<RecordedRequest> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    fn push(&self, request: RecordedRequest) {
        self.0.lock().unwrap().push(request);
    }
}

#[derive(Clone)]
struct MockState {
    log: RequestLog,
    status: StatusCode,
    reply: Value,
}

async fn record(
    State(state): State<MockState>,
    uri: axum::http::Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.log.push(RecordedRequest {
        path: uri.path().to_owned(),
        headers,
        body,
    });
    (state.status, Json(state.reply))
}

/// A POST endpoint at every path that records the request and answers with
/// `status` and `reply`.
pub async fn recording_server(status: StatusCode, reply: Value) -> (String, RequestLog) {
    let log = RequestLog::default();
    let state = MockState {
        log: log.clone(),
        status,
        reply,
    };
    let router = Router::new().fallback(record).with_state(state);
    (serve(router).await, log)
}

/// SwitchBot mock that answers every command with `statusCode: 100`.
pub async fn switchbot_ok() -> (String, RequestLog) {
    recording_server(
        StatusCode::OK,
        json!({ "statusCode": 100, "body": {}, "message": "success" }),
    )
    .await
}

/// Forecast mock serving `body` for any city code.
pub async fn forecast_server(body: Value) -> String {
    let router = Router::new().route(
        "/api/forecast/city/{code}",
        get(move || async move { Json(body) }),
    );
    format!("{}/api/forecast/city", serve(router).await)
}
