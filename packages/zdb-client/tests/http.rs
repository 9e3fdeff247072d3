use std::{collections::HashMap, net::SocketAddr, time::Duration};

use axum::{
	Json, Router,
	extract::Query,
	http::{HeaderMap, StatusCode},
	routing::{get, post},
};
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use zdb_client::{ApiClient, Error, HttpApiClient};
use zdb_config::Api;

async fn spawn_backend() -> SocketAddr {
	let app = Router::new()
		.route(
			"/v1/echo",
			get(|Query(params): Query<HashMap<String, String>>, headers: HeaderMap| async move {
				let auth = headers
					.get("authorization")
					.and_then(|value| value.to_str().ok())
					.unwrap_or_default()
					.to_string();
				let client = headers
					.get("x-client")
					.and_then(|value| value.to_str().ok())
					.unwrap_or_default()
					.to_string();

				Json(serde_json::json!({ "query": params, "auth": auth, "client": client }))
			}),
		)
		.route("/v1/body", post(|Json(body): Json<Value>| async move { Json(body) }))
		.route(
			"/v1/unavailable",
			get(|| async {
				(StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({ "detail": "Index warming up" })))
			}),
		)
		.route("/v1/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "not json") }))
		.route("/v1/empty", post(|| async { StatusCode::NO_CONTENT }))
		.route(
			"/v1/slow",
			get(|| async {
				tokio::time::sleep(Duration::from_millis(500)).await;

				Json(serde_json::json!({}))
			}),
		);
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind test listener.");
	let addr = listener.local_addr().expect("Failed to read listener address.");

	tokio::spawn(async move {
		axum::serve(listener, app).await.expect("Test backend failed.");
	});

	addr
}

fn client_for(addr: SocketAddr, timeout_ms: u64) -> HttpApiClient {
	let mut default_headers = Map::new();

	default_headers.insert("X-Client".to_string(), Value::String("zdb-tests".to_string()));

	let cfg = Api {
		base_url: format!("http://{addr}"),
		api_key: Some("secret".to_string()),
		timeout_ms,
		default_headers,
	};

	HttpApiClient::new(&cfg).expect("Failed to build client.")
}

#[tokio::test]
async fn get_sends_query_and_headers() {
	let addr = spawn_backend().await;
	let client = client_for(addr, 2_000);
	let query = vec![
		("q".to_string(), "vector db & more".to_string()),
		("limit".to_string(), "5".to_string()),
	];
	let res = client.get("/v1/echo", &query).await.expect("GET failed.");

	assert_eq!(res.status, 200);
	assert_eq!(res.status_text, "OK");
	assert_eq!(res.data["query"]["q"], "vector db & more");
	assert_eq!(res.data["query"]["limit"], "5");
	assert_eq!(res.data["auth"], "Bearer secret");
	assert_eq!(res.data["client"], "zdb-tests");
}

#[tokio::test]
async fn post_round_trips_json_body() {
	let addr = spawn_backend().await;
	let client = client_for(addr, 2_000);
	let body = serde_json::json!({ "query": "hello", "top_k": 3 });
	let res = client.post("/v1/body", &body).await.expect("POST failed.");

	assert_eq!(res.data, body);
}

#[tokio::test]
async fn empty_success_body_is_null() {
	let addr = spawn_backend().await;
	let client = client_for(addr, 2_000);
	let res = client.post("/v1/empty", &Value::Null).await.expect("POST failed.");

	assert_eq!(res.status, 204);
	assert_eq!(res.data, Value::Null);
}

#[tokio::test]
async fn error_status_carries_detail_message() {
	let addr = spawn_backend().await;
	let client = client_for(addr, 2_000);
	let err = client.get("/v1/unavailable", &[]).await.expect_err("Expected status error.");

	assert_eq!(err.status(), Some(503));
	assert!(!err.is_timeout());

	match err {
		Error::Status { path, message, .. } => {
			assert_eq!(path, "/v1/unavailable");
			assert_eq!(message, "Index warming up");
		},
		other => panic!("Unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn non_json_error_body_uses_reason_phrase() {
	let addr = spawn_backend().await;
	let client = client_for(addr, 2_000);
	let err = client.get("/v1/teapot", &[]).await.expect_err("Expected status error.");

	assert_eq!(err.status(), Some(418));
	assert!(err.to_string().contains("I'm a teapot"), "Unexpected error: {err}");
}

#[tokio::test]
async fn slow_backend_times_out() {
	let addr = spawn_backend().await;
	let client = client_for(addr, 50);
	let err = client.get("/v1/slow", &[]).await.expect_err("Expected timeout.");

	assert!(err.is_timeout(), "Unexpected error: {err:?}");
	assert_eq!(err.status(), None);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind listener.");
	let addr = listener.local_addr().expect("Failed to read listener address.");

	drop(listener);

	let client = client_for(addr, 2_000);
	let err = client.get("/v1/echo", &[]).await.expect_err("Expected connection error.");

	assert!(err.is_transport(), "Unexpected error: {err:?}");
	assert_eq!(err.status(), None);
}
