use std::{
	collections::{HashMap, VecDeque},
	sync::Mutex,
};

use serde_json::Value;

use zdb_client::{ApiClient, ApiResponse, BoxFuture, Error, Query, Result};

/// What a scripted route answers with.
#[derive(Debug, Clone)]
pub enum Reply {
	Ok(Value),
	Status(u16, String),
	Timeout,
}
impl Reply {
	fn into_result(self, path: &str) -> Result<ApiResponse> {
		match self {
			Self::Ok(data) => Ok(ApiResponse { data, status: 200, status_text: "OK".to_string() }),
			Self::Status(status, message) =>
				Err(Error::Status { path: path.to_string(), status, message }),
			Self::Timeout => Err(Error::Timeout { path: path.to_string() }),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	Get,
	Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
	pub method: Method,
	pub path: String,
	pub query: Vec<(String, String)>,
	pub body: Option<Value>,
}
impl RecordedRequest {
	pub fn query_param(&self, key: &str) -> Option<&str> {
		self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}
}

#[derive(Default)]
struct Route {
	queue: VecDeque<Reply>,
	sticky: Option<Reply>,
}

/// In-memory stand-in for the backend. Replies are scripted per path: queued
/// replies are consumed first, then the sticky reply repeats. Unscripted paths
/// answer 404.
#[derive(Default)]
pub struct ScriptedClient {
	routes: Mutex<HashMap<String, Route>>,
	requests: Mutex<Vec<RecordedRequest>>,
}
impl ScriptedClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&self, path: &str, reply: Reply) -> &Self {
		let mut routes = self.routes.lock().unwrap_or_else(|err| err.into_inner());

		routes.entry(path.to_string()).or_default().queue.push_back(reply);

		self
	}

	pub fn push_ok(&self, path: &str, data: Value) -> &Self {
		self.push(path, Reply::Ok(data))
	}

	pub fn push_status(&self, path: &str, status: u16) -> &Self {
		self.push(path, Reply::Status(status, format!("scripted status {status}")))
	}

	pub fn always(&self, path: &str, reply: Reply) -> &Self {
		let mut routes = self.routes.lock().unwrap_or_else(|err| err.into_inner());

		routes.entry(path.to_string()).or_default().sticky = Some(reply);

		self
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
		self.requests().into_iter().filter(|req| req.path == path).collect()
	}

	pub fn calls(&self, path: &str) -> usize {
		self.requests_to(path).len()
	}

	pub fn total_calls(&self) -> usize {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	fn answer(&self, request: RecordedRequest) -> Result<ApiResponse> {
		let path = request.path.clone();

		self.requests.lock().unwrap_or_else(|err| err.into_inner()).push(request);

		let reply = {
			let mut routes = self.routes.lock().unwrap_or_else(|err| err.into_inner());

			routes
				.get_mut(&path)
				.and_then(|route| route.queue.pop_front().or_else(|| route.sticky.clone()))
		};

		reply
			.unwrap_or_else(|| Reply::Status(404, format!("No scripted reply for {path}.")))
			.into_result(&path)
	}
}

impl ApiClient for ScriptedClient {
	fn get<'a>(&'a self, path: &'a str, query: &'a Query) -> BoxFuture<'a, Result<ApiResponse>> {
		let request = RecordedRequest {
			method: Method::Get,
			path: path.to_string(),
			query: query.to_vec(),
			body: None,
		};

		Box::pin(async move { self.answer(request) })
	}

	fn post<'a>(&'a self, path: &'a str, body: &'a Value) -> BoxFuture<'a, Result<ApiResponse>> {
		let request = RecordedRequest {
			method: Method::Post,
			path: path.to_string(),
			query: Vec::new(),
			body: Some(body.clone()),
		};

		Box::pin(async move { self.answer(request) })
	}
}
