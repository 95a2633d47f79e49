// crates.io
use parking_lot::Mutex;
use serde_json::{Value, json};
// self
use douyin_compare_client::{
	_preludet::*,
	api::{ApiClient, DouyinUserApi, IdentifierError, UserId, VideoQuery},
	config::ClientConfig,
	error::TransportError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, ResponseKind, TransportFuture},
	interceptor::{RequestInterceptor, ResponseInterceptor},
};

#[derive(Clone)]
struct Recorded {
	method: String,
	uri: String,
	content_type: Option<String>,
	body: Vec<u8>,
	kind: ResponseKind,
}

#[derive(Clone, Copy)]
enum Reply {
	Ok(u16, &'static [u8]),
	Fail,
}

/// In-process transport that records every request and answers with a canned reply.
#[derive(Clone)]
struct RecordingHttpClient {
	requests: Arc<Mutex<Vec<Recorded>>>,
	reply: Reply,
}
impl RecordingHttpClient {
	fn replying(status: u16, body: &'static [u8]) -> Self {
		Self { requests: Default::default(), reply: Reply::Ok(status, body) }
	}

	fn failing() -> Self {
		Self { requests: Default::default(), reply: Reply::Fail }
	}

	fn recorded(&self) -> Vec<Recorded> {
		self.requests.lock().clone()
	}
}
impl ApiHttpClient for RecordingHttpClient {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let recorded = Recorded {
			method: request.method().to_string(),
			uri: request.uri().to_string(),
			content_type: request
				.headers()
				.get("content-type")
				.and_then(|value| value.to_str().ok())
				.map(ToOwned::to_owned),
			kind: ResponseKind::of(&request),
			body: request.into_body(),
		};

		self.requests.lock().push(recorded);

		let reply = self.reply;

		Box::pin(async move {
			match reply {
				Reply::Ok(status, body) => {
					let mut response = ApiResponse::new(body.to_vec());

					*response.status_mut() = status.try_into().expect("Fixture status should be valid.");

					Ok(response)
				},
				Reply::Fail =>
					Err(TransportError::network(std::io::Error::other("connection reset")).into()),
			}
		})
	}
}

fn api(transport: &RecordingHttpClient) -> DouyinUserApi<RecordingHttpClient> {
	let config = ClientConfig::default().with_origin("http://backend.test");
	let client = ApiClient::with_http_client(config, transport.clone())
		.expect("Recording client should build.");

	DouyinUserApi::new(client)
}

fn query_of(uri: &str) -> VideoQuery {
	Url::parse(uri)
		.expect("Recorded URI should parse.")
		.query_pairs()
		.map(|(k, v)| (k.into_owned(), v.into_owned()))
		.collect()
}

#[tokio::test]
async fn compare_users_sends_exactly_one_request_with_user_ids_body() {
	let cases: [&[&str]; 4] = [&[], &["u1"], &["u2", "u1"], &["a", "b", "c", "MS4wLjABAAAA"]];

	for ids in cases {
		let transport = RecordingHttpClient::replying(200, b"{\"matches\":[]}");
		let ids = UserId::many(ids.iter()).expect("Fixture ids should be valid.");

		api(&transport).compare_users(&ids).await.expect("Comparison should succeed.");

		let recorded = transport.recorded();

		assert_eq!(recorded.len(), 1);
		assert_eq!(recorded[0].method, "POST");
		assert_eq!(recorded[0].uri, "http://backend.test/api/douyin/compare");

		let body: Value =
			serde_json::from_slice(&recorded[0].body).expect("Recorded body should be JSON.");
		let expected: Vec<&str> = ids.iter().map(|id| &**id).collect();

		assert_eq!(body, json!({ "userIds": expected }));
	}
}

#[tokio::test]
async fn get_user_info_targets_exact_path() {
	let cases = [
		("u1", "u1"),
		("MS4wLjABAAAA_x-Y", "MS4wLjABAAAA_x-Y"),
		("user.name", "user.name"),
		("...", "..."),
		("50%off", "50%25off"),
		("a?b", "a%3Fb"),
		("a#b", "a%23b"),
	];

	for (raw, encoded) in cases {
		let transport = RecordingHttpClient::replying(200, b"{\"name\":\"x\"}");

		api(&transport).get_user_info(&user_id(raw)).await.expect("Lookup should succeed.");

		let recorded = transport.recorded();

		assert_eq!(recorded.len(), 1);
		assert_eq!(recorded[0].method, "GET");
		assert_eq!(recorded[0].uri, format!("http://backend.test/api/douyin/user/{encoded}"));
		assert!(Url::parse(&recorded[0].uri).expect("Recorded URI should parse.").query().is_none());
	}
}

#[tokio::test]
async fn path_special_ids_stay_inside_their_segment() {
	let transport = RecordingHttpClient::replying(200, b"[]");
	let api = api(&transport);

	for raw in ["50%off", "a?b"] {
		api.get_user_videos(&user_id(raw), &VideoQuery::new())
			.await
			.expect("Video listing should succeed.");
	}

	let uris = transport.recorded().into_iter().map(|r| r.uri).collect::<Vec<_>>();

	assert_eq!(uris, [
		"http://backend.test/api/douyin/user/50%25off/videos",
		"http://backend.test/api/douyin/user/a%3Fb/videos",
	]);
}

#[test]
fn dot_segment_ids_cannot_reach_the_transport() {
	for raw in [".", ".."] {
		assert!(matches!(UserId::new(raw), Err(IdentifierError::DotSegment)));
		assert!(serde_json::from_value::<UserId>(json!(raw)).is_err());
	}
}

#[tokio::test]
async fn get_user_videos_query_equals_params() {
	let transport = RecordingHttpClient::replying(200, b"[]");
	let params = VideoQuery::from([
		("cursor".to_owned(), "0".to_owned()),
		("count".to_owned(), "18".to_owned()),
		("keyword".to_owned(), "猫 & 狗".to_owned()),
	]);

	api(&transport)
		.get_user_videos(&user_id("u3"), &params)
		.await
		.expect("Video listing should succeed.");

	let recorded = transport.recorded();
	let uri = &recorded[0].uri;

	assert!(uri.starts_with("http://backend.test/api/douyin/user/u3/videos?"));
	assert_eq!(query_of(uri), params);
}

#[tokio::test]
async fn get_user_videos_keeps_caller_order_and_repeated_keys() {
	let transport = RecordingHttpClient::replying(200, b"[]");
	let params = vec![
		("count".to_owned(), "18".to_owned()),
		("tag".to_owned(), "b".to_owned()),
		("cursor".to_owned(), "0".to_owned()),
		("tag".to_owned(), "a".to_owned()),
	];

	api(&transport)
		.get_user_videos(&user_id("u3"), &params)
		.await
		.expect("Video listing should succeed.");

	let recorded = transport.recorded();

	assert_eq!(
		recorded[0].uri,
		"http://backend.test/api/douyin/user/u3/videos?count=18&tag=b&cursor=0&tag=a"
	);
	assert_eq!(query_of(&recorded[0].uri), params);
}

#[tokio::test]
async fn default_content_type_is_sent_on_every_call() {
	let transport = RecordingHttpClient::replying(200, b"{}");
	let api = api(&transport);
	let ids = user_ids(["u1"]);

	api.compare_users(&ids).await.expect("Comparison should succeed.");
	api.get_user_info(&ids[0]).await.expect("Lookup should succeed.");
	api.get_user_videos(&ids[0], &VideoQuery::new()).await.expect("Listing should succeed.");
	api.download_user_links(&ids).await.expect("Download should succeed.");

	let recorded = transport.recorded();

	assert_eq!(recorded.len(), 4);

	for request in recorded {
		assert_eq!(request.content_type.as_deref(), Some("application/json"));
	}
}

#[tokio::test]
async fn download_declares_binary_and_skips_json_parsing() {
	let transport = RecordingHttpClient::replying(200, b"\xff\xfe not json at all");
	let links = api(&transport)
		.download_user_links(&user_ids(["u1", "u2"]))
		.await
		.expect("Invalid JSON must not fail a binary download.");

	assert_eq!(links.as_bytes(), b"\xff\xfe not json at all");

	let recorded = transport.recorded();

	assert_eq!(recorded[0].kind, ResponseKind::Binary);
	assert_eq!(recorded[0].uri, "http://backend.test/api/douyin/download-links");
	assert_eq!(recorded[0].body, br#"{"userIds":["u1","u2"]}"#);
}

#[tokio::test]
async fn json_calls_reject_non_json_bodies() {
	let transport = RecordingHttpClient::replying(200, b"<html>");
	let err = api(&transport)
		.get_user_info(&user_id("u1"))
		.await
		.expect_err("HTML is not a JSON payload.");

	assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn transport_failures_are_forwarded() {
	let transport = RecordingHttpClient::failing();
	let err = api(&transport)
		.compare_users(&user_ids(["u1"]))
		.await
		.expect_err("Transport failure must reach the caller.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	assert_eq!(transport.recorded().len(), 1, "Failures must not be retried.");
}

struct Deny;
impl RequestInterceptor for Deny {
	fn name(&self) -> &'static str {
		"deny"
	}

	fn intercept(&self, _request: ApiRequest) -> Result<ApiRequest> {
		Err(Error::Interceptor { interceptor: "deny", reason: "no session".into() })
	}
}

struct CountErrors(Arc<Mutex<Vec<String>>>);
impl ResponseInterceptor for CountErrors {
	fn name(&self) -> &'static str {
		"count_errors"
	}

	fn on_error(&self, error: Error) -> Error {
		self.0.lock().push(error.to_string());

		error
	}
}

/// Appends its label to a shared trail for every response or failure it sees.
struct Trail(&'static str, Arc<Mutex<Vec<String>>>);
impl ResponseInterceptor for Trail {
	fn name(&self) -> &'static str {
		self.0
	}

	fn on_response(&self, response: ApiResponse) -> Result<ApiResponse> {
		self.1.lock().push(format!("{}:response", self.0));

		Ok(response)
	}

	fn on_error(&self, error: Error) -> Error {
		self.1.lock().push(format!("{}:error", self.0));

		error
	}
}

struct StripEnvelope;
impl ResponseInterceptor for StripEnvelope {
	fn name(&self) -> &'static str {
		"strip_envelope"
	}

	fn on_response(&self, response: ApiResponse) -> Result<ApiResponse> {
		let value: Value = serde_json::from_slice(response.body()).map_err(|e| {
			Error::Interceptor { interceptor: "strip_envelope", reason: e.to_string() }
		})?;
		let data = serde_json::to_vec(&value["data"]).map_err(|e| Error::Interceptor {
			interceptor: "strip_envelope",
			reason: e.to_string(),
		})?;

		Ok(response.map(|_| data))
	}
}

#[tokio::test]
async fn rejected_request_never_reaches_transport_but_hits_error_hooks() {
	let transport = RecordingHttpClient::replying(200, b"{}");
	let seen = Arc::new(Mutex::new(Vec::new()));
	let config = ClientConfig::default();
	let client = ApiClient::with_http_client(config, transport.clone())
		.expect("Recording client should build.")
		.with_request_interceptor(Deny)
		.with_response_interceptor(CountErrors(seen.clone()));
	let err = DouyinUserApi::new(client)
		.get_user_info(&user_id("u1"))
		.await
		.expect_err("Deny must reject the call.");

	assert!(matches!(err, Error::Interceptor { interceptor: "deny", .. }));
	assert!(transport.recorded().is_empty());
	assert_eq!(seen.lock().len(), 1);
}

#[tokio::test]
async fn rejected_request_runs_every_error_hook_in_order() {
	let transport = RecordingHttpClient::replying(200, b"{}");
	let trail = Arc::new(Mutex::new(Vec::new()));
	let client = ApiClient::with_http_client(ClientConfig::default(), transport.clone())
		.expect("Recording client should build.")
		.with_request_interceptor(Deny)
		.with_response_interceptor(Trail("first", trail.clone()))
		.with_response_interceptor(Trail("second", trail.clone()))
		.with_response_interceptor(Trail("third", trail.clone()));
	let err = DouyinUserApi::new(client)
		.compare_users(&user_ids(["u1", "u2"]))
		.await
		.expect_err("Deny must reject the call.");

	assert!(matches!(err, Error::Interceptor { interceptor: "deny", .. }));
	assert!(transport.recorded().is_empty());
	assert_eq!(trail.lock().as_slice(), ["first:error", "second:error", "third:error"]);
}

#[tokio::test]
async fn status_errors_pass_through_error_hooks_unchanged() {
	let transport = RecordingHttpClient::replying(503, b"busy");
	let seen = Arc::new(Mutex::new(Vec::new()));
	let client = ApiClient::with_http_client(ClientConfig::default(), transport.clone())
		.expect("Recording client should build.")
		.with_response_interceptor(CountErrors(seen.clone()));
	let err = DouyinUserApi::new(client)
		.download_user_links(&user_ids(["u1"]))
		.await
		.expect_err("HTTP 503 must surface as an error.");

	assert_eq!(err.status(), Some(503));
	assert_eq!(seen.lock().as_slice(), ["Backend responded with HTTP 503."]);
}

#[tokio::test]
async fn response_interceptors_transform_before_unwrapping() {
	let transport = RecordingHttpClient::replying(200, b"{\"code\":0,\"data\":{\"name\":\"x\"}}");
	let client = ApiClient::with_http_client(ClientConfig::default(), transport)
		.expect("Recording client should build.")
		.with_response_interceptor(StripEnvelope);
	let value = DouyinUserApi::new(client)
		.get_user_info(&user_id("u1"))
		.await
		.expect("Envelope should be stripped.");

	assert_eq!(value, json!({ "name": "x" }));
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
	let transport = RecordingHttpClient::replying(200, b"{}");
	let api = api(&transport);
	let (u1, u2) = (user_id("u1"), user_id("u2"));
	let (a, b, c) =
		tokio::join!(api.get_user_info(&u1), api.get_user_info(&u2), api.compare_users(&[]));

	a.expect("First call should succeed.");
	b.expect("Second call should succeed.");
	c.expect("Third call should succeed.");

	let mut uris = transport.recorded().into_iter().map(|r| r.uri).collect::<Vec<_>>();

	uris.sort();

	assert_eq!(uris, [
		"http://backend.test/api/douyin/compare",
		"http://backend.test/api/douyin/user/u1",
		"http://backend.test/api/douyin/user/u2",
	]);
}
