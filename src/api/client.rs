//! Shared client that turns one call into exactly one intercepted HTTP exchange.

// crates.io
use http::Method;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::{self, ClientConfig},
	error::ConfigError,
	http::{ApiHttpClient, ApiRequest, ResponseKind},
	interceptor::{Interceptors, RequestInterceptor, ResponseInterceptor},
	obs::{self, CallKind, CallOutcome, CallSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient>;

/// Describes one backend call before it is turned into an [`ApiRequest`].
#[derive(Clone, Debug)]
pub struct CallRequest<'a> {
	/// HTTP method.
	pub method: Method,
	/// Path segments appended to the base URL, each encoded as one segment.
	pub segments: &'a [&'a str],
	/// Query parameters appended verbatim, in order.
	pub query: Option<&'a [(String, String)]>,
	/// Pre-encoded JSON body.
	pub body: Option<Vec<u8>>,
	/// Expected response treatment.
	pub response_kind: ResponseKind,
}
impl<'a> CallRequest<'a> {
	/// Creates a call with no query, no body, and a JSON response.
	pub fn new(method: Method, segments: &'a [&'a str]) -> Self {
		Self { method, segments, query: None, body: None, response_kind: ResponseKind::Json }
	}

	/// Attaches query parameters.
	pub fn with_query(mut self, query: &'a [(String, String)]) -> Self {
		self.query = Some(query);

		self
	}

	/// Serializes `body` as JSON.
	pub fn with_json<B>(mut self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_vec(body).map_err(|source| Error::Encode { source })?);

		Ok(self)
	}

	/// Declares the response as an opaque binary blob.
	pub fn binary(mut self) -> Self {
		self.response_kind = ResponseKind::Binary;

		self
	}
}

/// Configured HTTP client shared by every facade call.
///
/// The configuration is read once: the base URL is resolved at construction and the default
/// headers are copied onto each request before the request interceptors run.
#[derive(Clone)]
pub struct ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Transport used for every outbound request.
	pub http_client: Arc<C>,
	config: Arc<ClientConfig>,
	base_url: Url,
	interceptors: Interceptors,
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client around a caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Result<Self> {
		let base_url = config.resolve_base_url()?;

		Ok(Self {
			http_client: http_client.into(),
			config: Arc::new(config),
			base_url,
			interceptors: Interceptors::default(),
		})
	}

	/// Appends a request interceptor.
	pub fn with_request_interceptor(mut self, interceptor: impl 'static + RequestInterceptor) -> Self {
		self.interceptors.push_request(Arc::new(interceptor));

		self
	}

	/// Appends a response interceptor.
	pub fn with_response_interceptor(
		mut self,
		interceptor: impl 'static + ResponseInterceptor,
	) -> Self {
		self.interceptors.push_response(Arc::new(interceptor));

		self
	}

	/// Configuration the client was built from.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Absolute base URL every endpoint is resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Registered interceptor chains.
	pub fn interceptors(&self) -> &Interceptors {
		&self.interceptors
	}

	/// Builds the outbound request for `call`, without running interceptors.
	pub fn build_request(&self, call: CallRequest<'_>) -> Result<ApiRequest> {
		let mut url = config::endpoint(&self.base_url, call.segments);

		if let Some(query) = call.query.filter(|query| !query.is_empty()) {
			url.query_pairs_mut().extend_pairs(query);
		}

		let mut request = http::Request::builder()
			.method(call.method)
			.uri(url.as_str())
			.body(call.body.unwrap_or_default())
			.map_err(ConfigError::from)?;

		request.headers_mut().extend(self.config.default_headers.clone());
		request.extensions_mut().insert(call.response_kind);

		Ok(request)
	}

	/// Runs `request` through the interceptors and transport, returning only the body.
	///
	/// Non-success statuses become [`Error::Status`]. Every failure, including a rejected
	/// request, passes through the error hooks before it is returned.
	pub async fn send(&self, request: ApiRequest) -> Result<Vec<u8>> {
		self.dispatch(request).await.map_err(|e| self.interceptors.apply_error(e))
	}

	/// Builds, sends, and observes one call.
	pub async fn call(&self, kind: CallKind, call: CallRequest<'_>) -> Result<Vec<u8>> {
		let span = CallSpan::new(kind, "call");

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = self.build_request(call).map_err(|e| self.interceptors.apply_error(e))?;

				self.send(request).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		obs::log_call_result(kind, &result);

		result
	}

	/// Performs a JSON call and decodes the body into `T`.
	pub async fn call_json<T>(&self, kind: CallKind, call: CallRequest<'_>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let body = self.call(kind, call).await?;

		decode_json(&body)
	}

	async fn dispatch(&self, request: ApiRequest) -> Result<Vec<u8>> {
		let request = self.interceptors.apply_request(request)?;
		let response = self.http_client.execute(request).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(Error::Status { status: status.as_u16(), body: response.into_body() });
		}

		let response = self.interceptors.apply_response(response)?;

		Ok(response.into_body())
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient> {
	/// Creates a client with a reqwest transport honoring the configured timeout.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Self::with_http_client(config, http_client)
	}

	/// Creates a client from the process environment.
	pub fn from_env() -> Result<Self> {
		Self::new(ClientConfig::from_env())
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.base_url.as_str())
			.field("timeout", &self.config.timeout)
			.field("interceptors", &self.interceptors)
			.finish()
	}
}

/// Decodes a JSON body, treating a blank body as `null`.
pub fn decode_json<T>(body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) { b"null" } else { body };
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| Error::Decode { source })
}
