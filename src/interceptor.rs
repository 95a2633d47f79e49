//! Ordered request/response middleware applied around every backend call.
//!
//! Interceptors replace ad-hoc hooks with explicit lists: request interceptors see the
//! outbound [`ApiRequest`] after default headers are attached, response interceptors see the
//! full envelope of success-status responses, and every failure flows through
//! [`ResponseInterceptor::on_error`]. All stages run in registration order. An empty chain is a
//! pass-through.

// crates.io
use http::{HeaderName, HeaderValue};
// self
use crate::{
	_prelude::*,
	http::{ApiRequest, ApiResponse},
};

/// Hook invoked on every outbound request before it reaches the transport.
pub trait RequestInterceptor
where
	Self: Send + Sync,
{
	/// Stable label used in logs and [`Error::Interceptor`].
	fn name(&self) -> &'static str;

	/// Transforms the request or rejects the call.
	fn intercept(&self, request: ApiRequest) -> Result<ApiRequest>;
}

/// Hook invoked on every inbound response or failure before it reaches caller code.
pub trait ResponseInterceptor
where
	Self: Send + Sync,
{
	/// Stable label used in logs and [`Error::Interceptor`].
	fn name(&self) -> &'static str;

	/// Transforms a success-status response or turns it into a failure.
	fn on_response(&self, response: ApiResponse) -> Result<ApiResponse> {
		Ok(response)
	}

	/// Observes or replaces a failure. Forwards it unchanged by default.
	fn on_error(&self, error: Error) -> Error {
		error
	}
}

/// Request interceptor that sets one header on every outbound request.
///
/// This is the hook point for derived headers such as an auth token.
#[derive(Clone, Debug)]
pub struct AttachHeader {
	name: HeaderName,
	value: HeaderValue,
}
impl AttachHeader {
	/// Creates an interceptor inserting `name: value`, replacing any existing value.
	pub fn new(name: HeaderName, value: HeaderValue) -> Self {
		Self { name, value }
	}

	/// Creates an `authorization: Bearer <token>` interceptor.
	pub fn bearer(token: &str) -> Result<Self> {
		let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
			Error::Interceptor {
				interceptor: "attach_header",
				reason: "bearer token is not a valid header value".into(),
			}
		})?;

		Ok(Self::new(http::header::AUTHORIZATION, value))
	}
}
impl RequestInterceptor for AttachHeader {
	fn name(&self) -> &'static str {
		"attach_header"
	}

	fn intercept(&self, mut request: ApiRequest) -> Result<ApiRequest> {
		request.headers_mut().insert(self.name.clone(), self.value.clone());

		Ok(request)
	}
}

/// Ordered interceptor lists shared by every clone of a client.
#[derive(Clone, Default)]
pub struct Interceptors {
	request: Vec<Arc<dyn RequestInterceptor>>,
	response: Vec<Arc<dyn ResponseInterceptor>>,
}
impl Interceptors {
	/// Appends a request interceptor to the end of the chain.
	pub fn push_request(&mut self, interceptor: Arc<dyn RequestInterceptor>) {
		self.request.push(interceptor);
	}

	/// Appends a response interceptor to the end of the chain.
	pub fn push_response(&mut self, interceptor: Arc<dyn ResponseInterceptor>) {
		self.response.push(interceptor);
	}

	/// Runs the request chain, stopping at the first rejection.
	pub fn apply_request(&self, request: ApiRequest) -> Result<ApiRequest> {
		self.request.iter().try_fold(request, |request, interceptor| interceptor.intercept(request))
	}

	/// Runs the success chain, stopping at the first rejection.
	pub fn apply_response(&self, response: ApiResponse) -> Result<ApiResponse> {
		self.response
			.iter()
			.try_fold(response, |response, interceptor| interceptor.on_response(response))
	}

	/// Runs the failure chain over `error`.
	pub fn apply_error(&self, error: Error) -> Error {
		self.response.iter().fold(error, |error, interceptor| interceptor.on_error(error))
	}
}
impl Debug for Interceptors {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Interceptors")
			.field("request", &self.request.iter().map(|i| i.name()).collect::<Vec<_>>())
			.field("response", &self.response.iter().map(|i| i.name()).collect::<Vec<_>>())
			.finish()
	}
}
