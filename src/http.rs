//! Transport primitives for backend calls.
//!
//! The module exposes [`ApiHttpClient`] so callers can swap the HTTP stack (an in-process fake
//! in tests, a proxy-aware client in production) without touching the facade. Requests and
//! responses are plain [`http`] types carrying the full transport envelope; the facade decides
//! what to keep.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")]
use crate::{
	config::ClientConfig,
	error::{ConfigError, TransportError},
};

/// Outbound request handed to interceptors and the transport.
pub type ApiRequest = http::Request<Vec<u8>>;
/// Full response envelope returned by the transport.
pub type ApiResponse = http::Response<Vec<u8>>;
/// Boxed future returned by [`ApiHttpClient::execute`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<ApiResponse>> + 'a + Send>>;

/// Abstraction over HTTP transports able to execute one backend request.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared through
/// `Arc` by every clone of the client. An implementation performs exactly one network exchange
/// per call and never retries. Non-success statuses are returned as ordinary responses; the
/// facade turns them into [`Error::Status`].
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the complete response envelope.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// How the caller expects the response body to be treated.
///
/// The facade stores this in the request extensions so interceptors and transports can see
/// which calls download raw bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResponseKind {
	/// Body is decoded as JSON.
	#[default]
	Json,
	/// Body is returned untouched as an opaque blob.
	Binary,
}
impl ResponseKind {
	/// Reads the kind recorded on `request`, defaulting to [`ResponseKind::Json`].
	pub fn of<B>(request: &http::Request<B>) -> Self {
		request.extensions().get::<Self>().copied().unwrap_or_default()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// The wrapped client keeps its own timeout; [`ClientConfig::timeout`] only applies to
	/// clients built through [`ReqwestHttpClient::from_config`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a reqwest client honoring the configured timeout.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(config.timeout).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = reqwest::Request::try_from(request).map_err(ConfigError::from)?;
			let response = client.execute(request).await.map_err(TransportError::from)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(TransportError::from)?;
			let mut envelope = ApiResponse::new(body.to_vec());

			*envelope.status_mut() = status;
			*envelope.headers_mut() = headers;

			Ok(envelope)
		})
	}
}
impl<T> ApiHttpClient for Arc<T>
where
	T: ?Sized + ApiHttpClient,
{
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		(**self).execute(request)
	}
}
