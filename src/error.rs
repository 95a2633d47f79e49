//! Client-level error types shared across configuration, transport, and the API facade.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every variant represents a failed request; none of them is retried locally.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Backend answered with a non-success HTTP status.
	#[error("Backend responded with HTTP {status}.")]
	Status {
		/// HTTP status code returned by the backend.
		status: u16,
		/// Raw response body, kept unparsed.
		body: Vec<u8>,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be encoded as JSON.")]
	Encode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Response body could not be decoded into the requested type.
	#[error("Response body is not valid JSON for the requested type.")]
	Decode {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Downloaded payload could not be written to disk.
	#[error("Failed to save the downloaded payload to {}.", .path.display())]
	Save {
		/// Destination path.
		path: std::path::PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// An interceptor rejected the request or response.
	#[error("Interceptor `{interceptor}` rejected the call: {reason}.")]
	Interceptor {
		/// Name of the interceptor that failed.
		interceptor: &'static str,
		/// Interceptor-supplied reason string.
		reason: String,
	},
}
impl Error {
	/// Returns the HTTP status carried by the error, when the backend produced one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Returns `true` when the transport gave up because the configured timeout elapsed.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Transport(TransportError::Timeout { .. }))
	}
}

/// Configuration and validation failures raised while building the client or a request.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Base URL or origin cannot be parsed.
	#[error("Base URL `{value}` is invalid.")]
	InvalidBaseUrl {
		/// Value that failed to parse.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL cannot carry path segments (e.g. `mailto:`).
	#[error("Base URL `{value}` cannot be used as a path prefix.")]
	CannotBeABase {
		/// Offending URL.
		value: String,
	},
	/// Default header name or value is malformed.
	#[error("Default header `{name}` is invalid.")]
	InvalidHeader {
		/// Header name as supplied.
		name: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Configured timeout elapsed before the backend answered.
	#[error("Backend did not respond within the configured timeout.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
