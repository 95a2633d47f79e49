//! Client configuration read once at construction and shared by every request.
//!
//! The base URL comes from [`BASE_URL_ENV`] and falls back to [`DEFAULT_BASE_URL`]. A relative
//! base (the default `/api`) is resolved against [`ClientConfig::origin`], which plays the role
//! a page origin would play for a browser client.

// std
use std::time::Duration as StdDuration;
// crates.io
use http::{
	HeaderMap, HeaderName, HeaderValue,
	header::{CONTENT_TYPE, InvalidHeaderName, InvalidHeaderValue},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "DOUYIN_API_URL";
/// Environment variable holding the origin used to resolve a relative base URL.
pub const ORIGIN_ENV: &str = "DOUYIN_API_ORIGIN";
/// Base URL used when [`BASE_URL_ENV`] is absent or blank.
pub const DEFAULT_BASE_URL: &str = "/api";
/// Origin used when [`ORIGIN_ENV`] is absent or blank.
pub const DEFAULT_ORIGIN: &str = "http://localhost";
/// Timeout applied by the transport to every request.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Immutable settings for the shared API client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Absolute URL or path prefix prepended to every endpoint.
	pub base_url: String,
	/// Origin that relative base URLs are resolved against.
	pub origin: String,
	/// Transport timeout for a single request.
	pub timeout: StdDuration,
	/// Headers attached to every request before interceptors run.
	pub default_headers: HeaderMap,
}
impl ClientConfig {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Self {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads the configuration through `lookup`, treating blank values as absent.
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
		let mut config = Self::default();

		if let Some(base_url) = read(BASE_URL_ENV) {
			config.base_url = base_url;
		}
		if let Some(origin) = read(ORIGIN_ENV) {
			config.origin = origin;
		}

		config
	}

	/// Overrides the base URL.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();

		self
	}

	/// Overrides the origin used for relative base URLs.
	pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
		self.origin = origin.into();

		self
	}

	/// Overrides the transport timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Adds or replaces a default header.
	pub fn with_default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.default_headers.insert(name, value);

		self
	}

	/// Adds or replaces a default header from string parts.
	pub fn try_with_default_header(self, name: &str, value: &str) -> Result<Self, ConfigError> {
		let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
		let header_name =
			HeaderName::from_bytes(name.as_bytes()).map_err(|_: InvalidHeaderName| invalid())?;
		let header_value =
			HeaderValue::from_str(value).map_err(|_: InvalidHeaderValue| invalid())?;

		Ok(self.with_default_header(header_name, header_value))
	}

	/// Resolves [`base_url`](Self::base_url) into an absolute URL usable as a path prefix.
	pub fn resolve_base_url(&self) -> Result<Url, ConfigError> {
		let raw = self.base_url.trim();
		let base = match Url::parse(raw) {
			Ok(url) => url,
			Err(url::ParseError::RelativeUrlWithoutBase) => {
				let origin = Url::parse(self.origin.trim()).map_err(|source| {
					ConfigError::InvalidBaseUrl { value: self.origin.clone(), source }
				})?;

				origin
					.join(raw)
					.map_err(|source| ConfigError::InvalidBaseUrl { value: raw.to_owned(), source })?
			},
			Err(source) => return Err(ConfigError::InvalidBaseUrl { value: raw.to_owned(), source }),
		};

		if base.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { value: raw.to_owned() });
		}

		Ok(base)
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		let mut default_headers = HeaderMap::new();

		default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		Self {
			base_url: DEFAULT_BASE_URL.into(),
			origin: DEFAULT_ORIGIN.into(),
			timeout: DEFAULT_TIMEOUT,
			default_headers,
		}
	}
}

/// Appends `segments` to `base`, percent-encoding each one as a single path segment.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
	let mut url = base.clone();

	// `resolve_base_url` rejects cannot-be-a-base URLs, so the segments are always available.
	if let Ok(mut path) = url.path_segments_mut() {
		path.pop_if_empty().extend(segments);
	}

	url
}
