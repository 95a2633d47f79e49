//! Async client facade for the Douyin user comparison backend: one configured transport,
//! composable interceptors, and four typed calls.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		api::{ApiClient, DouyinUserApi, ReqwestDouyinUserApi, UserId},
		config::ClientConfig,
		http::ReqwestHttpClient,
	};

	/// Builds a configuration whose relative base URL resolves against a mock server origin.
	pub fn test_config(origin: &str) -> ClientConfig {
		ClientConfig::default().with_origin(origin)
	}

	/// Builds a reqwest HTTP client that honors the configured timeout and accepts the
	/// self-signed certificates produced by `httpmock` during tests.
	pub fn test_reqwest_http_client(config: &ClientConfig) -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.timeout(config.timeout)
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`DouyinUserApi`] backed by the reqwest transport used across integration
	/// tests.
	pub fn build_reqwest_test_api(config: ClientConfig) -> ReqwestDouyinUserApi {
		let http_client = test_reqwest_http_client(&config);
		let client = ApiClient::with_http_client(config, http_client)
			.expect("Failed to build API client for tests.");

		DouyinUserApi::new(client)
	}

	/// Parses fixture user identifiers.
	pub fn user_ids<const N: usize>(values: [&str; N]) -> Vec<UserId> {
		UserId::many(values).expect("Fixture user identifiers should be valid.")
	}

	/// Parses one fixture user identifier.
	pub fn user_id(value: &str) -> UserId {
		UserId::new(value).expect("Fixture user identifier should be valid.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, parking_lot as _};
