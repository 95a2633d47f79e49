//! The four Douyin user operations.
//!
//! Payload schemas belong to the backend, so the untyped calls return [`Value`] and the `*_as`
//! variants decode into any caller-chosen type.

// std
use std::path::Path;
// crates.io
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	api::{ApiClient, CallRequest, UserId},
	http::ApiHttpClient,
	obs::CallKind,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Facade specialized for the crate's default reqwest transport.
pub type ReqwestDouyinUserApi = DouyinUserApi<ReqwestHttpClient>;

/// Query parameters forwarded verbatim to the videos endpoint.
///
/// Pairs keep the caller's order and may repeat a key (`tag=a&tag=b`).
pub type VideoQuery = Vec<(String, String)>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserIdsBody<'a> {
	user_ids: &'a [UserId],
}

/// Raw bytes returned by [`DouyinUserApi::download_user_links`], never parsed.
#[derive(Clone, PartialEq, Eq)]
pub struct DownloadedLinks(Vec<u8>);
impl DownloadedLinks {
	/// Borrows the raw payload.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Returns the raw payload.
	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}

	/// Payload size in bytes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the backend returned an empty body.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Writes the payload to `path`, replacing any existing file.
	pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();

		std::fs::write(path, &self.0).map_err(|source| Error::Save { path: path.to_owned(), source })
	}
}
impl AsRef<[u8]> for DownloadedLinks {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}
impl From<Vec<u8>> for DownloadedLinks {
	fn from(value: Vec<u8>) -> Self {
		Self(value)
	}
}
impl Debug for DownloadedLinks {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "DownloadedLinks({} bytes)", self.0.len())
	}
}

/// Douyin user comparison backend calls.
///
/// Each operation performs exactly one request through the shared [`ApiClient`] and never
/// retries.
#[derive(Clone, Debug)]
pub struct DouyinUserApi<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Shared client every call goes through.
	pub client: ApiClient<C>,
}
impl<C> DouyinUserApi<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Wraps a configured client.
	pub fn new(client: ApiClient<C>) -> Self {
		Self { client }
	}

	/// `POST /douyin/compare` with `{"userIds": [...]}`.
	pub async fn compare_users(&self, user_ids: &[UserId]) -> Result<Value> {
		self.compare_users_as(user_ids).await
	}

	/// Typed variant of [`compare_users`](Self::compare_users).
	pub async fn compare_users_as<T>(&self, user_ids: &[UserId]) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let call =
			CallRequest::new(Method::POST, &["douyin", "compare"]).with_json(&UserIdsBody { user_ids })?;

		self.client.call_json(CallKind::CompareUsers, call).await
	}

	/// `GET /douyin/user/{userId}`.
	pub async fn get_user_info(&self, user_id: &UserId) -> Result<Value> {
		self.get_user_info_as(user_id).await
	}

	/// Typed variant of [`get_user_info`](Self::get_user_info).
	pub async fn get_user_info_as<T>(&self, user_id: &UserId) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let segments = ["douyin", "user", user_id.as_ref()];

		self.client.call_json(CallKind::GetUserInfo, CallRequest::new(Method::GET, &segments)).await
	}

	/// `GET /douyin/user/{userId}/videos` with `params` as the query string.
	pub async fn get_user_videos(&self, user_id: &UserId, params: &VideoQuery) -> Result<Value> {
		self.get_user_videos_as(user_id, params).await
	}

	/// Typed variant of [`get_user_videos`](Self::get_user_videos).
	pub async fn get_user_videos_as<T>(&self, user_id: &UserId, params: &VideoQuery) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let segments = ["douyin", "user", user_id.as_ref(), "videos"];
		let call = CallRequest::new(Method::GET, &segments).with_query(params);

		self.client.call_json(CallKind::GetUserVideos, call).await
	}

	/// `POST /douyin/download-links` with `{"userIds": [...]}`, returning the raw body.
	pub async fn download_user_links(&self, user_ids: &[UserId]) -> Result<DownloadedLinks> {
		let call = CallRequest::new(Method::POST, &["douyin", "download-links"])
			.with_json(&UserIdsBody { user_ids })?
			.binary();

		self.client.call(CallKind::DownloadUserLinks, call).await.map(DownloadedLinks::from)
	}
}
#[cfg(feature = "reqwest")]
impl DouyinUserApi<ReqwestHttpClient> {
	/// Creates the facade from the process environment with a reqwest transport.
	pub fn from_env() -> Result<Self> {
		Ok(Self::new(ApiClient::from_env()?))
	}
}
