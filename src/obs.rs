//! Optional observability helpers for backend calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `douyin_client.call` with the `call`
//!   (operation) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `douyin_client_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Backend operations exposed by the facade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// `POST /douyin/compare`.
	CompareUsers,
	/// `GET /douyin/user/{userId}`.
	GetUserInfo,
	/// `GET /douyin/user/{userId}/videos`.
	GetUserVideos,
	/// `POST /douyin/download-links`.
	DownloadUserLinks,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::CompareUsers => "compare_users",
			CallKind::GetUserInfo => "get_user_info",
			CallKind::GetUserVideos => "get_user_videos",
			CallKind::DownloadUserLinks => "download_user_links",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a facade call.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Logs the end of a call at `debug` (success) or `warn` (failure) when tracing is enabled.
pub fn log_call_result<T>(kind: CallKind, result: &Result<T>) {
	#[cfg(feature = "tracing")]
	{
		match result {
			Ok(_) => ::tracing::debug!(call = kind.as_str(), "backend call succeeded"),
			Err(e) => ::tracing::warn!(call = kind.as_str(), error = %e, "backend call failed"),
		}
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, result);
	}
}
