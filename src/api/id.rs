//! Validated user identifiers that always address exactly one path segment.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Error returned when user identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("User identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("User identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier contains a path separator.
	#[error("User identifier contains a `/`.")]
	ContainsSlash,
	/// The identifier is `.` or `..`, which URL path normalization would drop.
	#[error("User identifier cannot be a dot segment.")]
	DotSegment,
}

/// Opaque identifier of a backend user (e.g. a Douyin `sec_uid`).
///
/// Serializes as a plain JSON string so lists of ids form the `userIds` request body as-is.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);
impl UserId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Validates every value, preserving order.
	pub fn many<I>(values: I) -> Result<Vec<Self>, IdentifierError>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		values.into_iter().map(Self::new).collect()
	}
}
impl Deref for UserId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for UserId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<UserId> for String {
	fn from(value: UserId) -> Self {
		value.0
	}
}
impl TryFrom<String> for UserId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for UserId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for UserId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "User({})", self.0)
	}
}
impl Display for UserId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for UserId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.contains('/') {
		return Err(IdentifierError::ContainsSlash);
	}
	if view == "." || view == ".." {
		return Err(IdentifierError::DotSegment);
	}

	Ok(())
}
