//! Strongly typed identity-provider identifiers and discovery URL construction.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Well-known path appended to every provider authority.
pub const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

const PROVIDER_MAX_LEN: usize = 255;

/// Error returned when provider identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ProviderIdError {
	/// The identifier was empty.
	#[error("Provider identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Provider identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Provider identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Host/authority of an identity provider, e.g. `accounts.example.com`.
///
/// A port or a path suffix is legal (`login.example.net/tenant-a` covers tenant-style
/// issuers); the value is concatenated directly after `https://` when the discovery URL
/// is formed, and directly after the configured key prefix when the document is stored.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Provider(String);
impl Provider {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ProviderIdError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Returns the HTTPS discovery document URL for this provider.
	pub fn discovery_url(&self) -> Result<Url, url::ParseError> {
		Url::parse(&format!("https://{}{DISCOVERY_PATH}", self.0))
	}
}
impl Deref for Provider {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Provider {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<Provider> for String {
	fn from(value: Provider) -> Self {
		value.0
	}
}
impl TryFrom<String> for Provider {
	type Error = ProviderIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for Provider {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Provider({})", self.0)
	}
}
impl Display for Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for Provider {
	type Err = ProviderIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), ProviderIdError> {
	if view.is_empty() {
		return Err(ProviderIdError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(ProviderIdError::ContainsWhitespace);
	}
	if view.len() > PROVIDER_MAX_LEN {
		return Err(ProviderIdError::TooLong { max: PROVIDER_MAX_LEN });
	}

	Ok(())
}
