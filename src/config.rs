//! Invocation configuration resolved once at process start.
//!
//! Core logic never reads the environment; the value built here is passed by parameter
//! into [`Mirror`](crate::mirror::Mirror) and shared read-only across the batch.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError, provider::Provider};

/// Environment variable holding the JSON array of provider authorities.
pub const ENV_PROVIDERS: &str = "OIDC_PROVIDERS";
/// Environment variable holding the destination bucket name.
pub const ENV_BUCKET: &str = "DEST_BUCKET_NAME";
/// Environment variable holding the destination key prefix.
pub const ENV_PREFIX: &str = "DEST_BUCKET_PATH";

/// Read-only inputs for a single mirror invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
	/// Ordered list of provider authorities to fetch.
	pub providers: Vec<Provider>,
	/// Destination bucket receiving every discovery document.
	pub bucket: String,
	/// Key prefix concatenated directly before each provider identifier.
	///
	/// No separator is inserted between the two; include a trailing delimiter in the
	/// prefix when one is wanted.
	pub prefix: String,
}
impl MirrorConfig {
	/// Validates and assembles a configuration value.
	pub fn new(
		providers: Vec<Provider>,
		bucket: impl Into<String>,
		prefix: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let bucket = bucket.into();

		if bucket.is_empty() {
			return Err(ConfigError::EmptyBucket);
		}

		Ok(Self { providers, bucket, prefix: prefix.into() })
	}

	/// Loads the configuration from the process environment.
	///
	/// Expects [`ENV_PROVIDERS`] to hold a JSON array of authority strings, and
	/// [`ENV_BUCKET`] + [`ENV_PREFIX`] to hold plain strings.
	pub fn from_env() -> Result<Self, ConfigError> {
		let providers = parse_provider_list(&read_var(ENV_PROVIDERS)?)?;
		let bucket = read_var(ENV_BUCKET)?;
		let prefix = read_var(ENV_PREFIX)?;

		Self::new(providers, bucket, prefix)
	}
}

fn parse_provider_list(raw: &str) -> Result<Vec<Provider>, ConfigError> {
	let names: Vec<String> = serde_json::from_str(raw)
		.map_err(|e| ConfigError::InvalidProviderList { source: e })?;

	names.into_iter().map(Provider::new).collect::<Result<_, _>>().map_err(Into::into)
}

fn read_var(name: &'static str) -> Result<String, ConfigError> {
	env::var(name).map_err(|_| ConfigError::MissingVar { name })
}
