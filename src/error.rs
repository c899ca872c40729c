//! Mirror-level error types shared across fetching, configuration, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical mirror error exposed by public APIs.
///
/// Per-provider fetch failures never appear here; they settle as
/// [`FetchOutcome::Failure`](crate::fetch::FetchOutcome) values inside the batch. Only the
/// write barrier and startup validation can fail an invocation outright.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Configuration and validation failures raised at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required environment variable is absent or not valid UTF-8.
	#[error("Environment variable `{name}` is missing or unreadable.")]
	MissingVar {
		/// Variable name.
		name: &'static str,
	},
	/// Provider list payload could not be parsed.
	#[error("Provider list is not a valid JSON array of strings.")]
	InvalidProviderList {
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// A provider identifier failed validation.
	#[error("Provider list contains an invalid identifier.")]
	InvalidProvider(#[from] crate::provider::ProviderIdError),
	/// Destination bucket name is empty.
	#[error("Destination bucket name cannot be empty.")]
	EmptyBucket,
}

/// Failure detail attached to a single provider's fetch attempt.
///
/// Recorded and skipped by the orchestrator; never fatal to the batch.
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// Discovery URL could not be formed from the provider identifier.
	#[error("Discovery URL could not be formed.")]
	Url(#[from] url::ParseError),
	/// Transport failure (DNS, TCP, TLS) before the body completed.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Endpoint answered with a status other than 200.
	#[error("Discovery endpoint answered with status {status}.")]
	UnexpectedStatus {
		/// HTTP status code received.
		status: u16,
	},
	/// Endpoint answered with a content type other than `application/json`.
	#[error("Expected application/json but received {content_type:?}.")]
	UnexpectedContentType {
		/// The `content-type` header value, when present.
		content_type: Option<String>,
	},
	/// Response body is not valid UTF-8.
	#[error("Discovery document is not valid UTF-8.")]
	Decode(#[from] std::string::FromUtf8Error),
	/// Response body is not valid JSON.
	#[error("Discovery document is not valid JSON.")]
	Parse(
		#[source]
		#[from]
		serde_path_to_error::Error<serde_json::Error>,
	),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the discovery endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the discovery endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn store_error_converts_into_mirror_error_with_source() {
		let store_error =
			crate::store::StoreError::Backend { message: "bucket unreachable".into() };
		let mirror_error: Error = store_error.clone().into();

		assert!(matches!(mirror_error, Error::Storage(_)));
		assert!(mirror_error.to_string().contains("bucket unreachable"));

		let source = StdError::source(&mirror_error)
			.expect("Mirror error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn fetch_error_messages_carry_policy_detail() {
		let status = FetchError::UnexpectedStatus { status: 201 };

		assert!(status.to_string().contains("201"));

		let content_type =
			FetchError::UnexpectedContentType { content_type: Some("text/plain".into()) };

		assert!(content_type.to_string().contains("text/plain"));
	}
}
