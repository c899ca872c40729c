//! Discovery document fetcher.
//!
//! Every failure path settles into a [`FetchOutcome::Failure`]; nothing raised here can
//! stop a sibling fetch in the same batch. Response policy is deliberately narrow: the
//! status must be exactly 200 (other 2xx codes fail) and the `content-type` header must
//! start with `application/json` before the body is ever consumed.

// self
use crate::{
	_prelude::*,
	error::FetchError,
	http::{DiscoveryHttpClient, DiscoveryResponse},
	obs::{self, StageKind, StageOutcome},
	provider::Provider,
};

/// Settled result of a single provider fetch.
///
/// Produced exactly once per provider in a batch; the provider identity travels with the
/// outcome because it is not otherwise recoverable from the response.
#[derive(Debug)]
pub enum FetchOutcome {
	/// Discovery document fetched, decoded, and parsed.
	Success {
		/// Provider the document came from.
		provider: Provider,
		/// Parsed discovery document.
		configuration: JsonValue,
	},
	/// Attempt failed; the batch continues without this provider.
	Failure {
		/// Provider the attempt targeted.
		provider: Provider,
		/// What went wrong.
		reason: FetchError,
	},
}
impl FetchOutcome {
	/// Returns true for [`FetchOutcome::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}

	/// Provider this outcome belongs to.
	pub fn provider(&self) -> &Provider {
		match self {
			Self::Success { provider, .. } | Self::Failure { provider, .. } => provider,
		}
	}
}

/// Fetches and validates one provider's discovery document.
pub async fn fetch_discovery<C>(client: &C, provider: Provider) -> FetchOutcome
where
	C: ?Sized + DiscoveryHttpClient,
{
	obs::record_stage_outcome(StageKind::Fetch, StageOutcome::Attempt);

	match fetch_document(client, &provider).await {
		Ok(configuration) => {
			obs::record_stage_outcome(StageKind::Fetch, StageOutcome::Success);

			FetchOutcome::Success { provider, configuration }
		},
		Err(reason) => {
			obs::record_stage_outcome(StageKind::Fetch, StageOutcome::Failure);
			obs::note_discarded(StageKind::Fetch, &provider, &reason);

			FetchOutcome::Failure { provider, reason }
		},
	}
}

async fn fetch_document<C>(client: &C, provider: &Provider) -> Result<JsonValue, FetchError>
where
	C: ?Sized + DiscoveryHttpClient,
{
	let url = provider.discovery_url()?;
	let response = client.get(url).await?;
	let status = response.status();

	if status != 200 {
		// Consume the body so the connection can be reused.
		let _ = response.drain().await;

		return Err(FetchError::UnexpectedStatus { status });
	}

	let json_like =
		response.content_type().is_some_and(|value| value.starts_with("application/json"));

	if !json_like {
		let content_type = response.content_type().map(str::to_owned);
		let _ = response.drain().await;

		return Err(FetchError::UnexpectedContentType { content_type });
	}

	let body = response.into_body().await?;
	let text = String::from_utf8(body)?;
	let mut deserializer = serde_json::Deserializer::from_str(&text);
	let configuration = serde_path_to_error::deserialize(&mut deserializer)?;

	Ok(configuration)
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicBool, Ordering};
	// self
	use super::*;
	use crate::{error::TransportError, http::HttpFuture};

	struct CannedResponse {
		status: u16,
		content_type: Option<&'static str>,
		body: Vec<u8>,
		drained: Arc<AtomicBool>,
	}
	impl DiscoveryResponse for CannedResponse {
		fn status(&self) -> u16 {
			self.status
		}

		fn content_type(&self) -> Option<&str> {
			self.content_type
		}

		fn into_body(self) -> HttpFuture<'static, Vec<u8>> {
			Box::pin(async move { Ok(self.body) })
		}

		fn drain(self) -> HttpFuture<'static, ()> {
			self.drained.store(true, Ordering::SeqCst);

			Box::pin(async { Ok(()) })
		}
	}

	enum CannedClient {
		Respond {
			status: u16,
			content_type: Option<&'static str>,
			body: &'static str,
			drained: Arc<AtomicBool>,
		},
		Unreachable,
	}
	impl CannedClient {
		fn respond(status: u16, content_type: Option<&'static str>, body: &'static str) -> Self {
			Self::Respond { status, content_type, body, drained: Arc::new(AtomicBool::new(false)) }
		}

		fn drained(&self) -> bool {
			match self {
				Self::Respond { drained, .. } => drained.load(Ordering::SeqCst),
				Self::Unreachable => false,
			}
		}
	}
	impl DiscoveryHttpClient for CannedClient {
		type Response = CannedResponse;

		fn get(&self, _url: Url) -> HttpFuture<'_, Self::Response> {
			match self {
				Self::Respond { status, content_type, body, drained } => {
					let response = CannedResponse {
						status: *status,
						content_type: *content_type,
						body: body.as_bytes().to_vec(),
						drained: drained.clone(),
					};

					Box::pin(async move { Ok(response) })
				},
				Self::Unreachable => Box::pin(async {
					Err(TransportError::network(std::io::Error::other("connection refused")))
				}),
			}
		}
	}

	fn provider(value: &str) -> Provider {
		Provider::new(value).expect("Fetcher test provider should be valid.")
	}

	#[tokio::test]
	async fn success_carries_the_originating_provider() {
		let client = CannedClient::respond(
			200,
			Some("application/json; charset=utf-8"),
			"{\"issuer\":\"https://p1\"}",
		);
		let outcome = fetch_discovery(&client, provider("p1.example")).await;

		match outcome {
			FetchOutcome::Success { provider, configuration } => {
				assert_eq!(provider.as_ref(), "p1.example");
				assert_eq!(configuration["issuer"], "https://p1");
			},
			FetchOutcome::Failure { reason, .. } => {
				panic!("Valid response should settle as a success, not {reason}.")
			},
		}
	}

	#[tokio::test]
	async fn non_200_statuses_fail_even_within_2xx() {
		let client =
			CannedClient::respond(201, Some("application/json"), "{\"issuer\":\"https://p1\"}");
		let outcome = fetch_discovery(&client, provider("p1.example")).await;

		assert!(matches!(
			outcome,
			FetchOutcome::Failure { reason: FetchError::UnexpectedStatus { status: 201 }, .. },
		));
		assert!(client.drained(), "Rejected responses must drain the body.");
	}

	#[tokio::test]
	async fn content_type_gate_precedes_parsing() {
		let client = CannedClient::respond(200, Some("text/plain"), "{\"issuer\":\"https://p1\"}");
		let outcome = fetch_discovery(&client, provider("p1.example")).await;

		assert!(matches!(
			outcome,
			FetchOutcome::Failure { reason: FetchError::UnexpectedContentType { .. }, .. },
		));
		assert!(client.drained(), "Rejected responses must drain the body.");

		let missing = CannedClient::respond(200, None, "{}");
		let outcome = fetch_discovery(&missing, provider("p1.example")).await;

		assert!(matches!(
			outcome,
			FetchOutcome::Failure {
				reason: FetchError::UnexpectedContentType { content_type: None },
				..
			},
		));
	}

	#[tokio::test]
	async fn malformed_json_fails_as_parse() {
		let bad_json = CannedClient::respond(200, Some("application/json"), "{\"issuer\":");
		let outcome = fetch_discovery(&bad_json, provider("p1.example")).await;

		assert!(matches!(
			outcome,
			FetchOutcome::Failure { reason: FetchError::Parse(_), .. },
		));
	}

	#[tokio::test]
	async fn invalid_utf8_fails_as_decode() {
		struct InvalidUtf8Client;
		impl DiscoveryHttpClient for InvalidUtf8Client {
			type Response = CannedResponse;

			fn get(&self, _url: Url) -> HttpFuture<'_, Self::Response> {
				Box::pin(async {
					Ok(CannedResponse {
						status: 200,
						content_type: Some("application/json"),
						body: vec![0xFF, 0xFE, 0x7B],
						drained: Arc::new(AtomicBool::new(false)),
					})
				})
			}
		}

		let outcome = fetch_discovery(&InvalidUtf8Client, provider("p1.example")).await;

		assert!(matches!(
			outcome,
			FetchOutcome::Failure { reason: FetchError::Decode(_), .. },
		));
	}

	#[tokio::test]
	async fn transport_failures_settle_as_failures() {
		let outcome = fetch_discovery(&CannedClient::Unreachable, provider("p1.example")).await;

		match outcome {
			FetchOutcome::Failure { provider, reason } => {
				assert_eq!(provider.as_ref(), "p1.example");
				assert!(matches!(reason, FetchError::Transport(_)));
			},
			FetchOutcome::Success { .. } => {
				panic!("Transport failures must settle as failures.")
			},
		}
	}
}
