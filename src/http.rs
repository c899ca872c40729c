//! Transport primitives for discovery document fetches.
//!
//! [`DiscoveryHttpClient`] is the crate's only dependency on an HTTP stack. A client hands
//! back a [`DiscoveryResponse`] whose status line and `content-type` header are inspectable
//! before the body is consumed, so the fetcher can enforce its response policy first and
//! then either accumulate the body or drain it without retaining the bytes.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by transport operations.
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of fetching discovery documents.
///
/// Implementations must be `Send + Sync + 'static` so a single client can serve every
/// concurrent fetch in a batch behind an `Arc` without additional wrappers.
pub trait DiscoveryHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Response handle produced by [`get`](Self::get).
	type Response: DiscoveryResponse;

	/// Issues a GET request and resolves once response headers are available.
	///
	/// The body has not been consumed when the returned future resolves; callers decide
	/// between [`DiscoveryResponse::into_body`] and [`DiscoveryResponse::drain`].
	fn get(&self, url: Url) -> HttpFuture<'_, Self::Response>;
}

/// Response handle exposing headers ahead of body consumption.
pub trait DiscoveryResponse
where
	Self: Send,
{
	/// HTTP status code of the response.
	fn status(&self) -> u16;

	/// Value of the `content-type` header, when present.
	fn content_type(&self) -> Option<&str>;

	/// Accumulates the remaining body chunk by chunk into a single buffer.
	fn into_body(self) -> HttpFuture<'static, Vec<u8>>;

	/// Consumes and discards the remaining body without retaining it.
	fn drain(self) -> HttpFuture<'static, ()>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl DiscoveryHttpClient for ReqwestHttpClient {
	type Response = ReqwestDiscoveryResponse;

	fn get(&self, url: Url) -> HttpFuture<'_, Self::Response> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.get(url).send().await.map_err(TransportError::from)?;
			let content_type = response
				.headers()
				.get(reqwest::header::CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);

			Ok(ReqwestDiscoveryResponse {
				status: response.status().as_u16(),
				content_type,
				inner: response,
			})
		})
	}
}

/// Response handle returned by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
pub struct ReqwestDiscoveryResponse {
	status: u16,
	content_type: Option<String>,
	inner: reqwest::Response,
}
#[cfg(feature = "reqwest")]
impl DiscoveryResponse for ReqwestDiscoveryResponse {
	fn status(&self) -> u16 {
		self.status
	}

	fn content_type(&self) -> Option<&str> {
		self.content_type.as_deref()
	}

	fn into_body(self) -> HttpFuture<'static, Vec<u8>> {
		let mut response = self.inner;

		Box::pin(async move {
			let mut buf = Vec::new();

			while let Some(chunk) = response.chunk().await.map_err(TransportError::from)? {
				buf.extend_from_slice(&chunk);
			}

			Ok(buf)
		})
	}

	fn drain(self) -> HttpFuture<'static, ()> {
		let mut response = self.inner;

		Box::pin(async move {
			while response.chunk().await.map_err(TransportError::from)?.is_some() {}

			Ok(())
		})
	}
}
