//! Transport primitives shared by the token exchange and the profile fetch.
//!
//! The module exposes [`ApiHttpClient`] alongside [`StatusProbe`] so downstream crates
//! can integrate custom HTTP clients. The trait covers the two outbound calls the
//! strategy ever makes: the code-for-token exchange (driven by the `oauth2` crate
//! through [`ApiHttpClient::token_handle`]) and the single authenticated GET against
//! the user-info endpoint ([`ApiHttpClient::bearer_get`]). Token handles reset their
//! probe before a request goes out and record the HTTP status once one is known, so
//! exchange failures can be classified with consistent status context.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError};
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse, http::Response};
// self
use crate::_prelude::*;

/// Boxed future returned by transport primitives.
pub type ApiFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Response surface returned by [`ApiHttpClient::bearer_get`].
///
/// Carries only what the profile fetch needs: the status code for success checks and
/// the raw body text for normalization. Non-success statuses are reported as regular
/// responses here; the caller decides how to translate them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code of the response.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}
impl ApiResponse {
	/// Checks whether the status code is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports capable of executing the strategy's outbound calls.
///
/// The trait acts as the strategy's only dependency on an HTTP stack. Callers provide an
/// implementation (typically behind `Arc<T>` where `T: ApiHttpClient`) and the engine
/// requests a short-lived [`AsyncHttpClient`] handle per token exchange, each wired to a
/// [`StatusProbe`]. Implementations must be `Send + Sync + 'static` so they can be
/// shared across strategy instances without additional wrappers.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Error type the underlying transport emits.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle wired to a [`StatusProbe`], used by the `oauth2`
	/// crate for the code-for-token exchange.
	type TokenHandle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle that reports HTTP statuses to `probe`.
	fn token_handle(&self, probe: StatusProbe) -> Self::TokenHandle;

	/// Issues a single GET request with `access_token` as a Bearer credential in the
	/// `Authorization` header. The token must never appear in the query string.
	fn bearer_get<'a>(
		&'a self,
		url: &'a Url,
		access_token: &'a str,
	) -> ApiFuture<'a, ApiResponse, Self::TransportError>;
}

/// Shared cell the transport reports the token endpoint's HTTP status into.
///
/// The engine creates one probe per exchange, hands a clone to the token handle, and
/// reads [`last_status`](Self::last_status) right after the `oauth2` crate resolves.
/// [`reset`](Self::reset) clears the cell at the start of each request so a status
/// never outlives the attempt that produced it.
#[derive(Clone, Debug, Default)]
pub struct StatusProbe(Arc<Mutex<Option<u16>>>);
impl StatusProbe {
	/// Records the status of the response currently in flight.
	pub fn record(&self, status: u16) {
		*self.0.lock() = Some(status);
	}

	/// Clears any previously recorded status.
	pub fn reset(&self) {
		*self.0.lock() = None;
	}

	/// Returns the most recently recorded status, if a response arrived.
	pub fn last_status(&self) -> Option<u16> {
		*self.0.lock()
	}
}

/// Thin wrapper around [`ReqwestClient`] keeping the shared HTTP behavior in one place.
/// Token requests must not follow redirects, since OAuth 2.0 token endpoints answer
/// directly rather than delegating to another URI. Configure any custom
/// [`ReqwestClient`] with redirect following disabled; the engine hands this client to
/// the `oauth2` crate when it performs the exchange.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing [`ReqwestClient`].
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

/// Token-exchange handle returned by [`ReqwestHttpClient`] that satisfies [`ApiHttpClient`].
#[cfg(feature = "reqwest")]
pub struct ProbedTokenHandle {
	client: ReqwestClient,
	probe: StatusProbe,
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ProbedTokenHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			self.probe.reset();

			let outgoing = request.try_into().map_err(Box::new)?;
			let reply = self.client.execute(outgoing).await.map_err(Box::new)?;

			self.probe.record(reply.status().as_u16());

			let mut rebuilt = Response::builder().status(reply.status());

			if let Some(headers) = rebuilt.headers_mut() {
				headers.extend(reply.headers().clone());
			}

			Ok(rebuilt.body(reply.bytes().await.map_err(Box::new)?.to_vec())?)
		})
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TokenHandle = ProbedTokenHandle;
	type TransportError = ReqwestError;

	fn token_handle(&self, probe: StatusProbe) -> Self::TokenHandle {
		ProbedTokenHandle { client: self.0.clone(), probe }
	}

	fn bearer_get<'a>(
		&'a self,
		url: &'a Url,
		access_token: &'a str,
	) -> ApiFuture<'a, ApiResponse, Self::TransportError> {
		Box::pin(async move {
			let response = self.0.get(url.clone()).bearer_auth(access_token).send().await?;
			let status = response.status().as_u16();
			let body = response.text().await?;

			Ok(ApiResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn probe_reports_the_latest_status_until_reset() {
		let probe = StatusProbe::default();

		assert_eq!(probe.last_status(), None);

		probe.record(400);
		probe.record(503);

		assert_eq!(probe.last_status(), Some(503), "Later responses overwrite earlier ones.");

		probe.reset();

		assert_eq!(probe.last_status(), None);
	}

	#[test]
	fn probe_clones_share_the_cell() {
		let probe = StatusProbe::default();
		let transport_side = probe.clone();

		transport_side.record(429);

		assert_eq!(probe.last_status(), Some(429));
	}

	#[test]
	fn success_range_covers_2xx_only() {
		assert!(ApiResponse { status: 200, body: String::new() }.is_success());
		assert!(ApiResponse { status: 204, body: String::new() }.is_success());
		assert!(!ApiResponse { status: 301, body: String::new() }.is_success());
		assert!(!ApiResponse { status: 500, body: String::new() }.is_success());
	}
}
