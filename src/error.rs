//! Strategy-level error types shared across the handshake and the profile fetch.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical strategy error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Problem with the local strategy configuration.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Handshake failure surfaced by the embedded OAuth 2.0 engine.
	#[error(transparent)]
	Exchange(#[from] ExchangeError),
	/// Profile fetch or decode failure.
	#[error(transparent)]
	Profile(#[from] ProfileError),

	/// Application verify hook reported an error while deciding the login.
	#[error("Verify hook reported an error.")]
	Verify {
		/// Application-supplied failure cause.
		#[source]
		source: BoxError,
	},
}

/// Configuration and validation failures raised while assembling the strategy.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// An endpoint URL was rejected by the OAuth client.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// URL parsing failure behind the rejection.
		#[source]
		source: url::ParseError,
	},
	/// The callback URL was rejected by the OAuth client.
	#[error("Callback URL is invalid.")]
	InvalidCallback {
		/// URL parsing failure behind the rejection.
		#[source]
		source: url::ParseError,
	},
	/// Building the outbound HTTP request failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}

/// Failures raised while completing the code-for-token exchange.
///
/// These pass through whatever the embedded engine produced; the strategy only
/// sorts them into a stable taxonomy without discarding the original cause.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Authorization endpoint redirected back with an error instead of a code.
	#[error("Authorization was denied by the provider: {error}.")]
	Denied {
		/// OAuth `error` query parameter from the redirect.
		error: String,
		/// OAuth `error_description` query parameter, when supplied.
		description: Option<String>,
	},
	/// Authorization response carried neither a code nor an error parameter.
	#[error("Authorization response is missing the code parameter.")]
	MissingCode,
	/// Provider rejected the authorization grant (bad or reused code).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Provider refused the client credentials.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint returned an unexpected response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint answered with JSON the decoder could not make sense of.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Decode failure with the path that broke.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when one was captured.
		status: Option<u16>,
	},
	/// The request never completed at the transport layer.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Failures below the HTTP layer (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The HTTP client reported a network-level failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Client-specific network error.
		#[source]
		source: BoxError,
	},
	/// An IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Boxes a client-specific error as the network failure cause.
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

/// Failures raised while fetching or decoding the authenticated user's profile.
///
/// The two variants are deliberately distinct: [`Fetch`](ProfileError::Fetch) means the
/// user-info request itself failed, while [`Parse`](ProfileError::Parse) means the provider
/// answered successfully with a body that is not valid JSON. Callers can match on the kind
/// to tell "could not reach Discord" apart from "Discord answered garbage".
#[derive(Debug, ThisError)]
pub enum ProfileError {
	/// The user-info request failed at the transport or HTTP layer.
	#[error("Failed to fetch the user profile.")]
	Fetch {
		/// Underlying transport or HTTP failure.
		#[source]
		source: BoxError,
	},
	/// The user-info response body was not valid JSON.
	#[error(transparent)]
	Parse(#[from] serde_json::Error),
}
impl ProfileError {
	/// Wraps a transport or HTTP failure as the profile-fetch cause.
	pub fn fetch(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Fetch { source: Box::new(src) }
	}
}

/// Non-success status returned by the user-info endpoint.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Profile endpoint returned HTTP {status}: {body_preview}")]
pub struct ProfileEndpointError {
	/// HTTP status code of the failing response.
	pub status: u16,
	/// Preview of the response body, truncated for log friendliness.
	pub body_preview: String,
}
impl ProfileEndpointError {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a new error for the provided status, keeping a bounded body preview.
	pub fn new(status: u16, body: &str) -> Self {
		Self { status, body_preview: truncate_preview(body) }
	}
}

fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= ProfileEndpointError::BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= ProfileEndpointError::BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}
