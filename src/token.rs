//! Token grant surfaces produced by the code-for-token exchange.

// std
use std::time::Duration;
// crates.io
use oauth2::{TokenResponse, basic::BasicTokenResponse};
// self
use crate::_prelude::*;

/// Bearer credential that masks itself in every formatter.
///
/// Both `Debug` and `Display` print `****` in place of the token material, so a grant
/// can travel through logs and error chains safely. The raw value is only obtainable
/// through [`reveal`](Self::reveal), which marks the one place it goes onto the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);
impl BearerToken {
	/// Returns the raw token value for wire use.
	pub fn reveal(&self) -> &str {
		&self.0
	}
}
impl From<String> for BearerToken {
	fn from(raw: String) -> Self {
		Self(raw)
	}
}
impl From<&str> for BearerToken {
	fn from(raw: &str) -> Self {
		Self(raw.to_owned())
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("BearerToken(****)")
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("****")
	}
}

/// Opaque pass-through of the token endpoint's answer.
///
/// The strategy hands the grant to the profile fetch and the verify hook without
/// persisting or inspecting it further; refresh handling is the embedding
/// application's business.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGrant {
	/// Bearer access token used for API calls.
	pub access_token: BearerToken,
	/// Refresh token, when the provider issued one.
	pub refresh_token: Option<BearerToken>,
	/// Scopes granted by the provider, when echoed back.
	pub scopes: Option<Vec<String>>,
	/// Token lifetime hint, when supplied.
	pub expires_in: Option<Duration>,
}
impl TokenGrant {
	pub(crate) fn from_response(response: &BasicTokenResponse) -> Self {
		Self {
			access_token: response.access_token().secret().as_str().into(),
			refresh_token: response.refresh_token().map(|token| token.secret().as_str().into()),
			scopes: response
				.scopes()
				.map(|scopes| scopes.iter().map(|scope| scope.to_string()).collect()),
			expires_in: response.expires_in(),
		}
	}
}
