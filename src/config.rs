//! Strategy configuration with Discord's fixed endpoint defaults.

// self
use crate::{_prelude::*, error::ConfigError};

/// Default authorization endpoint used when the caller supplies no override.
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://discordapp.com/api/oauth2/authorize";
/// Default token endpoint used when the caller supplies no override.
pub const DEFAULT_TOKEN_URL: &str = "https://discordapp.com/api/oauth2/token";
/// Fixed user-info endpoint queried by the profile fetch. Not configurable.
pub const PROFILE_URL: &str = "https://discordapp.com/api/users/@me";

/// Immutable configuration consumed when constructing the strategy.
///
/// Endpoints and credentials are fixed for the strategy's lifetime; there are no
/// setters. Client id and secret are deliberately not validated here—credential
/// validation belongs to the embedded OAuth 2.0 engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
	/// OAuth 2.0 client identifier issued by Discord.
	pub client_id: String,
	/// OAuth 2.0 client secret issued by Discord.
	pub client_secret: String,
	/// Redirect URI registered with Discord for this application.
	pub callback_url: Url,
	/// Authorization endpoint; defaults to [`DEFAULT_AUTHORIZATION_URL`].
	pub authorization_url: Url,
	/// Token endpoint; defaults to [`DEFAULT_TOKEN_URL`].
	pub token_url: Url,
}
impl StrategyConfig {
	/// Creates a new builder seeded with the required credentials and callback URL.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		callback_url: Url,
	) -> StrategyConfigBuilder {
		StrategyConfigBuilder {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			callback_url,
			authorization_url: None,
			token_url: None,
		}
	}
}

/// Builder for [`StrategyConfig`] values.
#[derive(Debug)]
pub struct StrategyConfigBuilder {
	client_id: String,
	client_secret: String,
	callback_url: Url,
	authorization_url: Option<Url>,
	token_url: Option<Url>,
}
impl StrategyConfigBuilder {
	/// Overrides the authorization endpoint.
	pub fn authorization_url(mut self, url: Url) -> Self {
		self.authorization_url = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: Url) -> Self {
		self.token_url = Some(url);

		self
	}

	/// Consumes the builder, filling in Discord's fixed defaults for absent overrides.
	pub fn build(self) -> Result<StrategyConfig, ConfigError> {
		let authorization_url = match self.authorization_url {
			Some(url) => url,
			None => parse_default("authorization", DEFAULT_AUTHORIZATION_URL)?,
		};
		let token_url = match self.token_url {
			Some(url) => url,
			None => parse_default("token", DEFAULT_TOKEN_URL)?,
		};

		Ok(StrategyConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			callback_url: self.callback_url,
			authorization_url,
			token_url,
		})
	}
}

fn parse_default(endpoint: &'static str, value: &str) -> Result<Url, ConfigError> {
	Url::parse(value).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
}
