#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	sync::{Arc, Mutex},
};
// self
use oauth2_discord::{
	config::StrategyConfig,
	error::{Result, TransportError},
	http::ApiResponse,
	oauth::{AuthorizationRedirect, AuthorizeOptions, EngineFuture, GetFuture, OAuth2Engine},
	profile::UserProfile,
	strategy::{DiscordStrategy, Verify, VerifyFuture},
	token::TokenGrant,
	url::Url,
};

/// Canned engine substituted for the reqwest-backed facade.
///
/// Records every call so tests can assert the strategy delegates unchanged, and replays
/// queued results for the exchange and the profile fetch.
pub struct StubEngine {
	redirect: AuthorizationRedirect,
	authorize_calls: Mutex<Vec<AuthorizeOptions>>,
	exchange_results: Mutex<VecDeque<Result<TokenGrant>>>,
	profile_results: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
	profile_requests: Mutex<Vec<(Url, String)>>,
}
impl StubEngine {
	pub fn new() -> Self {
		let url = Url::parse("https://discordapp.com/api/oauth2/authorize?state=stub-state")
			.expect("Stub authorize URL should parse successfully.");

		Self {
			redirect: AuthorizationRedirect { url, state: "stub-state".into() },
			authorize_calls: Mutex::new(Vec::new()),
			exchange_results: Mutex::new(VecDeque::new()),
			profile_results: Mutex::new(VecDeque::new()),
			profile_requests: Mutex::new(Vec::new()),
		}
	}

	pub fn push_exchange(&self, result: Result<TokenGrant>) {
		self.exchange_results.lock().expect("Stub lock should not be poisoned.").push_back(result);
	}

	pub fn push_profile(&self, result: Result<ApiResponse, TransportError>) {
		self.profile_results.lock().expect("Stub lock should not be poisoned.").push_back(result);
	}

	pub fn authorize_calls(&self) -> Vec<AuthorizeOptions> {
		self.authorize_calls.lock().expect("Stub lock should not be poisoned.").clone()
	}

	pub fn profile_requests(&self) -> Vec<(Url, String)> {
		self.profile_requests.lock().expect("Stub lock should not be poisoned.").clone()
	}
}
impl OAuth2Engine for StubEngine {
	fn authorize_url(&self, options: &AuthorizeOptions) -> AuthorizationRedirect {
		self.authorize_calls
			.lock()
			.expect("Stub lock should not be poisoned.")
			.push(options.clone());

		self.redirect.clone()
	}

	fn exchange_code<'a>(&'a self, _code: &'a str) -> EngineFuture<'a, TokenGrant> {
		Box::pin(async move {
			self.exchange_results
				.lock()
				.expect("Stub lock should not be poisoned.")
				.pop_front()
				.expect("A canned exchange result should be queued before the call.")
		})
	}

	fn bearer_get<'a>(&'a self, url: &'a Url, access_token: &'a str) -> GetFuture<'a> {
		Box::pin(async move {
			self.profile_requests
				.lock()
				.expect("Stub lock should not be poisoned.")
				.push((url.clone(), access_token.to_owned()));

			self.profile_results
				.lock()
				.expect("Stub lock should not be poisoned.")
				.pop_front()
				.expect("A canned profile result should be queued before the call.")
		})
	}
}

/// Verify hook that accepts the login and surfaces the profile username as the user.
pub struct AcceptUsername;
impl Verify for AcceptUsername {
	type User = String;

	fn verify<'a>(
		&'a self,
		_grant: &'a TokenGrant,
		profile: &'a UserProfile,
	) -> VerifyFuture<'a, Self::User> {
		Box::pin(async move { Ok(profile.username.clone()) })
	}
}

/// Verify hook that declines every login without raising an error.
pub struct RejectAll;
impl Verify for RejectAll {
	type User = String;

	fn verify<'a>(
		&'a self,
		_grant: &'a TokenGrant,
		_profile: &'a UserProfile,
	) -> VerifyFuture<'a, Self::User> {
		Box::pin(async move { Ok(None) })
	}
}

/// Verify hook that fails with an application error.
pub struct FailingVerify;
impl Verify for FailingVerify {
	type User = String;

	fn verify<'a>(
		&'a self,
		_grant: &'a TokenGrant,
		_profile: &'a UserProfile,
	) -> VerifyFuture<'a, Self::User> {
		Box::pin(async move { Err("verify hook exploded".into()) })
	}
}

pub fn config() -> StrategyConfig {
	let callback = Url::parse("https://app.example.com/auth/discord/callback")
		.expect("Callback URL fixture should parse successfully.");

	StrategyConfig::builder("client-id", "client-secret", callback)
		.build()
		.expect("Config fixture should build successfully.")
}

pub fn stub_strategy<V>(engine: Arc<StubEngine>, verify: V) -> DiscordStrategy<V>
where
	V: Verify,
{
	DiscordStrategy::with_engine(config(), engine, verify)
		.expect("Strategy construction should succeed.")
}

pub fn grant(access_token: &str) -> TokenGrant {
	TokenGrant {
		access_token: access_token.into(),
		refresh_token: Some("refresh-fixture".into()),
		scopes: None,
		expires_in: None,
	}
}

pub fn ok_json(body: &str) -> ApiResponse {
	ApiResponse { status: 200, body: body.to_owned() }
}
