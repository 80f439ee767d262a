//! Discord authentication strategy surfaced to the hosting framework.
//!
//! [`DiscordStrategy`] composes a generic OAuth 2.0 engine and exposes the two
//! operations an authentication framework drives: [`authenticate`](DiscordStrategy::authenticate)
//! forwards the redirect/callback handshake to the engine, and
//! [`user_profile`](DiscordStrategy::user_profile) fetches and normalizes the
//! authenticated user's profile. The strategy adds no protocol logic of its own.

// self
use crate::{
	_prelude::*,
	config::{PROFILE_URL, StrategyConfig},
	error::{ConfigError, ExchangeError, ProfileEndpointError, ProfileError},
	oauth::{AuthorizationRedirect, AuthorizeOptions, OAuth2Engine},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	profile::UserProfile,
	token::TokenGrant,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::BasicEngine};

/// Name under which the hosting framework registers this strategy.
pub const STRATEGY_NAME: &str = "discord";

/// Boxed error type returned by application verify hooks.
pub type VerifyError = Box<dyn StdError + Send + Sync>;
/// Boxed future returned by [`Verify::verify`].
pub type VerifyFuture<'a, U> =
	Pin<Box<dyn Future<Output = Result<Option<U>, VerifyError>> + 'a + Send>>;

/// Application-supplied hook that turns a token grant and profile into a login decision.
///
/// Returning `Ok(Some(user))` accepts the login, `Ok(None)` rejects the credentials
/// without raising an error, and `Err` surfaces as [`Error::Verify`] with the cause
/// preserved.
pub trait Verify: Send + Sync {
	/// Application user type produced on success.
	type User: Send;

	/// Decides whether the authenticated Discord account maps to an application user.
	fn verify<'a>(
		&'a self,
		grant: &'a TokenGrant,
		profile: &'a UserProfile,
	) -> VerifyFuture<'a, Self::User>;
}

/// Incoming-request surface forwarded to the embedded engine.
#[derive(Clone, Debug)]
pub enum AuthenticateRequest {
	/// Initial navigation carrying no authorization response parameters.
	Start,
	/// Provider redirect carrying the authorization response.
	Callback(CallbackParams),
}

/// Query parameters delivered by the provider's redirect back to the callback URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
	/// Authorization code to exchange for tokens.
	pub code: Option<String>,
	/// Echoed `state` value; the hosting framework validates it against its session
	/// store before invoking the strategy.
	pub state: Option<String>,
	/// OAuth `error` parameter set when the user or provider declined.
	pub error: Option<String>,
	/// OAuth `error_description` parameter, when supplied.
	pub error_description: Option<String>,
}
impl CallbackParams {
	/// Extracts the authorization response parameters from a callback URL.
	pub fn from_query(url: &Url) -> Self {
		let mut params = Self::default();

		for (key, value) in url.query_pairs() {
			match key.as_ref() {
				"code" => params.code = Some(value.into_owned()),
				"state" => params.state = Some(value.into_owned()),
				"error" => params.error = Some(value.into_owned()),
				"error_description" => params.error_description = Some(value.into_owned()),
				_ => {},
			}
		}

		params
	}
}

/// Outcome handed back to the hosting framework by [`DiscordStrategy::authenticate`].
#[derive(Debug)]
pub enum Authentication<U> {
	/// Send the user agent to the provider's authorization endpoint.
	Redirect(AuthorizationRedirect),
	/// Handshake completed and the verify hook accepted the login.
	Authenticated {
		/// Application user produced by the verify hook.
		user: U,
		/// Tokens issued by the provider, passed through unmodified.
		grant: TokenGrant,
		/// Normalized profile of the authenticated account.
		profile: UserProfile,
	},
	/// Verify hook declined the credentials without raising an error.
	Denied,
}

/// The Discord authentication strategy.
///
/// Holds the immutable configuration, a shared engine reference, and the verify hook;
/// nothing is mutated per call, so one strategy instance is safe to reuse across
/// concurrent logins.
pub struct DiscordStrategy<V>
where
	V: Verify,
{
	config: StrategyConfig,
	engine: Arc<dyn OAuth2Engine>,
	profile_url: Url,
	verify: V,
}
impl<V> DiscordStrategy<V>
where
	V: Verify,
{
	/// Creates a strategy backed by the crate's default reqwest transport.
	#[cfg(feature = "reqwest")]
	pub fn new(config: StrategyConfig, verify: V) -> Result<Self> {
		let engine =
			BasicEngine::<ReqwestHttpClient>::from_config(&config, ReqwestHttpClient::default())?;

		Self::with_engine(config, Arc::new(engine), verify)
	}

	/// Creates a strategy over a caller-provided engine implementation.
	pub fn with_engine(
		config: StrategyConfig,
		engine: Arc<dyn OAuth2Engine>,
		verify: V,
	) -> Result<Self> {
		let profile_url = Url::parse(PROFILE_URL)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "profile", source })?;

		Ok(Self { config, engine, profile_url, verify })
	}

	/// Returns the registry name of this strategy.
	pub fn name(&self) -> &'static str {
		STRATEGY_NAME
	}

	/// Returns the configuration the strategy was constructed with.
	pub fn config(&self) -> &StrategyConfig {
		&self.config
	}

	/// Authenticates a request by delegating to the embedded OAuth 2.0 engine.
	///
	/// [`AuthenticateRequest::Start`] forwards `options` unchanged and returns the
	/// engine's redirect. [`AuthenticateRequest::Callback`] completes the standard
	/// authorization-code flow: code-for-token exchange, profile fetch, then the
	/// verify hook. Handshake failures surface however the engine produced them.
	pub async fn authenticate(
		&self,
		request: AuthenticateRequest,
		options: AuthorizeOptions,
	) -> Result<Authentication<V::User>> {
		const KIND: FlowKind = FlowKind::Authenticate;

		let span = FlowSpan::new(KIND, "authenticate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.run_authenticate(request, options)).await;

		obs::record_flow_outcome(
			KIND,
			if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure },
		);

		result
	}

	/// Fetches and normalizes the authenticated user's profile.
	///
	/// Issues exactly one GET to the fixed user-info endpoint with the access token as
	/// a Bearer credential in the `Authorization` header. Resolves with exactly one of
	/// the normalized profile or the error that prevented it: transport and
	/// non-success-status failures are wrapped as [`ProfileError::Fetch`] with the
	/// cause preserved, while malformed JSON surfaces as the raw
	/// [`ProfileError::Parse`]. There is no retry and no state carried across calls.
	pub async fn user_profile(&self, access_token: &str) -> Result<UserProfile, ProfileError> {
		const KIND: FlowKind = FlowKind::ProfileFetch;

		let span = FlowSpan::new(KIND, "user_profile");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.run_user_profile(access_token)).await;

		obs::record_flow_outcome(
			KIND,
			if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure },
		);

		result
	}

	async fn run_authenticate(
		&self,
		request: AuthenticateRequest,
		options: AuthorizeOptions,
	) -> Result<Authentication<V::User>> {
		let params = match request {
			AuthenticateRequest::Start =>
				return Ok(Authentication::Redirect(self.engine.authorize_url(&options))),
			AuthenticateRequest::Callback(params) => params,
		};

		if let Some(error) = params.error {
			return Err(
				ExchangeError::Denied { error, description: params.error_description }.into()
			);
		}

		let code = params.code.ok_or(ExchangeError::MissingCode)?;
		let grant = self.engine.exchange_code(&code).await?;
		let profile = self.user_profile(grant.access_token.reveal()).await?;
		let decision = self
			.verify
			.verify(&grant, &profile)
			.await
			.map_err(|source| Error::Verify { source })?;

		match decision {
			Some(user) => Ok(Authentication::Authenticated { user, grant, profile }),
			None => Ok(Authentication::Denied),
		}
	}

	async fn run_user_profile(&self, access_token: &str) -> Result<UserProfile, ProfileError> {
		let response = self
			.engine
			.bearer_get(&self.profile_url, access_token)
			.await
			.map_err(ProfileError::fetch)?;

		if !response.is_success() {
			return Err(ProfileError::fetch(ProfileEndpointError::new(
				response.status,
				&response.body,
			)));
		}

		UserProfile::from_body(&response.body)
	}
}
impl<V> Debug for DiscordStrategy<V>
where
	V: Verify,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DiscordStrategy")
			.field("name", &STRATEGY_NAME)
			.field("client_id", &self.config.client_id)
			.field("authorization_url", &self.config.authorization_url)
			.field("token_url", &self.config.token_url)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn callback_params_parse_from_query() {
		let url = Url::parse("https://app.example.com/cb?code=abc&state=xyz")
			.expect("Callback URL fixture should parse successfully.");
		let params = CallbackParams::from_query(&url);

		assert_eq!(params.code.as_deref(), Some("abc"));
		assert_eq!(params.state.as_deref(), Some("xyz"));
		assert_eq!(params.error, None);
	}

	#[test]
	fn callback_params_parse_error_responses() {
		let url = Url::parse(
			"https://app.example.com/cb?error=access_denied&error_description=declined",
		)
		.expect("Callback URL fixture should parse successfully.");
		let params = CallbackParams::from_query(&url);

		assert_eq!(params.code, None);
		assert_eq!(params.error.as_deref(), Some("access_denied"));
		assert_eq!(params.error_description.as_deref(), Some("declined"));
	}
}
