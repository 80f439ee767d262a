//! OAuth 2.0 engine facade composed by the strategy.
//!
//! [`OAuth2Engine`] is the capability surface of the generic OAuth 2.0 client the
//! strategy delegates to: authorization-redirect construction, the code-for-token
//! exchange, and the authenticated GET primitive used by the profile fetch. The
//! crate ships [`BasicEngine`], an implementation over [`oauth2::basic::BasicClient`],
//! but any implementation of the trait is acceptable—tests substitute a canned engine.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
	EndpointSet, HttpClientError, RedirectUrl, RequestTokenError, Scope, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicErrorResponseType, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	config::StrategyConfig,
	error::{ConfigError, ExchangeError, TransportError},
	http::{ApiFuture, ApiHttpClient, ApiResponse, StatusProbe},
	token::TokenGrant,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Boxed future returned by engine operations.
pub type EngineFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;
/// Boxed future returned by the authenticated GET primitive.
pub type GetFuture<'a> = ApiFuture<'a, ApiResponse, TransportError>;

#[cfg(feature = "reqwest")]
/// Engine specialized for the crate's default reqwest transport.
pub type ReqwestEngine = BasicEngine<ReqwestHttpClient>;

/// Options applied when constructing the authorization redirect.
///
/// Forwarded unchanged from [`authenticate`](crate::strategy::DiscordStrategy::authenticate)
/// to the engine. Scopes are joined with spaces, matching Discord's delimiter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizeOptions {
	/// OAuth scopes requested for the grant (e.g. `identify`, `email`).
	pub scopes: Vec<String>,
	/// Caller-supplied `state` value; a random CSRF token is generated when absent.
	pub state: Option<String>,
	/// Extra query parameters appended to the authorize URL (e.g. `prompt`).
	pub params: Vec<(String, String)>,
}
impl AuthorizeOptions {
	/// Creates an empty option set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a single scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scopes.push(scope.into());

		self
	}

	/// Appends multiple scopes.
	pub fn with_scopes<I>(mut self, scopes: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		self.scopes.extend(scopes.into_iter().map(Into::into));

		self
	}

	/// Overrides the `state` value instead of generating a random one.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Appends an extra authorize-URL query parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((key.into(), value.into()));

		self
	}
}

/// Redirect handed back to the hosting framework when a login starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRedirect {
	/// Fully-formed authorize URL the user agent should be sent to.
	pub url: Url,
	/// `state` value embedded in the URL; the hosting framework round-trips it.
	pub state: String,
}

/// Capability surface of the embedded generic OAuth 2.0 client.
///
/// Implementors are required to be `Send + Sync`. The strategy holds the engine behind
/// `Arc<dyn OAuth2Engine>` and never bypasses it for protocol work, which is what makes
/// canned substitutes viable in tests.
pub trait OAuth2Engine: Send + Sync {
	/// Constructs the authorization redirect for the configured provider.
	fn authorize_url(&self, options: &AuthorizeOptions) -> AuthorizationRedirect;

	/// Exchanges an authorization code for a token grant.
	fn exchange_code<'a>(&'a self, code: &'a str) -> EngineFuture<'a, TokenGrant>;

	/// Issues a single GET request carrying `access_token` as a Bearer credential in the
	/// `Authorization` header, never in the query string.
	fn bearer_get<'a>(&'a self, url: &'a Url, access_token: &'a str) -> GetFuture<'a>;
}

/// Engine implementation over the `oauth2` crate's [`BasicClient`].
///
/// Construction wires the client with the strategy configuration: authorization and
/// token endpoints, the registered callback URL, and client credentials sent as token
/// request body parameters (`AuthType::RequestBody`), which is how Discord expects
/// confidential clients to authenticate.
pub struct BasicEngine<C>
where
	C: ApiHttpClient,
{
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
}
impl<C> BasicEngine<C>
where
	C: ApiHttpClient,
{
	/// Builds an engine from the strategy configuration and an HTTP transport.
	pub fn from_config(
		config: &StrategyConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		let auth_url = AuthUrl::new(config.authorization_url.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "authorization", source })?;
		let token_url = TokenUrl::new(config.token_url.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "token", source })?;
		let redirect_url = RedirectUrl::new(config.callback_url.to_string())
			.map_err(|source| ConfigError::InvalidCallback { source })?;
		let oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.clone()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url)
			.set_redirect_uri(redirect_url)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self { oauth_client, http_client: http_client.into() })
	}
}
impl<C> OAuth2Engine for BasicEngine<C>
where
	C: ApiHttpClient,
{
	fn authorize_url(&self, options: &AuthorizeOptions) -> AuthorizationRedirect {
		let state = options.state.clone();
		let mut request = self.oauth_client.authorize_url(move || match state {
			Some(value) => CsrfToken::new(value),
			None => CsrfToken::new_random(),
		});

		for scope in &options.scopes {
			request = request.add_scope(Scope::new(scope.clone()));
		}
		for (key, value) in &options.params {
			request = request.add_extra_param(key.as_str(), value.as_str());
		}

		let (url, csrf) = request.url();

		AuthorizationRedirect { url, state: csrf.secret().clone() }
	}

	fn exchange_code<'a>(&'a self, code: &'a str) -> EngineFuture<'a, TokenGrant> {
		let probe = StatusProbe::default();

		Box::pin(async move {
			let handle = self.http_client.token_handle(probe.clone());
			let response = self
				.oauth_client
				.exchange_code(AuthorizationCode::new(code.to_owned()))
				.request_async(&handle)
				.await
				.map_err(|err| map_request_error(probe.last_status(), err))?;

			Ok(TokenGrant::from_response(&response))
		})
	}

	fn bearer_get<'a>(&'a self, url: &'a Url, access_token: &'a str) -> GetFuture<'a> {
		Box::pin(async move {
			self.http_client.bearer_get(url, access_token).await.map_err(TransportError::network)
		})
	}
}
impl<C> Debug for BasicEngine<C>
where
	C: ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BasicEngine").finish_non_exhaustive()
	}
}

fn map_request_error<E>(
	status: Option<u16>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(&response, status),
		RequestTokenError::Request(error) => map_transport_error(error, status),
		RequestTokenError::Parse(source, _body) =>
			ExchangeError::TokenResponseParse { source, status }.into(),
		RequestTokenError::Other(message) => ExchangeError::TokenEndpoint { message, status }.into(),
	}
}

fn map_server_response_error(response: &BasicErrorResponse, status: Option<u16>) -> Error {
	let reason = response
		.error_description()
		.cloned()
		.unwrap_or_else(|| response.error().as_ref().to_owned());

	match response.error() {
		BasicErrorResponseType::InvalidGrant => ExchangeError::InvalidGrant { reason }.into(),
		BasicErrorResponseType::InvalidClient | BasicErrorResponseType::UnauthorizedClient =>
			ExchangeError::InvalidClient { reason }.into(),
		_ => ExchangeError::TokenEndpoint {
			message: format!("Token endpoint returned an OAuth error: {reason}"),
			status,
		}
		.into(),
	}
}

fn map_transport_error<E>(err: HttpClientError<E>, status: Option<u16>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) =>
			ExchangeError::Transport(TransportError::network(*inner)).into(),
		HttpClientError::Http(inner) => ConfigError::HttpRequest(inner).into(),
		HttpClientError::Io(inner) => ExchangeError::Transport(TransportError::Io(inner)).into(),
		HttpClientError::Other(message) => ExchangeError::TokenEndpoint { message, status }.into(),
		_ => ExchangeError::TokenEndpoint {
			message: "HTTP client reported an unknown failure.".into(),
			status,
		}
		.into(),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::StandardErrorResponse;
	// self
	use super::*;

	fn server_error(kind: BasicErrorResponseType, description: Option<&str>) -> BasicErrorResponse {
		StandardErrorResponse::new(kind, description.map(str::to_owned), None)
	}

	#[test]
	fn invalid_grant_responses_are_classified() {
		let err = map_server_response_error(
			&server_error(BasicErrorResponseType::InvalidGrant, Some("code already used")),
			Some(400),
		);

		assert!(matches!(
			err,
			Error::Exchange(ExchangeError::InvalidGrant { ref reason }) if reason == "code already used"
		));
	}

	#[test]
	fn invalid_client_responses_are_classified() {
		let err = map_server_response_error(
			&server_error(BasicErrorResponseType::InvalidClient, None),
			Some(401),
		);

		assert!(matches!(err, Error::Exchange(ExchangeError::InvalidClient { .. })));
	}

	#[test]
	fn unrecognized_oauth_errors_keep_the_status() {
		let err = map_server_response_error(
			&server_error(BasicErrorResponseType::InvalidScope, None),
			Some(400),
		);

		assert!(matches!(
			err,
			Error::Exchange(ExchangeError::TokenEndpoint { status: Some(400), .. })
		));
	}
}
