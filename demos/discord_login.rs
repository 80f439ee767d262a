//! Interactive Discord login walkthrough.
//!
//! The example prints the authorize URL, waits for the user to paste the returned
//! `code` parameter via stdin, completes the code-for-token exchange plus profile
//! fetch, and prints the normalized profile so the whole strategy is exercised
//! end-to-end.

// std
use std::io::{self, Write};
// crates.io
use color_eyre::{Result, eyre::bail};
use url::Url;
// self
use oauth2_discord::{
	config::StrategyConfig,
	oauth::AuthorizeOptions,
	profile::UserProfile,
	strategy::{
		AuthenticateRequest, Authentication, CallbackParams, DiscordStrategy, Verify, VerifyFuture,
	},
	token::TokenGrant,
};

struct PrintLogin;
impl Verify for PrintLogin {
	type User = String;

	fn verify<'a>(
		&'a self,
		_grant: &'a TokenGrant,
		profile: &'a UserProfile,
	) -> VerifyFuture<'a, Self::User> {
		Box::pin(async move {
			let user = profile
				.username
				.clone()
				.or_else(|| profile.id.clone())
				.unwrap_or_else(|| "unknown".into());

			Ok(Some(user))
		})
	}
}

const DEFAULT_CALLBACK: &str = "https://app.example.com/auth/discord/callback";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client_id = ask("Discord client ID [demo-discord-client]")?
		.unwrap_or_else(|| "demo-discord-client".into());
	let client_secret = loop {
		match ask("Discord client secret")? {
			Some(secret) => break secret,
			None => println!("A client secret is required."),
		}
	};
	let redirect_input =
		ask(&format!("Redirect URI registered with Discord [{DEFAULT_CALLBACK}]"))?
			.unwrap_or_else(|| DEFAULT_CALLBACK.into());
	let callback_url = Url::parse(&redirect_input)?;
	let config = StrategyConfig::builder(client_id, client_secret, callback_url).build()?;
	let strategy = DiscordStrategy::new(config, PrintLogin)?;
	let options = AuthorizeOptions::new().with_scopes(["identify", "email"]);
	let redirect = match strategy.authenticate(AuthenticateRequest::Start, options).await? {
		Authentication::Redirect(redirect) => redirect,
		_ => bail!("Start requests always produce a redirect."),
	};

	println!("Authorize URL: {}", redirect.url);
	println!("State: {}", redirect.state);
	println!(
		"After Discord redirects back to your app, copy the `code` query parameter and paste it here."
	);

	let Some(code) = ask("Authorization code (leave blank to skip the live exchange)")? else {
		println!("Authorization code not provided; skipping the token exchange.");

		return Ok(());
	};
	let params = CallbackParams {
		code: Some(code),
		state: Some(redirect.state.clone()),
		..CallbackParams::default()
	};

	match strategy.authenticate(AuthenticateRequest::Callback(params), AuthorizeOptions::new()).await?
	{
		Authentication::Authenticated { user, grant, profile } => {
			println!("Logged in as: {user}");
			println!("Profile id: {}", profile.id.as_deref().unwrap_or("<absent>"));
			println!("Profile email: {}", profile.email.as_deref().unwrap_or("<absent>"));
			if grant.refresh_token.is_some() {
				println!("Provider issued a refresh token.");
			} else {
				println!("Provider did not return a refresh token.");
			}
		},
		Authentication::Denied => println!("Verify hook declined the login."),
		Authentication::Redirect(_) => bail!("Callback requests never produce a redirect."),
	}

	Ok(())
}

/// Prints `question`, reads one stdin line, and returns it trimmed; `None` when the
/// answer was empty. Defaults and required answers are the caller's business.
fn ask(question: &str) -> Result<Option<String>> {
	print!("{question}: ");

	io::stdout().flush()?;

	let mut line = String::new();

	io::stdin().read_line(&mut line)?;

	let answer = line.trim();

	Ok((!answer.is_empty()).then(|| answer.to_owned()))
}
