//! Discord OAuth 2.0 authentication strategy—delegate the authorization-code handshake to a
//! generic OAuth 2.0 client and hand normalized user profiles to your authentication framework.
//!
//! The strategy owns no protocol logic of its own. It configures the [`oauth2`] crate with
//! Discord's endpoints and header conventions, forwards the redirect/callback handshake to that
//! engine, and translates Discord's `/users/@me` payload into a stable [`profile::UserProfile`]
//! shape for the embedding application's verify hook.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod profile;
pub mod strategy;
pub mod token;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
