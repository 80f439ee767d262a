//! Normalized Discord user profile.

// self
use crate::{_prelude::*, error::ProfileError};

/// Provider tag attached to every normalized profile.
pub const PROVIDER: &str = "discord";

/// Provider-agnostic record describing the authenticated user.
///
/// The three normalized fields are copied directly from the corresponding top-level
/// JSON fields of the user-info response, with no renaming, validation, or coercion.
/// Any of them may be absent—Discord omits `email` unless the `email` scope was
/// granted—and absence is not an error. The literal body and the parsed structure
/// ride along for callers needing fields beyond the normalized set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Constant tag identifying this adapter; always [`PROVIDER`].
	pub provider: String,
	/// Externally-issued user identifier.
	pub id: Option<String>,
	/// Display username.
	pub username: Option<String>,
	/// Email address; present only when the granted scopes include it.
	pub email: Option<String>,
	/// Literal response body, kept verbatim for audit and debugging.
	#[serde(rename = "_raw")]
	pub raw: String,
	/// Parsed response structure for callers needing non-normalized fields.
	#[serde(rename = "_json")]
	pub json: JsonValue,
}
impl UserProfile {
	/// Normalizes a user-info response body.
	///
	/// Fails only when the body is not valid JSON, in which case the raw parse error
	/// is returned untranslated.
	pub fn from_body(body: &str) -> Result<Self, ProfileError> {
		let json: JsonValue = serde_json::from_str(body)?;

		Ok(Self {
			provider: PROVIDER.to_owned(),
			id: string_field(&json, "id"),
			username: string_field(&json, "username"),
			email: string_field(&json, "email"),
			raw: body.to_owned(),
			json,
		})
	}
}

fn string_field(json: &JsonValue, key: &str) -> Option<String> {
	json.get(key).and_then(JsonValue::as_str).map(str::to_owned)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn normalizes_the_top_level_fields() {
		let body = r#"{"id":"123","username":"alice","email":"a@example.com"}"#;
		let profile = UserProfile::from_body(body).expect("Well-formed body should normalize.");

		assert_eq!(profile.provider, PROVIDER);
		assert_eq!(profile.id.as_deref(), Some("123"));
		assert_eq!(profile.username.as_deref(), Some("alice"));
		assert_eq!(profile.email.as_deref(), Some("a@example.com"));
		assert_eq!(profile.raw, body);
		assert_eq!(profile.json["username"], "alice");
	}

	#[test]
	fn absent_email_is_not_an_error() {
		let profile = UserProfile::from_body(r#"{"id":"123","username":"alice"}"#)
			.expect("A body without email should still normalize.");

		assert_eq!(profile.email, None);
	}

	#[test]
	fn absent_id_and_username_are_preserved_as_none() {
		let profile = UserProfile::from_body("{}")
			.expect("An empty object is accepted; field presence is the application's concern.");

		assert_eq!(profile.id, None);
		assert_eq!(profile.username, None);
	}

	#[test]
	fn extra_fields_survive_in_the_json_passthrough() {
		let body = r#"{"id":"1","username":"bob","discriminator":"0042"}"#;
		let profile = UserProfile::from_body(body).expect("Body with extra fields should parse.");

		assert_eq!(profile.json["discriminator"], "0042");
	}

	#[test]
	fn malformed_bodies_surface_the_raw_parse_error() {
		let err = UserProfile::from_body("not-json")
			.expect_err("A non-JSON body must fail to normalize.");

		assert!(matches!(err, ProfileError::Parse(_)));
	}

	#[test]
	fn identical_bodies_normalize_to_equal_profiles() {
		let body = r#"{"id":"123","username":"alice"}"#;
		let first = UserProfile::from_body(body).expect("First normalization should succeed.");
		let second = UserProfile::from_body(body).expect("Second normalization should succeed.");

		assert_eq!(first, second);
	}
}
