//! Pure validators for provider payloads.
//!
//! Every network operation hands the raw response body to [`validate`], which decodes it
//! with [`serde_path_to_error`] (so failures carry the offending JSON path) and then runs the
//! type's [`Schema::check`] hook for rules serde cannot express. Nothing here touches the
//! network, so the validators are unit-testable on their own.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::{ClaimKey, ClaimsMap, MappedClaims, is_valid_email},
};

/// Payload failed validation.
#[derive(Debug, ThisError)]
pub enum ValidationError {
	/// Payload could not be decoded into the expected shape.
	#[error("Payload does not match the expected shape: {0}.")]
	Shape(#[from] serde_path_to_error::Error<serde_json::Error>),
	/// Payload carries extra content after the JSON document.
	#[error("Payload has trailing content after the JSON document: {0}.")]
	Trailing(#[source] serde_json::Error),
	/// A decoded field violates a semantic rule.
	#[error("Field `{field}` is invalid: {reason}.")]
	Field {
		/// Offending field name.
		field: String,
		/// Human-readable rule that failed.
		reason: String,
	},
}
impl ValidationError {
	/// Builds a [`ValidationError::Field`].
	pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Field { field: field.into(), reason: reason.into() }
	}

	/// JSON path or field name of the failure.
	pub fn path(&self) -> String {
		match self {
			Self::Shape(err) => err.path().to_string(),
			Self::Trailing(_) => ".".into(),
			Self::Field { field, .. } => field.clone(),
		}
	}
}

/// Payload type with optional post-decode checks.
pub trait Schema
where
	Self: Sized + DeserializeOwned,
{
	/// Rules that cannot be expressed through serde alone.
	fn check(&self) -> Result<(), ValidationError> {
		Ok(())
	}
}

/// Decodes and checks `payload` as `T`.
pub fn validate<T>(payload: &[u8]) -> Result<T, ValidationError>
where
	T: Schema,
{
	let mut de = serde_json::Deserializer::from_slice(payload);
	let value: T = serde_path_to_error::deserialize(&mut de)?;

	de.end().map_err(ValidationError::Trailing)?;
	value.check()?;

	Ok(value)
}

/// Endpoints published by `/.well-known/openid-configuration`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryDocument {
	/// Authorization endpoint the user agent is redirected to.
	pub authorization_endpoint: Url,
	/// Token endpoint for code exchanges.
	pub token_endpoint: Url,
	/// Userinfo endpoint returning identity claims.
	pub userinfo_endpoint: Url,
	/// End-session endpoint for RP-initiated logout.
	pub end_session_endpoint: Url,
}
impl Schema for DiscoveryDocument {
	fn check(&self) -> Result<(), ValidationError> {
		check_endpoint("authorization_endpoint", &self.authorization_endpoint)?;
		check_endpoint("token_endpoint", &self.token_endpoint)?;
		check_endpoint("userinfo_endpoint", &self.userinfo_endpoint)?;
		check_endpoint("end_session_endpoint", &self.end_session_endpoint)?;

		Ok(())
	}
}

/// Successful token endpoint response.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
	/// Issued access token.
	pub access_token: String,
	/// Lifetime in seconds.
	pub expires_in: u64,
	/// Issued refresh token.
	pub refresh_token: String,
	/// Granted scope string.
	pub scope: String,
	/// Token type (usually `Bearer`).
	pub token_type: String,
}
impl TokenResponse {
	/// Lifetime as signed seconds, saturating at `i64::MAX`.
	pub fn expires_in_secs(&self) -> i64 {
		i64::try_from(self.expires_in).unwrap_or(i64::MAX)
	}
}
impl Schema for TokenResponse {}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("refresh_token", &"<redacted>")
			.field("scope", &self.scope)
			.field("token_type", &self.token_type)
			.finish()
	}
}

/// Raw userinfo claims as returned by the provider.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct UserInfoClaims(pub Map<String, Value>);
impl UserInfoClaims {
	/// Remaps the payload onto the logical keys configured in `claims`.
	///
	/// The email claim is required and must hold a valid address; the id and name claims are
	/// copied only when present. `groups` is accepted as a list of strings.
	pub fn map(&self, claims: &ClaimsMap) -> Result<MappedClaims, ValidationError> {
		let mut mapped = BTreeMap::new();

		for key in ClaimKey::ALL {
			let claim = claims.claim(key);

			match self.0.get(claim) {
				Some(Value::String(value)) => {
					mapped.insert(key, value.clone());
				},
				Some(_) => return Err(ValidationError::field(claim, "expected a string")),
				None => {},
			}
		}

		let email_claim = claims.claim(ClaimKey::Email);
		let email = mapped
			.remove(&ClaimKey::Email)
			.ok_or_else(|| ValidationError::field(email_claim, "required claim is missing"))?;

		if !is_valid_email(&email) {
			return Err(ValidationError::field(email_claim, "expected an email address"));
		}

		Ok(MappedClaims {
			id: mapped.remove(&ClaimKey::Id),
			email,
			name: mapped.remove(&ClaimKey::Name),
			groups: self.groups()?,
		})
	}

	fn groups(&self) -> Result<Option<Vec<String>>, ValidationError> {
		match self.0.get("groups") {
			None | Some(Value::Null) => Ok(None),
			Some(Value::Array(items)) => items
				.iter()
				.map(|item| match item {
					Value::String(group) => Ok(group.clone()),
					_ => Err(ValidationError::field("groups", "expected a list of strings")),
				})
				.collect::<Result<Vec<_>, _>>()
				.map(Some),
			Some(_) => Err(ValidationError::field("groups", "expected a list of strings")),
		}
	}
}
impl Schema for UserInfoClaims {}

fn check_endpoint(name: &'static str, url: &Url) -> Result<(), ValidationError> {
	if url.cannot_be_a_base() || url.host().is_none() {
		return Err(ValidationError::field(name, "expected an absolute URL"));
	}

	Ok(())
}
