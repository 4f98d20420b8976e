//! Token exchange result handed back to the caller.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	schema::{TokenResponse, ValidationError},
};

/// Tokens issued by an authorization-code exchange.
///
/// The record is created once per exchange and owned by the caller; this crate never
/// stores, refreshes, or revokes it.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResult {
	/// Access token secret; callers must avoid logging it.
	pub access_token: Secret,
	/// Refresh token secret.
	pub refresh_token: Secret,
	/// Absolute expiry computed from the fetch instant plus `expires_in`.
	pub expires_at: OffsetDateTime,
	/// Space-delimited scope string exactly as reported by the provider.
	pub scope: String,
}
impl TokenResult {
	/// Maps a validated token response fetched at `fetched_at`.
	pub fn from_response(
		response: TokenResponse,
		fetched_at: OffsetDateTime,
	) -> Result<Self, ValidationError> {
		let expires_at = fetched_at
			.checked_add(Duration::seconds(response.expires_in_secs()))
			.ok_or_else(|| {
				ValidationError::field("expires_in", "value exceeds the supported range")
			})?;

		Ok(Self {
			access_token: Secret::new(response.access_token),
			refresh_token: Secret::new(response.refresh_token),
			expires_at,
			scope: response.scope,
		})
	}

	/// Returns `true` once `instant` reaches the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}
}
impl Debug for TokenResult {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResult")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.field("scope", &self.scope)
			.finish()
	}
}
