//! Claim-name mapping and the normalized user identity returned by userinfo lookups.

// self
use crate::_prelude::*;

/// Logical identity fields resolved from provider claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClaimKey {
	/// Stable user identifier.
	Id,
	/// Email address.
	Email,
	/// Display name.
	Name,
}
impl ClaimKey {
	/// Every logical key, in mapping order.
	pub const ALL: [ClaimKey; 3] = [ClaimKey::Id, ClaimKey::Email, ClaimKey::Name];

	/// Returns the logical key label.
	pub const fn as_str(self) -> &'static str {
		match self {
			ClaimKey::Id => "id",
			ClaimKey::Email => "email",
			ClaimKey::Name => "name",
		}
	}

	/// Provider argument that overrides the claim name for this key.
	pub const fn override_arg(self) -> &'static str {
		match self {
			ClaimKey::Id => "claim_id",
			ClaimKey::Email => "claim_email",
			ClaimKey::Name => "claim_name",
		}
	}

	/// Claim name used when no override is configured.
	pub const fn default_claim(self) -> &'static str {
		match self {
			ClaimKey::Id => "preferred_username",
			ClaimKey::Email => "email",
			ClaimKey::Name => "name",
		}
	}

	/// Returns `true` when `arg` is one of the claim override arguments.
	pub fn is_override_arg(arg: &str) -> bool {
		Self::ALL.iter().any(|key| key.override_arg() == arg)
	}
}
impl Display for ClaimKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Maps logical identity fields to provider-specific claim names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsMap {
	/// Claim carrying the user identifier.
	pub id: String,
	/// Claim carrying the email address.
	pub email: String,
	/// Claim carrying the display name.
	pub name: String,
}
impl ClaimsMap {
	/// Builds the active map from provider arguments, falling back to the defaults.
	pub fn from_args(args: &BTreeMap<String, String>) -> Self {
		let resolve = |key: ClaimKey| {
			args.get(key.override_arg()).cloned().unwrap_or_else(|| key.default_claim().to_owned())
		};

		Self {
			id: resolve(ClaimKey::Id),
			email: resolve(ClaimKey::Email),
			name: resolve(ClaimKey::Name),
		}
	}

	/// Claim name configured for `key`.
	pub fn claim(&self, key: ClaimKey) -> &str {
		match key {
			ClaimKey::Id => &self.id,
			ClaimKey::Email => &self.email,
			ClaimKey::Name => &self.name,
		}
	}
}
impl Default for ClaimsMap {
	fn default() -> Self {
		Self::from_args(&BTreeMap::new())
	}
}

/// Userinfo claims after remapping onto the logical keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedClaims {
	/// Identifier, absent when the configured claim is missing from the payload.
	pub id: Option<String>,
	/// Validated email address.
	pub email: String,
	/// Display name, absent when the configured claim is missing from the payload.
	pub name: Option<String>,
	/// Group names, when the provider reports them.
	pub groups: Option<Vec<String>>,
}

/// Normalized identity handed to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
	/// Identifier, absent when the configured claim is missing from the payload.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Email address.
	pub email: String,
}
impl From<MappedClaims> for UserIdentity {
	fn from(claims: MappedClaims) -> Self {
		Self { id: claims.id, email: claims.email }
	}
}

#[derive(garde::Validate)]
struct EmailAddress {
	#[garde(email)]
	address: String,
}

/// Returns `true` for an HTML5-valid address with a dot-atom local part and a dotted domain.
pub fn is_valid_email(candidate: &str) -> bool {
	use garde::Validate;

	if (EmailAddress { address: candidate.to_owned() }).validate().is_err() {
		return false;
	}

	let Some((local, domain)) = candidate.rsplit_once('@') else {
		return false;
	};

	local.split('.').all(|atom| !atom.is_empty()) && domain.contains('.')
}
