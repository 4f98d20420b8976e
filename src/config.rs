//! Provider configuration as loaded by the hosting application.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Provider settings read from application configuration.
///
/// Every field is optional so a provider can be left unconfigured; the adapter then stays
/// uninitialized instead of failing startup. Empty strings count as missing.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
	/// Issuer URL; discovery is fetched from `{issuer}/.well-known/openid-configuration`.
	pub issuer: Option<String>,
	/// OAuth client identifier.
	pub client_id: Option<String>,
	/// OAuth client secret.
	pub client_secret: Option<Secret>,
	/// Provider-specific overrides (`scope`, `claim_id`, `claim_email`, `claim_name`, and any
	/// extra authorization parameters).
	pub args: BTreeMap<String, String>,
}
impl ProviderConfig {
	/// Creates a fully configured provider entry.
	pub fn new(
		issuer: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			issuer: Some(issuer.into()),
			client_id: Some(client_id.into()),
			client_secret: Some(Secret::new(client_secret)),
			args: BTreeMap::new(),
		}
	}

	/// Adds or replaces a provider argument.
	pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.args.insert(key.into(), value.into());

		self
	}

	/// Returns `true` when issuer, client identifier, and client secret are all present.
	pub fn is_configured(&self) -> bool {
		self.credentials().is_ok()
	}

	/// Extracts the required credentials, naming the first missing field.
	pub fn credentials(&self) -> Result<Credentials, ConfigError> {
		let issuer = present(self.issuer.as_deref()).ok_or(ConfigError::MissingCredentials {
			field: "issuer",
		})?;
		let client_id = present(self.client_id.as_deref())
			.ok_or(ConfigError::MissingCredentials { field: "client_id" })?;
		let client_secret = present(self.client_secret.as_ref().map(Secret::expose))
			.ok_or(ConfigError::MissingCredentials { field: "client_secret" })?;

		Ok(Credentials {
			issuer: issuer.to_owned(),
			client_id: client_id.to_owned(),
			client_secret: Secret::new(client_secret),
		})
	}
}
impl Debug for ProviderConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfig")
			.field("issuer", &self.issuer)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("args", &self.args)
			.finish()
	}
}

/// Required provider credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// Issuer URL string (not yet validated).
	pub issuer: String,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Secret,
}

fn present(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn credentials_name_the_missing_field() {
		let config = ProviderConfig::new("https://id.example.com", "client", "secret");

		assert!(config.is_configured());

		let missing_secret = ProviderConfig { client_secret: None, ..config.clone() };
		let err = missing_secret.credentials().expect_err("Missing secret should be reported.");

		assert!(matches!(err, ConfigError::MissingCredentials { field: "client_secret" }));

		let empty_issuer = ProviderConfig { issuer: Some(String::new()), ..config };
		let err = empty_issuer.credentials().expect_err("Empty issuer should count as missing.");

		assert!(matches!(err, ConfigError::MissingCredentials { field: "issuer" }));
		assert!(!ProviderConfig::default().is_configured());
	}

	#[test]
	fn deserializes_partial_config_and_redacts_secret() {
		let config: ProviderConfig = serde_json::from_str(
			r#"{"issuer":"https://id.example.com","client_id":"app","client_secret":"s3cr3t","args":{"scope":"openid","claim_id":"sub"}}"#,
		)
		.expect("Provider config should deserialize.");

		assert_eq!(config.args.get("claim_id").map(String::as_str), Some("sub"));
		assert!(!format!("{config:?}").contains("s3cr3t"));

		let empty: ProviderConfig =
			serde_json::from_str("{}").expect("Empty provider config should deserialize.");

		assert_eq!(empty, ProviderConfig::default());
	}
}
