//! Name-indexed composition of registered providers.

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	provider::{OAuthProvider, ProviderRegistration},
};

/// Registered providers plus the set that signalled readiness.
///
/// Callback routes should only be served for names reported by [`ProviderRegistry::is_ready`].
#[derive(Default)]
pub struct ProviderRegistry {
	providers: RwLock<BTreeMap<ProviderId, Arc<dyn OAuthProvider>>>,
	ready: RwLock<BTreeSet<ProviderId>>,
}
impl ProviderRegistry {
	/// Registers `provider` under its name, replacing any previous entry.
	pub fn register(&self, provider: Arc<dyn OAuthProvider>) {
		let name = provider.provider_name().clone();

		self.providers.write().insert(name, provider);
	}

	/// Looks up a provider by name.
	pub fn get(&self, name: &str) -> Option<Arc<dyn OAuthProvider>> {
		self.providers.read().get(name).cloned()
	}

	/// Returns `true` once the named provider signalled readiness.
	pub fn is_ready(&self, name: &str) -> bool {
		self.ready.read().contains(name)
	}

	/// Names of every provider that signalled readiness, in name order.
	pub fn ready_providers(&self) -> Vec<ProviderId> {
		self.ready.read().iter().cloned().collect()
	}
}
impl ProviderRegistration for ProviderRegistry {
	fn mark_ready(&self, provider: &ProviderId) {
		self.ready.write().insert(provider.clone());
	}
}
impl Debug for ProviderRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderRegistry")
			.field("providers", &self.providers.read().keys().collect::<Vec<_>>())
			.field("ready", &*self.ready.read())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{TokenResult, UserIdentity},
		provider::ProviderFuture,
	};

	struct StaticProvider(ProviderId);
	impl OAuthProvider for StaticProvider {
		fn provider_name(&self) -> &ProviderId {
			&self.0
		}

		fn auth_url(&self, state: &str) -> Result<Url> {
			let mut url =
				Url::parse("https://id.example.com/authorize").expect("URL fixture should parse.");

			url.query_pairs_mut().append_pair("state", state);

			Ok(url)
		}

		fn token<'a>(&'a self, _code: &'a str) -> ProviderFuture<'a, TokenResult> {
			Box::pin(async { Err(Error::NotReady { provider: self.0.clone() }) })
		}

		fn user<'a>(&'a self, _access_token: &'a str) -> ProviderFuture<'a, UserIdentity> {
			Box::pin(async { Err(Error::NotReady { provider: self.0.clone() }) })
		}
	}

	#[test]
	fn registry_tracks_providers_and_readiness() {
		let registry = ProviderRegistry::default();
		let name = ProviderId::new("static").expect("Provider fixture should be valid.");

		registry.register(Arc::new(StaticProvider(name.clone())));

		assert!(registry.get("static").is_some());
		assert!(registry.get("missing").is_none());
		assert!(!registry.is_ready("static"));

		registry.mark_ready(&name);

		assert!(registry.is_ready("static"));
		assert_eq!(registry.ready_providers(), vec![name]);

		let url = registry
			.get("static")
			.expect("Registered provider should resolve.")
			.auth_url("s1")
			.expect("Static provider should build a URL.");

		assert_eq!(url.query(), Some("state=s1"));
	}
}
