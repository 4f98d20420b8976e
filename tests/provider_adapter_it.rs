#![cfg(feature = "reqwest")]

mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::*;
use oidc_relying_party::{
	auth::ProviderId,
	config::ProviderConfig,
	error::Error,
	oidc::DISCOVERY_PATH,
	provider::{OidcProvider, ProviderRegistry, ProviderStatus, ReqwestOidcProvider},
	url::Url,
};

fn provider(config: ProviderConfig) -> ReqwestOidcProvider {
	let name = ProviderId::new("oidc").expect("Provider fixture should be valid.");

	OidcProvider::with_http_client(name, config, url_helper(), test_http_client())
}

#[tokio::test]
async fn operations_fail_fast_before_init() {
	let server = MockServer::start_async().await;
	let discovery = mock_discovery(&server).await;
	let provider = provider(provider_config(&server));

	assert_eq!(provider.status(), ProviderStatus::Uninitialized);
	assert!(matches!(provider.auth_url("s1"), Err(Error::NotReady { .. })));
	assert!(matches!(provider.token("code").await, Err(Error::NotReady { .. })));
	assert!(matches!(provider.user("token").await, Err(Error::NotReady { .. })));

	discovery.assert_calls_async(0).await;
}

#[tokio::test]
async fn init_discovers_once_and_signals_readiness() {
	let server = MockServer::start_async().await;
	let discovery = mock_discovery(&server).await;
	let registry = ProviderRegistry::default();
	let provider = provider(provider_config(&server).with_arg("scope", "openid email"));
	let (first, second) = tokio::join!(provider.init(&registry), provider.init(&registry));

	assert_eq!(first.expect("First init should succeed."), ProviderStatus::Ready);
	assert_eq!(second.expect("Second init should succeed."), ProviderStatus::Ready);
	assert_eq!(provider.init(&registry).await.expect("Re-init is a no-op."), ProviderStatus::Ready);
	assert!(provider.is_ready());
	assert!(registry.is_ready("oidc"));

	discovery.assert_calls_async(1).await;

	let url = provider.auth_url("xyz").expect("Authorization URL should build.");
	let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

	assert!(url.as_str().starts_with(&server.url("/authorize")));
	assert!(pairs.contains(&("state".into(), "xyz".into())));
	assert!(pairs.contains(&("scope".into(), "openid email".into())));

	let redirect = Url::parse("https://app.example.com/").expect("Redirect fixture should parse.");
	let logout = provider.logout_url(Some(&redirect)).expect("Logout URL should build.");

	assert!(logout.as_str().starts_with(&server.url("/logout")));
}

#[tokio::test]
async fn failed_discovery_keeps_provider_uninitialized() {
	let server = MockServer::start_async().await;
	let discovery = server
		.mock_async(|when, then| {
			when.method(GET).path(DISCOVERY_PATH);
			then.status(502).body("bad gateway");
		})
		.await;
	let registry = ProviderRegistry::default();
	let provider = provider(provider_config(&server));
	let err = provider.init(&registry).await.expect_err("Discovery failure should propagate.");

	discovery.assert_async().await;

	assert!(matches!(err, Error::ProviderIntegration { status: 502, .. }));
	assert_eq!(provider.status(), ProviderStatus::Uninitialized);
	assert!(!registry.is_ready("oidc"));
	assert!(matches!(provider.auth_url("s1"), Err(Error::NotReady { .. })));
}

#[tokio::test]
async fn unconfigured_provider_never_contacts_the_issuer() {
	let server = MockServer::start_async().await;
	let discovery = mock_discovery(&server).await;
	let registry = ProviderRegistry::default();
	let config = ProviderConfig { client_id: None, ..provider_config(&server) };
	let provider = provider(config);
	let status = provider.init(&registry).await.expect("Unconfigured init is not an error.");

	assert_eq!(status, ProviderStatus::Uninitialized);
	assert!(registry.ready_providers().is_empty());

	discovery.assert_calls_async(0).await;
}

#[tokio::test]
async fn registry_drives_the_login_round_trip() {
	let server = MockServer::start_async().await;
	let _discovery = mock_discovery(&server).await;
	let _token = server
		.mock_async(|when, then| {
			when.method(POST).path("/token").body_includes("code=code-1");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"access_token": "access-1",
				"expires_in": 60,
				"refresh_token": "refresh-1",
				"scope": "openid profile email",
				"token_type": "Bearer",
			}));
		})
		.await;
	let _userinfo = server
		.mock_async(|when, then| {
			when.method(GET).path("/userinfo").header("authorization", "Bearer access-1");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "sub": "u1", "email": "a@b.com" }));
		})
		.await;
	let registry = ProviderRegistry::default();
	let adapter = Arc::new(provider(provider_config(&server).with_arg("claim_id", "sub")));

	registry.register(adapter.clone());
	adapter.init(&registry).await.expect("Init should succeed.");

	let provider = registry.get("oidc").expect("Provider should be registered.");

	assert!(registry.is_ready(provider.provider_name()));

	let tokens = provider.token("code-1").await.expect("Token exchange should succeed.");
	let user = provider.user(tokens.access_token.expose()).await.expect("Userinfo should map.");

	assert_eq!(user.id.as_deref(), Some("u1"));
	assert_eq!(user.email, "a@b.com");
}
