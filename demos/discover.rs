//! Demonstrates a full relying-party login round trip against a mock OpenID provider: lazy
//! initialization through discovery, the authorization redirect, the code exchange, and the
//! claim-mapped userinfo lookup.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use oidc_relying_party::{
	auth::ProviderId,
	config::ProviderConfig,
	http::ReqwestHttpClient,
	oidc::DISCOVERY_PATH,
	provider::{ProviderRegistry, ReqwestOidcProvider},
	reqwest::Client,
	url::Url,
	url_helper::BaseUrlHelper,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let discovery_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(DISCOVERY_PATH);
			then.status(200).header("content-type", "application/json").json_body(json!({
				"issuer": server.base_url(),
				"authorization_endpoint": server.url("/authorize"),
				"token_endpoint": server.url("/token"),
				"userinfo_endpoint": server.url("/userinfo"),
				"end_session_endpoint": server.url("/logout"),
			}));
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"access_token": "demo-access",
				"expires_in": 900,
				"refresh_token": "demo-refresh",
				"scope": "openid profile email",
				"token_type": "Bearer",
			}));
		})
		.await;
	let userinfo_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/userinfo").header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "sub": "user-42", "email": "demo@example.com" }));
		})
		.await;
	let config = ProviderConfig::new(server.base_url(), "demo-client", "demo-secret")
		.with_arg("claim_id", "sub")
		.with_arg("prompt", "login");
	let url_helper = Arc::new(BaseUrlHelper::new(Url::parse("https://app.example.com")?));
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let registry = ProviderRegistry::default();
	let adapter = Arc::new(ReqwestOidcProvider::with_http_client(
		ProviderId::new("demo")?,
		config,
		url_helper,
		http_client,
	));

	registry.register(adapter.clone());
	adapter.init(&registry).await?;

	println!("Ready providers: {:?}.", registry.ready_providers());

	let provider = registry.get("demo").ok_or_else(|| color_eyre::eyre::eyre!("Not registered."))?;

	println!("Redirect the browser to {}.", provider.auth_url("demo-state")?);

	let tokens = provider.token("demo-code").await?;

	println!("Access token expires at {}.", tokens.expires_at);

	let user = provider.user(tokens.access_token.expose()).await?;

	println!("Signed in as {} ({:?}).", user.email, user.id);
	println!("Logout via {}.", adapter.logout_url(None)?);

	discovery_mock.assert_async().await;
	token_mock.assert_async().await;
	userinfo_mock.assert_async().await;

	Ok(())
}
