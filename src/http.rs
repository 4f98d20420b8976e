//! Transport primitives for provider calls.
//!
//! The module exposes [`OidcHttpClient`], the crate's only dependency on an HTTP stack.
//! Requests and responses use the `oauth2` crate's [`HttpRequest`]/[`HttpResponse`] types so
//! custom transports can be plugged in without pulling reqwest into downstream crates.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Abstraction over HTTP transports capable of calling the provider's endpoints.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back every
/// client and adapter in the process. The handles they return must own whatever state is
/// required so their request futures remain `Send` for the lifetime of the in-flight call.
pub trait OidcHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single provider call.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle for one outbound request.
	fn handle(&self) -> Self::Handle;
}

/// Executes `request` on `http_client`, converting transport failures into crate errors.
pub(crate) async fn execute<C>(http_client: &C, request: HttpRequest) -> Result<HttpResponse>
where
	C: OidcHttpClient,
{
	let handle = http_client.handle();

	handle.call(request).await.map_err(map_transport_error)
}

/// Converts an [`HttpClientError`] emitted by any transport into a crate error.
pub fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::Network { source: inner }.into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unknown transport failure".into() }.into(),
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl OidcHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Per-request handle returned by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, ThisError)]
	#[error("Connection refused.")]
	struct Refused;

	#[test]
	fn transport_failures_map_to_crate_errors() {
		let err = map_transport_error(HttpClientError::Reqwest(Box::new(Refused)));

		assert!(matches!(err, Error::Transport(TransportError::Network { .. })));

		let err = map_transport_error::<Refused>(HttpClientError::Other("boom".into()));

		assert!(matches!(err, Error::Transport(TransportError::Other { .. })));

		let io = std::io::Error::other("pipe closed");
		let err = map_transport_error::<Refused>(HttpClientError::Io(io));

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));
	}
}
