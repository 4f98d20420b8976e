//! Client-level error types shared across discovery, token exchange, userinfo, and providers.

// self
use crate::{_prelude::*, auth::ProviderId, oidc::Endpoint, schema::ValidationError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; fatal at startup and never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Provider rejected the request with a 4xx status.
	#[error("The {endpoint} endpoint rejected the request with HTTP {status}: {detail}.")]
	ClientRequest {
		/// Endpoint that produced the response.
		endpoint: Endpoint,
		/// HTTP status code.
		status: u16,
		/// Preview of the provider-supplied response body.
		detail: String,
	},
	/// Provider answered with a non-2xx, non-4xx status.
	#[error("The {endpoint} endpoint failed with HTTP {status}: {detail}.")]
	ProviderIntegration {
		/// Endpoint that produced the response.
		endpoint: Endpoint,
		/// HTTP status code.
		status: u16,
		/// Preview of the provider-supplied response body.
		detail: String,
	},
	/// Provider answered 2xx but the payload does not match the expected schema.
	#[error("The {endpoint} endpoint returned a payload that violates its contract.")]
	ContractViolation {
		/// Endpoint that produced the response.
		endpoint: Endpoint,
		/// Validation failure detail.
		#[source]
		source: ValidationError,
	},
	/// Provider adapter was used before discovery completed.
	#[error("Provider `{provider}` is not loaded yet.")]
	NotReady {
		/// Provider name tag.
		provider: ProviderId,
	},
}
impl Error {
	/// HTTP status reported by the provider, when the error carries one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::ClientRequest { status, .. } | Self::ProviderIntegration { status, .. } =>
				Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised before any protocol exchange.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Issuer, client identifier, or client secret is missing.
	#[error("Provider configuration is missing `{field}`.")]
	MissingCredentials {
		/// Name of the first missing field.
		field: &'static str,
	},
	/// Issuer does not pass URL validation.
	#[error("Issuer `{issuer}` is not a valid URL.")]
	InvalidIssuer {
		/// Issuer string as configured.
		issuer: String,
	},
	/// An application link could not be resolved against the base URL.
	#[error("Link `{path}` cannot be resolved.")]
	InvalidLink {
		/// Path that failed to resolve.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// HTTP client reported a failure without a structured source.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
