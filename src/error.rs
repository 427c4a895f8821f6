//! Crate-level error types shared by the exchanger, providers, and hosts.

// self
use crate::{_prelude::*, host::HostError, identity::IdentityError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error surfaced by the credential exchange.
///
/// Every variant is terminal for an invocation; its [`Display`] output becomes the failure
/// reason reported to the host.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Host environment failure (missing input, output publication).
	#[error(transparent)]
	Host(#[from] HostError),
	/// App identity values failed validation.
	#[error(transparent)]
	Identity(#[from] IdentityError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The authentication provider rejected the identity.
	#[error("{message}")]
	Rejected {
		/// HTTP status code, when the rejection came from an HTTP response.
		status: Option<u16>,
		/// Provider-supplied human-readable message.
		message: String,
	},
	/// Token endpoint responded with JSON that does not describe an installation token.
	#[error("Token endpoint returned malformed JSON at `{}`.", source.path())]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl Error {
	/// Builds a [`Error::Rejected`] without an HTTP status, as stub providers do.
	pub fn rejected(message: impl Into<String>) -> Self {
		Self::Rejected { status: None, message: message.into() }
	}
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// API base URL cannot be parsed.
	#[error("GitHub API URL `{value}` is invalid.")]
	InvalidApiUrl {
		/// Raw value that failed to parse.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// API base URL uses a scheme other than `http` or `https`.
	#[error("GitHub API URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// Private key could not be loaded as an RSA signing key.
	#[error("Private key is not a valid PEM-encoded RSA key.")]
	InvalidPrivateKey {
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// App JWT could not be signed.
	#[error("Unable to sign the GitHub App JWT.")]
	JwtSigning {
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Access-token request body could not be serialized.
	#[error("Unable to encode the access token request.")]
	RequestEncode(#[from] serde_json::Error),
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

/// Transport-level failures (DNS, TCP, TLS, body streaming).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the GitHub API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
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
