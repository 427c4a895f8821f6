//! GitHub App identity values validated once per invocation.

// std
use std::{num::ParseIntError, ops::Deref};
// self
use crate::_prelude::*;

/// Error returned when an identity value fails validation.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentityError {
	/// The value was empty or whitespace.
	#[error("{kind} cannot be empty.")]
	Empty {
		/// Kind of value (app ID, private key, installation ID).
		kind: &'static str,
	},
	/// The App identifier contains whitespace characters.
	#[error("App ID contains whitespace.")]
	AppIdWhitespace,
	/// The installation identifier is not a base-10 integer.
	#[error("Installation ID `{value}` is not a valid integer.")]
	InvalidInstallationId {
		/// Raw value supplied by the caller.
		value: String,
		/// Underlying integer parsing failure.
		#[source]
		source: ParseIntError,
	},
}

/// GitHub App identifier, used as the JWT issuer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AppId(String);
impl AppId {
	/// Creates a new App identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentityError> {
		let view = value.as_ref();

		if view.is_empty() {
			return Err(IdentityError::Empty { kind: "App ID" });
		}
		if view.chars().any(char::is_whitespace) {
			return Err(IdentityError::AppIdWhitespace);
		}

		Ok(Self(view.to_owned()))
	}
}
impl Deref for AppId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for AppId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Debug for AppId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "AppId({})", self.0)
	}
}
impl Display for AppId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for AppId {
	type Err = IdentityError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Numeric identifier of one App installation.
///
/// Parsing is stricter than a JavaScript `parseInt`: trailing garbage such as `42abc` is rejected
/// here instead of being truncated to `42` and forwarded to GitHub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallationId(u64);
impl InstallationId {
	/// Wraps an already numeric installation identifier.
	pub const fn new(value: u64) -> Self {
		Self(value)
	}

	/// Returns the numeric value forwarded to the provider.
	pub const fn get(self) -> u64 {
		self.0
	}
}
impl Display for InstallationId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}
impl FromStr for InstallationId {
	type Err = IdentityError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let view = s.trim();

		if view.is_empty() {
			return Err(IdentityError::Empty { kind: "Installation ID" });
		}

		view.parse::<u64>().map(Self).map_err(|source| IdentityError::InvalidInstallationId {
			value: s.to_owned(),
			source,
		})
	}
}

/// PEM-encoded App private key that never appears in formatted output.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);
impl PrivateKey {
	/// Wraps PEM text, expanding literal `\n` escapes left by single-line secret stores.
	pub fn new(pem: impl AsRef<str>) -> Result<Self, IdentityError> {
		let view = pem.as_ref().trim();

		if view.is_empty() {
			return Err(IdentityError::Empty { kind: "Private key" });
		}

		let normalized =
			if view.contains("\\n") { view.replace("\\n", "\n") } else { view.to_owned() };

		Ok(Self(normalized))
	}

	/// Returns the PEM text. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for PrivateKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("PrivateKey").field(&"<redacted>").finish()
	}
}
impl Display for PrivateKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Immutable identity used for one installation-token exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppIdentity {
	/// App identifier (JWT issuer).
	pub app_id: AppId,
	/// App private key used to sign the JWT.
	pub private_key: PrivateKey,
	/// Installation the token is requested for.
	pub installation_id: InstallationId,
}
impl AppIdentity {
	/// Validates the three raw parameters and assembles an identity.
	pub fn parse(
		app_id: &str,
		private_key: &str,
		installation_id: &str,
	) -> Result<Self, IdentityError> {
		Ok(Self {
			app_id: AppId::new(app_id)?,
			private_key: PrivateKey::new(private_key)?,
			installation_id: installation_id.parse()?,
		})
	}
}
